//! Canonical form: `(value, value, ...)`, with nested predicates rendered
//! as `name(args...)`.
//!
//! Empty strings render as nothing, the empty predicate as `()`, quote
//! strings inside double quotes, and floats always with a fractional part.

use super::Grammar;
use crate::matrix::Matrix;
use crate::predicate::Predicate;
use crate::value::{Payload, Value};

/// The canonical grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonical;

impl Grammar for Canonical {
    fn open_matrix(&self, out: &mut String, _matrix: &Matrix) {
        out.push('(');
    }

    fn close_matrix(&self, out: &mut String) {
        out.push(')');
    }

    fn open_predicate(&self, out: &mut String, predicate: &Predicate) {
        out.push_str(predicate.name());
        out.push('(');
    }

    fn close_predicate(&self, out: &mut String) {
        out.push(')');
    }

    fn open_value(&self, _out: &mut String, _value: &Value) {}

    fn scalar(&self, out: &mut String, payload: &Payload) {
        match payload {
            Payload::Float(v) => out.push_str(&format!("{v:?}")),
            Payload::Integer(v) => out.push_str(&v.to_string()),
            Payload::Nominal(s) | Payload::TextString(s) => {
                out.push_str(s.as_deref().unwrap_or_default());
            }
            Payload::QuoteString(s) => {
                out.push('"');
                out.push_str(s.as_deref().unwrap_or_default());
                out.push('"');
            }
            Payload::TimeStamp(ts) => out.push_str(&ts.to_string()),
            Payload::Predicate(_) => out.push_str("()"),
            Payload::Undefined(label) => out.push_str(label),
        }
    }

    fn close_value(&self, _out: &mut String, _value: &Value) {}
}
