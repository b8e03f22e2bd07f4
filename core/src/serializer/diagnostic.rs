//! Diagnostic form: a fully parenthesized S-expression naming each variant
//! and carrying every identity.
//!
//! ```text
//! (Matrix (mveID 4) (varLen false) (argList ((IntDataValue (id 0) (itsFargID 5)
//!   (itsFargType INTEGER) (itsCellID 0) (itsValue 22) (subRange false)
//!   (minVal 0) (maxVal 0)))))
//! ```
//!
//! Floats and integers always list their bounds; time stamps list them only
//! when a subrange is in force. Empty strings render as `<null>` and an
//! unbound value's type as `UNDEFINED`.

use super::Grammar;
use crate::matrix::Matrix;
use crate::predicate::Predicate;
use crate::schema::SubRange;
use crate::value::{Payload, Value};

const NULL: &str = "<null>";
const UNBOUND_TYPE: &str = "UNDEFINED";

/// The diagnostic grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct Diagnostic;

impl Grammar for Diagnostic {
    fn open_matrix(&self, out: &mut String, matrix: &Matrix) {
        out.push_str(&format!(
            "(Matrix (mveID {}) (varLen {}) (argList (",
            matrix.mve_id(),
            matrix.var_len()
        ));
    }

    fn close_matrix(&self, out: &mut String) {
        out.push_str(")))");
    }

    fn open_predicate(&self, out: &mut String, predicate: &Predicate) {
        out.push_str(&format!(
            "(predicate (id {}) (predID {}) (predName {}) (varLen {}) (argList (",
            predicate.id(),
            predicate.pve_id(),
            predicate.name(),
            predicate.var_len()
        ));
    }

    fn close_predicate(&self, out: &mut String) {
        out.push_str(")))");
    }

    fn open_value(&self, out: &mut String, value: &Value) {
        out.push_str(&format!(
            "({} (id {}) (itsFargID {}) (itsFargType {}) (itsCellID {}) (itsValue ",
            value.kind().diagnostic_name(),
            value.id(),
            value.farg_id(),
            value.farg_type().map_or(UNBOUND_TYPE, |t| t.tag()),
            value.cell_id()
        ));
    }

    fn scalar(&self, out: &mut String, payload: &Payload) {
        match payload {
            Payload::Float(v) => out.push_str(&format!("{v:?}")),
            Payload::Integer(v) => out.push_str(&v.to_string()),
            Payload::Nominal(s) | Payload::QuoteString(s) | Payload::TextString(s) => {
                out.push_str(s.as_deref().unwrap_or(NULL));
            }
            Payload::TimeStamp(ts) => out.push_str(&ts.to_diagnostic_string()),
            Payload::Predicate(_) => out.push_str("()"),
            Payload::Undefined(label) => out.push_str(label),
        }
    }

    fn close_value(&self, out: &mut String, value: &Value) {
        let subranged = value.subrange().is_some();
        out.push_str(&format!(") (subRange {subranged})"));
        match (value.payload(), value.subrange()) {
            (Payload::Float(_), Some(SubRange::Float { min, max })) => {
                out.push_str(&format!(" (minVal {min:?}) (maxVal {max:?})"));
            }
            (Payload::Float(_), _) => out.push_str(" (minVal 0.0) (maxVal 0.0)"),
            (Payload::Integer(_), Some(SubRange::Integer { min, max })) => {
                out.push_str(&format!(" (minVal {min}) (maxVal {max})"));
            }
            (Payload::Integer(_), _) => out.push_str(" (minVal 0) (maxVal 0)"),
            (Payload::TimeStamp(_), Some(SubRange::TimeStamp { min, max })) => {
                out.push_str(&format!(
                    " (minVal {}) (maxVal {})",
                    min.to_diagnostic_string(),
                    max.to_diagnostic_string()
                ));
            }
            _ => {}
        }
        out.push(')');
    }
}
