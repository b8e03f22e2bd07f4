//! Text forms of matrices, predicates and values.
//!
//! Two forms are supported:
//! - **Canonical** ([`canonical`]): the human-readable, identity-free form,
//!   e.g. `(pve0(<arg1>, <arg2>))`
//! - **Diagnostic** ([`diagnostic`]): a tagged S-expression carrying every
//!   identity, for debugging and snapshots
//!
//! Both are produced by a single traversal ([`render`]) parameterized by a
//! [`Grammar`], so the two forms always visit the same structure in the
//! same order. Nothing is cached: rendering after a mutation reflects it.

pub mod canonical;
pub mod diagnostic;

use crate::matrix::Matrix;
use crate::predicate::Predicate;
use crate::value::{Payload, Value};

/// Separator between the arguments of one tuple, in both forms.
pub const SEPARATOR: &str = ", ";

/// Which text form to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Form {
    /// Identity-free display form.
    Canonical,
    /// Identity-carrying debugging form.
    Diagnostic,
}

/// The tokens a form emits around the shared traversal.
pub trait Grammar {
    /// Opens a matrix, up to the first argument.
    fn open_matrix(&self, out: &mut String, matrix: &Matrix);
    /// Closes a matrix after its last argument.
    fn close_matrix(&self, out: &mut String);
    /// Opens a predicate, up to the first argument.
    fn open_predicate(&self, out: &mut String, predicate: &Predicate);
    /// Closes a predicate after its last argument.
    fn close_predicate(&self, out: &mut String);
    /// Emits everything of a value that precedes its payload.
    fn open_value(&self, out: &mut String, value: &Value);
    /// Emits a payload that is not a non-empty predicate.
    fn scalar(&self, out: &mut String, payload: &Payload);
    /// Emits everything of a value that follows its payload.
    fn close_value(&self, out: &mut String, value: &Value);
}

/// Something the traversal can start from.
pub trait Render {
    /// Appends this item in `grammar` to `out`.
    fn render_into(&self, grammar: &dyn Grammar, out: &mut String);
}

impl Render for Matrix {
    fn render_into(&self, grammar: &dyn Grammar, out: &mut String) {
        grammar.open_matrix(out, self);
        render_args(grammar, out, self.args());
        grammar.close_matrix(out);
    }
}

impl Render for Predicate {
    fn render_into(&self, grammar: &dyn Grammar, out: &mut String) {
        grammar.open_predicate(out, self);
        render_args(grammar, out, self.args());
        grammar.close_predicate(out);
    }
}

impl Render for Value {
    fn render_into(&self, grammar: &dyn Grammar, out: &mut String) {
        grammar.open_value(out, self);
        match self.payload() {
            Payload::Predicate(Some(nested)) => nested.render_into(grammar, out),
            payload => grammar.scalar(out, payload),
        }
        grammar.close_value(out, self);
    }
}

fn render_args(grammar: &dyn Grammar, out: &mut String, args: &[Value]) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        arg.render_into(grammar, out);
    }
}

/// Renders `item` in the requested form.
#[must_use]
pub fn render<T: Render + ?Sized>(item: &T, form: Form) -> String {
    let mut out = String::with_capacity(64);
    match form {
        Form::Canonical => item.render_into(&canonical::Canonical, &mut out),
        Form::Diagnostic => item.render_into(&diagnostic::Diagnostic, &mut out),
    }
    out
}

/// Canonical form of `item`.
#[must_use]
pub fn to_canonical<T: Render + ?Sized>(item: &T) -> String {
    render(item, Form::Canonical)
}

/// Diagnostic form of `item`.
#[must_use]
pub fn to_diagnostic<T: Render + ?Sized>(item: &T) -> String {
    render(item, Form::Diagnostic)
}
