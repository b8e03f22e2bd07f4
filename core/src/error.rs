//! Error type shared by every fallible engine operation.
//!
//! Construction and mutation are all-or-nothing: when one of these errors is
//! returned, the tuple being built or modified is left exactly as it was.

use crate::ids::DbId;
use crate::schema::ParamType;
use crate::value::ValueKind;

/// Errors surfaced by schema lookup, tuple construction and tuple mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A required input is absent or malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A schema identity does not resolve to a schema of the requested kind.
    #[error("unknown schema: no schema of the requested kind has id {0}")]
    UnknownSchema(DbId),

    /// A formal parameter identity does not resolve.
    #[error("unknown parameter: no formal parameter has id {0}")]
    UnknownParameter(DbId),

    /// A supplied argument list does not fit the schema's arity.
    #[error("argument list has {found} values, schema expects {expected}")]
    LengthMismatch {
        /// Number of parameters declared by the schema.
        expected: usize,
        /// Number of values supplied.
        found: usize,
    },

    /// A value's variant may not occupy a slot of the given declared type.
    #[error("type mismatch: {found} value cannot occupy a slot of type {expected}")]
    TypeMismatch {
        /// Declared type of the target slot.
        expected: ParamType,
        /// Variant of the offending value.
        found: ValueKind,
    },

    /// A value is already bound to a different formal parameter.
    #[error("parameter mismatch: value is bound to parameter {found}, slot expects {expected}")]
    IdentityMismatch {
        /// Identity of the slot's formal parameter.
        expected: DbId,
        /// Identity the value is bound to.
        found: DbId,
    },

    /// An index-addressed accessor or mutator received an unusable index.
    #[error("index {0} is out of range")]
    Index(isize),
}

impl EngineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
