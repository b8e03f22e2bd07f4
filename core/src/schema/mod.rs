//! Schema model: formal parameters and the vocabulary elements that own them.
//!
//! Schemas are read-only from the engine's point of view. They are built
//! here, checked for well-formedness, and then handed to the Database
//! collaborator, which assigns identities.

mod formal;
mod vocab;

pub use formal::{FormalParameter, ParamType, SubRange};
pub use vocab::{ScalarType, SchemaKind, VocabElement};
