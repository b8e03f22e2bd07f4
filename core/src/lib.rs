//! Typed-tuple engine for an embedded annotation database.
//!
//! A schema ([`VocabElement`]) declares an ordered list of typed formal
//! parameters. Runtime tuples, [`Matrix`] and [`Predicate`], bind concrete
//! [`Value`]s to a schema and enforce the binding rule on every
//! construction and mutation. Predicates are themselves values, so tuples
//! nest without limit.
//!
//! # Entry Point
//!
//! ```
//! use annotdb_core::{
//!     FormalParameter, Matrix, ParamType, Predicate, ScalarType, SchemaRegistry, Value,
//!     VocabElement,
//! };
//!
//! let mut registry = SchemaRegistry::default();
//! let pve0 = registry.register(VocabElement::predicate(
//!     "pve0",
//!     vec![
//!         FormalParameter::new("<arg1>", ParamType::Untyped)?,
//!         FormalParameter::new("<arg2>", ParamType::Untyped)?,
//!     ],
//! )?)?;
//! let pred_mve = registry.register(VocabElement::tuple(
//!     "pred_mve",
//!     ScalarType::Predicate,
//!     vec![FormalParameter::new("<val>", ParamType::Predicate)?],
//! )?)?;
//! let db = registry.into_shared();
//!
//! let nested = Predicate::new(&db, pve0)?;
//! let m = Matrix::with_args(&db, pred_mve, vec![Value::predicate(nested)])?;
//! assert_eq!(m.to_canonical(), "(pve0(<arg1>, <arg2>))");
//! # Ok::<(), annotdb_core::EngineError>(())
//! ```
//!
//! # Serialization
//!
//! Every tuple and value renders in two forms, see [`serializer`]:
//!
//! ```
//! # use annotdb_core::Value;
//! let v = Value::integer(22);
//! assert_eq!(annotdb_core::serializer::to_canonical(&v), "22");
//! assert!(annotdb_core::serializer::to_diagnostic(&v).starts_with("(IntDataValue (id 0)"));
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `debug` for schema registration and
//! rejected arguments, `trace` for successful construction. Installing a
//! subscriber is left to the application.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)
)]

pub mod database;
pub mod error;
pub mod ids;
pub mod matrix;
pub mod names;
pub mod predicate;
pub mod schema;
pub mod serializer;
mod tuple;
pub mod value;

pub use database::{same_db, Database, DatabaseConfig, DbRef, SchemaRegistry};
pub use error::{EngineError, Result};
pub use ids::DbId;
pub use matrix::Matrix;
pub use predicate::Predicate;
pub use schema::{FormalParameter, ParamType, ScalarType, SchemaKind, SubRange, VocabElement};
pub use serializer::Form;
pub use value::{Payload, TimeStamp, Value, ValueKind};
