//! JSON documents describing schemas and the cells built from them.
//!
//! ```json
//! {
//!   "schemas": [
//!     { "kind": "predicate", "name": "pve0",
//!       "params": [ { "name": "<arg1>", "type": "untyped" },
//!                   { "name": "<arg2>", "type": "untyped" } ] },
//!     { "kind": "tuple", "name": "pred_mve", "scalar": "predicate",
//!       "params": [ { "name": "<val>", "type": "predicate" } ] }
//!   ],
//!   "cells": [
//!     { "schema": "pred_mve",
//!       "args": [ { "predicate": { "schema": "pve0" } } ] }
//!   ]
//! }
//! ```
//!
//! Schemas are registered in document order, so a predicate subrange may
//! only name predicate-schemas declared above it. A cell or nested
//! predicate without `args` is built with default values.

use std::collections::{BTreeSet, HashMap};

use annotdb_core::{
    DatabaseConfig, DbId, DbRef, FormalParameter, Matrix, ParamType, Payload, Predicate,
    ScalarType, SchemaRegistry, SubRange, TimeStamp, Value, VocabElement,
};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

/// A whole input document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Document {
    /// Schemas to register, in order.
    #[serde(default)]
    pub schemas: Vec<SchemaDoc>,
    /// Cells to build.
    #[serde(default)]
    pub cells: Vec<CellDoc>,
}

/// A schema declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SchemaDoc {
    /// A tuple-schema.
    Tuple {
        /// Schema name.
        name: String,
        /// Scalar type tag.
        scalar: ScalarType,
        /// Formal parameters.
        params: Vec<ParamDoc>,
        /// Variable-length flag.
        #[serde(default)]
        var_len: bool,
    },
    /// A predicate-schema.
    Predicate {
        /// Schema name.
        name: String,
        /// Formal parameters.
        params: Vec<ParamDoc>,
        /// Variable-length flag.
        #[serde(default)]
        var_len: bool,
    },
}

/// A formal parameter declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDoc {
    /// Parameter name, e.g. `<arg1>`.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Optional subrange.
    #[serde(default)]
    pub subrange: Option<SubRangeDoc>,
}

/// A subrange declaration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubRangeDoc {
    /// Float bounds.
    Float {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Integer bounds.
    Integer {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// Time-stamp bounds, in ticks at `tps`.
    TimeStamp {
        /// Tick rate of both bounds.
        tps: u32,
        /// Lower bound in ticks.
        min: u64,
        /// Upper bound in ticks.
        max: u64,
    },
    /// Approved nominals.
    Nominal(Vec<String>),
    /// Names of approved predicate-schemas.
    Predicate(Vec<String>),
}

/// A stored cell: a matrix over a named tuple-schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellDoc {
    /// Tuple-schema name.
    pub schema: String,
    /// Arguments; defaults when absent.
    #[serde(default)]
    pub args: Option<Vec<ValueDoc>>,
}

/// A nested predicate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateDoc {
    /// Predicate-schema name.
    pub schema: String,
    /// Arguments; defaults when absent.
    #[serde(default)]
    pub args: Option<Vec<ValueDoc>>,
}

/// A value, externally tagged by variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDoc {
    /// Float.
    Float(f64),
    /// Integer.
    Integer(i64),
    /// Nominal; `null` for empty.
    Nominal(Option<String>),
    /// Quote string without quotes; `null` for empty.
    QuoteString(Option<String>),
    /// Text string; `null` for empty.
    TextString(Option<String>),
    /// Time stamp; `tps` defaults to the database tick rate.
    TimeStamp {
        /// Tick rate.
        #[serde(default)]
        tps: Option<u32>,
        /// Elapsed ticks.
        ticks: u64,
    },
    /// Nested predicate; `null` for the empty predicate.
    Predicate(Option<PredicateDoc>),
    /// Placeholder.
    Undefined,
}

/// A loaded document: the frozen database and one matrix per cell.
#[derive(Debug)]
pub struct Loaded {
    /// Database holding every declared schema.
    pub db: DbRef,
    /// Cells, in document order.
    pub cells: Vec<Matrix>,
}

impl Document {
    /// Parses a document.
    ///
    /// # Errors
    ///
    /// Returns an error if `text` is not a valid document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse document")
    }

    /// Registers the schemas and builds the cells.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending schema or cell if any
    /// declaration is rejected by the engine.
    pub fn load(&self, config: DatabaseConfig) -> Result<Loaded> {
        let mut registry = SchemaRegistry::new(config).context("Invalid database settings")?;
        let mut ids = SchemaIds::default();
        for schema in &self.schemas {
            let id = build_schema(&registry, schema)
                .and_then(|element| registry.register(element).map_err(Into::into))
                .with_context(|| format!("In schema {}", schema.name()))?;
            ids.0.insert(schema.name().to_owned(), id);
        }
        let db = registry.into_shared();
        info!(schemas = ids.0.len(), "registered schemas");

        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                build_cell(&db, &ids, cell)
                    .with_context(|| format!("In cell {i} (schema {})", cell.schema))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Loaded { db, cells })
    }
}

impl SchemaDoc {
    /// Declared schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Tuple { name, .. } | Self::Predicate { name, .. } => name,
        }
    }
}

/// Schema identities by name, recorded while registering.
#[derive(Debug, Default)]
struct SchemaIds(HashMap<String, DbId>);

impl SchemaIds {
    fn get(&self, name: &str) -> Result<DbId> {
        self.0
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("Unknown schema {name}"))
    }
}

fn build_schema(registry: &SchemaRegistry, doc: &SchemaDoc) -> Result<VocabElement> {
    let element = match doc {
        SchemaDoc::Tuple {
            name,
            scalar,
            params,
            var_len,
        } => VocabElement::tuple(name.as_str(), *scalar, build_params(registry, params)?)?
            .variable_length(*var_len),
        SchemaDoc::Predicate {
            name,
            params,
            var_len,
        } => VocabElement::predicate(name.as_str(), build_params(registry, params)?)?
            .variable_length(*var_len),
    };
    Ok(element)
}

fn build_params(registry: &SchemaRegistry, params: &[ParamDoc]) -> Result<Vec<FormalParameter>> {
    params
        .iter()
        .map(|doc| {
            let param = FormalParameter::new(doc.name.as_str(), doc.param_type)?;
            match &doc.subrange {
                Some(range) => Ok(param.with_subrange(build_subrange(registry, range)?)?),
                None => Ok(param),
            }
        })
        .collect()
}

fn build_subrange(registry: &SchemaRegistry, doc: &SubRangeDoc) -> Result<SubRange> {
    Ok(match doc {
        SubRangeDoc::Float { min, max } => SubRange::Float {
            min: *min,
            max: *max,
        },
        SubRangeDoc::Integer { min, max } => SubRange::Integer {
            min: *min,
            max: *max,
        },
        SubRangeDoc::TimeStamp { tps, min, max } => SubRange::TimeStamp {
            min: TimeStamp::new(*tps, *min)?,
            max: TimeStamp::new(*tps, *max)?,
        },
        SubRangeDoc::Nominal(names) => SubRange::Nominal(names.iter().cloned().collect()),
        SubRangeDoc::Predicate(names) => SubRange::Predicate(
            names
                .iter()
                .map(|name| {
                    registry
                        .schema_id(name)
                        .ok_or_else(|| anyhow!("Approved predicate {name} is not declared above"))
                })
                .collect::<Result<BTreeSet<DbId>>>()?,
        ),
    })
}

fn build_cell(db: &DbRef, ids: &SchemaIds, doc: &CellDoc) -> Result<Matrix> {
    let mve = ids.get(&doc.schema)?;
    let matrix = match &doc.args {
        Some(args) => Matrix::with_args(db, mve, build_values(db, ids, args)?)?,
        None => Matrix::new(db, mve)?,
    };
    debug!(schema = doc.schema.as_str(), args = matrix.num_args(), "built cell");
    Ok(matrix)
}

fn build_values(db: &DbRef, ids: &SchemaIds, docs: &[ValueDoc]) -> Result<Vec<Value>> {
    docs.iter().map(|doc| build_value(db, ids, doc)).collect()
}

fn build_value(db: &DbRef, ids: &SchemaIds, doc: &ValueDoc) -> Result<Value> {
    let value = match doc {
        ValueDoc::Float(v) => Value::float(*v),
        ValueDoc::Integer(v) => Value::integer(*v),
        ValueDoc::Nominal(s) => Value::new(Payload::Nominal(s.clone()))?,
        ValueDoc::QuoteString(s) => Value::new(Payload::QuoteString(s.clone()))?,
        ValueDoc::TextString(s) => Value::new(Payload::TextString(s.clone()))?,
        ValueDoc::TimeStamp { tps, ticks } => Value::time_stamp(TimeStamp::new(
            tps.unwrap_or_else(|| db.current_tick_count()),
            *ticks,
        )?),
        ValueDoc::Predicate(None) => Value::empty_predicate(),
        ValueDoc::Predicate(Some(pred)) => {
            let pve = ids.get(&pred.schema)?;
            let predicate = match &pred.args {
                Some(args) => Predicate::with_args(db, pve, build_values(db, ids, args)?)?,
                None => Predicate::new(db, pve)?,
            };
            Value::predicate(predicate)
        }
        ValueDoc::Undefined => Value::undefined(),
    };
    Ok(value)
}
