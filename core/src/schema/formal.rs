//! Formal parameters: the named, typed slots of a schema.

use core::fmt;
use std::collections::BTreeSet;

use crate::error::{EngineError, Result};
use crate::ids::DbId;
use crate::names;
use crate::value::{TimeStamp, ValueKind};

/// Declared type of a formal parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParamType {
    /// Accepts float values.
    Float,
    /// Accepts integer values.
    Integer,
    /// Accepts nominal values.
    Nominal,
    /// Accepts predicate values.
    Predicate,
    /// Accepts quote-string values.
    QuoteString,
    /// Accepts text-string values.
    TextString,
    /// Accepts time-stamp values.
    TimeStamp,
    /// Accepts every variant except text strings.
    Untyped,
}

impl ParamType {
    /// All declared types, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Float,
        Self::Integer,
        Self::Nominal,
        Self::Predicate,
        Self::QuoteString,
        Self::TextString,
        Self::TimeStamp,
        Self::Untyped,
    ];

    /// The binding rule: may a value of variant `kind` occupy a slot of this
    /// declared type?
    ///
    /// Every typed slot takes exactly its own variant. An untyped slot takes
    /// every variant except text strings; text strings only ever occupy
    /// text-string slots.
    ///
    /// ```
    /// use annotdb_core::{ParamType, ValueKind};
    ///
    /// assert!(ParamType::Untyped.accepts(ValueKind::Float));
    /// assert!(ParamType::Untyped.accepts(ValueKind::Undefined));
    /// assert!(!ParamType::Untyped.accepts(ValueKind::TextString));
    /// assert!(!ParamType::Float.accepts(ValueKind::Integer));
    /// ```
    #[must_use]
    pub fn accepts(self, kind: ValueKind) -> bool {
        match (self, kind) {
            (Self::Untyped, ValueKind::TextString) => false,
            (Self::Untyped, _) => true,
            (Self::Float, ValueKind::Float)
            | (Self::Integer, ValueKind::Integer)
            | (Self::Nominal, ValueKind::Nominal)
            | (Self::Predicate, ValueKind::Predicate)
            | (Self::QuoteString, ValueKind::QuoteString)
            | (Self::TextString, ValueKind::TextString)
            | (Self::TimeStamp, ValueKind::TimeStamp) => true,
            _ => false,
        }
    }

    /// The variant a default value for this slot takes.
    #[must_use]
    pub fn default_kind(self) -> ValueKind {
        match self {
            Self::Float => ValueKind::Float,
            Self::Integer => ValueKind::Integer,
            Self::Nominal => ValueKind::Nominal,
            Self::Predicate => ValueKind::Predicate,
            Self::QuoteString => ValueKind::QuoteString,
            Self::TextString => ValueKind::TextString,
            Self::TimeStamp => ValueKind::TimeStamp,
            Self::Untyped => ValueKind::Undefined,
        }
    }

    /// Tag used for this type in the diagnostic form.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Float => "FLOAT",
            Self::Integer => "INTEGER",
            Self::Nominal => "NOMINAL",
            Self::Predicate => "PREDICATE",
            Self::QuoteString => "QUOTE_STRING",
            Self::TextString => "TEXT",
            Self::TimeStamp => "TIME_STAMP",
            Self::Untyped => "UNTYPED",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Nominal => "nominal",
            Self::Predicate => "predicate",
            Self::QuoteString => "quote string",
            Self::TextString => "text string",
            Self::TimeStamp => "time stamp",
            Self::Untyped => "untyped",
        })
    }
}

/// A restriction on the values a formal parameter admits.
#[derive(Debug, Clone, PartialEq)]
pub enum SubRange {
    /// Floats are clamped into `[min, max]`.
    Float {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Integers are clamped into `[min, max]`.
    Integer {
        /// Lower bound.
        min: i64,
        /// Upper bound.
        max: i64,
    },
    /// Time stamps are clamped into `[min, max]`.
    TimeStamp {
        /// Lower bound.
        min: TimeStamp,
        /// Upper bound.
        max: TimeStamp,
    },
    /// Only the listed nominals are admitted; others become empty.
    Nominal(BTreeSet<String>),
    /// Only predicates of the listed predicate-schemas are admitted; others
    /// become the empty predicate.
    Predicate(BTreeSet<DbId>),
}

impl SubRange {
    /// The declared type this constraint applies to.
    #[must_use]
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Float { .. } => ParamType::Float,
            Self::Integer { .. } => ParamType::Integer,
            Self::TimeStamp { .. } => ParamType::TimeStamp,
            Self::Nominal(_) => ParamType::Nominal,
            Self::Predicate(_) => ParamType::Predicate,
        }
    }

    fn validate(&self) -> Result<()> {
        let ordered = match self {
            Self::Float { min, max } => min < max,
            Self::Integer { min, max } => min < max,
            Self::TimeStamp { min, max } => min.ticks_per_second() == max.ticks_per_second()
                && min.ticks() < max.ticks(),
            Self::Nominal(approved) => {
                if let Some(bad) = approved.iter().find(|n| !names::is_valid_nominal(n)) {
                    return Err(EngineError::invalid(format!(
                        "approved nominal {bad:?} is not a valid nominal"
                    )));
                }
                true
            }
            Self::Predicate(_) => true,
        };
        if ordered {
            Ok(())
        } else {
            Err(EngineError::invalid("subrange requires min < max"))
        }
    }
}

/// A single named, typed slot of a schema.
///
/// The identity is assigned once, when the owning schema is registered with
/// the Database collaborator, and never changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FormalParameter {
    id: DbId,
    name: String,
    param_type: ParamType,
    subrange: Option<SubRange>,
}

impl FormalParameter {
    /// Creates an unregistered parameter.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `name` is not of the form
    /// `<name>`.
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Result<Self> {
        let name = name.into();
        if !names::is_valid_param_name(&name) {
            return Err(EngineError::invalid(format!(
                "{name:?} is not a valid formal parameter name"
            )));
        }
        Ok(Self {
            id: DbId::INVALID,
            name,
            param_type,
            subrange: None,
        })
    }

    /// Attaches a subrange constraint.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if the constraint's kind does
    /// not match the declared type or its bounds are not ordered.
    pub fn with_subrange(mut self, subrange: SubRange) -> Result<Self> {
        if subrange.param_type() != self.param_type {
            return Err(EngineError::invalid(format!(
                "{} subrange on {} parameter {}",
                subrange.param_type(),
                self.param_type,
                self.name
            )));
        }
        subrange.validate()?;
        self.subrange = Some(subrange);
        Ok(self)
    }

    /// Identity of this parameter; [`DbId::INVALID`] until registered.
    #[must_use]
    pub fn id(&self) -> DbId {
        self.id
    }

    /// Parameter name, including the angle brackets.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    #[must_use]
    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// Optional subrange constraint.
    #[must_use]
    pub fn subrange(&self) -> Option<&SubRange> {
        self.subrange.as_ref()
    }

    pub(crate) fn assign_id(&mut self, id: DbId) {
        self.id = id;
    }
}
