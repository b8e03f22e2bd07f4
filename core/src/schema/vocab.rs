//! Vocabulary elements: tuple-schemas and predicate-schemas.

use core::fmt;
use std::collections::HashSet;

use crate::error::{EngineError, Result};
use crate::ids::DbId;
use crate::names;
use crate::schema::{FormalParameter, ParamType};

/// Scalar type tag of a tuple-schema.
///
/// A scalar tuple-schema (`Float`, `Integer`, `Nominal`, `Predicate`,
/// `Text`) has exactly one parameter of the matching type; a `Tuple`
/// schema has one or more parameters of any type except text string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalarType {
    /// Single float parameter.
    Float,
    /// Single integer parameter.
    Integer,
    /// Single nominal parameter.
    Nominal,
    /// Single predicate parameter.
    Predicate,
    /// Single text-string parameter.
    Text,
    /// Any number of non-text parameters.
    Tuple,
}

impl ScalarType {
    fn sole_param_type(self) -> Option<ParamType> {
        match self {
            Self::Float => Some(ParamType::Float),
            Self::Integer => Some(ParamType::Integer),
            Self::Nominal => Some(ParamType::Nominal),
            Self::Predicate => Some(ParamType::Predicate),
            Self::Text => Some(ParamType::TextString),
            Self::Tuple => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Float => "FLOAT",
            Self::Integer => "INTEGER",
            Self::Nominal => "NOMINAL",
            Self::Predicate => "PREDICATE",
            Self::Text => "TEXT",
            Self::Tuple => "MATRIX",
        })
    }
}

/// Whether a vocabulary element shapes matrices or predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Tuple-schema, instantiated by [`Matrix`](crate::Matrix).
    Tuple(ScalarType),
    /// Predicate-schema, instantiated by [`Predicate`](crate::Predicate).
    Predicate,
}

/// A named, ordered list of formal parameters.
///
/// Built with [`VocabElement::tuple`] or [`VocabElement::predicate`], then
/// handed to the schema collaborator (for example
/// [`SchemaRegistry::register`](crate::SchemaRegistry::register)), which
/// assigns the schema and parameter identities. The engine only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct VocabElement {
    id: DbId,
    name: String,
    kind: SchemaKind,
    params: Vec<FormalParameter>,
    var_len: bool,
}

impl VocabElement {
    /// Creates a tuple-schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if the name is malformed,
    /// parameter names repeat, or the parameter list does not fit `scalar`.
    pub fn tuple(
        name: impl Into<String>,
        scalar: ScalarType,
        params: Vec<FormalParameter>,
    ) -> Result<Self> {
        let element = Self::build(name.into(), SchemaKind::Tuple(scalar), params)?;
        match scalar.sole_param_type() {
            Some(expected) => {
                let fits = element.params.len() == 1 && element.params[0].param_type() == expected;
                if !fits {
                    return Err(EngineError::invalid(format!(
                        "{scalar} schema {} needs exactly one {expected} parameter",
                        element.name
                    )));
                }
            }
            None => element.reject_text_params()?,
        }
        Ok(element)
    }

    /// Creates a predicate-schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if the name is malformed,
    /// parameter names repeat, the list is empty, or a parameter is a text
    /// string.
    pub fn predicate(name: impl Into<String>, params: Vec<FormalParameter>) -> Result<Self> {
        let element = Self::build(name.into(), SchemaKind::Predicate, params)?;
        element.reject_text_params()?;
        Ok(element)
    }

    /// Marks the schema as variable-length.
    #[must_use]
    pub fn variable_length(mut self, var_len: bool) -> Self {
        self.var_len = var_len;
        self
    }

    fn build(name: String, kind: SchemaKind, params: Vec<FormalParameter>) -> Result<Self> {
        if !names::is_valid_schema_name(&name) {
            return Err(EngineError::invalid(format!(
                "{name:?} is not a valid schema name"
            )));
        }
        if params.is_empty() {
            return Err(EngineError::invalid(format!(
                "schema {name} declares no parameters"
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = params.iter().find(|p| !seen.insert(p.name())) {
            return Err(EngineError::invalid(format!(
                "schema {name} repeats parameter name {}",
                dup.name()
            )));
        }
        Ok(Self {
            id: DbId::INVALID,
            name,
            kind,
            params,
            var_len: false,
        })
    }

    fn reject_text_params(&self) -> Result<()> {
        match self
            .params
            .iter()
            .find(|p| p.param_type() == ParamType::TextString)
        {
            Some(p) => Err(EngineError::invalid(format!(
                "schema {} may not declare text parameter {}",
                self.name,
                p.name()
            ))),
            None => Ok(()),
        }
    }

    /// Identity of this schema; [`DbId::INVALID`] until registered.
    #[must_use]
    pub fn id(&self) -> DbId {
        self.id
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tuple- or predicate-schema.
    #[must_use]
    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Scalar type tag, present for tuple-schemas only.
    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        match self.kind {
            SchemaKind::Tuple(scalar) => Some(scalar),
            SchemaKind::Predicate => None,
        }
    }

    /// Whether tuples of this schema may grow past the declared parameters.
    #[must_use]
    pub fn is_variable_length(&self) -> bool {
        self.var_len
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// All declared parameters, in order.
    #[must_use]
    pub fn parameters(&self) -> &[FormalParameter] {
        &self.params
    }

    /// The parameter at position `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Index`] if `index` is negative or not below
    /// [`parameter_count`](Self::parameter_count).
    pub fn parameter_at(&self, index: isize) -> Result<&FormalParameter> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.params.get(i))
            .ok_or(EngineError::Index(index))
    }

    /// Looks up a parameter by identity.
    #[must_use]
    pub fn parameter(&self, id: DbId) -> Option<&FormalParameter> {
        self.params.iter().find(|p| p.id() == id)
    }

    /// The parameter governing argument position `index`.
    ///
    /// Positions past the declared parameters of a variable-length schema
    /// are governed by the final parameter; for fixed-length schemas they
    /// have no parameter.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&FormalParameter> {
        match self.params.get(index) {
            Some(p) => Some(p),
            None if self.var_len => self.params.last(),
            None => None,
        }
    }

    pub(crate) fn assign_ids(&mut self, id: DbId, mut next: impl FnMut() -> DbId) {
        self.id = id;
        for param in &mut self.params {
            param.assign_id(next());
        }
    }
}
