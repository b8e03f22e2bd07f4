//! The Value family: concrete typed data bound to formal parameters.
//!
//! A [`Value`] is a closed sum over eight variants ([`ValueKind`]). Each value
//! carries the identity and declared type of the formal parameter it is
//! bound to, the identity of the cell that owns it, and its payload.
//! Whether a variant may occupy a slot is decided by
//! [`ParamType::accepts`](crate::ParamType::accepts).

mod timestamp;

use core::fmt;
use core::hash::{Hash, Hasher};

pub use timestamp::{TimeStamp, MAX_TPS, MIN_TPS};

use crate::database::{same_db, DbRef};
use crate::error::{EngineError, Result};
use crate::ids::DbId;
use crate::names;
use crate::predicate::Predicate;
use crate::schema::{FormalParameter, ParamType, SubRange};

/// Label an undefined value carries until it is bound to a parameter.
pub const UNBOUND_LABEL: &str = "<val>";

/// The variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 64-bit float.
    Float,
    /// 64-bit signed integer.
    Integer,
    /// A nominal: a bare name.
    Nominal,
    /// A nested predicate.
    Predicate,
    /// A double-quoted string.
    QuoteString,
    /// Free text; only valid in text-string slots.
    TextString,
    /// A tick-based time stamp.
    TimeStamp,
    /// A placeholder for an untyped slot that has no value yet.
    Undefined,
}

impl ValueKind {
    /// All variants, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Float,
        Self::Integer,
        Self::Nominal,
        Self::Predicate,
        Self::QuoteString,
        Self::TextString,
        Self::TimeStamp,
        Self::Undefined,
    ];

    /// The declared type whose slots take exactly this variant.
    ///
    /// Undefined values have no typed slot of their own and map to
    /// [`ParamType::Untyped`].
    #[must_use]
    pub fn param_type(self) -> ParamType {
        match self {
            Self::Float => ParamType::Float,
            Self::Integer => ParamType::Integer,
            Self::Nominal => ParamType::Nominal,
            Self::Predicate => ParamType::Predicate,
            Self::QuoteString => ParamType::QuoteString,
            Self::TextString => ParamType::TextString,
            Self::TimeStamp => ParamType::TimeStamp,
            Self::Undefined => ParamType::Untyped,
        }
    }

    /// Variant name used by the diagnostic form.
    #[must_use]
    pub fn diagnostic_name(self) -> &'static str {
        match self {
            Self::Float => "FloatDataValue",
            Self::Integer => "IntDataValue",
            Self::Nominal => "NominalDataValue",
            Self::Predicate => "PredDataValue",
            Self::QuoteString => "QuoteStringDataValue",
            Self::TextString => "TextStringDataValue",
            Self::TimeStamp => "TimeStampDataValue",
            Self::Undefined => "UndefinedDataValue",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Nominal => "nominal",
            Self::Predicate => "predicate",
            Self::QuoteString => "quote string",
            Self::TextString => "text string",
            Self::TimeStamp => "time stamp",
            Self::Undefined => "undefined",
        })
    }
}

/// The datum a [`Value`] holds.
///
/// `None` marks an empty string payload or the empty predicate. Values
/// store `Some("")` as `None`.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Float payload.
    Float(f64),
    /// Integer payload.
    Integer(i64),
    /// Nominal payload.
    Nominal(Option<String>),
    /// Nested predicate, or the empty predicate.
    Predicate(Option<Predicate>),
    /// Quote-string payload, without the surrounding quotes.
    QuoteString(Option<String>),
    /// Text-string payload.
    TextString(Option<String>),
    /// Time-stamp payload.
    TimeStamp(TimeStamp),
    /// Placeholder label, normally the bound parameter's name.
    Undefined(String),
}

impl Payload {
    /// The variant this payload belongs to.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Float(_) => ValueKind::Float,
            Self::Integer(_) => ValueKind::Integer,
            Self::Nominal(_) => ValueKind::Nominal,
            Self::Predicate(_) => ValueKind::Predicate,
            Self::QuoteString(_) => ValueKind::QuoteString,
            Self::TextString(_) => ValueKind::TextString,
            Self::TimeStamp(_) => ValueKind::TimeStamp,
            Self::Undefined(_) => ValueKind::Undefined,
        }
    }

    /// Collapses empty string payloads into `None`, the single empty form.
    fn normalized(self) -> Self {
        match self {
            Self::Nominal(Some(s)) if s.is_empty() => Self::Nominal(None),
            Self::QuoteString(Some(s)) if s.is_empty() => Self::QuoteString(None),
            Self::TextString(Some(s)) if s.is_empty() => Self::TextString(None),
            other => other,
        }
    }

    fn validate(&self) -> Result<()> {
        let (ok, what, s) = match self {
            Self::Nominal(Some(s)) => (names::is_valid_nominal(s), "nominal", s),
            Self::QuoteString(Some(s)) => (names::is_valid_quote_string(s), "quote string", s),
            Self::TextString(Some(s)) => (names::is_valid_text_string(s), "text string", s),
            Self::Undefined(s) => (names::is_valid_param_name(s), "parameter name", s),
            _ => return Ok(()),
        };
        if ok {
            Ok(())
        } else {
            Err(EngineError::invalid(format!("{s:?} is not a valid {what}")))
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Nominal(a), Self::Nominal(b))
            | (Self::QuoteString(a), Self::QuoteString(b))
            | (Self::TextString(a), Self::TextString(b)) => a == b,
            (Self::Predicate(a), Self::Predicate(b)) => a == b,
            (Self::TimeStamp(a), Self::TimeStamp(b)) => a == b,
            (Self::Undefined(a), Self::Undefined(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Payload {}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind().hash(state);
        match self {
            Self::Float(v) => v.to_bits().hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Nominal(s) | Self::QuoteString(s) | Self::TextString(s) => s.hash(state),
            Self::Predicate(p) => p.hash(state),
            Self::TimeStamp(ts) => ts.hash(state),
            Self::Undefined(label) => label.hash(state),
        }
    }
}

/// A concrete typed datum.
///
/// Values are compared and hashed by payload plus parameter binding; the
/// value's own identity and its owning cell are ignored, so two values built
/// independently with the same content are equal.
///
/// `Clone` is a deep copy: a cloned predicate payload owns its own argument
/// list.
///
/// # Example
///
/// ```
/// use annotdb_core::{Value, ValueKind};
///
/// let v = Value::float(1.5);
/// assert_eq!(v.kind(), ValueKind::Float);
/// assert!(!v.farg_id().is_valid());
/// assert_eq!(v.to_string(), "1.5");
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    id: DbId,
    farg_id: DbId,
    farg_type: Option<ParamType>,
    cell_id: DbId,
    subrange: Option<SubRange>,
    payload: Payload,
}

impl Value {
    /// Creates an unbound value.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if a string payload violates
    /// its syntax (see [`names`](crate::names)).
    pub fn new(payload: Payload) -> Result<Self> {
        let payload = payload.normalized();
        payload.validate()?;
        Ok(Self::unchecked(payload))
    }

    fn unchecked(payload: Payload) -> Self {
        Self {
            id: DbId::INVALID,
            farg_id: DbId::INVALID,
            farg_type: None,
            cell_id: DbId::INVALID,
            subrange: None,
            payload,
        }
    }

    /// An unbound float.
    #[must_use]
    pub fn float(value: f64) -> Self {
        Self::unchecked(Payload::Float(value))
    }

    /// An unbound integer.
    #[must_use]
    pub fn integer(value: i64) -> Self {
        Self::unchecked(Payload::Integer(value))
    }

    /// An unbound nominal.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `s` is neither empty nor
    /// a valid nominal.
    pub fn nominal(s: impl Into<String>) -> Result<Self> {
        Self::new(Payload::Nominal(Some(s.into())))
    }

    /// An unbound quote string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `s` contains `"` or
    /// non-printable characters.
    pub fn quote_string(s: impl Into<String>) -> Result<Self> {
        Self::new(Payload::QuoteString(Some(s.into())))
    }

    /// An unbound text string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `s` contains a backspace.
    pub fn text_string(s: impl Into<String>) -> Result<Self> {
        Self::new(Payload::TextString(Some(s.into())))
    }

    /// An unbound time stamp.
    #[must_use]
    pub fn time_stamp(ts: TimeStamp) -> Self {
        Self::unchecked(Payload::TimeStamp(ts))
    }

    /// An unbound value wrapping `predicate`.
    #[must_use]
    pub fn predicate(predicate: Predicate) -> Self {
        Self::unchecked(Payload::Predicate(Some(predicate)))
    }

    /// An unbound empty predicate, rendered `()`.
    #[must_use]
    pub fn empty_predicate() -> Self {
        Self::unchecked(Payload::Predicate(None))
    }

    /// An unbound placeholder labelled `<val>`.
    #[must_use]
    pub fn undefined() -> Self {
        Self::unchecked(Payload::Undefined(UNBOUND_LABEL.to_owned()))
    }

    /// Creates a value bound to the formal parameter `farg_id` of `db`.
    ///
    /// The parameter's subrange is applied to the payload.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownParameter`] if `farg_id` does not resolve.
    /// - [`EngineError::TypeMismatch`] if the payload's variant may not
    ///   occupy the parameter's slot.
    /// - [`EngineError::InvalidArgument`] for a malformed string payload or
    ///   a predicate built against another database.
    pub fn bound(db: &DbRef, farg_id: DbId, payload: Payload) -> Result<Self> {
        let param = db.resolve_parameter(farg_id)?;
        let mut value = Self::new(payload)?;
        value.check_slot(db, param)?;
        value.bind(param);
        Ok(value)
    }

    /// The default value for a slot of `param`: zero, empty, the empty
    /// predicate, time zero at the database's tick rate, or a placeholder
    /// labelled with the parameter's name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if the database reports an
    /// unusable tick rate.
    pub fn default_for(db: &DbRef, param: &FormalParameter) -> Result<Self> {
        let payload = match param.param_type() {
            ParamType::Float => Payload::Float(0.0),
            ParamType::Integer => Payload::Integer(0),
            ParamType::Nominal => Payload::Nominal(None),
            ParamType::Predicate => Payload::Predicate(None),
            ParamType::QuoteString => Payload::QuoteString(None),
            ParamType::TextString => Payload::TextString(None),
            ParamType::TimeStamp => Payload::TimeStamp(TimeStamp::zero(db.current_tick_count())?),
            ParamType::Untyped => Payload::Undefined(param.name().to_owned()),
        };
        let mut value = Self::unchecked(payload);
        value.bind(param);
        Ok(value)
    }

    /// Identity assigned on commit to a cell; [`DbId::INVALID`] before.
    #[must_use]
    pub fn id(&self) -> DbId {
        self.id
    }

    /// Identity of the bound formal parameter; [`DbId::INVALID`] if unbound.
    #[must_use]
    pub fn farg_id(&self) -> DbId {
        self.farg_id
    }

    /// Declared type of the bound formal parameter, if bound.
    #[must_use]
    pub fn farg_type(&self) -> Option<ParamType> {
        self.farg_type
    }

    /// Identity of the owning cell; [`DbId::INVALID`] until committed.
    #[must_use]
    pub fn cell_id(&self) -> DbId {
        self.cell_id
    }

    /// The variant of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.payload.kind()
    }

    /// The payload.
    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The subrange in force, inherited from the bound parameter.
    #[must_use]
    pub fn subrange(&self) -> Option<&SubRange> {
        self.subrange.as_ref()
    }

    /// Float payload, if this is a float.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.payload {
            Payload::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self.payload {
            Payload::Integer(v) => Some(v),
            _ => None,
        }
    }

    /// String payload of a nominal, quote string or text string, or the
    /// label of an undefined value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.payload {
            Payload::Nominal(s) | Payload::QuoteString(s) | Payload::TextString(s) => {
                s.as_deref()
            }
            Payload::Undefined(label) => Some(label),
            _ => None,
        }
    }

    /// Nested predicate, if this is a non-empty predicate value.
    #[must_use]
    pub fn as_predicate(&self) -> Option<&Predicate> {
        match &self.payload {
            Payload::Predicate(p) => p.as_ref(),
            _ => None,
        }
    }

    /// Time-stamp payload, if this is a time stamp.
    #[must_use]
    pub fn as_time_stamp(&self) -> Option<TimeStamp> {
        match self.payload {
            Payload::TimeStamp(ts) => Some(ts),
            _ => None,
        }
    }

    /// Replaces the payload with another of the same variant, applying the
    /// subrange in force.
    ///
    /// # Errors
    ///
    /// - [`EngineError::TypeMismatch`] if `payload` is of another variant.
    /// - [`EngineError::InvalidArgument`] for a malformed string payload.
    pub fn set_payload(&mut self, payload: Payload) -> Result<()> {
        if payload.kind() != self.kind() {
            return Err(EngineError::TypeMismatch {
                expected: self.farg_type.unwrap_or_else(|| self.kind().param_type()),
                found: payload.kind(),
            });
        }
        let payload = payload.normalized();
        payload.validate()?;
        self.payload = payload;
        self.apply_subrange();
        Ok(())
    }

    /// Checks whether this value may be placed into the slot of `param` in
    /// a tuple over `db`, without modifying anything.
    pub(crate) fn check_slot(&self, db: &DbRef, param: &FormalParameter) -> Result<()> {
        if !param.param_type().accepts(self.kind()) {
            return Err(EngineError::TypeMismatch {
                expected: param.param_type(),
                found: self.kind(),
            });
        }
        if self.farg_id.is_valid() && self.farg_id != param.id() {
            return Err(EngineError::IdentityMismatch {
                expected: param.id(),
                found: self.farg_id,
            });
        }
        if let Some(nested) = self.as_predicate() {
            if !same_db(nested.db(), db) {
                return Err(EngineError::invalid(format!(
                    "predicate {} belongs to another database",
                    nested.name()
                )));
            }
        }
        Ok(())
    }

    /// Binds this value to `param`, stamping the parameter identity and
    /// type and applying the parameter's subrange.
    pub(crate) fn bind(&mut self, param: &FormalParameter) {
        self.farg_id = param.id();
        self.farg_type = Some(param.param_type());
        self.subrange = match param.param_type() {
            ParamType::Untyped => None,
            _ => param.subrange().cloned(),
        };
        if let Payload::Undefined(label) = &mut self.payload {
            param.name().clone_into(label);
        }
        self.apply_subrange();
    }

    fn apply_subrange(&mut self) {
        match (&mut self.payload, &self.subrange) {
            (Payload::Float(v), Some(SubRange::Float { min, max })) => *v = v.clamp(*min, *max),
            (Payload::Integer(v), Some(SubRange::Integer { min, max })) => {
                *v = (*v).clamp(*min, *max);
            }
            (Payload::TimeStamp(ts), Some(SubRange::TimeStamp { min, max })) => {
                *ts = ts.clamp_between(min, max);
            }
            (Payload::Nominal(n), Some(SubRange::Nominal(approved))) => {
                if n.as_ref().is_some_and(|s| !approved.contains(s)) {
                    *n = None;
                }
            }
            (Payload::Predicate(p), Some(SubRange::Predicate(approved))) => {
                if p.as_ref().is_some_and(|p| !approved.contains(&p.pve_id())) {
                    *p = None;
                }
            }
            _ => {}
        }
    }

    /// Stamps a fresh identity and the owning cell on this value and on
    /// everything nested in it.
    pub(crate) fn commit(&mut self, cell_id: DbId, allocate: &mut dyn FnMut() -> DbId) {
        self.id = allocate();
        self.cell_id = cell_id;
        if let Payload::Predicate(Some(nested)) = &mut self.payload {
            nested.commit(cell_id, allocate);
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.farg_id == other.farg_id
            && self.farg_type == other.farg_type
            && self.payload == other.payload
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.farg_id.hash(state);
        self.farg_type.hash(state);
        self.payload.hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::serializer::to_canonical(self))
    }
}
