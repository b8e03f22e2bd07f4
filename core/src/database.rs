//! The Database collaborator: schema lookup by identity.
//!
//! Tuples hold a shared, read-only [`DbRef`] and resolve every schema and
//! parameter identity through it. [`SchemaRegistry`] is the in-memory
//! implementation used by the clients and the tests.

use core::fmt;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{EngineError, Result};
use crate::ids::DbId;
use crate::schema::{FormalParameter, SchemaKind, VocabElement};
use crate::value::{MAX_TPS, MIN_TPS};

/// Default tick rate for new time stamps.
pub const DEFAULT_TICKS_PER_SECOND: u32 = 60;

/// Lookup interface the engine consumes.
///
/// Implementations never hand out [`DbId::INVALID`] as an identity, so
/// looking it up always fails.
pub trait Database: fmt::Debug + Send + Sync {
    /// Resolves a tuple-schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSchema`] if `id` is not a registered
    /// tuple-schema.
    fn resolve_tuple_schema(&self, id: DbId) -> Result<&VocabElement>;

    /// Resolves a predicate-schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownSchema`] if `id` is not a registered
    /// predicate-schema.
    fn resolve_predicate_schema(&self, id: DbId) -> Result<&VocabElement>;

    /// Resolves the schema that owns the formal parameter `farg_id`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownParameter`] if no registered schema
    /// declares `farg_id`.
    fn schema_of_parameter(&self, farg_id: DbId) -> Result<&VocabElement>;

    /// Resolves a formal parameter by identity.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownParameter`] if no registered schema
    /// declares `farg_id`.
    fn resolve_parameter(&self, farg_id: DbId) -> Result<&FormalParameter> {
        self.schema_of_parameter(farg_id)?
            .parameter(farg_id)
            .ok_or(EngineError::UnknownParameter(farg_id))
    }

    /// Tick rate used for default time-stamp values.
    fn current_tick_count(&self) -> u32;
}

/// Shared handle to a Database collaborator.
pub type DbRef = Arc<dyn Database>;

/// Whether two handles refer to the same database.
#[must_use]
pub fn same_db(a: &DbRef, b: &DbRef) -> bool {
    core::ptr::eq(
        Arc::as_ptr(a).cast::<()>(),
        Arc::as_ptr(b).cast::<()>(),
    )
}

/// Settings for a [`SchemaRegistry`].
///
/// ```
/// use annotdb_core::DatabaseConfig;
///
/// let config = DatabaseConfig::default();
/// assert_eq!(config.ticks_per_second, 60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DatabaseConfig {
    /// Tick rate reported to tuples for default time stamps.
    pub ticks_per_second: u32,
    /// First identity the registry issues.
    pub first_id: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            first_id: 1,
        }
    }
}

impl DatabaseConfig {
    /// Checks the settings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if the tick rate is outside
    /// `1..=1000` or `first_id` is the reserved invalid identity.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TPS..=MAX_TPS).contains(&self.ticks_per_second) {
            return Err(EngineError::invalid(format!(
                "ticks_per_second {} outside {MIN_TPS}..={MAX_TPS}",
                self.ticks_per_second
            )));
        }
        if self.first_id == DbId::INVALID.get() {
            return Err(EngineError::invalid("first_id 0 is reserved"));
        }
        Ok(())
    }
}

/// In-memory Database collaborator.
///
/// Schemas are registered once, then the registry is frozen into a shared
/// [`DbRef`] with [`into_shared`](Self::into_shared).
///
/// # Example
///
/// ```
/// use annotdb_core::{FormalParameter, ParamType, ScalarType, SchemaRegistry, VocabElement};
///
/// let mut registry = SchemaRegistry::default();
/// let id = registry.register(VocabElement::tuple(
///     "float_mve",
///     ScalarType::Float,
///     vec![FormalParameter::new("<val>", ParamType::Float)?],
/// )?)?;
/// assert_eq!(registry.schema_id("float_mve"), Some(id));
/// # Ok::<(), annotdb_core::EngineError>(())
/// ```
#[derive(Debug)]
pub struct SchemaRegistry {
    config: DatabaseConfig,
    next_id: u64,
    schemas: HashMap<DbId, VocabElement>,
    by_name: HashMap<String, DbId>,
    owners: HashMap<DbId, DbId>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let config = DatabaseConfig::default();
        Self {
            next_id: config.first_id,
            config,
            schemas: HashMap::new(),
            by_name: HashMap::new(),
            owners: HashMap::new(),
        }
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if `config` fails
    /// [`DatabaseConfig::validate`].
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            next_id: config.first_id,
            config,
            ..Self::default()
        })
    }

    /// The settings this registry was created with.
    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Registers a schema, assigning its identity and one identity per
    /// parameter, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidArgument`] if a schema of the same name
    /// is already registered, or if the identity space cannot hold the
    /// schema and its parameters.
    pub fn register(&mut self, mut element: VocabElement) -> Result<DbId> {
        if self.by_name.contains_key(element.name()) {
            return Err(EngineError::invalid(format!(
                "schema {} is already registered",
                element.name()
            )));
        }
        let next_free = u64::try_from(element.parameter_count())
            .ok()
            .and_then(|count| count.checked_add(1))
            .and_then(|count| self.next_id.checked_add(count))
            .ok_or_else(|| {
                EngineError::invalid(format!(
                    "identity space exhausted registering schema {}",
                    element.name()
                ))
            })?;
        let id = DbId::new(self.next_id);
        let mut next = self.next_id;
        element.assign_ids(id, || {
            next += 1;
            DbId::new(next)
        });
        self.next_id = next_free;

        for param in element.parameters() {
            self.owners.insert(param.id(), id);
        }
        debug!(
            schema = element.name(),
            id = id.get(),
            params = element.parameter_count(),
            predicate = matches!(element.kind(), SchemaKind::Predicate),
            "registered schema"
        );
        self.by_name.insert(element.name().to_owned(), id);
        self.schemas.insert(id, element);
        Ok(id)
    }

    /// Identity of the schema named `name`.
    #[must_use]
    pub fn schema_id(&self, name: &str) -> Option<DbId> {
        self.by_name.get(name).copied()
    }

    /// The schema with identity `id`, of either kind.
    #[must_use]
    pub fn schema(&self, id: DbId) -> Option<&VocabElement> {
        self.schemas.get(&id)
    }

    /// Freezes the registry into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> DbRef {
        Arc::new(self)
    }

    fn resolve_kind(&self, id: DbId, predicate: bool) -> Result<&VocabElement> {
        self.schemas
            .get(&id)
            .filter(|s| matches!(s.kind(), SchemaKind::Predicate) == predicate)
            .ok_or(EngineError::UnknownSchema(id))
    }
}

impl Database for SchemaRegistry {
    fn resolve_tuple_schema(&self, id: DbId) -> Result<&VocabElement> {
        self.resolve_kind(id, false)
    }

    fn resolve_predicate_schema(&self, id: DbId) -> Result<&VocabElement> {
        self.resolve_kind(id, true)
    }

    fn schema_of_parameter(&self, farg_id: DbId) -> Result<&VocabElement> {
        self.owners
            .get(&farg_id)
            .and_then(|owner| self.schemas.get(owner))
            .ok_or(EngineError::UnknownParameter(farg_id))
    }

    fn current_tick_count(&self) -> u32 {
        self.config.ticks_per_second
    }
}
