//! Predicates: schema-bound tuples that can themselves be values.

use core::fmt;
use core::hash::{Hash, Hasher};

use tracing::trace;

use crate::database::DbRef;
use crate::error::Result;
use crate::ids::DbId;
use crate::schema::VocabElement;
use crate::serializer;
use crate::tuple;
use crate::value::Value;

/// A tuple of values instantiating a predicate-schema.
///
/// A predicate is wrapped by a predicate-typed [`Value`], so predicates nest
/// to any depth. `Clone` is a deep copy that shares only the database
/// handle.
///
/// Equality compares the schema and the argument list; the predicate's own
/// identity and database handle are ignored.
#[derive(Clone)]
pub struct Predicate {
    db: DbRef,
    id: DbId,
    pve_id: DbId,
    name: String,
    var_len: bool,
    args: Vec<Value>,
}

impl Predicate {
    /// Creates a predicate with one default value per parameter.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownSchema`](crate::EngineError::UnknownSchema)
    ///   if `pve_id` is not a predicate-schema of `db`.
    /// - [`EngineError::InvalidArgument`](crate::EngineError::InvalidArgument)
    ///   if `db` reports an unusable tick rate.
    pub fn new(db: &DbRef, pve_id: DbId) -> Result<Self> {
        let schema = db.resolve_predicate_schema(pve_id)?;
        let args = tuple::default_args(db, schema)?;
        Ok(Self::assemble(db, schema, args))
    }

    /// Creates a predicate from a supplied argument list, binding every
    /// value whose parameter identity is unset.
    ///
    /// # Errors
    ///
    /// - `UnknownSchema` if `pve_id` is not a predicate-schema of `db`.
    /// - `LengthMismatch` if the list does not fit the schema's arity.
    /// - `TypeMismatch` if a value may not occupy its slot.
    /// - `IdentityMismatch` if a value is bound to another parameter.
    /// - `InvalidArgument` if a nested predicate belongs to another
    ///   database.
    pub fn with_args(db: &DbRef, pve_id: DbId, args: Vec<Value>) -> Result<Self> {
        let schema = db.resolve_predicate_schema(pve_id)?;
        let args = tuple::bind_args(db, schema, args)?;
        Ok(Self::assemble(db, schema, args))
    }

    fn assemble(db: &DbRef, schema: &VocabElement, args: Vec<Value>) -> Self {
        trace!(predicate = schema.name(), args = args.len(), "constructed predicate");
        Self {
            db: DbRef::clone(db),
            id: DbId::INVALID,
            pve_id: schema.id(),
            name: schema.name().to_owned(),
            var_len: schema.is_variable_length(),
            args,
        }
    }

    /// Identity assigned on commit to a cell.
    #[must_use]
    pub fn id(&self) -> DbId {
        self.id
    }

    /// Identity of the predicate-schema.
    #[must_use]
    pub fn pve_id(&self) -> DbId {
        self.pve_id
    }

    /// Name of the predicate-schema.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The database this predicate resolves identities through.
    #[must_use]
    pub fn db(&self) -> &DbRef {
        &self.db
    }

    /// Whether the schema is variable-length.
    #[must_use]
    pub fn var_len(&self) -> bool {
        self.var_len
    }

    /// Number of arguments.
    #[must_use]
    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// All arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The predicate-schema.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSchema` if the database no longer resolves it.
    pub fn schema(&self) -> Result<&VocabElement> {
        self.db.resolve_predicate_schema(self.pve_id)
    }

    /// The argument at `i`, or `None` past the end.
    ///
    /// # Errors
    ///
    /// Returns `Index` if `i` is negative.
    pub fn arg(&self, i: isize) -> Result<Option<&Value>> {
        tuple::get(&self.args, i)
    }

    /// A deep copy of the argument at `i`, or `None` past the end.
    ///
    /// # Errors
    ///
    /// Returns `Index` if `i` is negative.
    pub fn arg_copy(&self, i: isize) -> Result<Option<Value>> {
        Ok(self.arg(i)?.cloned())
    }

    /// Replaces the argument at `i`, dropping the previous value.
    ///
    /// # Errors
    ///
    /// - `Index` if `i` is negative or not below [`num_args`](Self::num_args).
    /// - `TypeMismatch`, `IdentityMismatch` or `InvalidArgument` as for
    ///   [`with_args`](Self::with_args).
    pub fn replace_arg(&mut self, i: isize, value: Value) -> Result<()> {
        let schema = self.db.resolve_predicate_schema(self.pve_id)?;
        tuple::replace(&self.db, schema, &mut self.args, i, value)
    }

    /// Appends an argument to a variable-length predicate.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the schema is fixed-length, and the slot
    /// errors of [`with_args`](Self::with_args) otherwise.
    pub fn append_arg(&mut self, value: Value) -> Result<()> {
        let schema = self.db.resolve_predicate_schema(self.pve_id)?;
        tuple::append(&self.db, schema, &mut self.args, value)
    }

    /// Canonical form, for example `pve0(<arg1>, <arg2>)`.
    #[must_use]
    pub fn to_canonical(&self) -> String {
        serializer::to_canonical(self)
    }

    /// Diagnostic form, carrying every identity.
    #[must_use]
    pub fn to_diagnostic(&self) -> String {
        serializer::to_diagnostic(self)
    }

    pub(crate) fn commit(&mut self, cell_id: DbId, allocate: &mut dyn FnMut() -> DbId) {
        self.id = allocate();
        for arg in &mut self.args {
            arg.commit(cell_id, allocate);
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("id", &self.id)
            .field("pve_id", &self.pve_id)
            .field("name", &self.name)
            .field("var_len", &self.var_len)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.pve_id == other.pve_id && self.var_len == other.var_len && self.args == other.args
    }
}

impl Eq for Predicate {}

impl Hash for Predicate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pve_id.hash(state);
        self.var_len.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}
