//! Matrices: the schema-bound tuples stored in cells.

use core::fmt;

use tracing::{debug, trace};

use crate::database::DbRef;
use crate::error::{EngineError, Result};
use crate::ids::DbId;
use crate::schema::{SchemaKind, VocabElement};
use crate::serializer;
use crate::tuple;
use crate::value::Value;

/// A tuple of values instantiating a tuple-schema.
///
/// Every value in the list is bound to the formal parameter of its
/// position. Mutation goes through [`replace_arg`](Self::replace_arg) and
/// [`append_arg`](Self::append_arg), which re-check the binding rule, so the
/// invariant holds for the matrix's whole life.
///
/// `Clone` is a deep copy: the copy shares the database handle and nothing
/// else.
///
/// # Example
///
/// ```
/// use annotdb_core::{
///     FormalParameter, Matrix, ParamType, ScalarType, SchemaRegistry, VocabElement,
/// };
///
/// let mut registry = SchemaRegistry::default();
/// let mve = registry.register(VocabElement::tuple(
///     "float_mve",
///     ScalarType::Float,
///     vec![FormalParameter::new("<val>", ParamType::Float)?],
/// )?)?;
/// let db = registry.into_shared();
///
/// let m = Matrix::new(&db, mve)?;
/// assert_eq!(m.to_canonical(), "(0.0)");
/// # Ok::<(), annotdb_core::EngineError>(())
/// ```
#[derive(Clone)]
pub struct Matrix {
    db: DbRef,
    mve_id: DbId,
    var_len: bool,
    args: Vec<Value>,
}

impl Matrix {
    /// Creates a matrix with one default value per parameter.
    ///
    /// # Errors
    ///
    /// - `UnknownSchema` if `mve_id` is not a tuple-schema of `db`.
    /// - `InvalidArgument` if `db` reports an unusable tick rate.
    pub fn new(db: &DbRef, mve_id: DbId) -> Result<Self> {
        let schema = db.resolve_tuple_schema(mve_id)?;
        let args = tuple::default_args(db, schema)?;
        Ok(Self::assemble(db, schema, args))
    }

    /// Creates a matrix from a supplied argument list, binding every value
    /// whose parameter identity is unset.
    ///
    /// # Errors
    ///
    /// - `UnknownSchema` if `mve_id` is not a tuple-schema of `db`.
    /// - `LengthMismatch` if the list does not fit the schema's arity,
    ///   including an empty list.
    /// - `TypeMismatch` if a value may not occupy its slot.
    /// - `IdentityMismatch` if a value is bound to another parameter.
    /// - `InvalidArgument` if a nested predicate belongs to another
    ///   database.
    pub fn with_args(db: &DbRef, mve_id: DbId, args: Vec<Value>) -> Result<Self> {
        let schema = db.resolve_tuple_schema(mve_id)?;
        let args = tuple::bind_args(db, schema, args)?;
        Ok(Self::assemble(db, schema, args))
    }

    fn assemble(db: &DbRef, schema: &VocabElement, args: Vec<Value>) -> Self {
        trace!(matrix = schema.name(), args = args.len(), "constructed matrix");
        Self {
            db: DbRef::clone(db),
            mve_id: schema.id(),
            var_len: schema.is_variable_length(),
            args,
        }
    }

    /// Number of arguments.
    #[must_use]
    pub fn num_args(&self) -> usize {
        self.args.len()
    }

    /// Identity of the tuple-schema.
    #[must_use]
    pub fn mve_id(&self) -> DbId {
        self.mve_id
    }

    /// The database this matrix resolves identities through.
    #[must_use]
    pub fn db(&self) -> &DbRef {
        &self.db
    }

    /// Whether the schema is variable-length.
    #[must_use]
    pub fn var_len(&self) -> bool {
        self.var_len
    }

    /// All arguments, in order.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The tuple-schema.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSchema` if the database no longer resolves it.
    pub fn schema(&self) -> Result<&VocabElement> {
        self.db.resolve_tuple_schema(self.mve_id)
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
    /// The newcomer is bound to the slot's parameter; on error the matrix is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - `Index` if `i` is negative or not below [`num_args`](Self::num_args).
    /// - `TypeMismatch` if the value may not occupy the slot.
    /// - `IdentityMismatch` if the value is bound to another parameter.
    /// - `InvalidArgument` if a nested predicate belongs to another
    ///   database.
    pub fn replace_arg(&mut self, i: isize, value: Value) -> Result<()> {
        let schema = self.db.resolve_tuple_schema(self.mve_id)?;
        tuple::replace(&self.db, schema, &mut self.args, i, value)
    }

    /// Appends an argument to a variable-length matrix; the value is bound
    /// to the schema's final parameter.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if the schema is fixed-length, and the slot
    /// errors of [`replace_arg`](Self::replace_arg) otherwise.
    pub fn append_arg(&mut self, value: Value) -> Result<()> {
        let schema = self.db.resolve_tuple_schema(self.mve_id)?;
        tuple::append(&self.db, schema, &mut self.args, value)
    }

    /// Resolves the tuple-schema that declares `farg_id`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParameter` for any identity no registered
    /// tuple-schema declares, including [`DbId::INVALID`].
    pub fn lookup_schema_for_parameter(&self, farg_id: DbId) -> Result<&VocabElement> {
        let schema = self.db.schema_of_parameter(farg_id)?;
        match schema.kind() {
            SchemaKind::Tuple(_) => Ok(schema),
            SchemaKind::Predicate => {
                debug!(farg_id = farg_id.get(), "parameter belongs to a predicate-schema");
                Err(EngineError::UnknownParameter(farg_id))
            }
        }
    }

    /// Records that this matrix is stored in `cell_id`.
    ///
    /// Every value and nested predicate receives a fresh identity from
    /// `allocate` and the owning cell identity. Identities are issued by the
    /// caller; the engine never invents them.
    pub fn commit_to_cell(&mut self, cell_id: DbId, mut allocate: impl FnMut() -> DbId) {
        for arg in &mut self.args {
            arg.commit(cell_id, &mut allocate);
        }
    }

    /// Canonical form, for example `(22)`.
    #[must_use]
    pub fn to_canonical(&self) -> String {
        serializer::to_canonical(self)
    }

    /// Diagnostic form, carrying every identity.
    #[must_use]
    pub fn to_diagnostic(&self) -> String {
        serializer::to_diagnostic(self)
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("mve_id", &self.mve_id)
            .field("var_len", &self.var_len)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.mve_id == other.mve_id && self.var_len == other.var_len && self.args == other.args
    }
}

impl Eq for Matrix {}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}
