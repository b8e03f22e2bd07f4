//! Argument-list handling shared by [`Matrix`](crate::Matrix) and
//! [`Predicate`](crate::Predicate).
//!
//! Every check runs before anything is bound or stored, so a rejected
//! construction, replacement or append leaves the tuple untouched.

use tracing::{debug, trace};

use crate::database::DbRef;
use crate::error::{EngineError, Result};
use crate::schema::{FormalParameter, VocabElement};
use crate::value::Value;

/// Converts a caller-supplied index, rejecting negative values.
pub(crate) fn index(i: isize) -> Result<usize> {
    usize::try_from(i).map_err(|_| EngineError::Index(i))
}

fn slot(schema: &VocabElement, position: usize) -> Result<&FormalParameter> {
    schema
        .slot(position)
        .ok_or(EngineError::Index(isize::try_from(position).unwrap_or(isize::MAX)))
}

fn rejected(schema: &VocabElement, position: usize, err: EngineError) -> EngineError {
    debug!(schema = schema.name(), index = position, error = %err, "rejected argument");
    err
}

/// One default value per declared parameter.
pub(crate) fn default_args(db: &DbRef, schema: &VocabElement) -> Result<Vec<Value>> {
    let args = schema
        .parameters()
        .iter()
        .map(|param| Value::default_for(db, param))
        .collect::<Result<Vec<_>>>()?;
    trace!(schema = schema.name(), args = args.len(), "built default argument list");
    Ok(args)
}

/// Validates a supplied list against `schema` and binds every value to its
/// slot.
///
/// Fixed-length schemas need exactly one value per parameter;
/// variable-length schemas need at least that many, with the extra values
/// bound to the final parameter.
pub(crate) fn bind_args(
    db: &DbRef,
    schema: &VocabElement,
    mut args: Vec<Value>,
) -> Result<Vec<Value>> {
    let expected = schema.parameter_count();
    let fits = if schema.is_variable_length() {
        args.len() >= expected
    } else {
        args.len() == expected
    };
    if !fits {
        let err = EngineError::LengthMismatch {
            expected,
            found: args.len(),
        };
        debug!(schema = schema.name(), error = %err, "rejected argument list");
        return Err(err);
    }

    for (position, value) in args.iter().enumerate() {
        let param = slot(schema, position)?;
        value
            .check_slot(db, param)
            .map_err(|err| rejected(schema, position, err))?;
    }
    for (position, value) in args.iter_mut().enumerate() {
        value.bind(slot(schema, position)?);
    }
    trace!(schema = schema.name(), args = args.len(), "bound argument list");
    Ok(args)
}

/// Replaces the value at `i`, binding the newcomer to the slot's parameter.
pub(crate) fn replace(
    db: &DbRef,
    schema: &VocabElement,
    args: &mut [Value],
    i: isize,
    mut value: Value,
) -> Result<()> {
    let position = index(i)?;
    if position >= args.len() {
        return Err(EngineError::Index(i));
    }
    let param = slot(schema, position)?;
    value
        .check_slot(db, param)
        .map_err(|err| rejected(schema, position, err))?;
    value.bind(param);
    if let Some(target) = args.get_mut(position) {
        *target = value;
    }
    Ok(())
}

/// Appends a value to a variable-length tuple.
pub(crate) fn append(
    db: &DbRef,
    schema: &VocabElement,
    args: &mut Vec<Value>,
    mut value: Value,
) -> Result<()> {
    if !schema.is_variable_length() {
        let err = EngineError::LengthMismatch {
            expected: schema.parameter_count(),
            found: args.len() + 1,
        };
        debug!(schema = schema.name(), error = %err, "rejected append to fixed-length tuple");
        return Err(err);
    }
    let position = args.len();
    let param = slot(schema, position)?;
    value
        .check_slot(db, param)
        .map_err(|err| rejected(schema, position, err))?;
    value.bind(param);
    args.push(value);
    Ok(())
}

/// Read-only positional access: negative indices fail, indices past the
/// end are a miss.
pub(crate) fn get(args: &[Value], i: isize) -> Result<Option<&Value>> {
    Ok(args.get(index(i)?))
}
