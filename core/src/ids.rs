//! Opaque database identities.
//!
//! Schemas, formal parameters, values, predicates and cells all refer to one
//! another through [`DbId`] rather than through live references. Identities
//! are issued by the Database collaborator and outlive any single in-memory
//! tuple.

use core::fmt;

/// An identity issued by the Database collaborator.
///
/// `DbId::INVALID` (zero) is reserved: it is never issued, and marks an
/// identity that has not been assigned yet.
///
/// # Example
///
/// ```
/// use annotdb_core::DbId;
///
/// assert!(!DbId::INVALID.is_valid());
/// assert!(DbId::new(7).is_valid());
/// assert_eq!(DbId::new(7).to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct DbId(u64);

impl DbId {
    /// The reserved "unset" identity.
    pub const INVALID: Self = Self(0);

    /// Wraps a raw identity value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw identity value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is [`DbId::INVALID`].
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DbId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}
