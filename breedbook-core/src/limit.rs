//! Validated size arguments for fetches and exports.

use std::fmt;

use thiserror::Error;

/// Errors raised when a caller-supplied size cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The value was below zero.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Name of the rejected argument.
        field: &'static str,
        /// Value supplied by the caller.
        value: i64,
    },
    /// The value does not fit the platform's address space.
    #[error("{field} is too large (got {value})")]
    OutOfRange {
        /// Name of the rejected argument.
        field: &'static str,
        /// Value supplied by the caller.
        value: i64,
    },
}

/// A non-negative bound on the number of records to fetch or read.
///
/// A limit of zero is valid and always yields an empty result.
///
/// # Examples
/// ```
/// use breedbook_core::{ArgumentError, Limit};
///
/// let limit = Limit::from_signed("limit", 25)?;
/// assert_eq!(limit.get(), 25);
///
/// let err = Limit::from_signed("limit", -1).expect_err("negative limits are rejected");
/// assert!(matches!(err, ArgumentError::Negative { value: -1, .. }));
/// # Ok::<(), ArgumentError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Limit(usize);

impl Limit {
    /// The empty bound.
    pub const ZERO: Self = Self(0);

    /// Wrap an unsigned bound.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Validate a signed value received at a boundary, naming the argument
    /// in the error.
    pub fn from_signed(field: &'static str, value: i64) -> Result<Self, ArgumentError> {
        if value < 0 {
            return Err(ArgumentError::Negative { field, value });
        }
        usize::try_from(value)
            .map(Self)
            .map_err(|_| ArgumentError::OutOfRange { field, value })
    }

    /// The bound as a count of records.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Whether the bound admits no records.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for Limit {
    type Error = ArgumentError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_signed("limit", value)
    }
}

impl From<usize> for Limit {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
