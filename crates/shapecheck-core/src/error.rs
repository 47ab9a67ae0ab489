//! Error types for shapecheck-core.
//!
//! Two disjoint classes of failure exist:
//!
//! - [`SchemaError`]: the schema itself is malformed or used in a position
//!   where it has no meaning. These are programmer errors and abort the
//!   current match.
//! - [`ValidationError`]: the data does not satisfy the schema. Matchers
//!   produce these as [`Mismatch`] values; only [`crate::validate`] turns
//!   one into an error.

use std::fmt;

use thiserror::Error;

use crate::mismatch::Mismatch;

/// A schema that cannot be matched against anything.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Array template must contain exactly one element, found {found}")]
    ArrayArity { found: usize },

    #[error("Schema of kind '{0}' is only meaningful as an object template field")]
    Misplaced(&'static str),

    #[error("Recursive schema reference outlived the schema that owns it")]
    DanglingReference,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Data rejected by [`crate::validate`].
///
/// The message is the canonical rendering of the mismatch, so two errors
/// with the same message describe the same failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Canonical rendering of `mismatch`.
    pub message: String,

    /// The structured mismatch the message was rendered from.
    pub mismatch: Mismatch,
}

impl ValidationError {
    pub fn new(mismatch: Mismatch) -> Self {
        Self {
            message: mismatch.to_string(),
            mismatch,
        }
    }
}

impl From<Mismatch> for ValidationError {
    fn from(mismatch: Mismatch) -> Self {
        Self::new(mismatch)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}

impl Error {
    /// The mismatch behind a validation failure, if this is one.
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Error::Validation(e) => Some(&e.mismatch),
            Error::InvalidSchema(_) => None,
        }
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, Error::InvalidSchema(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_error_message_is_rendering() {
        let error = ValidationError::new(Mismatch::value(json!("nope")).at_key("name"));
        assert_eq!(error.message, r#"{... "name": "nope" ...}"#);
        assert_eq!(error.to_string(), error.message);
    }

    #[test]
    fn test_error_kinds_are_distinct() {
        let invalid: Error = SchemaError::ArrayArity { found: 2 }.into();
        assert!(invalid.is_invalid_schema());
        assert!(invalid.mismatch().is_none());
        assert!(invalid.to_string().contains("exactly one element"));

        let rejected: Error = ValidationError::new(Mismatch::missing()).into();
        assert!(!rejected.is_invalid_schema());
        assert_eq!(rejected.to_string(), "undefined");
    }
}
