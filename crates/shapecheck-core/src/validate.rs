//! Entry points.
//!
//! Each entry point takes a schema once and returns a function that can be
//! applied to any number of values:
//!
//! - [`try_match`]: the generic adapter, calling exactly one of two
//!   continuations per value
//! - [`matches`]: `true`/`false`, with no detail
//! - [`validate`]: the value back on success, a [`ValidationError`] otherwise
//!
//! Schema errors are never folded into a mismatch; every entry point
//! surfaces them as errors of their own.

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, SchemaError, ValidationError};
use crate::matcher::match_schema;
use crate::mismatch::Mismatch;
use crate::schema::Schema;

/// Run the matcher once per value and hand the outcome to `on_match` or
/// `on_mismatch`.
///
/// ```rust
/// use shapecheck_core::{try_match, Schema};
/// use serde_json::json;
///
/// let describe = try_match(
///     Schema::object([("x", 1)]),
///     |_| "ok".to_string(),
///     |m| format!("bad: {}", m),
/// );
///
/// assert_eq!(describe(&json!({"x": 1})).unwrap(), "ok");
/// assert_eq!(describe(&json!({})).unwrap(), r#"bad: {... "x": undefined ...}"#);
/// ```
pub fn try_match<R, M, F>(
    schema: impl Into<Schema>,
    on_match: M,
    on_mismatch: F,
) -> impl Fn(&Value) -> std::result::Result<R, SchemaError>
where
    M: Fn(&Value) -> R,
    F: Fn(Mismatch) -> R,
{
    let schema = schema.into();
    move |data: &Value| match match_schema(&schema, data) {
        Ok(None) => Ok(on_match(data)),
        Ok(Some(mismatch)) => Ok(on_mismatch(mismatch)),
        Err(e) => {
            debug!(kind = schema.kind(), "Invalid schema: {}", e);
            Err(e)
        }
    }
}

/// Predicate over values. Mismatch details are discarded.
pub fn matches(
    schema: impl Into<Schema>,
) -> impl Fn(&Value) -> std::result::Result<bool, SchemaError> {
    try_match(schema, |_| true, |_| false)
}

/// Identity on matching values; anything else becomes
/// [`crate::Error::Validation`] carrying the mismatch rendering.
///
/// ```rust
/// use shapecheck_core::{optional, validate, Schema};
/// use serde_json::json;
///
/// let check = validate(Schema::object([("a", optional(1))]));
///
/// assert_eq!(check(json!({})).unwrap(), json!({}));
/// let err = check(json!({"a": 2})).unwrap_err();
/// assert_eq!(err.to_string(), r#"{... "a": 2 ...}"#);
/// ```
pub fn validate(schema: impl Into<Schema>) -> impl Fn(Value) -> Result<Value> {
    let check = try_match(schema, |_| None, Some);
    move |data: Value| match check(&data)? {
        None => Ok(data),
        Some(mismatch) => Err(reject(mismatch)),
    }
}

/// [`validate`] without taking ownership of the schema.
pub(crate) fn check_owned(schema: &Schema, data: Value) -> Result<Value> {
    match match_schema(schema, &data)? {
        None => Ok(data),
        Some(mismatch) => Err(reject(mismatch)),
    }
}

fn reject(mismatch: Mismatch) -> crate::Error {
    let error = ValidationError::new(mismatch);
    debug!(path = %error.mismatch.path(), "Validation failed: {}", error.message);
    error.into()
}
