//! Structural matching for JSON-like data.
//!
//! A [`Schema`] is composed from literals, regular expressions, array and
//! object templates, and combinators. Matching walks the schema and a
//! [`serde_json::Value`] together and reports either success or a
//! [`Mismatch`] that locates the first failure.
//!
//! - **Templates**: `Schema::array_of(s)` checks every element against `s`;
//!   `Schema::object(fields)` checks named fields and ignores the rest, as
//!   long as the rest is valid JSON
//! - **Combinators**: [`optional`], [`lazy`], [`where_`], [`or`], [`and`],
//!   [`not`], and the base schemas [`any`], [`boolean`], [`number`],
//!   [`string`]
//! - **Entry points**: [`matches`], [`validate`] and the underlying
//!   [`try_match`]
//!
//! # Example
//!
//! ```rust
//! use shapecheck_core::{number, optional, or, validate, Schema};
//! use serde_json::json;
//!
//! let point = Schema::object([
//!     ("x", number()),
//!     ("y", number()),
//!     ("label", optional(or([Schema::null(), shapecheck_core::string()]))),
//! ]);
//!
//! let check = validate(Schema::array_of(point));
//! assert!(check(json!([{"x": 1, "y": 2}, {"x": 0, "y": 0, "label": "origin"}])).is_ok());
//!
//! let err = check(json!([{"x": 1, "y": "2"}])).unwrap_err();
//! assert_eq!(err.to_string(), r#"[... 0: {... "y": "2" ...} ...]"#);
//! ```

mod combinators;
mod error;
mod matcher;
mod mismatch;
mod schema;
mod validate;

pub use error::{Error, Result, SchemaError, ValidationError};
pub use mismatch::{Mismatch, Segment};
pub use schema::{Atom, PredicateFn, Schema, ThunkFn};

pub use combinators::{
    and, any, any_array, any_object, boolean, lazy, not, number, optional, or, string, where_,
};
pub use matcher::{any_object_except, match_schema, MatchResult};
pub use validate::{matches, try_match, validate};
