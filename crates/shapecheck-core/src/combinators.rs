//! Functions that build schemas out of other schemas.
//!
//! Every combinator here produces a [`Schema::Predicate`] (or, for
//! [`optional`] and [`lazy`], the dedicated variant), so combinators nest
//! freely with templates and literals.

use std::sync::Arc;

use serde_json::Value;

use crate::matcher::{match_any, match_schema};
use crate::mismatch::Mismatch;
use crate::schema::Schema;

/// Allow an object template field to be absent.
///
/// Only meaningful as the value of an object template field; matched
/// anywhere else it fails with [`crate::SchemaError::Misplaced`].
pub fn optional(schema: impl Into<Schema>) -> Schema {
    Schema::Optional(Box::new(schema.into()))
}

/// Defer building a schema until match time.
///
/// `supply` is called again on every match, so it should be cheap. For a
/// schema built once see [`Schema::recursive`].
///
/// ```rust
/// use shapecheck_core::{lazy, number, optional, Schema};
/// use serde_json::json;
///
/// fn list() -> Schema {
///     Schema::object([("head", number()), ("tail", optional(lazy(list)))])
/// }
///
/// assert!(list().matches(&json!({"head": 1, "tail": {"head": 2}})).unwrap());
/// ```
pub fn lazy<F>(supply: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    Schema::Lazy(Arc::new(supply))
}

/// Leaf schema from a boolean test. A rejected value is reported as is.
#[doc(alias = "where")]
pub fn where_<F>(test: F) -> Schema
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Schema::predicate(move |data| {
        Ok(if test(data) {
            None
        } else {
            Some(Mismatch::value(data.clone()))
        })
    })
}

/// Any value with a JSON representation.
pub fn any() -> Schema {
    Schema::predicate(|data| Ok(match_any(data)))
}

pub fn boolean() -> Schema {
    where_(Value::is_boolean)
}

/// A finite number.
pub fn number() -> Schema {
    where_(|data| data.as_f64().is_some_and(f64::is_finite))
}

pub fn string() -> Schema {
    where_(Value::is_string)
}

/// An array of valid JSON values, i.e. `[any]`.
pub fn any_array() -> Schema {
    Schema::array_of(any())
}

/// Any object; unnamed fields must still be valid JSON.
pub fn any_object() -> Schema {
    Schema::object(std::iter::empty::<(String, Schema)>())
}

/// Succeed if any alternative matches, trying them in order.
///
/// When every alternative fails the result is a
/// [`Mismatch::Alternatives`] holding one mismatch per alternative. With no
/// alternatives nothing matches.
pub fn or<I>(schemas: I) -> Schema
where
    I: IntoIterator,
    I::Item: Into<Schema>,
{
    let schemas: Vec<Schema> = schemas.into_iter().map(Into::into).collect();
    Schema::predicate(move |data| {
        let mut mismatches = Vec::with_capacity(schemas.len());
        for schema in &schemas {
            match match_schema(schema, data)? {
                None => return Ok(None),
                Some(m) => mismatches.push(m),
            }
        }
        Ok(Some(Mismatch::Alternatives(mismatches)))
    })
}

/// Succeed if every schema matches. The first failure is returned as is.
/// With no schemas everything matches.
pub fn and<I>(schemas: I) -> Schema
where
    I: IntoIterator,
    I::Item: Into<Schema>,
{
    let schemas: Vec<Schema> = schemas.into_iter().map(Into::into).collect();
    Schema::predicate(move |data| {
        for schema in &schemas {
            if let Some(m) = match_schema(schema, data)? {
                return Ok(Some(m));
            }
        }
        Ok(None)
    })
}

/// Succeed exactly when `schema` does not.
pub fn not(schema: impl Into<Schema>) -> Schema {
    let schema = schema.into();
    Schema::predicate(move |data| {
        Ok(match match_schema(&schema, data)? {
            Some(_) => None,
            None => Some(Mismatch::value(data.clone())),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn basic_json() -> Vec<Value> {
        vec![
            json!(null),
            json!(0),
            json!(1),
            json!(false),
            json!(true),
            json!(""),
            json!([]),
            json!({}),
        ]
    }

    #[test]
    fn test_base_schemas() {
        for data in basic_json() {
            assert!(any().matches(&data).unwrap());
            assert_eq!(boolean().matches(&data).unwrap(), data.is_boolean());
            assert_eq!(number().matches(&data).unwrap(), data.is_number());
            assert_eq!(string().matches(&data).unwrap(), data.is_string());
            assert_eq!(any_array().matches(&data).unwrap(), data.is_array());
            assert_eq!(any_object().matches(&data).unwrap(), data.is_object());
        }
    }

    #[test]
    fn test_where_reports_value() {
        let even = where_(|v| v.as_i64().is_some_and(|n| n % 2 == 0));
        assert_eq!(even.check(&json!(4)).unwrap(), None);
        assert_eq!(
            even.check(&json!(3)).unwrap(),
            Some(Mismatch::value(json!(3)))
        );
    }

    #[test]
    fn test_empty_or_and() {
        for data in basic_json() {
            assert_eq!(
                or(Vec::<Schema>::new()).check(&data).unwrap(),
                Some(Mismatch::Alternatives(vec![]))
            );
            assert!(and(Vec::<Schema>::new()).matches(&data).unwrap());
        }
    }

    #[test]
    fn test_or_aggregates_in_order() {
        let schema = or([Schema::from(1), Schema::from(2), or([3])]);
        for data in [json!(1), json!(2), json!(3)] {
            assert!(schema.matches(&data).unwrap());
        }

        let Some(Mismatch::Alternatives(ms)) = schema.check(&json!(0)).unwrap() else {
            panic!("expected aggregated mismatch");
        };
        assert_eq!(ms.len(), 3);
        assert_eq!(ms[2], Mismatch::Alternatives(vec![Mismatch::value(json!(0))]));
        assert_eq!(schema.check(&json!(0)).unwrap().unwrap().to_string(), "0");
    }

    #[test]
    fn test_and_returns_first_failure() {
        let schema = and([number(), Schema::from(1)]);
        assert!(schema.matches(&json!(1)).unwrap());
        assert_eq!(
            schema.check(&json!("1")).unwrap(),
            Some(Mismatch::value(json!("1")))
        );
        assert!(!and([0, 1]).matches(&json!(0)).unwrap());
    }

    #[test]
    fn test_not_is_complement() {
        let schema = not(Schema::object([("a", 1)]));
        assert!(schema.matches(&json!({"a": 2})).unwrap());
        assert_eq!(
            schema.check(&json!({"a": 1})).unwrap(),
            Some(Mismatch::value(json!({"a": 1})))
        );
    }

    #[test]
    fn test_combinators_propagate_schema_errors() {
        let broken = Schema::array(Vec::<Schema>::new());
        for schema in [
            or([broken.clone()]),
            and([broken.clone()]),
            not(broken.clone()),
            lazy(move || broken.clone()),
        ] {
            assert!(matches!(
                schema.check(&json!([])),
                Err(SchemaError::ArrayArity { found: 0 })
            ));
        }
    }

    #[test]
    fn test_lazy_calls_supplier_each_match() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let schema = lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Schema::from(true)
        });

        assert!(schema.matches(&json!(true)).unwrap());
        assert!(!schema.matches(&json!(false)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
