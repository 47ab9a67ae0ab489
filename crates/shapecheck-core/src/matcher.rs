//! Schema dispatch and the structural matching rules.
//!
//! [`match_schema`] walks the schema and the data in lock-step, depth
//! first, and returns at most one mismatch. Only a disjunction built with
//! [`crate::or`] reports more than one failure, and it does so inside a
//! single [`Mismatch::Alternatives`].

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::SchemaError;
use crate::mismatch::Mismatch;
use crate::schema::{Atom, Schema};

/// `Ok(None)` on success, `Ok(Some(_))` when the data does not match, and
/// `Err(_)` when the schema itself is unusable.
pub type MatchResult = Result<Option<Mismatch>, SchemaError>;

/// Match `data` against `schema`.
pub fn match_schema(schema: &Schema, data: &Value) -> MatchResult {
    trace!(kind = schema.kind(), "dispatching");

    match schema {
        Schema::Literal(atom) => Ok(match_atom(atom, data)),
        Schema::Pattern(re) => Ok(match_pattern(re, data)),
        Schema::Array(elements) => match_array(elements, data),
        Schema::Object(fields) => match_object(fields, data),
        Schema::Predicate(check) => check(data),
        Schema::Lazy(supply) => match_schema(&supply(), data),
        Schema::Recursive(inner) => match_schema(inner, data),
        Schema::Backref(this) => {
            let this = this.upgrade().ok_or(SchemaError::DanglingReference)?;
            match_schema(&this, data)
        }
        Schema::Optional(_) => Err(SchemaError::Misplaced(schema.kind())),
    }
}

pub fn match_atom(atom: &Atom, data: &Value) -> Option<Mismatch> {
    if atom.matches(data) {
        None
    } else {
        Some(Mismatch::value(data.clone()))
    }
}

/// Unanchored: the expression only has to match somewhere in the string.
pub fn match_pattern(re: &Regex, data: &Value) -> Option<Mismatch> {
    match data {
        Value::String(s) if re.is_match(s) => None,
        _ => Some(Mismatch::value(data.clone())),
    }
}

/// Check every element against the template's single element schema,
/// stopping at the first failure.
pub fn match_array(elements: &[Schema], data: &Value) -> MatchResult {
    let [element] = elements else {
        return Err(SchemaError::ArrayArity {
            found: elements.len(),
        });
    };

    let Value::Array(items) = data else {
        return Ok(Some(Mismatch::value(data.clone())));
    };

    for (i, item) in items.iter().enumerate() {
        if let Some(m) = match_schema(element, item)? {
            return Ok(Some(m.at_index(i)));
        }
    }
    Ok(None)
}

/// Check named fields in template order, then require every field the
/// template does not name to be valid JSON.
pub fn match_object(fields: &IndexMap<String, Schema>, data: &Value) -> MatchResult {
    let Value::Object(object) = data else {
        return Ok(Some(Mismatch::value(data.clone())));
    };

    for (key, field) in fields {
        let found = match (field, object.get(key)) {
            (Schema::Optional(_), None) => None,
            (Schema::Optional(inner), Some(value)) => match_schema(inner, value)?,
            (_, None) => Some(Mismatch::missing()),
            (_, Some(value)) => match_schema(field, value)?,
        };
        if let Some(m) = found {
            return Ok(Some(m.at_key(key.as_str())));
        }
    }

    Ok(any_object_except(object, |key| fields.contains_key(key)))
}

/// Accept anything with a JSON representation.
///
/// Every number must be finite, and arrays and objects are scanned all
/// the way down.
pub fn match_any(data: &Value) -> Option<Mismatch> {
    match data {
        Value::Null | Value::Bool(_) | Value::String(_) => None,
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => None,
            _ => Some(Mismatch::value(data.clone())),
        },
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| match_any(item).map(|m| m.at_index(i))),
        Value::Object(object) => any_object_except(object, |_| false),
    }
}

/// Require every entry of `object` whose key is not ignored to be valid
/// JSON. Entries are visited in the object's own order.
pub fn any_object_except<F>(object: &Map<String, Value>, is_ignored: F) -> Option<Mismatch>
where
    F: Fn(&str) -> bool,
{
    object
        .iter()
        .filter(|(key, _)| !is_ignored(key.as_str()))
        .find_map(|(key, value)| match_any(value).map(|m| m.at_key(key.as_str())))
}
