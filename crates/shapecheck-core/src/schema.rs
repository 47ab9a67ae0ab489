//! Schema nodes.
//!
//! A [`Schema`] is a closed sum type over the kinds of shape a value can be
//! checked against. Schemas are plain values: built once, never mutated,
//! cheap to clone, and safe to share between threads.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::matcher::{self, MatchResult};
use crate::validate;

/// A closure deciding whether `data` matches, and why not.
pub type PredicateFn = dyn Fn(&Value) -> MatchResult + Send + Sync;

/// A supplier invoked at match time to produce the schema to use.
pub type ThunkFn = dyn Fn() -> Schema + Send + Sync;

/// A primitive literal matched by strict equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl Atom {
    /// Strict equality: no coercion between kinds, numbers compared by value.
    pub fn matches(&self, data: &Value) -> bool {
        match (self, data) {
            (Atom::Null, Value::Null) => true,
            (Atom::Bool(a), Value::Bool(b)) => a == b,
            (Atom::Number(a), Value::Number(b)) => b.as_f64() == Some(*a),
            (Atom::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Atom::Null => write!(f, "null"),
            Atom::Bool(b) => write!(f, "{}", b),
            Atom::Number(n) => write!(f, "{}", n),
            Atom::String(s) => write!(f, "{}", Value::from(s.as_str())),
        }
    }
}

#[derive(Clone)]
pub enum Schema {
    /// Matches exactly one primitive value.
    Literal(Atom),

    /// Matches strings the expression finds a match in (unanchored).
    Pattern(Regex),

    /// `[element]`: every element of an array must match `element`.
    ///
    /// Holds a `Vec` so that templates read from documents keep their
    /// arity; anything other than exactly one element is rejected at match
    /// time with [`SchemaError::ArrayArity`].
    Array(Vec<Schema>),

    /// Named fields checked in insertion order. Fields not named here are
    /// allowed, but must still be valid JSON.
    Object(IndexMap<String, Schema>),

    /// Marks an object template field as allowed to be absent.
    Optional(Box<Schema>),

    /// Arbitrary check. Every combinator is one of these.
    Predicate(Arc<PredicateFn>),

    /// Schema produced by calling the supplier on every match.
    Lazy(Arc<ThunkFn>),

    /// Owner of a self-referential schema built by [`Schema::recursive`].
    Recursive(Arc<Schema>),

    /// Reference back to an enclosing [`Schema::Recursive`].
    Backref(Weak<Schema>),
}

impl Schema {
    pub fn literal(atom: impl Into<Atom>) -> Self {
        Schema::Literal(atom.into())
    }

    pub fn null() -> Self {
        Schema::Literal(Atom::Null)
    }

    /// Compile a regular expression into a pattern schema.
    pub fn pattern(pattern: &str) -> std::result::Result<Self, SchemaError> {
        Ok(Schema::Pattern(Regex::new(pattern)?))
    }

    /// Array template from raw elements; see [`Schema::Array`] for arity.
    pub fn array<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Schema>,
    {
        Schema::Array(elements.into_iter().map(Into::into).collect())
    }

    /// Array template whose elements must all match `element`.
    pub fn array_of(element: impl Into<Schema>) -> Self {
        Schema::Array(vec![element.into()])
    }

    /// Object template from `(field, schema)` pairs, in checking order.
    pub fn object<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<Schema>,
    {
        Schema::Object(
            fields
                .into_iter()
                .map(|(k, s)| (k.into(), s.into()))
                .collect(),
        )
    }

    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&Value) -> MatchResult + Send + Sync + 'static,
    {
        Schema::Predicate(Arc::new(check))
    }

    /// Build a schema that refers to itself.
    ///
    /// `build` receives a handle standing for the schema being built. The
    /// handle resolves to the finished schema at match time, so the shape
    /// is constructed once rather than on every match as with
    /// [`crate::lazy`].
    ///
    /// ```rust
    /// use shapecheck_core::{number, optional, or, Schema};
    /// use serde_json::json;
    ///
    /// let tree = Schema::recursive(|tree| {
    ///     or([
    ///         Schema::null(),
    ///         Schema::object([
    ///             ("lhs", optional(tree.clone())),
    ///             ("key", number()),
    ///             ("rhs", optional(tree)),
    ///         ]),
    ///     ])
    /// });
    ///
    /// assert!(tree.matches(&json!({"lhs": {"key": 0}, "key": 1})).unwrap());
    /// assert!(!tree.matches(&json!({"lhs": {}, "key": 1})).unwrap());
    /// ```
    pub fn recursive<F>(build: F) -> Self
    where
        F: FnOnce(Schema) -> Schema,
    {
        Schema::Recursive(Arc::new_cyclic(|this| build(Schema::Backref(this.clone()))))
    }

    /// Interpret a JSON document as a template.
    ///
    /// Primitives become literals, arrays become array templates and
    /// objects become object templates with every field required. Patterns
    /// and combinators have no document form.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Schema::Literal(Atom::Null),
            Value::Bool(b) => Schema::Literal(Atom::Bool(*b)),
            Value::Number(n) => Schema::Literal(Atom::from(n)),
            Value::String(s) => Schema::Literal(Atom::String(s.clone())),
            Value::Array(items) => Schema::Array(items.iter().map(Schema::from_json).collect()),
            Value::Object(fields) => Schema::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Schema::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Short name of this schema's kind, used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Literal(_) => "literal",
            Schema::Pattern(_) => "pattern",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
            Schema::Optional(_) => "optional",
            Schema::Predicate(_) => "predicate",
            Schema::Lazy(_) => "lazy",
            Schema::Recursive(_) => "recursive",
            Schema::Backref(_) => "backref",
        }
    }

    /// Run the matcher once. `Ok(None)` means `data` matches.
    pub fn check(&self, data: &Value) -> MatchResult {
        matcher::match_schema(self, data)
    }

    pub fn matches(&self, data: &Value) -> std::result::Result<bool, SchemaError> {
        Ok(self.check(data)?.is_none())
    }

    /// Return `data` unchanged if it matches, otherwise a validation error.
    pub fn validate(&self, data: Value) -> Result<Value> {
        validate::check_owned(self, data)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Literal(atom) => write!(f, "Literal({})", atom),
            Schema::Pattern(re) => write!(f, "Pattern(/{}/)", re.as_str()),
            Schema::Array(elements) => f.debug_tuple("Array").field(elements).finish(),
            Schema::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Schema::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Schema::Predicate(_) => write!(f, "Predicate(..)"),
            Schema::Lazy(_) => write!(f, "Lazy(..)"),
            // the inner schema contains a Backref to itself
            Schema::Recursive(_) => write!(f, "Recursive(..)"),
            Schema::Backref(_) => write!(f, "Backref(..)"),
        }
    }
}

macro_rules! atom_from {
    ($($ty:ty => |$v:ident| $atom:expr;)*) => {
        $(
            impl From<$ty> for Atom {
                fn from($v: $ty) -> Self {
                    $atom
                }
            }

            impl From<$ty> for Schema {
                fn from(value: $ty) -> Self {
                    Schema::Literal(Atom::from(value))
                }
            }
        )*
    };
}

atom_from! {
    bool => |b| Atom::Bool(b);
    i32 => |n| Atom::Number(f64::from(n));
    u32 => |n| Atom::Number(f64::from(n));
    i64 => |n| Atom::Number(n as f64);
    u64 => |n| Atom::Number(n as f64);
    f64 => |n| Atom::Number(n);
    &str => |s| Atom::String(s.to_string());
    String => |s| Atom::String(s);
}

impl From<&serde_json::Number> for Atom {
    fn from(n: &serde_json::Number) -> Self {
        // as_f64 only fails for arbitrary-precision numbers
        Atom::Number(
            n.as_f64()
                .unwrap_or_else(|| n.to_string().parse().unwrap_or(f64::NAN)),
        )
    }
}

impl From<Atom> for Schema {
    fn from(atom: Atom) -> Self {
        Schema::Literal(atom)
    }
}

impl From<Regex> for Schema {
    fn from(re: Regex) -> Self {
        Schema::Pattern(re)
    }
}

impl From<Vec<Schema>> for Schema {
    fn from(elements: Vec<Schema>) -> Self {
        Schema::Array(elements)
    }
}

impl From<&Value> for Schema {
    fn from(value: &Value) -> Self {
        Schema::from_json(value)
    }
}
