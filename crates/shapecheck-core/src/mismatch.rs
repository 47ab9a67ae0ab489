//! The failure side of a match.
//!
//! A [`Mismatch`] is produced as a value by every matcher and travels back
//! up through the recursive dispatch, picking up one [`Segment`] per
//! object or array it passes through. Its [`Display`](fmt::Display)
//! implementation is the canonical rendering used for validation error
//! messages and for collapsing duplicate alternatives.

use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::Value;

/// One step on the path from the root of the data to a failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

/// A structured description of why data failed to satisfy a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mismatch {
    /// The offending value itself, or `None` when a required field was
    /// absent altogether.
    Value(Option<Value>),

    /// A mismatch found underneath an object key or array index.
    At {
        segment: Segment,
        mismatch: Box<Mismatch>,
    },

    /// One mismatch per failed alternative of a disjunction, in
    /// alternative order.
    Alternatives(Vec<Mismatch>),
}

impl Mismatch {
    pub fn value(value: Value) -> Self {
        Mismatch::Value(Some(value))
    }

    /// A required field that is not present.
    pub fn missing() -> Self {
        Mismatch::Value(None)
    }

    /// Locate this mismatch underneath `segment`.
    pub fn at(self, segment: impl Into<Segment>) -> Self {
        Mismatch::At {
            segment: segment.into(),
            mismatch: Box::new(self),
        }
    }

    pub fn at_index(self, index: usize) -> Self {
        self.at(Segment::Index(index))
    }

    pub fn at_key(self, key: impl Into<String>) -> Self {
        self.at(Segment::Key(key.into()))
    }

    /// Follow located mismatches down to the mismatch they wrap.
    pub fn leaf(&self) -> &Mismatch {
        let mut current = self;
        while let Mismatch::At { mismatch, .. } = current {
            current = mismatch;
        }
        current
    }

    /// Whether the failure is an absent required field.
    pub fn is_missing(&self) -> bool {
        matches!(self.leaf(), Mismatch::Value(None))
    }

    /// The segments from the root of the data to the failure.
    ///
    /// Stops at the first aggregated mismatch, since alternatives may fail
    /// at different locations.
    pub fn segments(&self) -> Vec<&Segment> {
        let mut segments = Vec::new();
        let mut current = self;
        while let Mismatch::At { segment, mismatch } = current {
            segments.push(segment);
            current = mismatch;
        }
        segments
    }

    /// The failure location as a JSON path.
    ///
    /// Examples:
    /// - `""` - the root value
    /// - `"spec.replicas"` - nested field
    /// - `"spec.containers[0].image"` - array element field
    pub fn path(&self) -> String {
        let mut path = String::new();
        for segment in self.segments() {
            match segment {
                Segment::Index(i) => path.push_str(&format!("[{}]", i)),
                Segment::Key(k) if path.is_empty() => path.push_str(k),
                Segment::Key(k) => {
                    path.push('.');
                    path.push_str(k);
                }
            }
        }
        path
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Value(None) => write!(f, "undefined"),
            Mismatch::Value(Some(value)) => write_compact(f, value),
            Mismatch::At {
                segment: Segment::Index(i),
                mismatch,
            } => write!(f, "[... {}: {} ...]", i, mismatch),
            Mismatch::At {
                segment: Segment::Key(k),
                mismatch,
            } => write!(f, "{{... {}: {} ...}}", Value::from(k.as_str()), mismatch),
            Mismatch::Alternatives(mismatches) => {
                let rendered: IndexSet<String> =
                    mismatches.iter().map(ToString::to_string).collect();
                let rendered: Vec<String> = rendered.into_iter().collect();
                write!(f, "{}", rendered.join(" and "))
            }
        }
    }
}

/// Compact JSON with numbers in shortest decimal form, so `2.0` and `2`
/// render alike.
fn write_compact(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(x) if n.is_f64() => write_number(f, x),
            _ => write!(f, "{}", n),
        },
        Value::Array(items) => {
            write!(f, "[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write_compact(f, item)?;
            }
            write!(f, "]")
        }
        Value::Object(fields) => {
            write!(f, "{{")?;
            for (i, (key, item)) in fields.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}:", Value::from(key.as_str()))?;
                write_compact(f, item)?;
            }
            write!(f, "}}")
        }
        // null, booleans and quoted strings
        _ => write!(f, "{}", value),
    }
}

/// Plain decimal between 1e-6 and 1e21, exponent form with a signed
/// exponent outside that range.
fn write_number(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if x == 0.0 {
        return write!(f, "0");
    }
    let magnitude = x.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return write!(f, "{}", x);
    }
    let exp = format!("{:e}", x);
    match exp.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            write!(f, "{}e+{}", mantissa, exponent)
        }
        _ => write!(f, "{}", exp),
    }
}
