use super::{Histogram, Number};
use crate::common::{float_literal, format_float, quote_string};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single metric value.
///
/// Values are totally ordered, first by kind
/// (`Empty < Histogram < String < Float < Integer < Boolean`) and then by their
/// natural order within a kind. Floats use the IEEE total order.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Empty,
    Histogram(Histogram),
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    pub const TRUE: Value = Value::Boolean(true);
    pub const FALSE: Value = Value::Boolean(false);

    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_histogram(&self) -> bool {
        matches!(self, Value::Histogram(_))
    }

    const fn kind_rank(&self) -> u8 {
        match self {
            Value::Empty => 0,
            Value::Histogram(_) => 1,
            Value::String(_) => 2,
            Value::Float(_) => 3,
            Value::Integer(_) => 4,
            Value::Boolean(_) => 5,
        }
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Empty => "empty",
            Value::Histogram(_) => "histogram",
            Value::String(_) => "string",
            Value::Float(_) => "float",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Numeric view. Booleans count as 1 and 0; histograms, strings and empty
    /// values have none.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Integer(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::Float(*f)),
            Value::Boolean(b) => Some(Number::Int(*b as i64)),
            Value::Empty | Value::Histogram(_) | Value::String(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            Value::Histogram(h) => Some(!h.is_empty()),
            Value::String(_) | Value::Empty => None,
        }
    }

    pub fn as_string(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Boolean(b) => Some(Cow::Owned(b.to_string())),
            Value::Integer(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(format_float(*f))),
            Value::Histogram(_) | Value::Empty => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&Histogram> {
        match self {
            Value::Histogram(h) => Some(h),
            _ => None,
        }
    }

    /// Source text for this value as a literal. Empty has no literal form and
    /// renders as `(none)`.
    pub fn config_string(&self) -> String {
        match self {
            Value::Empty => "(none)".to_string(),
            Value::Histogram(h) => h.config_string(),
            Value::String(s) => quote_string(s),
            Value::Float(f) => float_literal(*f),
            Value::Integer(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Histogram(x), Histogram(y)) => x.cmp(y),
            (String(x), String(y)) => x.cmp(y),
            (Float(x), Float(y)) => x.total_cmp(y),
            (Integer(x), Integer(y)) => x.cmp(y),
            (Boolean(x), Boolean(y)) => x.cmp(y),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.kind_rank());
        match self {
            Value::Empty => {}
            Value::Histogram(h) => h.hash(state),
            Value::String(s) => s.hash(state),
            Value::Float(f) => state.write_u64(f.to_bits()),
            Value::Integer(i) => i.hash(state),
            Value::Boolean(b) => b.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Histogram> for Value {
    fn from(value: Histogram) -> Self {
        Value::Histogram(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        match value {
            Number::Int(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Empty)
    }
}
