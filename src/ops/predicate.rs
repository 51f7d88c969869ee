use crate::value::Value;
use std::cmp::Ordering;

/// Equality across kinds. Booleans and numbers compare numerically; strings
/// and histograms compare only with their own kind. Any other pairing is
/// undecidable.
pub fn equals(x: &Value, y: &Value) -> Option<bool> {
    match (x, y) {
        (Value::String(a), Value::String(b)) => Some(a == b),
        (Value::Histogram(a), Value::Histogram(b)) => Some(a == b),
        _ => {
            let a = x.as_number()?;
            let b = y.as_number()?;
            a.numeric_cmp(b).map(|o| o == Ordering::Equal).or(Some(false))
        }
    }
}

/// Ordering between two numbers or two strings.
pub fn compare(x: &Value, y: &Value) -> Option<Ordering> {
    match (x, y) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            let a = x.as_number()?;
            let b = y.as_number()?;
            a.numeric_cmp(b)
        }
    }
}

pub fn logical_and(x: &Value, y: &Value) -> Option<bool> {
    Some(x.as_bool()? && y.as_bool()?)
}

pub fn logical_or(x: &Value, y: &Value) -> Option<bool> {
    Some(x.as_bool()? || y.as_bool()?)
}
