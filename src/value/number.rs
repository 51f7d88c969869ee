use crate::common::format_float;
use std::cmp::Ordering;
use std::fmt;

/// Numeric view of a value. Integers stay integral for as long as an operation
/// permits; mixing with a float promotes to float.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Number::Int(_))
    }

    /// Sum preserving the integral type. Integer overflow yields `None`.
    pub fn checked_add(self, other: Number) -> Option<Number> {
        match (self, other) {
            (Number::Int(x), Number::Int(y)) => x.checked_add(y).map(Number::Int),
            (x, y) => Some(Number::Float(x.as_f64() + y.as_f64())),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn numeric_cmp(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
            (x, y) => x.as_f64().partial_cmp(&y.as_f64()),
        }
    }

    /// The numerically greater of the two; on a tie or NaN `self` wins.
    pub fn max(self, other: Number) -> Number {
        match self.numeric_cmp(other) {
            Some(Ordering::Less) => other,
            _ => self,
        }
    }

    pub fn min(self, other: Number) -> Number {
        match self.numeric_cmp(other) {
            Some(Ordering::Greater) => other,
            _ => self,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.numeric_cmp(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.numeric_cmp(*other)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) => write!(f, "{}", format_float(*v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_preserves_integers() {
        assert!(matches!(Number::Int(2).checked_add(Number::Int(3)), Some(Number::Int(5))));
        assert!(matches!(Number::Int(2).checked_add(Number::Float(0.5)), Some(Number::Float(v)) if v == 2.5));
        assert!(Number::Int(i64::MAX).checked_add(Number::Int(1)).is_none());
    }

    #[test]
    fn test_mixed_comparison() {
        assert_eq!(Number::Int(1), Number::Float(1.0));
        assert!(Number::Int(2) > Number::Float(1.5));
        assert!(matches!(Number::Int(4).max(Number::Float(4.5)), Number::Float(_)));
        assert!(matches!(Number::Int(4).min(Number::Float(4.5)), Number::Int(4)));
    }
}
