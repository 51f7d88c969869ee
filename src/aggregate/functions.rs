use super::AggregateFn;
use crate::value::{Histogram, Number, Value};

/// Sum of all values. Empty values count as zero and histograms contribute
/// their sum; a string or an integer overflow poisons the group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Sum;

impl AggregateFn for Sum {
    type Acc = Option<Number>;

    fn initial(&self) -> Self::Acc {
        Some(Number::Int(0))
    }

    fn map(&self, value: &Value) -> Self::Acc {
        match value {
            Value::Empty => Some(Number::Int(0)),
            Value::Histogram(h) => Some(Number::Float(h.sum())),
            Value::String(_) => None,
            other => other.as_number(),
        }
    }

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc {
        x?.checked_add(y?)
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        acc.map(Value::from).unwrap_or_default()
    }

    fn scalar_fallback(&self) -> Value {
        Value::Integer(0)
    }
}

fn extreme_of(value: &Value, histogram_extreme: fn(&Histogram) -> Option<f64>) -> Option<Number> {
    match value {
        Value::Histogram(h) => histogram_extreme(h).map(Number::Float),
        other => other.as_number(),
    }
}

/// Largest present value. Histograms contribute their upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Max;

impl AggregateFn for Max {
    type Acc = Option<Number>;

    fn initial(&self) -> Self::Acc {
        None
    }

    fn map(&self, value: &Value) -> Self::Acc {
        extreme_of(value, |h| h.max())
    }

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc {
        match (x, y) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        acc.map(Value::from).unwrap_or_default()
    }
}

/// Smallest present value. Histograms contribute their lower bound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Min;

impl AggregateFn for Min {
    type Acc = Option<Number>;

    fn initial(&self) -> Self::Acc {
        None
    }

    fn map(&self, value: &Value) -> Self::Acc {
        extreme_of(value, |h| h.min())
    }

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc {
        match (x, y) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        acc.map(Value::from).unwrap_or_default()
    }
}

/// Arithmetic mean of the present numeric values, as a float.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Avg;

impl AggregateFn for Avg {
    /// Running sum and count.
    type Acc = (f64, u64);

    fn initial(&self) -> Self::Acc {
        (0.0, 0)
    }

    fn map(&self, value: &Value) -> Self::Acc {
        let v = match value {
            Value::Histogram(h) => h.avg(),
            other => other.as_number().map(Number::as_f64),
        };
        v.map_or((0.0, 0), |v| (v, 1))
    }

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc {
        (x.0 + y.0, x.1 + y.1)
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        match acc {
            (_, 0) => Value::Empty,
            (sum, count) => Value::Float(sum / count as f64),
        }
    }
}

/// Number of present values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Count;

impl AggregateFn for Count {
    type Acc = u64;

    fn initial(&self) -> Self::Acc {
        0
    }

    fn map(&self, value: &Value) -> Self::Acc {
        value.is_present() as u64
    }

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc {
        x + y
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        i64::try_from(acc).map(Value::Integer).unwrap_or_default()
    }

    fn scalar_fallback(&self) -> Value {
        Value::Integer(0)
    }
}
