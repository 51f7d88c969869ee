use super::AggregateFn;
use crate::error::{ExprError, ExprResult};
use crate::value::Value;

/// Linearly interpolated percentile of the numeric values in a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentile {
    percentile: f64,
}

impl Percentile {
    pub fn new(percentile: f64) -> ExprResult<Percentile> {
        if !(0.0..=100.0).contains(&percentile) {
            return Err(ExprError::InvalidPercentile(percentile));
        }
        Ok(Percentile { percentile })
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }
}

impl AggregateFn for Percentile {
    type Acc = Vec<Value>;

    fn initial(&self) -> Self::Acc {
        Vec::new()
    }

    fn map(&self, value: &Value) -> Self::Acc {
        if value.is_present() {
            vec![value.clone()]
        } else {
            Vec::new()
        }
    }

    fn reduce(&self, mut x: Self::Acc, mut y: Self::Acc) -> Self::Acc {
        x.append(&mut y);
        x
    }

    fn finalize(&self, acc: Self::Acc) -> Value {
        let mut values: Vec<f64> = acc
            .iter()
            .filter_map(|v| v.as_number().map(|n| n.as_f64()))
            .collect();
        if values.is_empty() {
            return Value::Empty;
        }
        values.sort_by(f64::total_cmp);
        Value::Float(interpolate(&values, self.percentile))
    }
}

/// `sorted` must be non-empty.
fn interpolate(sorted: &[f64], percentile: f64) -> f64 {
    let index = (sorted.len() - 1) as f64 * percentile / 100.0;
    let lo = index.floor();
    let left = sorted[lo as usize];
    let right = sorted[index.ceil() as usize];
    let right_fraction = index - lo;
    if right_fraction == 0.0 {
        return left;
    }
    (1.0 - right_fraction) * left + right_fraction * right
}
