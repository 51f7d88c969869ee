//! Many-to-one reduction of values.
//!
//! An aggregate maps each input value into an accumulator, reduces
//! accumulators pairwise and finalizes the result back into a value. Grouping
//! is decided by an [`AggregationClause`](crate::matching::AggregationClause).
mod aggregator;
mod functions;
mod intermediate;
mod percentile;

pub use aggregator::*;
pub use functions::*;
pub use intermediate::*;
pub use percentile::*;

use crate::value::Value;

pub trait AggregateFn {
    type Acc: Clone;

    /// Identity for [`reduce`](AggregateFn::reduce).
    fn initial(&self) -> Self::Acc;

    fn map(&self, value: &Value) -> Self::Acc;

    fn reduce(&self, x: Self::Acc, y: Self::Acc) -> Self::Acc;

    fn finalize(&self, acc: Self::Acc) -> Value;

    /// Result of a scalar aggregation over no input at all.
    fn scalar_fallback(&self) -> Value {
        Value::Empty
    }
}

cfg_if::cfg_if! {
    if #[cfg(test)] {
        mod aggregate_tests;
    }
}
