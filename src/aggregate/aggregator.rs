use super::{aggregate, Avg, Count, Max, Min, Percentile, Sum};
use crate::common::format_float;
use crate::matching::AggregationClause;
use crate::result_set::ResultSet;
use std::fmt;

/// The aggregate functions available to expressions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregator {
    Sum,
    Max,
    Min,
    Avg,
    Count,
    Percentile(Percentile),
}

impl Aggregator {
    pub fn from_name(name: &str) -> Option<Aggregator> {
        let agg = match name {
            "sum" => Aggregator::Sum,
            "max" => Aggregator::Max,
            "min" => Aggregator::Min,
            "avg" => Aggregator::Avg,
            "count" => Aggregator::Count,
            _ => return None,
        };
        Some(agg)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Aggregator::Sum => "sum",
            Aggregator::Max => "max",
            Aggregator::Min => "min",
            Aggregator::Avg => "avg",
            Aggregator::Count => "count",
            Aggregator::Percentile(_) => "percentile_agg",
        }
    }

    /// Leading arguments that are part of the function rather than its input.
    pub fn parameter_string(&self) -> Option<String> {
        match self {
            Aggregator::Percentile(p) => Some(format_float(p.percentile())),
            _ => None,
        }
    }

    pub fn apply<'a, I>(&self, clause: &AggregationClause, inputs: I) -> ResultSet
    where
        I: IntoIterator<Item = &'a ResultSet>,
    {
        match self {
            Aggregator::Sum => aggregate(&Sum, clause, inputs),
            Aggregator::Max => aggregate(&Max, clause, inputs),
            Aggregator::Min => aggregate(&Min, clause, inputs),
            Aggregator::Avg => aggregate(&Avg, clause, inputs),
            Aggregator::Count => aggregate(&Count, clause, inputs),
            Aggregator::Percentile(p) => aggregate(p, clause, inputs),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
