use super::AggregateFn;
use crate::matching::AggregationClause;
use crate::result_set::{ResultSet, Vector};
use crate::tags::Tags;
use crate::value::Value;

/// Partially reduced aggregate state: one accumulator for all scalar inputs
/// plus one per output group.
#[derive(Debug, Clone)]
pub struct Intermediate<A> {
    scalar: Option<A>,
    groups: Vec<(Tags, A)>,
}

impl<A: Clone> Intermediate<A> {
    /// Maps and reduces `inputs`. Vector elements from every input are
    /// grouped together through `clause`; scalar inputs reduce into a
    /// separate partial.
    pub fn accumulate<'a, F, I>(f: &F, clause: &AggregationClause, inputs: I) -> Self
    where
        F: AggregateFn<Acc = A>,
        I: IntoIterator<Item = &'a ResultSet>,
    {
        let mut scalar: Option<A> = None;
        let mut entries: Vec<&(Tags, Value)> = Vec::new();

        for input in inputs {
            match input {
                ResultSet::Scalar(v) => {
                    let mapped = f.map(v);
                    scalar = Some(match scalar.take() {
                        Some(acc) => f.reduce(acc, mapped),
                        None => mapped,
                    });
                }
                ResultSet::Vector(vector) => entries.extend(vector.entries().iter()),
            }
        }

        let groups = clause
            .apply(entries.iter().map(|(t, _)| t))
            .into_iter()
            .map(|group| {
                let acc = group
                    .members
                    .iter()
                    .fold(f.initial(), |acc, &m| f.reduce(acc, f.map(&entries[m].1)));
                (group.tags, acc)
            })
            .collect();

        Intermediate { scalar, groups }
    }

    pub fn is_empty(&self) -> bool {
        self.scalar.is_none() && self.groups.is_empty()
    }

    /// Reduces everything into one value. With no input at all the function's
    /// scalar fallback is returned.
    pub fn finalize_scalar<F>(self, f: &F) -> Value
    where
        F: AggregateFn<Acc = A>,
    {
        if self.is_empty() {
            return f.scalar_fallback();
        }
        let init = self.scalar.unwrap_or_else(|| f.initial());
        let acc = self
            .groups
            .into_iter()
            .fold(init, |acc, (_, group)| f.reduce(acc, group));
        f.finalize(acc)
    }

    /// Finalizes each group separately, folding the scalar partial into every
    /// one of them.
    pub fn finalize_vector<F>(self, f: &F) -> Vector
    where
        F: AggregateFn<Acc = A>,
    {
        let Intermediate { scalar, groups } = self;
        groups
            .into_iter()
            .map(|(tags, acc)| {
                let acc = match &scalar {
                    Some(s) => f.reduce(s.clone(), acc),
                    None => acc,
                };
                (tags, f.finalize(acc))
            })
            .collect()
    }
}

/// Runs `f` over `inputs`, producing a scalar for a scalar clause and a vector
/// otherwise.
pub fn aggregate<'a, F, I>(f: &F, clause: &AggregationClause, inputs: I) -> ResultSet
where
    F: AggregateFn,
    I: IntoIterator<Item = &'a ResultSet>,
{
    let intermediate = Intermediate::accumulate(f, clause, inputs);
    if clause.is_scalar() {
        let value = intermediate.finalize_scalar(f);
        tracing::trace!(result = %value, "scalar aggregate");
        ResultSet::Scalar(value)
    } else {
        let vector = intermediate.finalize_vector(f);
        tracing::trace!(groups = vector.len(), "vector aggregate");
        ResultSet::Vector(vector)
    }
}
