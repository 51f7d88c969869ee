use crate::matching::MatchClause;
use crate::result_set::{ResultSet, Vector};
use crate::value::Value;

/// Combines two result sets element-wise.
///
/// A scalar operand is applied to every element of a vector operand, which
/// keeps its tags. Two vectors are joined through `clause`. Elements for which
/// `f` yields nothing are dropped; a scalar pair with no result becomes
/// `Scalar(Empty)`.
pub fn combine<F>(x: &ResultSet, y: &ResultSet, clause: &MatchClause, mut f: F) -> ResultSet
where
    F: FnMut(&Value, &Value) -> Option<Value>,
{
    match (x, y) {
        (ResultSet::Scalar(a), ResultSet::Scalar(b)) => ResultSet::Scalar(f(a, b).unwrap_or_default()),
        (ResultSet::Scalar(a), ResultSet::Vector(ys)) => ResultSet::Vector(
            ys.iter()
                .filter_map(|(t, b)| f(a, b).map(|r| (t.clone(), r)))
                .collect(),
        ),
        (ResultSet::Vector(xs), ResultSet::Scalar(b)) => ResultSet::Vector(
            xs.iter()
                .filter_map(|(t, a)| f(a, b).map(|r| (t.clone(), r)))
                .collect(),
        ),
        (ResultSet::Vector(xs), ResultSet::Vector(ys)) => {
            let joined = clause.apply(xs.entries(), ys.entries(), f);
            ResultSet::Vector(joined.into_iter().collect::<Vector>())
        }
    }
}

/// Folds any number of result sets left to right with [`combine`]. No inputs
/// yields `Scalar(init)`.
pub fn combine_all<'a, I, F>(inputs: I, init: Value, clause: &MatchClause, mut f: F) -> ResultSet
where
    I: IntoIterator<Item = &'a ResultSet>,
    F: FnMut(&Value, &Value) -> Option<Value>,
{
    let mut iter = inputs.into_iter();
    let Some(first) = iter.next() else {
        return ResultSet::Scalar(init);
    };
    let first = combine(&ResultSet::Scalar(init), first, clause, &mut f);
    iter.fold(first, |acc, next| combine(&acc, next, clause, &mut f))
}
