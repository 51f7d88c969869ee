#[cfg(test)]
mod tests {
    use crate::aggregate::{Aggregator, Percentile};
    use crate::matching::{AggregationClause, TagNameSet};
    use crate::result_set::{ResultSet, Vector};
    use crate::tags::Tags;
    use crate::value::{Histogram, Value};
    use test_case::test_case;

    fn scalars(values: &[Value]) -> Vec<ResultSet> {
        values.iter().cloned().map(ResultSet::Scalar).collect()
    }

    fn tagged(items: &[(&str, &str, i64)]) -> ResultSet {
        ResultSet::Vector(
            items
                .iter()
                .map(|(host, zone, v)| {
                    (
                        Tags::new([("host", *host), ("zone", *zone)]).unwrap(),
                        Value::Integer(*v),
                    )
                })
                .collect::<Vector>(),
        )
    }

    fn by(names: &[&str]) -> AggregationClause {
        AggregationClause::by(TagNameSet::new(names.iter().copied()).unwrap(), false)
    }

    fn zone(name: &str) -> Tags {
        Tags::new([("zone", name)]).unwrap()
    }

    fn scalar_of(agg: Aggregator, values: &[Value]) -> Value {
        let inputs = scalars(values);
        match agg.apply(&AggregationClause::scalar(), inputs.iter()) {
            ResultSet::Scalar(v) => v,
            other => panic!("expected scalar, got {}", other),
        }
    }

    #[test_case(&[Value::Integer(4), Value::Integer(1), Value::Integer(1)], Value::Integer(4) ; "leading max")]
    #[test_case(&[Value::Integer(7), Value::Integer(9), Value::Integer(11)], Value::Integer(11) ; "trailing max")]
    #[test_case(&[Value::Integer(-2), Value::Integer(-1), Value::Integer(-3)], Value::Integer(-1) ; "negatives")]
    #[test_case(&[Value::Integer(0), Value::Empty, Value::Empty], Value::Integer(0) ; "absent values skipped")]
    #[test_case(&[Value::Empty], Value::Empty ; "only absent")]
    #[test_case(&[Value::Integer(1), Value::Float(1.5)], Value::Float(1.5) ; "mixed kinds")]
    fn test_max(values: &[Value], expected: Value) {
        assert_eq!(scalar_of(Aggregator::Max, values), expected);
    }

    #[test_case(&[1, 2, 3, 4], Value::Float(2.5) ; "four values")]
    #[test_case(&[1, 2, 3], Value::Float(2.0) ; "three values")]
    #[test_case(&[3, 1, 2], Value::Float(2.0) ; "unsorted input")]
    #[test_case(&[], Value::Empty ; "no values")]
    fn test_median(values: &[i64], expected: Value) {
        let values: Vec<Value> = values.iter().map(|v| Value::Integer(*v)).collect();
        let agg = Aggregator::Percentile(Percentile::new(50.0).unwrap());
        assert_eq!(scalar_of(agg, &values), expected);
    }

    #[test]
    fn test_percentile_extremes() {
        let values = [Value::Integer(5), Value::Float(-1.5), Value::Integer(12)];
        let p0 = Aggregator::Percentile(Percentile::new(0.0).unwrap());
        let p100 = Aggregator::Percentile(Percentile::new(100.0).unwrap());
        assert_eq!(scalar_of(p0, &values), Value::Float(-1.5));
        assert_eq!(scalar_of(p100, &values), Value::Float(12.0));
    }

    #[test]
    fn test_scalar_fallbacks() {
        assert_eq!(scalar_of(Aggregator::Sum, &[]), Value::Integer(0));
        assert_eq!(scalar_of(Aggregator::Count, &[]), Value::Integer(0));
        assert_eq!(scalar_of(Aggregator::Max, &[]), Value::Empty);
        assert_eq!(scalar_of(Aggregator::Min, &[]), Value::Empty);
        assert_eq!(scalar_of(Aggregator::Avg, &[]), Value::Empty);
    }

    #[test]
    fn test_histogram_inputs() {
        let h = Value::Histogram(Histogram::from_ranges(&[(0.0, 10.0, 4.0)]).unwrap());
        assert_eq!(scalar_of(Aggregator::Max, &[h.clone(), Value::Integer(3)]), Value::Float(10.0));
        assert_eq!(scalar_of(Aggregator::Min, &[h.clone(), Value::Integer(3)]), Value::Float(0.0));
        assert_eq!(scalar_of(Aggregator::Sum, &[h.clone()]), Value::Float(20.0));
        assert_eq!(scalar_of(Aggregator::Avg, &[h]), Value::Float(5.0));
    }

    #[test]
    fn test_vector_input_scalar_clause() {
        let input = tagged(&[("h1", "east", 1), ("h2", "east", 2), ("h3", "west", 4)]);
        let r = Aggregator::Sum.apply(&AggregationClause::scalar(), [&input]);
        assert_eq!(r, ResultSet::scalar(7));
    }

    #[test]
    fn test_grouped_sum() {
        let input = tagged(&[("h1", "east", 1), ("h2", "east", 2), ("h3", "west", 4)]);
        let r = Aggregator::Sum.apply(&by(&["zone"]), [&input]);
        let expected: Vector = vec![(zone("east"), Value::Integer(3)), (zone("west"), Value::Integer(4))]
            .into_iter()
            .collect();
        assert_eq!(r, ResultSet::Vector(expected));
    }

    #[test]
    fn test_scalar_partial_folds_into_groups() {
        let input = tagged(&[("h1", "east", 1), ("h3", "west", 4)]);
        let ten = ResultSet::scalar(10);
        let r = Aggregator::Sum.apply(&by(&["zone"]), [&input, &ten]);
        let expected: Vector = vec![(zone("east"), Value::Integer(11)), (zone("west"), Value::Integer(14))]
            .into_iter()
            .collect();
        assert_eq!(r, ResultSet::Vector(expected));

        let r = Aggregator::Sum.apply(&AggregationClause::scalar(), [&input, &ten]);
        assert_eq!(r, ResultSet::scalar(15));
    }

    #[test]
    fn test_duplicates_across_arguments_are_kept() {
        let x = tagged(&[("h1", "east", 1)]);
        let r = Aggregator::Count.apply(&by(&["host"]), [&x, &x]);
        let expected: Vector = vec![(Tags::new([("host", "h1")]).unwrap(), Value::Integer(2))]
            .into_iter()
            .collect();
        assert_eq!(r, ResultSet::Vector(expected));
    }

    #[test]
    fn test_keep_common_grouping() {
        let input = tagged(&[("h1", "east", 1), ("h2", "east", 2)]);
        let clause = AggregationClause::by(TagNameSet::empty(), true);
        let r = Aggregator::Max.apply(&clause, [&input]);
        let expected: Vector = vec![(zone("east"), Value::Integer(2))].into_iter().collect();
        assert_eq!(r, ResultSet::Vector(expected));
    }

    #[test]
    fn test_names() {
        assert_eq!(Aggregator::from_name("min"), Some(Aggregator::Min));
        assert_eq!(Aggregator::from_name("percentile_agg"), None);
        let p = Aggregator::Percentile(Percentile::new(90.0).unwrap());
        assert_eq!(p.name(), "percentile_agg");
        assert_eq!(p.parameter_string().as_deref(), Some("90.0"));
    }
}
