#[cfg(test)]
mod tests {
    use crate::matching::{MatchClause, TagNameSet};
    use crate::ops::{combine, combine_all, BinaryOp};
    use crate::result_set::{ResultSet, Vector};
    use crate::tags::Tags;
    use crate::value::{Histogram, Value};
    use test_case::test_case;

    fn hist(ranges: &[(f64, f64, f64)]) -> Value {
        Value::Histogram(Histogram::from_ranges(ranges).unwrap())
    }

    fn host(name: &str) -> Tags {
        Tags::new([("host", name)]).unwrap()
    }

    fn vector(items: &[(&str, i64)]) -> ResultSet {
        ResultSet::Vector(
            items
                .iter()
                .map(|(h, v)| (host(h), Value::Integer(*v)))
                .collect::<Vector>(),
        )
    }

    #[test_case(Value::Integer(1), Value::Float(1.0), Some(false) ; "int and float")]
    #[test_case(Value::Integer(1), Value::TRUE, Some(false) ; "int and bool")]
    #[test_case(Value::Integer(1), Value::Integer(2), Some(true) ; "different ints")]
    #[test_case(Value::from("a"), Value::from("a"), Some(false) ; "same strings")]
    #[test_case(Value::from("a"), Value::from("b"), Some(true) ; "different strings")]
    #[test_case(Value::Integer(17), Value::from("true"), None ; "int and string")]
    #[test_case(Value::TRUE, Value::from("true"), None ; "bool and string")]
    #[test_case(Value::Empty, Value::Integer(0), None ; "empty")]
    #[test_case(hist(&[(0.0, 3.0, 3.0)]), hist(&[(0.0, 1.0, 1.0), (1.0, 2.0, 1.0), (2.0, 3.0, 1.0)]), Some(false) ; "normalized histograms")]
    #[test_case(hist(&[(0.0, 3.0, 3.0)]), hist(&[(0.0, 3.0, 4.0)]), Some(true) ; "different histograms")]
    #[test_case(hist(&[(0.0, 3.0, 3.0)]), Value::Integer(3), None ; "histogram and int")]
    fn test_inequality(x: Value, y: Value, expected: Option<bool>) {
        assert_eq!(BinaryOp::NotEq.apply(&x, &y), expected.map(Value::Boolean));
    }

    #[test_case(BinaryOp::Add, Value::Integer(2), Value::Integer(3), Value::Integer(5) ; "int add")]
    #[test_case(BinaryOp::Mul, Value::Float(1.5), Value::Integer(2), Value::Float(3.0) ; "float mul")]
    #[test_case(BinaryOp::Mod, Value::Integer(-7), Value::Integer(2), Value::Integer(-1) ; "int mod")]
    #[test_case(BinaryOp::Shl, Value::Integer(3), Value::Integer(2), Value::Integer(12) ; "int shl")]
    #[test_case(BinaryOp::Shr, Value::Float(8.0), Value::Integer(2), Value::Float(2.0) ; "float shr")]
    #[test_case(BinaryOp::Lt, Value::from("abc"), Value::from("abd"), Value::TRUE ; "string lt")]
    #[test_case(BinaryOp::Gte, Value::Integer(2), Value::Float(2.0), Value::TRUE ; "mixed gte")]
    #[test_case(BinaryOp::Or, Value::Integer(0), Value::TRUE, Value::TRUE ; "or")]
    #[test_case(BinaryOp::And, Value::Float(0.0), Value::TRUE, Value::FALSE ; "and")]
    fn test_apply(op: BinaryOp, x: Value, y: Value, expected: Value) {
        assert_eq!(op.apply(&x, &y), Some(expected));
    }

    #[test]
    fn test_histogram_arithmetic() {
        let h = hist(&[(0.0, 2.0, 4.0)]);
        assert_eq!(BinaryOp::Add.apply(&h, &Value::Integer(1)), Some(hist(&[(0.0, 2.0, 6.0)])));
        assert_eq!(BinaryOp::Sub.apply(&h, &Value::Integer(1)), Some(hist(&[(0.0, 2.0, 2.0)])));
        assert_eq!(BinaryOp::Mul.apply(&h, &Value::Float(0.5)), Some(hist(&[(0.0, 2.0, 2.0)])));
        assert_eq!(BinaryOp::Div.apply(&h, &Value::Integer(4)), Some(hist(&[(0.0, 2.0, 1.0)])));
        assert_eq!(BinaryOp::Shl.apply(&h, &Value::Integer(1)), Some(hist(&[(0.0, 2.0, 8.0)])));
        assert_eq!(BinaryOp::Shr.apply(&h, &Value::Integer(2)), Some(hist(&[(0.0, 2.0, 1.0)])));
        assert_eq!(BinaryOp::Div.apply(&h, &Value::Integer(0)), None);
        assert_eq!(BinaryOp::Mod.apply(&h, &Value::Integer(3)), None);

        assert_eq!(BinaryOp::Add.apply(&Value::Integer(1), &h), Some(hist(&[(0.0, 2.0, 6.0)])));
        assert_eq!(BinaryOp::Mul.apply(&Value::Integer(2), &h), Some(hist(&[(0.0, 2.0, 8.0)])));
        assert_eq!(BinaryOp::Sub.apply(&Value::Integer(3), &h), Some(hist(&[(0.0, 2.0, 2.0)])));
        assert_eq!(BinaryOp::Div.apply(&Value::Integer(3), &h), None);
    }

    #[test]
    fn test_histogram_merge() {
        let x = hist(&[(0.0, 2.0, 2.0)]);
        let y = hist(&[(1.0, 3.0, 2.0)]);
        assert_eq!(
            BinaryOp::Add.apply(&x, &y),
            Some(hist(&[(0.0, 1.0, 1.0), (1.0, 2.0, 2.0), (2.0, 3.0, 1.0)]))
        );
        // mixed-sign result
        assert_eq!(BinaryOp::Sub.apply(&x, &y), None);
        assert_eq!(BinaryOp::Mul.apply(&x, &y), None);
    }

    #[test]
    fn test_combine_scalars() {
        let r = combine(
            &ResultSet::scalar(7),
            &ResultSet::scalar(0),
            &MatchClause::Default,
            |x, y| BinaryOp::Div.apply(x, y),
        );
        assert_eq!(r, ResultSet::Scalar(Value::Empty));
    }

    #[test]
    fn test_combine_scalar_broadcast() {
        let v = vector(&[("a", 1), ("b", 0)]);
        let r = combine(&ResultSet::scalar(10), &v, &MatchClause::Default, |x, y| {
            BinaryOp::Div.apply(x, y)
        });
        assert_eq!(r, vector(&[("a", 10)]));

        let r = combine(&v, &ResultSet::scalar(1), &MatchClause::Default, |x, y| {
            BinaryOp::Sub.apply(x, y)
        });
        assert_eq!(r, vector(&[("a", 0), ("b", -1)]));
    }

    #[test]
    fn test_combine_vectors_inner_join() {
        let x = vector(&[("a", 1), ("b", 2), ("c", 3)]);
        let y = vector(&[("c", 30), ("a", 10), ("d", 40)]);
        let r = combine(&x, &y, &MatchClause::Default, |a, b| BinaryOp::Add.apply(a, b));
        assert_eq!(r, vector(&[("a", 11), ("c", 33)]));
    }

    #[test]
    fn test_combine_vectors_by_scalar_clause() {
        let x = vector(&[("a", 1)]);
        let y = ResultSet::Vector(
            vec![(Tags::new([("zone", "east")]).unwrap(), Value::Integer(5))]
                .into_iter()
                .collect(),
        );
        let clause = MatchClause::by(TagNameSet::empty(), false);
        let r = combine(&x, &y, &clause, |a, b| BinaryOp::Mul.apply(a, b));
        let expected: Vector = vec![(Tags::empty(), Value::Integer(5))].into_iter().collect();
        assert_eq!(r, ResultSet::Vector(expected));
    }

    #[test]
    fn test_combine_all() {
        let concat = |x: &Value, y: &Value| -> Option<Value> {
            Some(Value::from(format!("{}{}", x.as_string()?, y.as_string()?)))
        };
        let inputs = [ResultSet::scalar("a"), ResultSet::scalar(1), ResultSet::scalar(true)];
        let r = combine_all(inputs.iter(), Value::from(""), &MatchClause::Default, concat);
        assert_eq!(r, ResultSet::scalar("a1true"));

        let none: [ResultSet; 0] = [];
        let r = combine_all(none.iter(), Value::from(""), &MatchClause::Default, concat);
        assert_eq!(r, ResultSet::scalar(""));
    }
}
