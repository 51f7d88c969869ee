//! Arithmetic over single values.
//!
//! Booleans take part as the integers 1 and 0. Integer operations are checked:
//! overflow, a zero divisor and shift counts outside `0..=63` give no result
//! rather than a wrapped one. Mixing in a float promotes to IEEE arithmetic.
use super::BinaryOp;
use crate::value::{Histogram, Number, Value};

pub fn apply(op: BinaryOp, x: &Value, y: &Value) -> Option<Value> {
    match (x, y) {
        (Value::Histogram(h), Value::Histogram(g)) => histogram_op(op, h, g),
        (Value::Histogram(h), other) => {
            let n = other.as_number()?;
            histogram_scalar_op(op, h, n.as_f64())
        }
        (other, Value::Histogram(h)) => {
            let n = other.as_number()?;
            scalar_histogram_op(op, n.as_f64(), h)
        }
        _ => {
            let a = x.as_number()?;
            let b = y.as_number()?;
            number_op(op, a, b).map(Value::from)
        }
    }
}

pub fn number_op(op: BinaryOp, x: Number, y: Number) -> Option<Number> {
    match (x, y) {
        (Number::Int(a), Number::Int(b)) => int_op(op, a, b).map(Number::Int),
        _ => float_op(op, x.as_f64(), y.as_f64()).map(Number::Float),
    }
}

fn int_op(op: BinaryOp, x: i64, y: i64) -> Option<i64> {
    use BinaryOp::*;
    match op {
        Add => x.checked_add(y),
        Sub => x.checked_sub(y),
        Mul => x.checked_mul(y),
        Div => x.checked_div(y),
        Mod => x.checked_rem(y),
        Shl => {
            let shift = shift_count(y)?;
            i64::try_from((x as i128) << shift).ok()
        }
        Shr => {
            let shift = shift_count(y)?;
            Some(x >> shift)
        }
        _ => None,
    }
}

fn shift_count(y: i64) -> Option<u32> {
    if (0..=63).contains(&y) {
        Some(y as u32)
    } else {
        None
    }
}

fn float_op(op: BinaryOp, x: f64, y: f64) -> Option<f64> {
    use BinaryOp::*;
    match op {
        Add => Some(x + y),
        Sub => Some(x - y),
        Mul => Some(x * y),
        Div => Some(x / y),
        Mod => Some(ieee_remainder(x, y)),
        Shl => Some(x * y.exp2()),
        Shr => Some(x * (-y).exp2()),
        _ => None,
    }
}

/// IEEE 754 remainder: `x − y·n` where `n` is `x/y` rounded to the nearest
/// integer, ties to even.
pub fn ieee_remainder(x: f64, y: f64) -> f64 {
    x - (x / y).round_ties_even() * y
}

fn histogram_op(op: BinaryOp, x: &Histogram, y: &Histogram) -> Option<Value> {
    let result = match op {
        BinaryOp::Add => x.add(y),
        BinaryOp::Sub => x.subtract(y),
        _ => return None,
    };
    result.ok().map(Value::Histogram)
}

fn histogram_scalar_op(op: BinaryOp, h: &Histogram, y: f64) -> Option<Value> {
    use BinaryOp::*;
    let result = match op {
        Add => h.add_scalar(y),
        Sub => h.subtract_scalar(y),
        Mul => h.multiply(y),
        Div => h.divide(y),
        Shl => h.multiply(y.exp2()),
        Shr => h.multiply((-y).exp2()),
        _ => return None,
    };
    result.ok().map(Value::Histogram)
}

fn scalar_histogram_op(op: BinaryOp, x: f64, h: &Histogram) -> Option<Value> {
    let result = match op {
        BinaryOp::Add => h.add_scalar(x),
        BinaryOp::Sub => h.subtract_from_scalar(x),
        BinaryOp::Mul => h.multiply(x),
        _ => return None,
    };
    result.ok().map(Value::Histogram)
}

/// Unary minus. Integer negation is checked.
pub fn negate(value: &Value) -> Option<Value> {
    match value {
        Value::Integer(i) => i.checked_neg().map(Value::Integer),
        Value::Boolean(b) => Some(Value::Integer(-(*b as i64))),
        Value::Float(f) => Some(Value::Float(-f)),
        Value::Histogram(h) => Some(Value::Histogram(h.negate())),
        Value::String(_) | Value::Empty => None,
    }
}

/// Logical not, on the boolean view of the value.
pub fn not(value: &Value) -> Option<Value> {
    value.as_bool().map(|b| Value::Boolean(!b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(7, 2, BinaryOp::Div, Some(3) ; "integer division truncates")]
    #[test_case(7, 0, BinaryOp::Div, None ; "division by zero")]
    #[test_case(7, 0, BinaryOp::Mod, None ; "modulo by zero")]
    #[test_case(i64::MAX, 1, BinaryOp::Add, None ; "overflow")]
    #[test_case(i64::MIN, -1, BinaryOp::Div, None ; "division overflow")]
    #[test_case(1, 62, BinaryOp::Shl, Some(1 << 62) ; "large shift")]
    #[test_case(1, 63, BinaryOp::Shl, None ; "shift out of range")]
    #[test_case(-1, 63, BinaryOp::Shl, Some(i64::MIN) ; "shift into sign bit")]
    #[test_case(1, 64, BinaryOp::Shl, None ; "shift count too large")]
    #[test_case(1, -1, BinaryOp::Shr, None ; "negative shift count")]
    #[test_case(-8, 1, BinaryOp::Shr, Some(-4) ; "arithmetic shift right")]
    fn test_int_op(x: i64, y: i64, op: BinaryOp, expected: Option<i64>) {
        assert_eq!(int_op(op, x, y), expected);
    }

    #[test]
    fn test_float_promotion() {
        let r = apply(BinaryOp::Add, &Value::Integer(1), &Value::Float(0.5));
        assert_eq!(r, Some(Value::Float(1.5)));
        let r = apply(BinaryOp::Div, &Value::Float(1.0), &Value::Integer(0));
        assert_eq!(r, Some(Value::Float(f64::INFINITY)));
    }

    #[test]
    fn test_ieee_remainder() {
        assert_eq!(ieee_remainder(5.0, 3.0), -1.0);
        assert_eq!(ieee_remainder(7.0, 2.0), -1.0);
        assert_eq!(ieee_remainder(5.0, 2.0), 1.0);
        assert!(ieee_remainder(1.0, 0.0).is_nan());
    }

    #[test]
    fn test_booleans_are_integers() {
        let r = apply(BinaryOp::Add, &Value::TRUE, &Value::TRUE);
        assert_eq!(r, Some(Value::Integer(2)));
        assert_eq!(negate(&Value::TRUE), Some(Value::Integer(-1)));
    }

    #[test]
    fn test_strings_and_empty_have_no_arithmetic() {
        assert_eq!(apply(BinaryOp::Add, &Value::from("a"), &Value::from("b")), None);
        assert_eq!(apply(BinaryOp::Mul, &Value::Empty, &Value::Integer(1)), None);
        assert_eq!(negate(&Value::from("a")), None);
        assert_eq!(negate(&Value::Integer(i64::MIN)), None);
    }

    #[test]
    fn test_not() {
        assert_eq!(not(&Value::Integer(0)), Some(Value::TRUE));
        assert_eq!(not(&Value::Float(2.5)), Some(Value::FALSE));
        assert_eq!(not(&Value::from("x")), None);
    }
}
