use super::{arithmetic, predicate};
use crate::error::ExprError;
use crate::expression::priority;
use crate::value::Value;
use phf::phf_map;
use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Eql,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

pub static BINARY_OPS_MAP: phf::Map<&'static str, BinaryOp> = phf_map! {
    "+" => BinaryOp::Add,
    "-" => BinaryOp::Sub,
    "*" => BinaryOp::Mul,
    "/" => BinaryOp::Div,
    "%" => BinaryOp::Mod,
    "<<" => BinaryOp::Shl,
    ">>" => BinaryOp::Shr,

    // cmp ops
    "=" => BinaryOp::Eql,
    "!=" => BinaryOp::NotEq,
    "<" => BinaryOp::Lt,
    "<=" => BinaryOp::Lte,
    ">" => BinaryOp::Gt,
    ">=" => BinaryOp::Gte,

    "&&" => BinaryOp::And,
    "||" => BinaryOp::Or,

    "add" => BinaryOp::Add,
    "sub" => BinaryOp::Sub,
    "mul" => BinaryOp::Mul,
    "div" => BinaryOp::Div,
    "mod" => BinaryOp::Mod,
    "shl" => BinaryOp::Shl,
    "shr" => BinaryOp::Shr,
    "eq" => BinaryOp::Eql,
    "ne" => BinaryOp::NotEq,
    "lt" => BinaryOp::Lt,
    "lte" => BinaryOp::Lte,
    "gt" => BinaryOp::Gt,
    "gte" => BinaryOp::Gte,
    "and" => BinaryOp::And,
    "or" => BinaryOp::Or,
};

/// Broad operator families; each resolves operands differently.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpKind {
    Arithmetic,
    Equality,
    Comparison,
    Logical,
}

impl BinaryOp {
    pub const fn as_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            Shl => "<<",
            Shr => ">>",
            Eql => "=",
            NotEq => "!=",
            Lt => "<",
            Lte => "<=",
            Gt => ">",
            Gte => ">=",
            And => "&&",
            Or => "||",
        }
    }

    pub const fn kind(&self) -> OpKind {
        use BinaryOp::*;
        match self {
            Add | Sub | Mul | Div | Mod | Shl | Shr => OpKind::Arithmetic,
            Eql | NotEq => OpKind::Equality,
            Lt | Lte | Gt | Gte => OpKind::Comparison,
            And | Or => OpKind::Logical,
        }
    }

    /// Binding strength; higher binds tighter.
    pub const fn priority(&self) -> u8 {
        use BinaryOp::*;
        match self {
            Or => priority::LOGICAL_OR,
            And => priority::LOGICAL_AND,
            Eql | NotEq => priority::EQUALITY,
            Lt | Lte | Gt | Gte => priority::COMPARISON,
            Shl | Shr => priority::SHIFT,
            Add | Sub => priority::ADDITION,
            Mul | Div | Mod => priority::MULTIPLY,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self.kind(), OpKind::Equality | OpKind::Comparison)
    }

    /// Applies the operator to a single pair of values. `None` means the pair
    /// has no defined result.
    pub fn apply(&self, x: &Value, y: &Value) -> Option<Value> {
        use BinaryOp::*;
        match self {
            Add | Sub | Mul | Div | Mod | Shl | Shr => arithmetic::apply(*self, x, y),
            Eql => predicate::equals(x, y).map(Value::Boolean),
            NotEq => predicate::equals(x, y).map(|b| Value::Boolean(!b)),
            Lt => predicate::compare(x, y).map(|o| Value::Boolean(o.is_lt())),
            Lte => predicate::compare(x, y).map(|o| Value::Boolean(o.is_le())),
            Gt => predicate::compare(x, y).map(|o| Value::Boolean(o.is_gt())),
            Gte => predicate::compare(x, y).map(|o| Value::Boolean(o.is_ge())),
            And => predicate::logical_and(x, y).map(Value::Boolean),
            Or => predicate::logical_or(x, y).map(Value::Boolean),
        }
    }
}

impl FromStr for BinaryOp {
    type Err = ExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BinaryOp::try_from(s)
    }
}

impl TryFrom<&str> for BinaryOp {
    type Error = ExprError;

    fn try_from(op: &str) -> Result<Self, Self::Error> {
        if let Some(ch) = op.chars().next() {
            let value = if !ch.is_alphabetic() {
                BINARY_OPS_MAP.get(op)
            } else {
                BINARY_OPS_MAP.get(op).or_else(|| {
                    let lower = op.to_ascii_lowercase();
                    BINARY_OPS_MAP.get(lower.as_str())
                })
            };
            if let Some(operator) = value {
                return Ok(*operator);
            }
        }
        Err(ExprError::UnknownOperator(op.to_string()))
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(BinaryOp::try_from("<<").unwrap(), BinaryOp::Shl);
        assert_eq!(BinaryOp::try_from("AND").unwrap(), BinaryOp::And);
        assert_eq!("ne".parse::<BinaryOp>().unwrap(), BinaryOp::NotEq);
        assert!(BinaryOp::try_from("^").is_err());
        assert!(BinaryOp::try_from("").is_err());
    }

    #[test]
    fn test_symbols_round_trip() {
        for op in BINARY_OPS_MAP.values() {
            assert_eq!(BinaryOp::try_from(op.as_str()).unwrap(), *op);
        }
    }

    #[test]
    fn test_priority_order() {
        assert!(BinaryOp::Or.priority() < BinaryOp::And.priority());
        assert!(BinaryOp::And.priority() < BinaryOp::Eql.priority());
        assert!(BinaryOp::Eql.priority() < BinaryOp::Lt.priority());
        assert!(BinaryOp::Lt.priority() < BinaryOp::Shl.priority());
        assert!(BinaryOp::Shl.priority() < BinaryOp::Add.priority());
        assert!(BinaryOp::Add.priority() < BinaryOp::Mul.priority());
    }
}
