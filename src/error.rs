use crate::parser::ParseError;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type ExprResult<T> = Result<T, ExprError>;

/// Errors raised while building expressions, windows or settings.
///
/// Evaluation itself never fails: type and arithmetic problems resolve to
/// `Value::Empty` or to an omitted vector element.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExprError {
    #[error("{0}")]
    InvalidLookBack(&'static str),
    #[error("{}: {0}", crate::error_consts::INVALID_PERCENTILE)]
    InvalidPercentile(f64),
    #[error("{0}")]
    InvalidTagClause(String),
    #[error("{0}")]
    InvalidTags(String),
    #[error("{0}")]
    InvalidHistogram(&'static str),
    #[error("{0}")]
    InvalidPath(&'static str),
    #[error("EXPR: unknown operator: {0}")]
    UnknownOperator(String),
    #[error("EXPR: invalid regex: {0}")]
    InvalidRegex(String),
    #[error("EXPR: invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("{msg} (current {current}, offered {offered})")]
    WindowOrder {
        msg: &'static str,
        current: DateTime<Utc>,
        offered: DateTime<Utc>,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<regex::Error> for ExprError {
    fn from(e: regex::Error) -> Self {
        ExprError::InvalidRegex(e.to_string())
    }
}

impl From<serde_json::Error> for ExprError {
    fn from(e: serde_json::Error) -> Self {
        ExprError::InvalidConfiguration(e.to_string())
    }
}
