//! Text form of expressions.
//!
//! Every [`Expression`] renders to source text with `config_string`, and
//! parsing that text yields an expression that evaluates identically.

mod error;
mod grammar;
mod lexical;

pub use error::ParseError;

use crate::config::{get_global_settings, ParserSettings};
use crate::expression::Expression;
use error::SyntaxError;
use grammar::Grammar;
use std::str::FromStr;

/// Parses `text` with the globally configured parser settings.
pub fn parse(text: &str) -> Result<Expression, ParseError> {
    parse_with_settings(text, &get_global_settings().parser)
}

pub fn parse_with_settings(text: &str, settings: &ParserSettings) -> Result<Expression, ParseError> {
    let grammar = Grammar::new(settings);
    let err = match grammar.parse_all(text) {
        Ok((_, expr)) => {
            tracing::trace!(expr = %expr.config_string(), "parsed expression");
            return Ok(expr);
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => e.into_parse_error(text),
        Err(nom::Err::Incomplete(_)) => {
            SyntaxError::new(&text[text.len()..], "unexpected end of input").into_parse_error(text)
        }
    };
    tracing::debug!(input = text, error = %err, "failed to parse expression");
    Err(err)
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

cfg_if::cfg_if! {
    if #[cfg(test)] {
    }
}
