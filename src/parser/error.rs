use nom::error::{ContextError, ErrorKind, FromExternalError, ParseError as NomParseError};
use nom::IResult;
use std::fmt;
use thiserror::Error;

/// Syntax errors in expression source text, one `"line:col: message"` string
/// per problem, innermost first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join("; "))]
pub struct ParseError {
    pub messages: Vec<String>,
}

impl ParseError {
    pub fn new(messages: Vec<String>) -> Self {
        ParseError { messages }
    }
}

pub(super) type PResult<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

/// nom error type that remembers where each problem occurred.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SyntaxError<'a> {
    errors: Vec<(&'a str, String)>,
}

impl<'a> SyntaxError<'a> {
    pub fn new(input: &'a str, message: impl Into<String>) -> Self {
        SyntaxError {
            errors: vec![(input, message.into())],
        }
    }

    /// An unrecoverable error at `input`.
    pub fn failure<T>(input: &'a str, message: impl Into<String>) -> PResult<'a, T> {
        Err(nom::Err::Failure(SyntaxError::new(input, message)))
    }

    /// A recoverable error at `input`; alternatives may still be tried.
    pub fn error<T>(input: &'a str, message: impl Into<String>) -> PResult<'a, T> {
        Err(nom::Err::Error(SyntaxError::new(input, message)))
    }

    fn remaining(&self) -> usize {
        self.errors.first().map_or(usize::MAX, |(input, _)| input.len())
    }

    /// Resolves positions against `source`, which every recorded input must
    /// be a suffix of.
    pub fn into_parse_error(self, source: &str) -> ParseError {
        let mut messages: Vec<String> = Vec::with_capacity(self.errors.len());
        for (input, message) in self.errors {
            let offset = source.len().saturating_sub(input.len());
            let (line, col) = line_col(source, offset);
            let rendered = format!("{}:{}: {}", line, col, message);
            if !messages.contains(&rendered) {
                messages.push(rendered);
            }
        }
        ParseError { messages }
    }
}

/// One-based line and column of byte `offset` in `source`.
fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

impl<'a> NomParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::Eof => "unexpected end of input".to_string(),
            other => format!("expected {}", other.description().to_lowercase()),
        };
        SyntaxError::new(input, message)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        SyntaxError::new(input, format!("expected '{}'", c))
    }

    /// Keeps the alternative that got further.
    fn or(self, other: Self) -> Self {
        if other.remaining() <= self.remaining() {
            other
        } else {
            self
        }
    }
}

impl<'a> ContextError<&'a str> for SyntaxError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, format!("in {}", ctx)));
        other
    }
}

impl<'a, E: fmt::Display> FromExternalError<&'a str, E> for SyntaxError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, e: E) -> Self {
        SyntaxError::new(input, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "a +\n  b\n\nc";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 2), (1, 3));
        assert_eq!(line_col(source, 6), (2, 3));
        assert_eq!(line_col(source, 9), (4, 1));
    }

    #[test]
    fn test_into_parse_error() {
        let source = "x +\n )";
        let mut err = SyntaxError::new(&source[5..], "expected operand");
        err = SyntaxError::add_context(&source[2..], "binary expression", err);
        let parsed = err.into_parse_error(source);
        assert_eq!(
            parsed.messages,
            vec!["2:2: expected operand".to_string(), "1:3: in binary expression".to_string()]
        );
        assert_eq!(parsed.to_string(), "2:2: expected operand; 1:3: in binary expression");
    }

    #[test]
    fn test_or_prefers_furthest() {
        let source = "abcdef";
        let near = SyntaxError::new(&source[1..], "near");
        let far = SyntaxError::new(&source[4..], "far");
        assert_eq!(near.clone().or(far.clone()), far);
        assert_eq!(far.clone().or(near), far);
    }
}
