use super::error::{PResult, SyntaxError};
use crate::collection::{MatchSegment, PathMatcher};
use crate::common::{duration, is_identifier_char, is_identifier_start, unquote_string};
use crate::value::Value;
use chrono::Duration;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while};
use nom::character::complete::{char, digit1, multispace0, one_of, satisfy};
use nom::combinator::{map, opt, recognize, value};
use nom::multi::{separated_list0, separated_list1};
use nom::sequence::{delimited, pair, tuple};

pub(super) fn ws(input: &str) -> PResult<&str> {
    multispace0(input)
}

/// A bare identifier: a letter or underscore followed by letters, digits or
/// underscores.
pub(super) fn identifier(input: &str) -> PResult<&str> {
    recognize(pair(satisfy(is_identifier_start), take_while(is_identifier_char)))(input)
}

/// Matches exactly `word`, not a longer identifier starting with it.
pub(super) fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> PResult<'a, &'a str> {
    move |input: &'a str| match identifier(input) {
        Ok((rest, found)) if found == word => Ok((rest, found)),
        _ => SyntaxError::error(input, format!("expected '{}'", word)),
    }
}

fn quoted<'a>(quote: char) -> impl FnMut(&'a str) -> PResult<'a, String> {
    move |input: &'a str| {
        let mut chars = input.char_indices();
        match chars.next() {
            Some((_, c)) if c == quote => {}
            _ => return SyntaxError::error(input, format!("expected {}", quote)),
        }
        let mut escaped = false;
        for (i, c) in chars {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                let end = i + c.len_utf8();
                return match unquote_string(&input[..end]) {
                    Some(s) => Ok((&input[end..], s)),
                    None => SyntaxError::failure(input, "invalid escape sequence"),
                };
            }
        }
        SyntaxError::failure(input, "unterminated string")
    }
}

/// A double-quoted string literal.
pub(super) fn string_literal(input: &str) -> PResult<String> {
    quoted('"')(input)
}

/// A name written either bare or in single quotes.
pub(super) fn name(input: &str) -> PResult<String> {
    alt((map(identifier, String::from), quoted('\'')))(input)
}

/// An optionally negative number. Integral text that fits an `i64` becomes an
/// integer; everything else is a float.
pub(super) fn number(input: &str) -> PResult<Value> {
    let (rest, text) = recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)?;
    let is_float = text.contains(['.', 'e', 'E']);
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return Ok((rest, Value::Integer(i)));
        }
    }
    match text.parse::<f64>() {
        Ok(f) => Ok((rest, Value::Float(f))),
        Err(e) => SyntaxError::failure(input, e.to_string()),
    }
}

pub(super) fn float(input: &str) -> PResult<f64> {
    let (rest, v) = number(input)?;
    match v.as_number() {
        Some(n) => Ok((rest, n.as_f64())),
        None => SyntaxError::failure(input, "expected a number"),
    }
}

/// `[5m]`, the interval of a windowed function.
pub(super) fn interval(input: &str) -> PResult<Duration> {
    delimited(
        pair(char('['), ws),
        duration::<SyntaxError>,
        pair(ws, char(']')),
    )(input)
}

fn segment(input: &str) -> PResult<MatchSegment> {
    alt((
        value(MatchSegment::DoubleWildcard, tag("**")),
        value(MatchSegment::Wildcard, char('*')),
        map(name, MatchSegment::Literal),
    ))(input)
}

/// Dot separated path segments, possibly with wildcards.
pub(super) fn path(input: &str) -> PResult<PathMatcher> {
    let (rest, segments) = separated_list1(char('.'), segment)(input)?;
    match PathMatcher::new(segments) {
        Ok(matcher) => Ok((rest, matcher)),
        Err(e) => SyntaxError::failure(input, e.to_string()),
    }
}

/// `(a, b, 'c d')`
pub(super) fn name_list(input: &str) -> PResult<Vec<String>> {
    delimited(
        pair(char('('), ws),
        separated_list0(tuple((ws, char(','), ws)), name),
        pair(ws, char(')')),
    )(input)
}

/// True if `c` can begin an operand, i.e. a literal, a reference or a
/// selector.
pub(super) fn starts_operand(c: char) -> bool {
    matches!(c, '$' | '"' | '(' | '[' | '\'' | '-' | '!') || c.is_ascii_digit() || is_identifier_start(c)
}
