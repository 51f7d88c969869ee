use enquote::{enquote, unquote};
use std::borrow::Cow;

/// Words with a meaning of their own in the expression language. They must be
/// quoted to be used as identifiers.
pub const RESERVED_WORDS: [&str; 5] = ["true", "false", "by", "without", "keep_common"];

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub fn is_reserved_word(s: &str) -> bool {
    RESERVED_WORDS.contains(&s)
}

pub fn is_plain_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(ch) if is_identifier_start(ch) => chars.all(is_identifier_char) && !is_reserved_word(s),
        _ => false,
    }
}

/// Returns `s` unchanged if it can be written as a bare identifier, otherwise
/// wraps it in single quotes.
pub fn maybe_quote_identifier(s: &str) -> Cow<'_, str> {
    if is_plain_identifier(s) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(enquote('\'', s))
    }
}

pub fn quote_string(s: &str) -> String {
    enquote('"', s)
}

/// Reverses [`quote_string`] and [`maybe_quote_identifier`]. Input must include
/// the surrounding quotes.
pub fn unquote_string(s: &str) -> Option<String> {
    unquote(s).ok()
}

/// Renders a float so that it reads back as a float, i.e. `1.0` rather than `1`
/// and `1e20` rather than `100000000000000000000`.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() || value.fract() != 0.0 {
        format!("{}", value)
    } else if value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{:e}", value)
    }
}

/// Source text for a float constant. Infinities are written with an exponent
/// beyond the `f64` range, which reads back as infinity. NaN has no literal
/// and is written as the division that produces it.
pub fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "(0.0 / 0.0)".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "1e999" } else { "-1e999" }.to_string()
    } else {
        format_float(value)
    }
}
