use super::error::{PResult, SyntaxError};
use super::lexical::{
    float, identifier, interval, keyword, name, name_list, number, path, starts_operand,
    string_literal, ws,
};
use crate::aggregate::{Aggregator, Percentile};
use crate::collection::MatchSegment;
use crate::common::is_identifier_start;
use crate::config::ParserSettings;
use crate::error::{ExprError, ExprResult};
use crate::expression::{Expression, Selector};
use crate::matching::{AggregationClause, MatchClause, TagNameSet};
use crate::ops::BinaryOp;
use crate::value::{Bucket, Histogram, Value};
use chrono::Duration;
use nom::bytes::complete::tag;
use nom::character::complete::{char, multispace1};
use nom::combinator::{cut, map, opt};
use nom::error::context;
use nom::multi::separated_list0;
use nom::sequence::{pair, preceded, terminated, tuple};
use std::cell::Cell;

/// Characters that may continue an operator symbol. An operator directly
/// followed by one of them is part of a longer operator.
const OPERATOR_CHARS: &str = "<>=~&|";

#[derive(Debug, Clone, Copy)]
enum OpToken {
    Binary(BinaryOp),
    Regex { negated: bool },
}

impl OpToken {
    fn symbol(&self) -> &'static str {
        match self {
            OpToken::Binary(op) => op.as_str(),
            OpToken::Regex { negated: false } => "=~",
            OpToken::Regex { negated: true } => "!~",
        }
    }
}

/// Binary operators grouped by precedence, loosest first.
static LEVELS: [&[OpToken]; 7] = [
    &[OpToken::Binary(BinaryOp::Or)],
    &[OpToken::Binary(BinaryOp::And)],
    &[
        OpToken::Regex { negated: false },
        OpToken::Regex { negated: true },
        OpToken::Binary(BinaryOp::NotEq),
        OpToken::Binary(BinaryOp::Eql),
    ],
    &[
        OpToken::Binary(BinaryOp::Lte),
        OpToken::Binary(BinaryOp::Gte),
        OpToken::Binary(BinaryOp::Lt),
        OpToken::Binary(BinaryOp::Gt),
    ],
    &[OpToken::Binary(BinaryOp::Shl), OpToken::Binary(BinaryOp::Shr)],
    &[OpToken::Binary(BinaryOp::Add), OpToken::Binary(BinaryOp::Sub)],
    &[
        OpToken::Binary(BinaryOp::Mul),
        OpToken::Binary(BinaryOp::Div),
        OpToken::Binary(BinaryOp::Mod),
    ],
];

fn operator<'a>(input: &'a str, ops: &[OpToken]) -> Option<(OpToken, &'a str)> {
    ops.iter().find_map(|op| {
        let rest = input.strip_prefix(op.symbol())?;
        match rest.chars().next() {
            Some(c) if OPERATOR_CHARS.contains(c) => None,
            _ => Some((*op, rest)),
        }
    })
}

/// Turns a construction error into an unrecoverable parse error at `input`.
fn built<'a, T>(input: &'a str, result: ExprResult<T>) -> Result<T, nom::Err<SyntaxError<'a>>> {
    result.map_err(|e: ExprError| nom::Err::Failure(SyntaxError::new(input, e.to_string())))
}

/// Releases one nesting level when dropped.
struct DepthGuard<'p> {
    depth: &'p Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Recursive descent parser for the expression language.
pub(super) struct Grammar {
    max_depth: usize,
    depth: Cell<usize>,
}

impl Grammar {
    pub fn new(settings: &ParserSettings) -> Self {
        Grammar {
            max_depth: settings.max_depth,
            depth: Cell::new(0),
        }
    }

    /// Parses `input` as one expression surrounded by optional whitespace.
    pub fn parse_all<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        let (rest, _) = ws(input)?;
        let (rest, expr) = self.expression(rest)?;
        let (rest, _) = ws(rest)?;
        if !rest.is_empty() {
            return SyntaxError::failure(rest, "unexpected input");
        }
        Ok((rest, expr))
    }

    fn nested<'a>(&self, input: &'a str) -> Result<DepthGuard<'_>, nom::Err<SyntaxError<'a>>> {
        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(nom::Err::Failure(SyntaxError::new(
                input,
                format!("expression nested deeper than {} levels", self.max_depth),
            )));
        }
        self.depth.set(depth);
        Ok(DepthGuard { depth: &self.depth })
    }

    fn expression<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        self.binary(input, 0)
    }

    fn binary<'a>(&self, input: &'a str, level: usize) -> PResult<'a, Expression> {
        let Some(ops) = LEVELS.get(level) else {
            return self.unary(input);
        };
        let (mut input, mut lhs) = self.binary(input, level + 1)?;
        loop {
            let (after_ws, _) = ws(input)?;
            let Some((op, rest)) = operator(after_ws, ops) else {
                return Ok((input, lhs));
            };
            let (rest, _) = ws(rest)?;
            match op {
                OpToken::Regex { negated } => {
                    let (rest, pattern) =
                        cut(context("regular expression", string_literal))(rest)?;
                    lhs = built(after_ws, Expression::regex_match(lhs, &pattern, negated))?;
                    input = rest;
                }
                OpToken::Binary(op) => {
                    let (rest, matcher) = match_clause(rest)?;
                    let (rest, _) = ws(rest)?;
                    let (rest, rhs) = cut(|i| self.binary(i, level + 1))(rest)?;
                    lhs = Expression::binary_with(op, lhs, rhs, matcher);
                    input = rest;
                }
            }
        }
    }

    fn unary<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        let mut chars = input.chars();
        let (first, second) = (chars.next(), chars.next());
        if first == Some('-') && second.is_some_and(|d| d.is_ascii_digit()) {
            return map(number, Expression::Constant)(input);
        }
        match first {
            Some(c @ ('-' | '!')) => {
                let _guard = self.nested(input)?;
                let (rest, _) = ws(&input[1..])?;
                let (rest, operand) = cut(|i| self.unary(i))(rest)?;
                let expr = if c == '-' {
                    Expression::negate(operand)
                } else {
                    Expression::not(operand)
                };
                Ok((rest, expr))
            }
            _ => self.primary(input),
        }
    }

    fn primary<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        match input.chars().next() {
            Some('(') => self.parenthesised(input),
            Some('[') => histogram(input),
            Some('"') => map(string_literal, |s| Expression::Constant(Value::String(s)))(input),
            Some('$') => reference(input),
            Some(c) if c.is_ascii_digit() => map(number, Expression::Constant)(input),
            Some(c) if is_identifier_start(c) || c == '\'' || c == '*' => self.named(input),
            _ => SyntaxError::error(input, "expected an expression"),
        }
    }

    fn parenthesised<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        let _guard = self.nested(input)?;
        preceded(
            pair(char('('), ws),
            cut(terminated(|i| self.expression(i), pair(ws, char(')')))),
        )(input)
    }

    /// Literals spelled as words, function calls and selectors.
    fn named<'a>(&self, input: &'a str) -> PResult<'a, Expression> {
        if let Ok((rest, word)) = identifier(input) {
            match word {
                "true" => return Ok((rest, Expression::TRUE)),
                "false" => return Ok((rest, Expression::FALSE)),
                _ => {}
            }
            if rest.starts_with('(') || rest.starts_with('[') {
                return context("function call", |i| self.call(word, i))(rest);
            }
        }
        selector(input)
    }

    fn arguments<'a>(&self, input: &'a str) -> PResult<'a, Vec<Expression>> {
        preceded(
            pair(char('('), ws),
            cut(terminated(
                separated_list0(tuple((ws, char(','), ws)), |i| self.expression(i)),
                pair(ws, char(')')),
            )),
        )(input)
    }

    fn call<'a>(&self, function: &'a str, input: &'a str) -> PResult<'a, Expression> {
        let _guard = self.nested(input)?;
        let (rest, window) = opt(interval)(input)?;
        match function {
            "rate" => {
                let (rest, mut args) = self.arguments(rest)?;
                if args.len() != 1 {
                    return SyntaxError::failure(input, "rate takes exactly one argument");
                }
                let arg = args.remove(0);
                Ok((rest, built(input, Expression::rate(arg, window))?))
            }
            "tag" => {
                no_interval(function, input, window)?;
                let (rest, (arg, _, _, _, tag_name, _, _)) = preceded(
                    pair(char('('), ws),
                    cut(tuple((
                        |i| self.expression(i),
                        ws,
                        char(','),
                        ws,
                        name,
                        ws,
                        char(')'),
                    ))),
                )(rest)?;
                Ok((rest, Expression::tag_value(arg, tag_name)))
            }
            "regexp" => {
                no_interval(function, input, window)?;
                let (rest, (arg, _, _, _, pattern, _, _, _, template, _, _)) = preceded(
                    pair(char('('), ws),
                    cut(tuple((
                        |i| self.expression(i),
                        ws,
                        char(','),
                        ws,
                        string_literal,
                        ws,
                        char(','),
                        ws,
                        string_literal,
                        ws,
                        char(')'),
                    ))),
                )(rest)?;
                Ok((rest, built(input, Expression::regexp(arg, &pattern, template))?))
            }
            "str" => {
                no_interval(function, input, window)?;
                let (rest, args) = self.arguments(rest)?;
                let (rest, matcher) = trailing_match_clause(rest)?;
                Ok((rest, Expression::str_concat(args, matcher)))
            }
            "percentile_agg" => {
                let (rest, (p, args)) = preceded(
                    pair(char('('), ws),
                    cut(pair(
                        float,
                        terminated(
                            |i| self.trailing_arguments(i),
                            pair(ws, char(')')),
                        ),
                    )),
                )(rest)?;
                let percentile = built(input, Percentile::new(p))?;
                let (rest, clause) = aggregation_clause(rest)?;
                let expr = Expression::aggregate(Aggregator::Percentile(percentile), args, clause, window);
                Ok((rest, built(input, expr)?))
            }
            other => match Aggregator::from_name(other) {
                Some(aggregator) => {
                    let (rest, args) = self.arguments(rest)?;
                    let (rest, clause) = aggregation_clause(rest)?;
                    let expr = Expression::aggregate(aggregator, args, clause, window);
                    Ok((rest, built(input, expr)?))
                }
                None => SyntaxError::failure(input, format!("unknown function '{}'", other)),
            },
        }
    }

    /// Zero or more `, expr` items.
    fn trailing_arguments<'a>(&self, mut input: &'a str) -> PResult<'a, Vec<Expression>> {
        let mut args = Vec::new();
        loop {
            let Ok((rest, _)) = pair(ws, char::<&str, SyntaxError>(','))(input) else {
                return Ok((input, args));
            };
            let (rest, _) = ws(rest)?;
            let (rest, arg) = cut(|i| self.expression(i))(rest)?;
            args.push(arg);
            input = rest;
        }
    }
}

fn no_interval<'a>(
    function: &str,
    input: &'a str,
    window: Option<Duration>,
) -> Result<(), nom::Err<SyntaxError<'a>>> {
    if window.is_some() {
        let message = format!("{} does not take an interval", function);
        return Err(nom::Err::Failure(SyntaxError::new(input, message)));
    }
    Ok(())
}

fn histogram(input: &str) -> PResult<Expression> {
    let bucket = map(
        tuple((float, ws, tag(".."), ws, float, ws, char('='), ws, float)),
        |(floor, _, _, _, ceil, _, _, _, count)| (floor, ceil, count),
    );
    let (rest, ranges) = context(
        "histogram",
        preceded(
            pair(char('['), ws),
            cut(terminated(
                separated_list0(tuple((ws, char(','), ws)), bucket),
                pair(ws, char(']')),
            )),
        ),
    )(input)?;
    let histogram = ranges
        .into_iter()
        .map(|(floor, ceil, count)| Bucket::new(floor, ceil, count))
        .collect::<ExprResult<Vec<_>>>()
        .and_then(Histogram::new);
    Ok((rest, Expression::constant(built(input, histogram)?)))
}

/// `$name`, or `$alias metric.path` when a group binding is used as the
/// group of a selector.
fn reference(input: &str) -> PResult<Expression> {
    let (rest, alias) = preceded(char('$'), cut(name))(input)?;
    if let Some((rest, selector)) = alias_selector(&alias, rest) {
        return Ok((rest, selector));
    }
    Ok((rest, Expression::identifier(alias)))
}

/// A metric path that starts with `*` could also be a multiplication; it is
/// read as one whenever an operand follows.
fn alias_selector<'a>(alias: &str, input: &'a str) -> Option<(&'a str, Expression)> {
    let (after_ws, _) = multispace1::<&str, SyntaxError>(input).ok()?;
    let (rest, metric) = path(after_ws).ok()?;
    if matches!(metric.segments().first(), Some(MatchSegment::Wildcard)) {
        let (next, _) = ws(rest).ok()?;
        if next.chars().next().is_some_and(starts_operand) {
            return None;
        }
    }
    Some((rest, Expression::Selector(Selector::alias(alias, metric))))
}

/// `group.path metric.path`
fn selector(input: &str) -> PResult<Expression> {
    let (rest, group) = path(input)?;
    let (rest, metric) = cut(context("selector", preceded(multispace1, path)))(rest)?;
    Ok((rest, Expression::Selector(Selector::new(group, metric))))
}

fn tag_names<'a>(input: &'a str, names: Vec<String>) -> Result<TagNameSet, nom::Err<SyntaxError<'a>>> {
    built(input, TagNameSet::new(names))
}

/// `by (a, b) [keep_common]` directly at `input`, or the default clause.
fn match_clause(input: &str) -> PResult<MatchClause> {
    let Ok((rest, _)) = keyword("by")(input) else {
        return Ok((input, MatchClause::Default));
    };
    let (rest, names) = cut(preceded(ws, name_list))(rest)?;
    let (rest, keep) = opt(preceded(ws, keyword("keep_common")))(rest)?;
    Ok((rest, MatchClause::by(tag_names(input, names)?, keep.is_some())))
}

/// Like [`match_clause`], after optional whitespace.
fn trailing_match_clause(input: &str) -> PResult<MatchClause> {
    let (after_ws, _) = ws(input)?;
    match match_clause(after_ws)? {
        (_, MatchClause::Default) => Ok((input, MatchClause::Default)),
        found => Ok(found),
    }
}

/// `by (..) [keep_common]`, `keep_common` or `without (..)` after an
/// aggregate's argument list. No clause aggregates to a scalar.
fn aggregation_clause(input: &str) -> PResult<AggregationClause> {
    let (after_ws, _) = ws(input)?;
    if let Ok((rest, _)) = keyword("by")(after_ws) {
        let (rest, names) = cut(preceded(ws, name_list))(rest)?;
        let (rest, keep) = opt(preceded(ws, keyword("keep_common")))(rest)?;
        let names = tag_names(after_ws, names)?;
        return Ok((rest, AggregationClause::by(names, keep.is_some())));
    }
    if let Ok((rest, _)) = keyword("keep_common")(after_ws) {
        return Ok((rest, AggregationClause::by(TagNameSet::empty(), true)));
    }
    if let Ok((rest, _)) = keyword("without")(after_ws) {
        let (rest, names) = cut(preceded(ws, name_list))(rest)?;
        let names = tag_names(after_ws, names)?;
        return Ok((rest, built(after_ws, AggregationClause::without(names))?));
    }
    Ok((input, AggregationClause::scalar()))
}
