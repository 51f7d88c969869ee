use super::functions::{rate, regexp_rewrite, str_concat, tag_value};
use super::{priority, EvalContext, Selector};
use crate::aggregate::Aggregator;
use crate::common::{format_duration, maybe_quote_identifier, quote_string};
use crate::error::ExprResult;
use crate::lookback::LookBack;
use crate::matching::{AggregationClause, MatchClause};
use crate::ops::{arithmetic, combine, BinaryOp};
use crate::result_set::ResultSet;
use crate::value::Value;
use chrono::Duration;
use regex::Regex;

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Expression,
    pub rhs: Expression,
    pub matcher: MatchClause,
}

#[derive(Debug, Clone)]
pub struct RegexMatchExpr {
    pub expr: Expression,
    pub regex: Regex,
    pub negated: bool,
}

impl PartialEq for RegexMatchExpr {
    fn eq(&self, other: &Self) -> bool {
        self.negated == other.negated
            && self.regex.as_str() == other.regex.as_str()
            && self.expr == other.expr
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpr {
    pub aggregator: Aggregator,
    pub args: Vec<Expression>,
    pub clause: AggregationClause,
    /// Aggregate over every collection within this interval instead of just
    /// the current one.
    pub interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateExpr {
    pub arg: Expression,
    pub interval: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagValueExpr {
    pub arg: Expression,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrConcatExpr {
    pub args: Vec<Expression>,
    pub matcher: MatchClause,
}

/// Rewrites string values through a regex and a replacement template such as
/// `"$1-${name}"`.
#[derive(Debug, Clone)]
pub struct RegexpExpr {
    pub expr: Expression,
    pub regex: Regex,
    pub template: String,
}

impl PartialEq for RegexpExpr {
    fn eq(&self, other: &Self) -> bool {
        self.regex.as_str() == other.regex.as_str()
            && self.template == other.template
            && self.expr == other.expr
    }
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Value),
    Selector(Selector),
    /// Reference to a binding, written `$name`.
    Identifier(String),
    Negate(Box<Expression>),
    Not(Box<Expression>),
    Binary(Box<BinaryExpr>),
    RegexMatch(Box<RegexMatchExpr>),
    Aggregate(Box<AggregateExpr>),
    Rate(Box<RateExpr>),
    TagValue(Box<TagValueExpr>),
    StrConcat(Box<StrConcatExpr>),
    Regexp(Box<RegexpExpr>),
}

impl Expression {
    pub const TRUE: Expression = Expression::Constant(Value::TRUE);
    pub const FALSE: Expression = Expression::Constant(Value::FALSE);

    pub fn constant(value: impl Into<Value>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn negate(expr: Expression) -> Self {
        Expression::Negate(Box::new(expr))
    }

    pub fn not(expr: Expression) -> Self {
        Expression::Not(Box::new(expr))
    }

    pub fn binary(op: BinaryOp, lhs: Expression, rhs: Expression) -> Self {
        Expression::binary_with(op, lhs, rhs, MatchClause::Default)
    }

    pub fn binary_with(op: BinaryOp, lhs: Expression, rhs: Expression, matcher: MatchClause) -> Self {
        Expression::Binary(Box::new(BinaryExpr {
            op,
            lhs,
            rhs,
            matcher,
        }))
    }

    /// Fails if `pattern` is not a valid regular expression.
    pub fn regex_match(expr: Expression, pattern: &str, negated: bool) -> ExprResult<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Expression::RegexMatch(Box::new(RegexMatchExpr {
            expr,
            regex,
            negated,
        })))
    }

    pub fn aggregate(
        aggregator: Aggregator,
        args: Vec<Expression>,
        clause: AggregationClause,
        interval: Option<Duration>,
    ) -> ExprResult<Self> {
        if let Some(d) = interval {
            LookBack::interval(d)?;
        }
        Ok(Expression::Aggregate(Box::new(AggregateExpr {
            aggregator,
            args,
            clause,
            interval,
        })))
    }

    pub fn rate(arg: Expression, interval: Option<Duration>) -> ExprResult<Self> {
        if let Some(d) = interval {
            LookBack::interval(d)?;
        }
        Ok(Expression::Rate(Box::new(RateExpr { arg, interval })))
    }

    pub fn tag_value(arg: Expression, tag: impl Into<String>) -> Self {
        Expression::TagValue(Box::new(TagValueExpr {
            arg,
            tag: tag.into(),
        }))
    }

    pub fn str_concat(args: Vec<Expression>, matcher: MatchClause) -> Self {
        Expression::StrConcat(Box::new(StrConcatExpr { args, matcher }))
    }

    /// Fails if `pattern` is not a valid regular expression.
    pub fn regexp(expr: Expression, pattern: &str, template: impl Into<String>) -> ExprResult<Self> {
        let regex = Regex::new(pattern)?;
        Ok(Expression::Regexp(Box::new(RegexpExpr {
            expr,
            regex,
            template: template.into(),
        })))
    }

    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Constant(_) | Expression::Selector(_) | Expression::Identifier(_) => vec![],
            Expression::Negate(e) | Expression::Not(e) => vec![e.as_ref()],
            Expression::Binary(b) => vec![&b.lhs, &b.rhs],
            Expression::RegexMatch(r) => vec![&r.expr],
            Expression::Aggregate(a) => a.args.iter().collect(),
            Expression::Rate(r) => vec![&r.arg],
            Expression::TagValue(t) => vec![&t.arg],
            Expression::StrConcat(s) => s.args.iter().collect(),
            Expression::Regexp(r) => vec![&r.expr],
        }
    }

    /// Evaluates the tree against `ctx`. Never fails: undefined operations
    /// produce `Empty` scalars or drop vector elements.
    pub fn evaluate(&self, ctx: &EvalContext) -> ResultSet {
        match self {
            Expression::Constant(v) => ResultSet::Scalar(v.clone()),
            Expression::Selector(s) => s.evaluate(ctx),
            Expression::Identifier(name) => ctx.resolve(name),
            Expression::Negate(e) => e.evaluate(ctx).map_values(arithmetic::negate),
            Expression::Not(e) => e.evaluate(ctx).map_values(arithmetic::not),
            Expression::Binary(b) => {
                let lhs = b.lhs.evaluate(ctx);
                let rhs = b.rhs.evaluate(ctx);
                combine(&lhs, &rhs, &b.matcher, |x, y| b.op.apply(x, y))
            }
            Expression::RegexMatch(r) => r.expr.evaluate(ctx).map_values(|v| match v {
                Value::String(s) => Some(Value::Boolean(r.regex.is_match(s) != r.negated)),
                _ => None,
            }),
            Expression::Aggregate(a) => a.evaluate(ctx),
            Expression::Rate(r) => rate(ctx, &r.arg, r.interval),
            Expression::TagValue(t) => tag_value(&t.arg.evaluate(ctx), &t.tag),
            Expression::StrConcat(s) => {
                let results: Vec<ResultSet> = s.args.iter().map(|e| e.evaluate(ctx)).collect();
                str_concat(&results, &s.matcher)
            }
            Expression::Regexp(r) => regexp_rewrite(&r.expr.evaluate(ctx), &r.regex, &r.template),
        }
    }

    /// History this subtree needs, relative to the collection it is
    /// evaluated against.
    pub fn lookback(&self) -> LookBack {
        let children = || self.children().into_iter().map(Expression::lookback);
        match self {
            Expression::Rate(r) => r
                .interval
                .map(LookBack::Interval)
                .unwrap_or(LookBack::ScrapeCount(1))
                .and_then(r.arg.lookback()),
            Expression::Aggregate(a) => match a.interval {
                Some(d) => LookBack::Interval(d).and_then_many(children()),
                None => LookBack::Empty.and_then_many(children()),
            },
            _ => LookBack::Empty.and_then_many(children()),
        }
    }

    /// Binding strength of the node's textual form; higher binds tighter.
    pub fn priority(&self) -> u8 {
        match self {
            Expression::Binary(b) => b.op.priority(),
            Expression::RegexMatch(_) => priority::EQUALITY,
            Expression::Negate(_) | Expression::Not(_) => priority::UNARY,
            _ => priority::BRACKETS,
        }
    }

    /// Canonical source text; parsing it yields an equivalent expression.
    pub fn config_string(&self) -> String {
        match self {
            Expression::Constant(v) => v.config_string(),
            Expression::Selector(s) => s.config_string(),
            Expression::Identifier(name) => format!("${}", maybe_quote_identifier(name)),
            Expression::Negate(e) => {
                let operand = wrap(e, e.priority() < priority::UNARY);
                // "-5" would read back as a negative literal
                if operand.starts_with(|c: char| c.is_ascii_digit()) {
                    format!("- {}", operand)
                } else {
                    format!("-{}", operand)
                }
            }
            Expression::Not(e) => format!("!{}", wrap(e, e.priority() < priority::UNARY)),
            Expression::Binary(b) => {
                let p = b.op.priority();
                let lhs = wrap(&b.lhs, b.lhs.priority() < p || ends_with_alias_wildcard(&b.lhs));
                let rhs = wrap(&b.rhs, b.rhs.priority() <= p);
                match b.matcher {
                    MatchClause::Default => format!("{} {} {}", lhs, b.op, rhs),
                    ref m => format!("{} {} {} {}", lhs, b.op, m, rhs),
                }
            }
            Expression::RegexMatch(r) => {
                let op = if r.negated { "!~" } else { "=~" };
                format!(
                    "{} {} {}",
                    wrap(
                        &r.expr,
                        r.expr.priority() < priority::EQUALITY || ends_with_alias_wildcard(&r.expr)
                    ),
                    op,
                    quote_string(r.regex.as_str())
                )
            }
            Expression::Aggregate(a) => a.config_string(),
            Expression::Rate(r) => match r.interval {
                Some(d) => format!("rate[{}]({})", format_duration(d), r.arg.config_string()),
                None => format!("rate({})", r.arg.config_string()),
            },
            Expression::TagValue(t) => {
                format!("tag({}, {})", t.arg.config_string(), maybe_quote_identifier(&t.tag))
            }
            Expression::StrConcat(s) => {
                let args = join_config(&s.args);
                match s.matcher {
                    MatchClause::Default => format!("str({})", args),
                    ref m => format!("str({}) {}", args, m),
                }
            }
            Expression::Regexp(r) => format!(
                "regexp({}, {}, {})",
                r.expr.config_string(),
                quote_string(r.regex.as_str()),
                quote_string(&r.template)
            ),
        }
    }
}

impl AggregateExpr {
    fn evaluate(&self, ctx: &EvalContext) -> ResultSet {
        let inputs: Vec<ResultSet> = match self.interval {
            None => self.args.iter().map(|e| e.evaluate(ctx)).collect(),
            Some(d) => ctx
                .view()
                .views_since(d)
                .into_iter()
                .flat_map(|view| {
                    let shifted = ctx.with_view(view);
                    self.args
                        .iter()
                        .map(|e| e.evaluate(&shifted))
                        .collect::<Vec<_>>()
                })
                .collect(),
        };
        self.aggregator.apply(&self.clause, inputs.iter())
    }

    fn config_string(&self) -> String {
        let mut out = String::from(self.aggregator.name());
        if let Some(d) = self.interval {
            out.push('[');
            out.push_str(&format_duration(d));
            out.push(']');
        }
        out.push('(');
        let args = join_config(&self.args);
        match self.aggregator.parameter_string() {
            Some(param) if args.is_empty() => out.push_str(&param),
            Some(param) => {
                out.push_str(&param);
                out.push_str(", ");
                out.push_str(&args);
            }
            None => out.push_str(&args),
        }
        out.push(')');
        let clause = self.clause.config_string();
        if !clause.is_empty() {
            out.push(' ');
            out.push_str(&clause);
        }
        out
    }
}

fn wrap(expr: &Expression, braces: bool) -> String {
    if braces {
        format!("({})", expr.config_string())
    } else {
        expr.config_string()
    }
}

/// True if the rendered text of `expr` ends in a selector like `$alias *`,
/// which would read as a multiplication when an operator follows it.
fn ends_with_alias_wildcard(expr: &Expression) -> bool {
    match expr {
        Expression::Selector(s) => s.is_alias_wildcard(),
        Expression::Negate(e) | Expression::Not(e) => {
            e.priority() >= priority::UNARY && ends_with_alias_wildcard(e)
        }
        Expression::Binary(b) => b.rhs.priority() > b.op.priority() && ends_with_alias_wildcard(&b.rhs),
        _ => false,
    }
}

fn join_config(exprs: &[Expression]) -> String {
    exprs
        .iter()
        .map(Expression::config_string)
        .collect::<Vec<_>>()
        .join(", ")
}
