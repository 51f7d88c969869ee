use super::{EvalContext, Expression};
use crate::matching::MatchClause;
use crate::ops::combine;
use crate::ops::combine_all;
use crate::result_set::ResultSet;
use crate::value::Value;
use chrono::Duration;
use regex::Regex;

/// Per-second change of `arg` between the current view and an earlier one:
/// the previous scrape, or the newest collection at least `interval` old.
pub(super) fn rate(ctx: &EvalContext, arg: &Expression, interval: Option<Duration>) -> ResultSet {
    let current = arg.evaluate(ctx);
    let view = ctx.view();
    let previous_view = match interval {
        Some(d) => view.previous_view_at(d),
        None => view.previous_view(1),
    };
    let Some(previous_view) = previous_view else {
        return current.empty_like();
    };

    let elapsed = view.timestamp() - previous_view.timestamp();
    let secs = elapsed.num_milliseconds() as f64 / 1000.0;
    if secs <= 0.0 {
        return current.empty_like();
    }

    let previous = arg.evaluate(&ctx.with_view(previous_view));
    combine(&current, &previous, &MatchClause::Default, |cur, prev| {
        per_second(cur, prev, secs)
    })
}

fn per_second(current: &Value, previous: &Value, secs: f64) -> Option<Value> {
    match (current, previous) {
        (Value::Histogram(cur), Value::Histogram(prev)) => {
            let delta = cur.subtract(prev).ok()?;
            delta.divide(secs).ok().map(Value::Histogram)
        }
        (Value::Histogram(_), _) | (_, Value::Histogram(_)) => None,
        _ => {
            let cur = current.as_number()?.as_f64();
            let prev = previous.as_number()?.as_f64();
            Some(Value::Float((cur - prev) / secs))
        }
    }
}

/// The value of tag `name` for every element of a vector. Elements without
/// the tag are dropped; a scalar has no tags and yields an empty vector.
pub(super) fn tag_value(input: &ResultSet, name: &str) -> ResultSet {
    match input {
        ResultSet::Scalar(_) => ResultSet::empty_vector(),
        ResultSet::Vector(vector) => ResultSet::Vector(
            vector
                .iter()
                .filter_map(|(tags, _)| tags.get(name).map(|v| (tags.clone(), v.clone())))
                .collect(),
        ),
    }
}

/// Concatenates the string forms of all inputs. Histograms and empty values
/// have no string form and drop out.
pub(super) fn str_concat(inputs: &[ResultSet], matcher: &MatchClause) -> ResultSet {
    combine_all(inputs, Value::String(String::new()), matcher, |x, y| {
        let mut out = x.as_string()?.into_owned();
        out.push_str(&y.as_string()?);
        Some(Value::String(out))
    })
}

/// Rewrites the string form of every value through `template`, filled from
/// the first match of `regex`. Values that do not match drop out.
pub(super) fn regexp_rewrite(input: &ResultSet, regex: &Regex, template: &str) -> ResultSet {
    input.map_values(|v| {
        let text = v.as_string()?;
        let captures = regex.captures(&text)?;
        let mut out = String::new();
        captures.expand(template, &mut out);
        Some(Value::String(out))
    })
}
