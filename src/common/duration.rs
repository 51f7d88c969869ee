use chrono::Duration;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::error::{FromExternalError, ParseError};
use nom::multi::many1;
use nom::sequence::pair;
use nom::IResult;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

const UNITS: [(&str, i64); 5] = [
    ("d", MILLIS_PER_DAY),
    ("h", MILLIS_PER_HOUR),
    ("m", MILLIS_PER_MINUTE),
    ("s", MILLIS_PER_SECOND),
    ("ms", 1),
];

fn unit_millis(unit: &str) -> i64 {
    UNITS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, ms)| *ms)
        .unwrap_or(1)
}

fn duration_part<'a, E>(input: &'a str) -> IResult<&'a str, i64, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, &'static str>,
{
    map_res(
        pair(
            digit1,
            // "ms" must be tried before "m"
            alt((tag("ms"), tag("d"), tag("h"), tag("m"), tag("s"))),
        ),
        |(digits, unit): (&str, &str)| {
            digits
                .parse::<i64>()
                .ok()
                .and_then(|n| n.checked_mul(unit_millis(unit)))
                .ok_or("duration overflow")
        },
    )(input)
}

/// nom parser for durations such as `5m`, `1h30m` or `250ms`.
pub fn duration<'a, E>(input: &'a str) -> IResult<&'a str, Duration, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, &'static str>,
{
    map_res(many1(duration_part), |parts: Vec<i64>| {
        parts
            .into_iter()
            .try_fold(0i64, |acc, ms| acc.checked_add(ms))
            .map(Duration::milliseconds)
            .ok_or("duration overflow")
    })(input)
}

/// Parses a complete duration string, returning `None` on any trailing input.
pub fn parse_duration(value: &str) -> Option<Duration> {
    all_consuming(duration::<nom::error::Error<&str>>)(value).ok().map(|(_, d)| d)
}

/// Renders a duration in the form accepted by [`parse_duration`].
pub fn format_duration(d: Duration) -> String {
    let mut millis = d.num_milliseconds();
    if millis == 0 {
        return "0s".to_string();
    }
    let mut result = String::new();
    if millis < 0 {
        result.push('-');
        millis = millis.saturating_abs();
    }
    for (name, size) in UNITS {
        let n = millis / size;
        if n > 0 {
            result.push_str(&n.to_string());
            result.push_str(name);
            millis -= n * size;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("5m", 5 * 60 * 1000 ; "minutes")]
    #[test_case("1h30m", 90 * 60 * 1000 ; "hours and minutes")]
    #[test_case("250ms", 250 ; "millis")]
    #[test_case("1d2s", 86_402_000 ; "days and seconds")]
    #[test_case("3m30s", 210_000 ; "minutes and seconds")]
    fn test_parse_duration(input: &str, millis: i64) {
        assert_eq!(parse_duration(input), Some(Duration::milliseconds(millis)));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("5"), None);
        assert_eq!(parse_duration("5x"), None);
        assert_eq!(parse_duration("m5"), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::zero()), "0s");
        assert_eq!(format_duration(Duration::seconds(90)), "1m30s");
        assert_eq!(format_duration(Duration::milliseconds(86_400_250)), "1d250ms");
        assert_eq!(format_duration(Duration::minutes(-5)), "-5m");
    }

    #[test]
    fn test_format_parse_agree() {
        for ms in [1, 999, 1000, 61_000, 3_600_000, 90_061_001] {
            let d = Duration::milliseconds(ms);
            assert_eq!(parse_duration(&format_duration(d)), Some(d));
        }
    }
}
