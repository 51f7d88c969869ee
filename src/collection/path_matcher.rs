use crate::common::maybe_quote_identifier;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use crate::tags::SimplePath;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchSegment {
    Literal(String),
    /// `*`: exactly one segment
    Wildcard,
    /// `**`: any number of segments, including none
    DoubleWildcard,
}

impl MatchSegment {
    fn config_string(&self) -> String {
        match self {
            MatchSegment::Literal(s) => maybe_quote_identifier(s).into_owned(),
            MatchSegment::Wildcard => "*".to_string(),
            MatchSegment::DoubleWildcard => "**".to_string(),
        }
    }
}

/// Matches group paths and metric names, optionally with wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathMatcher {
    segments: Vec<MatchSegment>,
}

impl PathMatcher {
    pub fn new(segments: Vec<MatchSegment>) -> ExprResult<PathMatcher> {
        if segments.is_empty() {
            return Err(ExprError::InvalidPath(error_consts::EMPTY_PATH));
        }
        Ok(PathMatcher { segments })
    }

    pub fn literal(path: &SimplePath) -> PathMatcher {
        PathMatcher {
            segments: path
                .segments()
                .iter()
                .map(|s| MatchSegment::Literal(s.clone()))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[MatchSegment] {
        &self.segments
    }

    /// The exact path matched, if the matcher has no wildcards.
    pub fn as_literal(&self) -> Option<SimplePath> {
        let literals: Option<Vec<&str>> = self
            .segments
            .iter()
            .map(|s| match s {
                MatchSegment::Literal(lit) => Some(lit.as_str()),
                _ => None,
            })
            .collect();
        literals.and_then(|parts| SimplePath::new(parts).ok())
    }

    pub fn matches(&self, path: &SimplePath) -> bool {
        matches_from(&self.segments, path.segments())
    }

    pub fn config_string(&self) -> String {
        self.segments
            .iter()
            .map(MatchSegment::config_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

fn matches_from(pattern: &[MatchSegment], path: &[String]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((MatchSegment::DoubleWildcard, rest)) => {
            (0..=path.len()).any(|skip| matches_from(rest, &path[skip..]))
        }
        Some((head, rest)) => match path.split_first() {
            None => false,
            Some((segment, path_rest)) => {
                let head_ok = match head {
                    MatchSegment::Literal(lit) => lit == segment,
                    _ => true,
                };
                head_ok && matches_from(rest, path_rest)
            }
        },
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn matcher(parts: &[&str]) -> PathMatcher {
        PathMatcher::new(
            parts
                .iter()
                .map(|p| match *p {
                    "*" => MatchSegment::Wildcard,
                    "**" => MatchSegment::DoubleWildcard,
                    lit => MatchSegment::Literal(lit.to_string()),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test_case(&["a", "b"], "a.b", true ; "literal")]
    #[test_case(&["a", "b"], "a.c", false ; "literal mismatch")]
    #[test_case(&["a", "*"], "a.c", true ; "single wildcard")]
    #[test_case(&["a", "*"], "a.c.d", false ; "single wildcard is one segment")]
    #[test_case(&["a", "**"], "a", true ; "double wildcard matches nothing")]
    #[test_case(&["a", "**"], "a.b.c", true ; "double wildcard matches many")]
    #[test_case(&["**", "c"], "a.b.c", true ; "leading double wildcard")]
    #[test_case(&["**", "c"], "a.b.d", false ; "leading double wildcard mismatch")]
    fn test_matches(pattern: &[&str], path: &str, expected: bool) {
        let path = SimplePath::from_dotted(path).unwrap();
        assert_eq!(matcher(pattern).matches(&path), expected);
    }

    #[test]
    fn test_as_literal() {
        assert_eq!(
            matcher(&["a", "b"]).as_literal(),
            Some(SimplePath::from_dotted("a.b").unwrap())
        );
        assert_eq!(matcher(&["a", "*"]).as_literal(), None);
    }

    #[test]
    fn test_config_string() {
        assert_eq!(matcher(&["com", "*", "**", "x y"]).config_string(), "com.*.**.'x y'");
    }
}
