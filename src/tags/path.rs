use crate::common::maybe_quote_identifier;
use crate::common::types::SegmentVec;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use std::fmt;

/// A dotted hierarchical name, used for both group paths and metric names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimplePath {
    segments: SegmentVec,
}

impl SimplePath {
    pub fn new<I, S>(segments: I) -> ExprResult<SimplePath>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: SegmentVec = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return Err(ExprError::InvalidPath(error_consts::EMPTY_PATH));
        }
        Ok(SimplePath { segments })
    }

    /// Splits on `.`; no quoting is interpreted.
    pub fn from_dotted(name: &str) -> ExprResult<SimplePath> {
        SimplePath::new(name.split('.'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn config_string(&self) -> String {
        self.segments
            .iter()
            .map(|s| maybe_quote_identifier(s))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for SimplePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dotted() {
        let path = SimplePath::from_dotted("java.lang.Memory").unwrap();
        assert_eq!(path.segments(), &["java", "lang", "Memory"]);
        assert_eq!(path.config_string(), "java.lang.Memory");
    }

    #[test]
    fn test_quoted_segments() {
        let path = SimplePath::new(["disk", "/var"]).unwrap();
        assert_eq!(path.config_string(), "disk.'/var'");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(SimplePath::new(Vec::<String>::new()).is_err());
        assert!(SimplePath::from_dotted("a..b").is_err());
    }
}
