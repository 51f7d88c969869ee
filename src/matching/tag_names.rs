use crate::common::maybe_quote_identifier;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use crate::tags::Tags;
use smallvec::SmallVec;
use std::fmt;

/// A sorted, duplicate-free set of tag names used by `by`/`without` clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagNameSet {
    names: SmallVec<[String; 4]>,
}

impl TagNameSet {
    pub fn new<I, S>(names: I) -> ExprResult<TagNameSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: SmallVec<[String; 4]> = names.into_iter().map(Into::into).collect();
        if names.iter().any(|n| n.is_empty()) {
            return Err(ExprError::InvalidTagClause(
                error_consts::EMPTY_TAG_NAME.to_string(),
            ));
        }
        names.sort();
        if let Some(dup) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(ExprError::InvalidTagClause(format!(
                "{}: {}",
                error_consts::DUPLICATE_TAG,
                dup[0]
            )));
        }
        Ok(TagNameSet { names })
    }

    pub fn empty() -> TagNameSet {
        TagNameSet::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names
            .binary_search_by(|n| n.as_str().cmp(name))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// True if `tags` carries every name in the set.
    pub fn all_present(&self, tags: &Tags) -> bool {
        self.names.iter().all(|n| tags.contains(n))
    }

    /// `tags` restricted to the names in this set.
    pub fn project(&self, tags: &Tags) -> Tags {
        tags.retain_names(|n| self.contains(n))
    }

    /// `tags` with every name in this set removed.
    pub fn exclude(&self, tags: &Tags) -> Tags {
        tags.retain_names(|n| !self.contains(n))
    }

    /// Renders as `(a, b)`.
    pub fn config_string(&self) -> String {
        let names: Vec<_> = self.names.iter().map(|n| maybe_quote_identifier(n)).collect();
        format!("({})", names.join(", "))
    }
}

impl fmt::Display for TagNameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_unique() {
        let names = TagNameSet::new(["zone", "host"]).unwrap();
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["host", "zone"]);
        assert!(names.contains("zone"));
        assert!(!names.contains("rack"));
        assert_eq!(names.config_string(), "(host, zone)");
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert!(matches!(
            TagNameSet::new(["a", "a"]),
            Err(ExprError::InvalidTagClause(_))
        ));
        assert!(TagNameSet::new([""]).is_err());
    }

    #[test]
    fn test_project_and_exclude() {
        let names = TagNameSet::new(["host"]).unwrap();
        let tags = Tags::new([("host", "h1"), ("dc", "east")]).unwrap();
        assert_eq!(names.project(&tags), Tags::new([("host", "h1")]).unwrap());
        assert_eq!(names.exclude(&tags), Tags::new([("dc", "east")]).unwrap());
        assert!(names.all_present(&tags));
        assert!(!TagNameSet::new(["rack"]).unwrap().all_present(&tags));
    }

    #[test]
    fn test_quoted_names() {
        let names = TagNameSet::new(["by", "x y"]).unwrap();
        assert_eq!(names.config_string(), "('by', 'x y')");
    }
}
