use super::{SimplePath, Tags};
use std::fmt;

/// Identifies one metric group inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub path: SimplePath,
    pub tags: Tags,
}

impl GroupKey {
    pub fn new(path: SimplePath, tags: Tags) -> Self {
        GroupKey { path, tags }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tags.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}{}", self.path, self.tags)
        }
    }
}
