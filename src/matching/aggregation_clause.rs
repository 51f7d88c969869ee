use super::TagNameSet;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use crate::tags::Tags;
use ahash::AHashMap;
use std::fmt;

/// How an aggregate groups its input elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AggregationClause {
    /// Group by the named tags. With `keep_common`, each group is keyed by the
    /// tags all of its members share instead.
    By {
        names: TagNameSet,
        keep_common: bool,
    },
    /// Group by every tag except the named ones.
    Without { names: TagNameSet },
}

impl Default for AggregationClause {
    fn default() -> Self {
        AggregationClause::scalar()
    }
}

/// One output group: its key and the indices of its members, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub tags: Tags,
    pub members: Vec<usize>,
}

impl AggregationClause {
    pub fn scalar() -> Self {
        AggregationClause::By {
            names: TagNameSet::empty(),
            keep_common: false,
        }
    }

    pub fn by(names: TagNameSet, keep_common: bool) -> Self {
        AggregationClause::By { names, keep_common }
    }

    pub fn without(names: TagNameSet) -> ExprResult<Self> {
        if names.is_empty() {
            return Err(ExprError::InvalidTagClause(
                error_consts::EMPTY_WITHOUT_CLAUSE.to_string(),
            ));
        }
        Ok(AggregationClause::Without { names })
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, AggregationClause::By { names, keep_common: false } if names.is_empty())
    }

    pub fn keep_common(&self) -> bool {
        matches!(self, AggregationClause::By { keep_common: true, .. })
    }

    fn names(&self) -> &TagNameSet {
        match self {
            AggregationClause::By { names, .. } => names,
            AggregationClause::Without { names } => names,
        }
    }

    /// The grouping key for `tags`, or `None` if a named tag is missing.
    pub fn key_for(&self, tags: &Tags) -> Option<Tags> {
        let names = self.names();
        if !names.all_present(tags) {
            return None;
        }
        Some(match self {
            AggregationClause::By { names, .. } => names.project(tags),
            AggregationClause::Without { names } => names.exclude(tags),
        })
    }

    /// Partitions `items` into groups, in order of first appearance. Elements
    /// lacking a named tag are dropped; duplicates are kept.
    pub fn apply<'a, I>(&self, items: I) -> Vec<Group>
    where
        I: IntoIterator<Item = &'a Tags>,
    {
        let keep_common = self.keep_common();
        let mut index: AHashMap<Tags, usize> = AHashMap::new();
        let mut groups: Vec<Group> = Vec::new();

        for (i, tags) in items.into_iter().enumerate() {
            let Some(key) = self.key_for(tags) else {
                continue;
            };
            match index.get(&key) {
                Some(&g) => {
                    let group = &mut groups[g];
                    if keep_common {
                        group.tags = group.tags.common(tags);
                    }
                    group.members.push(i);
                }
                None => {
                    index.insert(key.clone(), groups.len());
                    let tags = if keep_common { tags.clone() } else { key };
                    groups.push(Group {
                        tags,
                        members: vec![i],
                    });
                }
            }
        }
        groups
    }

    /// Groups the concatenation of `x` and `y`. Member indices into `y` are
    /// offset by the length of `x`.
    pub fn apply_two<'a, I, J>(&self, x: I, y: J) -> Vec<Group>
    where
        I: IntoIterator<Item = &'a Tags>,
        J: IntoIterator<Item = &'a Tags>,
    {
        self.apply(x.into_iter().chain(y))
    }

    pub fn config_string(&self) -> String {
        match self {
            AggregationClause::By { names, keep_common } => match (names.is_empty(), keep_common) {
                (true, false) => String::new(),
                (true, true) => "keep_common".to_string(),
                (false, false) => format!("by {}", names),
                (false, true) => format!("by {} keep_common", names),
            },
            AggregationClause::Without { names } => format!("without {}", names),
        }
    }
}

impl fmt::Display for AggregationClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}
