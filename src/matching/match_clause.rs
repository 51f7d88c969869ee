use super::TagNameSet;
use crate::tags::Tags;
use crate::value::Value;
use ahash::AHashMap;
use std::fmt;

/// How the elements of two vectors are paired by a binary operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum MatchClause {
    /// Elements pair when their tag sets are identical.
    #[default]
    Default,
    /// Elements pair when their tags agree on `names`. Keys matching more than
    /// one element on either side are dropped.
    By {
        names: TagNameSet,
        keep_common: bool,
    },
}

impl MatchClause {
    pub fn by(names: TagNameSet, keep_common: bool) -> Self {
        MatchClause::By { names, keep_common }
    }

    /// `by ()`: every element pairs with every element as long as each side
    /// holds at most one.
    pub fn is_scalar(&self) -> bool {
        matches!(self, MatchClause::By { names, keep_common: false } if names.is_empty())
    }

    /// Inner join of `x` and `y`, applying `f` to every matched pair. Pairs for
    /// which `f` yields nothing are left out.
    pub fn apply<R, F>(&self, x: &[(Tags, Value)], y: &[(Tags, Value)], mut f: F) -> Vec<(Tags, R)>
    where
        F: FnMut(&Value, &Value) -> Option<R>,
    {
        match self {
            MatchClause::Default => {
                let right: AHashMap<&Tags, &Value> = y.iter().map(|(t, v)| (t, v)).collect();
                x.iter()
                    .filter_map(|(tags, xv)| {
                        let yv = right.get(tags)?;
                        f(xv, yv).map(|r| (tags.clone(), r))
                    })
                    .collect()
            }
            MatchClause::By { names, keep_common } => {
                let left = group_unique(names, x);
                let right: AHashMap<Tags, (&Tags, &Value)> =
                    group_unique(names, y).into_iter().collect();
                left.into_iter()
                    .filter_map(|(key, (xt, xv))| {
                        let (yt, yv) = right.get(&key)?;
                        let r = f(xv, yv)?;
                        let tags = if *keep_common { xt.common(yt) } else { key };
                        Some((tags, r))
                    })
                    .collect()
            }
        }
    }

    pub fn config_string(&self) -> String {
        match self {
            MatchClause::Default => String::new(),
            MatchClause::By { names, keep_common } => {
                if *keep_common {
                    format!("by {} keep_common", names)
                } else {
                    format!("by {}", names)
                }
            }
        }
    }
}

/// Projects each element's tags onto `names`, keeping only keys that occur
/// once. Insertion order follows `items`.
fn group_unique<'a>(
    names: &TagNameSet,
    items: &'a [(Tags, Value)],
) -> Vec<(Tags, (&'a Tags, &'a Value))> {
    let mut index: AHashMap<Tags, usize> = AHashMap::with_capacity(items.len());
    let mut grouped: Vec<(Tags, (&'a Tags, &'a Value), bool)> = Vec::with_capacity(items.len());
    for (tags, value) in items {
        let key = names.project(tags);
        match index.get(&key) {
            Some(&idx) => grouped[idx].2 = true,
            None => {
                index.insert(key.clone(), grouped.len());
                grouped.push((key, (tags, value), false));
            }
        }
    }
    grouped
        .into_iter()
        .filter_map(|(key, item, ambiguous)| {
            if ambiguous {
                tracing::trace!(key = %key, "dropping ambiguous match key");
                None
            } else {
                Some((key, item))
            }
        })
        .collect()
}

impl fmt::Display for MatchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}
