use super::EvalContext;
use crate::collection::{Collection, MatchSegment, MetricGroup, PathMatcher};
use crate::common::maybe_quote_identifier;
use crate::result_set::{ResultSet, Vector};
use crate::tags::SimplePath;
use std::fmt;

/// Which groups a selector reads from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupSelector {
    Path(PathMatcher),
    /// A group path bound by name, written `$name`.
    Alias(String),
}

impl GroupSelector {
    pub fn config_string(&self) -> String {
        match self {
            GroupSelector::Path(matcher) => matcher.config_string(),
            GroupSelector::Alias(name) => format!("${}", maybe_quote_identifier(name)),
        }
    }
}

/// Reads one metric from every matching group of the current collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    pub group: GroupSelector,
    pub metric: PathMatcher,
}

impl Selector {
    pub fn new(group: PathMatcher, metric: PathMatcher) -> Self {
        Selector {
            group: GroupSelector::Path(group),
            metric,
        }
    }

    pub fn alias(name: impl Into<String>, metric: PathMatcher) -> Self {
        Selector {
            group: GroupSelector::Alias(name.into()),
            metric,
        }
    }

    /// A vector keyed by group tags. When several matched values share a tag
    /// set, the one from the first group path (in path order) and then the
    /// first metric name wins.
    pub fn evaluate(&self, ctx: &EvalContext) -> ResultSet {
        let collection = ctx.view().current();
        let result = match &self.group {
            GroupSelector::Path(matcher) => match matcher.as_literal() {
                Some(path) => self.select(collection, std::iter::once(&path)),
                None => {
                    let paths = collection.group_paths().filter(|p| matcher.matches(p));
                    self.select(collection, paths)
                }
            },
            GroupSelector::Alias(name) => match ctx.group_alias(name) {
                Some(path) => self.select(collection, std::iter::once(path)),
                None => Vector::new(),
            },
        };
        ResultSet::Vector(result)
    }

    fn select<'a, I>(&self, collection: &'a Collection, paths: I) -> Vector
    where
        I: IntoIterator<Item = &'a SimplePath>,
    {
        let literal_metric = self.metric.as_literal();
        let mut result = Vector::new();
        for path in paths {
            let mut groups: Vec<&MetricGroup> = collection.groups_at(path).collect();
            groups.sort_by(|a, b| a.tags().cmp(b.tags()));
            for group in groups {
                match &literal_metric {
                    Some(name) => {
                        if let Some(value) = group.metric(name) {
                            result.insert(group.tags().clone(), value.clone());
                        }
                    }
                    None => {
                        let found = group
                            .metrics()
                            .find(|(name, _)| self.metric.matches(name));
                        if let Some((_, value)) = found {
                            result.insert(group.tags().clone(), value.clone());
                        }
                    }
                }
            }
        }
        result
    }

    /// An alias group followed by a metric path starting with `*`.
    pub fn is_alias_wildcard(&self) -> bool {
        matches!(self.group, GroupSelector::Alias(_))
            && matches!(self.metric.segments().first(), Some(MatchSegment::Wildcard))
    }

    pub fn config_string(&self) -> String {
        format!("{} {}", self.group.config_string(), self.metric.config_string())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.config_string())
    }
}
