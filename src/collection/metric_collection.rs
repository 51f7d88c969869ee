use crate::common::types::{Timestamp, Timestamped};
use crate::tags::{GroupKey, SimplePath, Tags};
use crate::value::Value;
use ahash::AHashMap;
use std::collections::BTreeMap;

/// The metrics of one group at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricGroup {
    key: GroupKey,
    metrics: BTreeMap<SimplePath, Value>,
}

impl MetricGroup {
    pub fn new(key: GroupKey) -> Self {
        MetricGroup {
            key,
            metrics: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn tags(&self) -> &Tags {
        &self.key.tags
    }

    pub fn metric(&self, name: &SimplePath) -> Option<&Value> {
        self.metrics.get(name)
    }

    /// Metrics in name order.
    pub fn metrics(&self) -> impl Iterator<Item = (&SimplePath, &Value)> {
        self.metrics.iter()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

/// A snapshot of every scraped group at one timestamp.
///
/// Groups are indexed by path (in path order) and then by tags.
#[derive(Debug, Clone)]
pub struct Collection {
    timestamp: Timestamp,
    groups: BTreeMap<SimplePath, AHashMap<Tags, MetricGroup>>,
}

impl Collection {
    pub fn new(timestamp: Timestamp) -> Self {
        Collection {
            timestamp,
            groups: BTreeMap::new(),
        }
    }

    pub fn builder(timestamp: Timestamp) -> CollectionBuilder {
        CollectionBuilder::new(timestamp)
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn group_paths(&self) -> impl Iterator<Item = &SimplePath> {
        self.groups.keys()
    }

    /// All groups sharing `path`, in unspecified order.
    pub fn groups_at<'a>(&'a self, path: &SimplePath) -> impl Iterator<Item = &'a MetricGroup> + 'a {
        self.groups.get(path).into_iter().flat_map(|by_tags| by_tags.values())
    }

    pub fn groups(&self) -> impl Iterator<Item = &MetricGroup> {
        self.groups.values().flat_map(|by_tags| by_tags.values())
    }

    pub fn group(&self, key: &GroupKey) -> Option<&MetricGroup> {
        self.groups.get(&key.path).and_then(|by_tags| by_tags.get(&key.tags))
    }

    pub fn metric(&self, key: &GroupKey, name: &SimplePath) -> Option<&Value> {
        self.group(key).and_then(|g| g.metric(name))
    }

    pub fn group_count(&self) -> usize {
        self.groups.values().map(|by_tags| by_tags.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Timestamped for Collection {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.groups == other.groups
    }
}

pub struct CollectionBuilder {
    collection: Collection,
}

impl CollectionBuilder {
    pub fn new(timestamp: Timestamp) -> Self {
        CollectionBuilder {
            collection: Collection::new(timestamp),
        }
    }

    /// Records `value` for `metric` in group `key`, replacing any previous value.
    pub fn insert(&mut self, key: &GroupKey, metric: SimplePath, value: Value) -> &mut Self {
        let group = self
            .collection
            .groups
            .entry(key.path.clone())
            .or_default()
            .entry(key.tags.clone())
            .or_insert_with(|| MetricGroup::new(key.clone()));
        group.metrics.insert(metric, value);
        self
    }

    pub fn add(mut self, key: &GroupKey, metric: SimplePath, value: impl Into<Value>) -> Self {
        self.insert(key, metric, value.into());
        self
    }

    pub fn build(self) -> Collection {
        self.collection
    }
}
