use crate::common::maybe_quote_identifier;
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use crate::value::Value;
use smallvec::SmallVec;
use std::fmt;

type TagPairs = SmallVec<[(String, Value); 4]>;

/// An immutable set of `name → value` pairs, kept sorted by name.
///
/// Ordering is lexicographic over the sorted pairs; two sets are equal iff
/// their pairs are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tags {
    pairs: TagPairs,
}

impl Tags {
    /// Builds a tag set. Fails on empty or duplicate names and on empty or
    /// histogram values.
    pub fn new<I, K, V>(pairs: I) -> ExprResult<Tags>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut collected: TagPairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        for (name, value) in collected.iter() {
            if name.is_empty() {
                return Err(ExprError::InvalidTags(error_consts::EMPTY_TAG_NAME.to_string()));
            }
            if value.is_empty() || value.is_histogram() {
                return Err(ExprError::InvalidTags(format!(
                    "{}: {}",
                    error_consts::INVALID_TAG_VALUE,
                    name
                )));
            }
        }

        collected.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(dup) = collected.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(ExprError::InvalidTags(format!(
                "{}: {}",
                error_consts::DUPLICATE_TAG,
                dup[0].0
            )));
        }

        Ok(Tags { pairs: collected })
    }

    pub fn empty() -> Tags {
        Tags::default()
    }

    /// Pairs must already be sorted, unique and valid.
    fn from_sorted(pairs: TagPairs) -> Tags {
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0));
        Tags { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.pairs
            .binary_search_by(|(k, _)| k.as_str().cmp(name))
            .ok()
            .map(|idx| &self.pairs[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Keeps only tags for which `keep` returns true.
    pub fn retain_names<F>(&self, mut keep: F) -> Tags
    where
        F: FnMut(&str) -> bool,
    {
        Tags::from_sorted(
            self.pairs
                .iter()
                .filter(|(k, _)| keep(k))
                .cloned()
                .collect(),
        )
    }

    /// Tags present in both sets with identical values.
    pub fn common(&self, other: &Tags) -> Tags {
        Tags::from_sorted(
            self.pairs
                .iter()
                .filter(|(k, v)| other.get(k) == Some(v))
                .cloned()
                .collect(),
        )
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", maybe_quote_identifier(k), v)?;
        }
        write!(f, "}}")
    }
}
