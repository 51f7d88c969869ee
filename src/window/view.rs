use crate::collection::Collection;
use crate::common::types::Timestamp;
use chrono::Duration;
use std::sync::Arc;

/// A read-only position in a window: the current collection and everything
/// older than it, newest first.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    collections: &'a [Arc<Collection>],
}

impl<'a> WindowView<'a> {
    /// `collections` must be non-empty and ordered newest first.
    pub(crate) fn new(collections: &'a [Arc<Collection>]) -> Self {
        debug_assert!(!collections.is_empty());
        WindowView { collections }
    }

    pub fn current(&self) -> &'a Collection {
        &self.collections[0]
    }

    pub fn timestamp(&self) -> Timestamp {
        self.current().timestamp()
    }

    /// Number of collections visible from this view, including the current one.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// The collection `n` scrapes back; `previous(0)` is the current one.
    pub fn previous(&self, n: usize) -> Option<&'a Collection> {
        self.collections.get(n).map(Arc::as_ref)
    }

    /// The newest collection at or before `current - d`.
    pub fn previous_at(&self, d: Duration) -> Option<&'a Collection> {
        self.index_at(d).map(|i| self.collections[i].as_ref())
    }

    /// This view shifted `n` scrapes into the past.
    pub fn previous_view(&self, n: usize) -> Option<WindowView<'a>> {
        if n < self.collections.len() {
            Some(WindowView::new(&self.collections[n..]))
        } else {
            None
        }
    }

    /// This view shifted back to the newest collection at or before
    /// `current - d`.
    pub fn previous_view_at(&self, d: Duration) -> Option<WindowView<'a>> {
        self.index_at(d).map(|i| WindowView::new(&self.collections[i..]))
    }

    /// Every view whose current collection lies within `d` of this one,
    /// oldest first and ending with this view.
    pub fn views_since(&self, d: Duration) -> Vec<WindowView<'a>> {
        let boundary = self.timestamp() - d;
        let count = self
            .collections
            .iter()
            .take_while(|c| c.timestamp() >= boundary)
            .count();
        (0..count)
            .rev()
            .map(|i| WindowView::new(&self.collections[i..]))
            .collect()
    }

    /// Time between the current and the previous collection.
    pub fn collection_interval(&self) -> Option<Duration> {
        let previous = self.previous(1)?;
        Some(self.timestamp() - previous.timestamp())
    }

    fn index_at(&self, d: Duration) -> Option<usize> {
        let boundary = self.timestamp() - d;
        self.collections
            .iter()
            .position(|c| c.timestamp() <= boundary)
    }
}
