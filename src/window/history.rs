use super::WindowView;
use crate::collection::Collection;
use crate::config::{get_global_settings, WindowSettings};
use crate::error::{ExprError, ExprResult};
use crate::error_consts;
use crate::lookback::LookBack;
use std::sync::Arc;

/// The current collection plus the history an expression still needs,
/// ordered by strictly decreasing timestamp.
#[derive(Debug, Clone)]
pub struct Window {
    collections: Vec<Arc<Collection>>,
    settings: WindowSettings,
}

impl Window {
    /// A window over `current` alone, using the globally configured window
    /// settings.
    pub fn new(current: Arc<Collection>) -> Self {
        Window::with_settings(current, get_global_settings().window)
    }

    pub fn with_settings(current: Arc<Collection>, settings: WindowSettings) -> Self {
        Window {
            collections: vec![current],
            settings,
        }
    }

    /// Builds a window from arbitrary history, retaining what `lookback`
    /// requires behind the newest collection. Returns `None` for an empty
    /// history.
    pub fn from_history<I>(collections: I, lookback: &LookBack) -> Option<Window>
    where
        I: IntoIterator<Item = Arc<Collection>>,
    {
        Window::from_history_with_settings(collections, lookback, get_global_settings().window)
    }

    pub fn from_history_with_settings<I>(
        collections: I,
        lookback: &LookBack,
        settings: WindowSettings,
    ) -> Option<Window>
    where
        I: IntoIterator<Item = Arc<Collection>>,
    {
        let mut sorted: Vec<Arc<Collection>> = collections.into_iter().collect();
        sorted.sort_by_key(|c| std::cmp::Reverse(c.timestamp()));
        sorted.dedup_by_key(|c| c.timestamp());
        if sorted.is_empty() {
            return None;
        }
        let current = sorted.remove(0);
        let mut window = Window::with_settings(current, settings);
        window.retain_history(sorted, lookback);
        Some(window)
    }

    pub fn current(&self) -> &Arc<Collection> {
        &self.collections[0]
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn settings(&self) -> &WindowSettings {
        &self.settings
    }

    pub fn view(&self) -> WindowView<'_> {
        WindowView::new(&self.collections)
    }

    /// Makes `next` the current collection, keeping the history `lookback`
    /// requires. `next` must be strictly newer than the current collection.
    pub fn update(&mut self, next: Arc<Collection>, lookback: &LookBack) -> ExprResult<()> {
        let current = self.current().timestamp();
        let offered = next.timestamp();
        if offered <= current {
            tracing::error!(
                %current,
                %offered,
                retained = self.collections.len(),
                "rejecting out of order collection"
            );
            return Err(ExprError::WindowOrder {
                msg: error_consts::WINDOW_ORDER,
                current,
                offered,
            });
        }

        let history = std::mem::take(&mut self.collections);
        self.collections.push(next);
        self.retain_history(history, lookback);

        tracing::debug!(
            current = %offered,
            retained = self.collections.len() - 1,
            hint = %crate::common::format_duration(lookback.hint_duration()),
            "window updated"
        );
        Ok(())
    }

    /// Appends the part of `history` (newest first) selected by `lookback`
    /// behind the current collection.
    fn retain_history(&mut self, history: Vec<Arc<Collection>>, lookback: &LookBack) {
        let fallback = history.first().cloned();
        let mut kept: Vec<Arc<Collection>> = lookback.filter(&history).to_vec();

        kept.sort_by_key(|c| std::cmp::Reverse(c.timestamp()));
        kept.dedup_by_key(|c| c.timestamp());
        if kept.is_empty() {
            kept.extend(fallback);
        }
        if let Some(max) = self.settings.max_retained {
            kept.truncate(max.max(1));
        }

        self.collections.extend(kept);
        debug_assert!(
            self.collections
                .windows(2)
                .all(|w| w[0].timestamp() > w[1].timestamp()),
            "window must be ordered newest first"
        );
    }
}
