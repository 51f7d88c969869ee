#[cfg(test)]
mod tests {
    use crate::collection::Collection;
    use crate::config::{get_global_settings, set_global_settings, WindowSettings};
    use crate::error::ExprError;
    use crate::lookback::LookBack;
    use crate::window::Window;
    use anyhow::Context;
    use chrono::{DateTime, Duration};
    use std::sync::Arc;

    fn at(minute: i64) -> Arc<Collection> {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        Arc::new(Collection::new(base + Duration::minutes(minute)))
    }

    fn minutes_of(window: &Window) -> Vec<i64> {
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let view = window.view();
        (0..view.len())
            .filter_map(|i| view.previous(i))
            .map(|c| (c.timestamp() - base).num_minutes())
            .collect()
    }

    fn fill(lookback: &LookBack, count: i64) -> Window {
        let mut window = Window::with_settings(at(0), WindowSettings::default());
        for m in 1..count {
            window.update(at(m), lookback).unwrap();
        }
        window
    }

    #[test]
    fn test_scrape_count_retention() {
        let window = fill(&LookBack::ScrapeCount(3), 11);
        assert_eq!(minutes_of(&window), vec![10, 9, 8, 7]);
    }

    #[test]
    fn test_interval_retention() -> anyhow::Result<()> {
        let lookback = LookBack::interval(Duration::minutes(5))?;
        let window = fill(&lookback, 11);
        assert_eq!(minutes_of(&window), vec![10, 9, 8, 7, 6, 5, 4]);

        let lookback = LookBack::interval(Duration::seconds(210))?;
        let window = fill(&lookback, 11);
        assert_eq!(minutes_of(&window), vec![10, 9, 8, 7, 6, 5]);

        let lookback = LookBack::ScrapeCount(2).and_then(LookBack::interval(Duration::minutes(5))?);
        let window = fill(&lookback, 11);
        assert_eq!(minutes_of(&window), vec![10, 9, 8, 7, 6, 5, 4, 3, 2]);
        Ok(())
    }

    #[test]
    fn test_empty_lookback_keeps_one_previous() {
        let window = fill(&LookBack::Empty, 5);
        assert_eq!(minutes_of(&window), vec![4, 3]);
    }

    #[test]
    fn test_max_retained_caps_history() {
        let settings = WindowSettings {
            max_retained: Some(2),
        };
        let mut window = Window::with_settings(at(0), settings);
        for m in 1..6 {
            window.update(at(m), &LookBack::ScrapeCount(10)).unwrap();
        }
        assert_eq!(minutes_of(&window), vec![5, 4, 3]);
    }

    #[test]
    fn test_global_settings_apply_to_new_windows() {
        let saved = get_global_settings();
        let mut settings = saved.clone();
        settings.window.max_retained = Some(3);
        set_global_settings(settings);

        let mut window = Window::new(at(0));
        for m in 1..6 {
            window.update(at(m), &LookBack::ScrapeCount(10)).unwrap();
        }
        let rebuilt = Window::from_history((0..6).map(at), &LookBack::ScrapeCount(10));
        set_global_settings(saved);

        assert_eq!(window.settings().max_retained, Some(3));
        assert_eq!(minutes_of(&window), vec![5, 4, 3, 2]);
        let rebuilt = rebuilt.unwrap();
        assert_eq!(rebuilt.settings().max_retained, Some(3));
        assert_eq!(minutes_of(&rebuilt), vec![5, 4, 3, 2]);
    }

    #[test]
    fn test_from_history_with_explicit_settings() {
        let settings = WindowSettings {
            max_retained: Some(1),
        };
        let window =
            Window::from_history_with_settings((0..4).map(at), &LookBack::ScrapeCount(10), settings).unwrap();
        assert_eq!(minutes_of(&window), vec![3, 2]);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut window = fill(&LookBack::ScrapeCount(2), 3);
        let err = window.update(at(2), &LookBack::Empty).unwrap_err();
        assert!(matches!(err, ExprError::WindowOrder { .. }));
        assert!(window.update(at(1), &LookBack::Empty).is_err());
        assert_eq!(minutes_of(&window), vec![2, 1, 0]);
    }

    #[test]
    fn test_from_history() {
        let history = vec![at(3), at(0), at(2), at(1), at(2)];
        let window = Window::from_history(history, &LookBack::ScrapeCount(1)).unwrap();
        assert_eq!(minutes_of(&window), vec![3, 2]);
        assert!(Window::from_history(Vec::<Arc<Collection>>::new(), &LookBack::Empty).is_none());
    }

    #[test]
    fn test_views() -> anyhow::Result<()> {
        let window = fill(&LookBack::ScrapeCount(10), 6);
        let view = window.view();
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert_eq!(view.collection_interval(), Some(Duration::minutes(1)));

        let back = view.previous_view(2).context("two scrapes back")?;
        assert_eq!(back.timestamp(), base + Duration::minutes(3));
        assert_eq!(back.len(), 4);
        assert!(view.previous_view(6).is_none());

        let at_90s = view.previous_at(Duration::seconds(90)).context("90s back")?;
        assert_eq!(at_90s.timestamp(), base + Duration::minutes(3));
        assert!(view.previous_view_at(Duration::minutes(6)).is_none());

        let since: Vec<_> = view
            .views_since(Duration::minutes(2))
            .iter()
            .map(|v| (v.timestamp() - base).num_minutes())
            .collect();
        assert_eq!(since, vec![3, 4, 5]);
        Ok(())
    }
}
