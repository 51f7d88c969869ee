use crate::error::ExprResult;
use serde::{Deserialize, Serialize};
use std::sync::{LazyLock, RwLock};

pub const DEFAULT_MAX_PARSE_DEPTH: usize = 128;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Hard upper bound on the number of retained previous collections, applied
    /// after the lookback policy. `None` leaves retention to the policy alone.
    pub max_retained: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Maximum nesting of parenthesised, unary or function call sub-expressions.
    pub max_depth: usize,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            max_depth: DEFAULT_MAX_PARSE_DEPTH,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub parser: ParserSettings,
}

impl Settings {
    pub fn from_json(json: &str) -> ExprResult<Settings> {
        let settings = serde_json::from_str(json)?;
        Ok(settings)
    }

    pub fn to_json(&self) -> ExprResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

static GLOBAL_SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

pub fn get_global_settings() -> Settings {
    match GLOBAL_SETTINGS.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

pub fn set_global_settings(settings: Settings) {
    let mut guard = match GLOBAL_SETTINGS.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    tracing::debug!(?settings, "installing global settings");
    *guard = settings;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.parser.max_depth, DEFAULT_MAX_PARSE_DEPTH);
        assert_eq!(settings.window.max_retained, None);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{"window": {"max_retained": 12}}"#).unwrap();
        assert_eq!(settings.window.max_retained, Some(12));
        assert_eq!(settings.parser.max_depth, DEFAULT_MAX_PARSE_DEPTH);
    }

    #[test]
    fn test_invalid_json() {
        let err = Settings::from_json(r#"{"window": {"max_retained": "lots"}}"#).unwrap_err();
        assert!(matches!(err, crate::error::ExprError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_json_roundtrip() -> anyhow::Result<()> {
        let mut settings = Settings::default();
        settings.parser.max_depth = 7;
        let json = settings.to_json()?;
        assert_eq!(Settings::from_json(&json)?, settings);
        Ok(())
    }
}
