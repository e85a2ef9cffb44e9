//! Runtime configuration.
//!
//! Values come from an optional YAML file and are then overridden by
//! `NAVSYNC_*` environment variables.

use std::time::Duration;

use navsync_navigation::application::command_handlers::{DEFAULT_SECTION_ID, SyncSettings};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_PATH_VAR: &str = "NAVSYNC_CONFIG";

const SETTLE_DELAY_VAR: &str = "NAVSYNC_SETTLE_DELAY_MS";
const DEFAULT_SECTION_VAR: &str = "NAVSYNC_DEFAULT_SECTION";
const READY_TIMEOUT_VAR: &str = "NAVSYNC_READY_TIMEOUT_MS";
const PLAYER_CALL_TIMEOUT_VAR: &str = "NAVSYNC_PLAYER_CALL_TIMEOUT_MS";
const TICK_INTERVAL_VAR: &str = "NAVSYNC_TICK_INTERVAL_MS";
const DEBUG_VAR: &str = "NAVSYNC_DEBUG";

/// Carousel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// How long playback ticks are ignored after a programmatic seek.
    pub settle_delay_ms: u64,
    /// Section shown for an empty fragment.
    pub default_section: String,
    /// How long startup waits for the player.
    pub ready_timeout_ms: u64,
    /// How long a single pause, seek or resume may take.
    pub player_call_timeout_ms: u64,
    /// Interval of the simulated player's time updates.
    pub tick_interval_ms: u64,
    /// Keeps the simulated player from ever starting playback.
    pub debug_mode: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 1000,
            default_section: DEFAULT_SECTION_ID.to_owned(),
            ready_timeout_ms: 10_000,
            player_call_timeout_ms: 5_000,
            tick_interval_ms: 250,
            debug_mode: false,
        }
    }
}

fn parse_millis(var: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim()
        .parse()
        .map_err(|e| AppError::Config(format!("{var} must be a number of milliseconds: {e}")))
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Config(format!(
            "{var} must be a boolean, got {other:?}"
        ))),
    }
}

impl NavConfig {
    /// Parses a YAML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ConfigFile` for malformed YAML or unknown keys and
    /// `AppError::Config` if a value is out of range.
    pub fn from_yaml(yaml: &str) -> Result<Self, AppError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `NAVSYNC_*` overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if an override cannot be parsed or the
    /// result is out of range.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        if let Some(raw) = lookup(SETTLE_DELAY_VAR) {
            self.settle_delay_ms = parse_millis(SETTLE_DELAY_VAR, &raw)?;
        }
        if let Some(raw) = lookup(DEFAULT_SECTION_VAR) {
            self.default_section = raw.trim().to_owned();
        }
        if let Some(raw) = lookup(READY_TIMEOUT_VAR) {
            self.ready_timeout_ms = parse_millis(READY_TIMEOUT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(PLAYER_CALL_TIMEOUT_VAR) {
            self.player_call_timeout_ms = parse_millis(PLAYER_CALL_TIMEOUT_VAR, &raw)?;
        }
        if let Some(raw) = lookup(TICK_INTERVAL_VAR) {
            self.tick_interval_ms = parse_millis(TICK_INTERVAL_VAR, &raw)?;
        }
        if let Some(raw) = lookup(DEBUG_VAR) {
            self.debug_mode = parse_flag(DEBUG_VAR, &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Loads the file named by `NAVSYNC_CONFIG` (if set), then applies the
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be read, and the errors of
    /// [`NavConfig::from_yaml`] and [`NavConfig::with_overrides`].
    pub fn from_env() -> Result<Self, AppError> {
        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_yaml(&std::fs::read_to_string(path)?)?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|var| std::env::var(var).ok())
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for an empty default section, a zero tick
    /// interval or a zero player call timeout.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_section.is_empty() {
            return Err(AppError::Config("default_section must not be empty".into()));
        }
        if self.player_call_timeout_ms == 0 {
            return Err(AppError::Config(
                "player_call_timeout_ms must be positive".into(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(AppError::Config("tick_interval_ms must be positive".into()));
        }
        Ok(())
    }

    /// The controller settings this configuration describes.
    #[must_use]
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            default_section: self.default_section.clone(),
            ready_timeout: Duration::from_millis(self.ready_timeout_ms),
            player_call_timeout: Duration::from_millis(self.player_call_timeout_ms),
        }
    }

    /// Interval between simulated playback ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_from_yaml_fills_missing_keys_with_defaults() {
        let config = NavConfig::from_yaml("settle_delay_ms: 500\n").unwrap();

        assert_eq!(config.settle_delay_ms, 500);
        assert_eq!(config.default_section, "intro");
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.player_call_timeout_ms, 5_000);
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_keys() {
        let result = NavConfig::from_yaml("settle_delay: 500\n");
        assert!(matches!(result, Err(AppError::ConfigFile(_))));
    }

    #[test]
    fn test_overrides_take_precedence() {
        // Arrange
        let lookup = env(&[
            ("NAVSYNC_SETTLE_DELAY_MS", "750"),
            ("NAVSYNC_DEFAULT_SECTION", "welcome"),
            ("NAVSYNC_DEBUG", "yes"),
        ]);

        // Act
        let config = NavConfig::default().with_overrides(lookup).unwrap();

        // Assert
        assert_eq!(config.settle_delay_ms, 750);
        assert_eq!(config.default_section, "welcome");
        assert!(config.debug_mode);
        assert_eq!(config.sync_settings().settle_delay, Duration::from_millis(750));
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let result = NavConfig::default().with_overrides(env(&[("NAVSYNC_READY_TIMEOUT_MS", "soon")]));
        match result {
            Err(AppError::Config(message)) => assert!(message.contains("NAVSYNC_READY_TIMEOUT_MS")),
            other => panic!("expected Config error, got {other:?}"),
        }

        let result = NavConfig::default().with_overrides(env(&[("NAVSYNC_DEBUG", "maybe")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_player_call_timeout_override_reaches_sync_settings() {
        let config = NavConfig::default()
            .with_overrides(env(&[("NAVSYNC_PLAYER_CALL_TIMEOUT_MS", "1500")]))
            .unwrap();

        assert_eq!(
            config.sync_settings().player_call_timeout,
            Duration::from_millis(1500)
        );

        let result = NavConfig::default()
            .with_overrides(env(&[("NAVSYNC_PLAYER_CALL_TIMEOUT_MS", "0")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_zero_tick_interval_is_rejected() {
        let result = NavConfig::default().with_overrides(env(&[("NAVSYNC_TICK_INTERVAL_MS", "0")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
