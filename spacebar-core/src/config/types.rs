//! Configuration Data Structures for spacebar.
//!
//! # Key Structs
//! - [`CoreConfig`]: The root configuration structure.
//! - [`LoggingConfig`]: Configuration of the logging subsystem.
//! - [`BarConfig`]: Timing parameters of the workspace bar.
//!
//! Missing fields fall back to the functions in [`super::defaults`]; unknown
//! fields are rejected via `#[serde(deny_unknown_fields)]`.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use super::defaults;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use spacebar_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/spacebar.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/spacebar.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level to record: "trace", "debug", "info", "warn" or "error".
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Timing parameters for the workspace bar and the workspace state engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BarConfig {
    /// A primary-button release within this many milliseconds of the press
    /// activates the workspace.
    #[serde(default = "defaults::default_max_click_time_delta_ms")]
    pub max_click_time_delta_ms: u32,
    /// Delay before a coalesced workspace update is delivered to listeners.
    #[serde(default = "defaults::default_update_delay_ms")]
    pub update_delay_ms: u64,
    /// Delay before smart workspace names are settled after window changes.
    #[serde(default = "defaults::default_smart_names_delay_ms")]
    pub smart_names_delay_ms: u64,
}

impl BarConfig {
    pub fn update_delay(&self) -> Duration {
        Duration::from_millis(self.update_delay_ms)
    }

    pub fn smart_names_delay(&self) -> Duration {
        Duration::from_millis(self.smart_names_delay_ms)
    }
}

impl Default for BarConfig {
    fn default() -> Self {
        defaults::default_bar_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use spacebar_core::config::CoreConfig;
///
/// let toml_str = r#"
/// [logging]
/// level = "warn"
///
/// [bar]
/// max_click_time_delta_ms = 250
/// "#;
/// let config: CoreConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(config.logging.level, "warn");
/// assert_eq!(config.bar.max_click_time_delta_ms, 250);
/// assert_eq!(config.bar.update_delay_ms, 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_bar_config")]
    pub bar: BarConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default_values() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.file_path, None);
        assert_eq!(config.format, "text");
    }

    #[test]
    fn test_bar_config_default_values() {
        let config = BarConfig::default();
        assert_eq!(config.max_click_time_delta_ms, 300);
        assert_eq!(config.update_delay(), Duration::ZERO);
        assert_eq!(config.smart_names_delay(), Duration::ZERO);
    }

    #[test]
    fn test_core_config_deserialize_empty() {
        let config: CoreConfig = toml::from_str("").unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn test_bar_config_deserialize_partial() {
        let json = r#"{"smart_names_delay_ms": 150}"#;
        let config: BarConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.smart_names_delay(), Duration::from_millis(150));
        assert_eq!(config.max_click_time_delta_ms, 300);
    }

    #[test]
    fn test_core_config_rejects_unknown_field() {
        let result = toml::from_str::<CoreConfig>("[bar]\nclick_ms = 3\n");
        assert!(result.is_err());
    }
}
