//! Default configuration values for spacebar.
//!
//! These functions back the `#[serde(default = "...")]` attributes of the
//! configuration structures.

use crate::config::{BarConfig, LoggingConfig};
use std::path::PathBuf;

/// Returns the default `LoggingConfig`.
pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// Returns the default log level string (`"info"`).
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// Returns the default log file path (`None`, file logging disabled).
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// Returns the default log format string (`"text"`).
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

/// Returns the default `BarConfig`.
pub(super) fn default_bar_config() -> BarConfig {
    BarConfig {
        max_click_time_delta_ms: default_max_click_time_delta_ms(),
        update_delay_ms: default_update_delay_ms(),
        smart_names_delay_ms: default_smart_names_delay_ms(),
    }
}

/// Maximum time between button press and release that still counts as a click.
pub(super) fn default_max_click_time_delta_ms() -> u32 {
    300
}

/// Structural updates flush on the next scheduler turn.
pub(super) fn default_update_delay_ms() -> u64 {
    0
}

pub(super) fn default_smart_names_delay_ms() -> u64 {
    0
}
