use thiserror::Error;

use super::value::SettingKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown setting key: '{0}'")]
    UnknownKey(String),

    #[error("Setting '{key}' expected a {expected} value: {details}")]
    TypeMismatch {
        key: String,
        expected: SettingKind,
        details: String,
    },

    #[error("Failed to serialize value for setting '{key}': {details}")]
    Serialization { key: String, details: String },
}
