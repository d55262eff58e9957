//! Errors surfaced by the spacebar domain layer.

use spacebar_core::CoreError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}
