//! Error handling for the spacebar UI layer.

use spacebar_core::CoreError;
use spacebar_domain::DomainError;
use thiserror::Error;

/// UI error type.
#[derive(Error, Debug)]
pub enum UiError {
    /// Settings or workspace engine failure.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Configuration or logging failure.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
