//! Application identifier type.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the application owning a window, e.g. its WM class.
///
/// Smart workspace names are remembered per `AppIdentifier`. The value is any
/// non-blank string; surrounding whitespace is trimmed.
///
/// ```
/// # use spacebar_core::types::AppIdentifier;
/// # use spacebar_core::error::CoreError;
/// let app_id = AppIdentifier::new(" org.gnome.Nautilus ").unwrap();
/// assert_eq!(app_id.value(), "org.gnome.Nautilus");
///
/// assert!(matches!(AppIdentifier::new("  "), Err(CoreError::InvalidInput(_))));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AppIdentifier(String);

impl AppIdentifier {
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if the value is empty after trimming.
    pub fn new(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput(
                "AppIdentifier cannot be empty.".to_string(),
            ));
        }
        Ok(AppIdentifier(trimmed.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AppIdentifier> for String {
    fn from(app_id: AppIdentifier) -> Self {
        app_id.0
    }
}

impl AsRef<str> for AppIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(AppIdentifier: fmt::Debug, Clone, PartialEq, Eq, std::hash::Hash, Ord, Send, Sync, fmt::Display, AsRef<str>);

    #[test]
    fn app_identifier_new_valid() {
        assert_eq!(AppIdentifier::new("firefox").unwrap().value(), "firefox");
        assert_eq!(AppIdentifier::new("org.gnome.Terminal").unwrap().value(), "org.gnome.Terminal");
    }

    #[test]
    fn app_identifier_new_invalid_empty() {
        match AppIdentifier::new("") {
            Err(CoreError::InvalidInput(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn app_identifier_serde_is_transparent_string() {
        let app_id = AppIdentifier::new("editor").unwrap();
        assert_eq!(serde_json::to_string(&app_id).unwrap(), "\"editor\"");
    }
}
