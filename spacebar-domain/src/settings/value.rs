//! Typed values stored in a [`SettingsStore`](super::SettingsStore).
//!
//! The store itself only knows booleans, strings and string arrays. JSON
//! objects are persisted as strings and decoded through [`Json`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

/// A raw persisted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Boolean(bool),
    String(String),
    StringArray(Vec<String>),
}

impl SettingValue {
    pub fn kind_name(&self) -> &'static str {
        match self {
            SettingValue::Boolean(_) => "boolean",
            SettingValue::String(_) => "string",
            SettingValue::StringArray(_) => "string-array",
        }
    }

    /// Whether both values use the same storage representation.
    pub fn same_representation(&self, other: &SettingValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// The type a reactive setting is declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKind {
    Boolean,
    String,
    StringArray,
    JsonObject,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Boolean => "boolean",
            SettingKind::String => "string",
            SettingKind::StringArray => "string-array",
            SettingKind::JsonObject => "json-object",
        };
        f.write_str(name)
    }
}

/// Conversion between a Rust type and its persisted [`SettingValue`].
pub trait SettingType: Clone + Send + Sync + 'static {
    const KIND: SettingKind;

    fn from_setting(value: &SettingValue) -> Result<Self, String>;

    fn to_setting(&self) -> Result<SettingValue, String>;
}

fn unexpected(value: &SettingValue) -> String {
    format!("found a {} value", value.kind_name())
}

impl SettingType for bool {
    const KIND: SettingKind = SettingKind::Boolean;

    fn from_setting(value: &SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::Boolean(b) => Ok(*b),
            other => Err(unexpected(other)),
        }
    }

    fn to_setting(&self) -> Result<SettingValue, String> {
        Ok(SettingValue::Boolean(*self))
    }
}

impl SettingType for String {
    const KIND: SettingKind = SettingKind::String;

    fn from_setting(value: &SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::String(s) => Ok(s.clone()),
            other => Err(unexpected(other)),
        }
    }

    fn to_setting(&self) -> Result<SettingValue, String> {
        Ok(SettingValue::String(self.clone()))
    }
}

impl SettingType for Vec<String> {
    const KIND: SettingKind = SettingKind::StringArray;

    fn from_setting(value: &SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::StringArray(values) => Ok(values.clone()),
            other => Err(unexpected(other)),
        }
    }

    fn to_setting(&self) -> Result<SettingValue, String> {
        Ok(SettingValue::StringArray(self.clone()))
    }
}

/// A JSON object persisted as a string setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> SettingType for Json<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    const KIND: SettingKind = SettingKind::JsonObject;

    fn from_setting(value: &SettingValue) -> Result<Self, String> {
        match value {
            SettingValue::String(raw) => serde_json::from_str(raw)
                .map(Json)
                .map_err(|e| format!("invalid JSON: {}", e)),
            other => Err(unexpected(other)),
        }
    }

    fn to_setting(&self) -> Result<SettingValue, String> {
        serde_json::to_string(&self.0)
            .map(SettingValue::String)
            .map_err(|e| e.to_string())
    }
}
