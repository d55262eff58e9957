//! Shared data types.

pub mod app_identifier;

pub use app_identifier::AppIdentifier;
