//! Configuration Management for spacebar.
//!
//! - [`types`]: the configuration schema ([`CoreConfig`], [`LoggingConfig`], [`BarConfig`]).
//! - [`defaults`]: default values used by `serde` when fields are missing.
//! - [`loader`]: [`ConfigLoader`], which reads, parses and validates `config.toml`.

pub mod types;
mod defaults;
pub mod loader;

pub use types::{BarConfig, CoreConfig, LoggingConfig};
pub use loader::ConfigLoader;
