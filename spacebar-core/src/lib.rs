//! # Spacebar Core Library (`spacebar-core`)
//!
//! Foundation shared by the spacebar crates:
//!
//! - **Error Handling**: [`CoreError`] and the more specific [`ConfigError`] and
//!   [`LoggingError`].
//! - **Configuration**: TOML loading and validation through [`ConfigLoader`],
//!   producing a [`CoreConfig`] with logging and bar timing sections.
//! - **Logging**: `tracing` subscriber setup ([`init_logging`], [`init_minimal_logging`]).
//! - **Event utilities**: [`DebouncingNotifier`] for coalescing change signals and
//!   [`Disposer`]/[`DisposerList`] for scoped subscriptions.
//!
//! ```rust,ignore
//! use spacebar_core::{ConfigLoader, init_logging, CoreError};
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging)?;
//!     tracing::info!("spacebar core initialized");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

pub use config::{BarConfig, ConfigLoader, CoreConfig, LoggingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
pub use types::AppIdentifier;
pub use utils::{DebouncingNotifier, Disposer, DisposerList};
