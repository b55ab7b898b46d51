//! Logging system for applog.
//!
//! Routes records to a console stream and a size-rotated file, each with
//! its own threshold and line format, according to a [`LoggingConfig`].
//!
//! Initialization happens once, explicitly, at process entry:
//!
//! ```rust,no_run
//! use applog_core::log::{self, Logger};
//!
//! fn main() -> applog_types::Result<()> {
//!     let dir = log::init("/opt/myapp")?;
//!     Logger::root().info(format!("logging to {}", dir.display()));
//!     Ok(())
//! }
//! ```
//!
//! Applying a configuration a second time replaces the first one; it never
//! adds a second set of destinations.

use applog_types::{LoggingConfig, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::Registry;

use crate::config::{build_configuration, load_config};
use crate::state;
use crate::util::fs::{create_dir, ensure_log_directory, install_dir};

mod console;
mod format;
mod layer;
mod logger;
mod rotate;

pub use console::ConsoleSink;
pub use format::{Formatter, LogRecord};
pub use layer::RoutingLayer;
pub use logger::{Location, Logger};
pub use rotate::RotatingFileWriter;

/// Install `config` as the process-wide logging configuration.
///
/// Every formatter is parsed and every destination opened before global
/// state is touched, so a failure leaves the previous configuration (or
/// none) in place. Calling this again swaps the configuration in place.
///
/// # Errors
///
/// Returns [`applog_types::LogError::ConfigurationApplication`] when the
/// configuration is inconsistent, a file cannot be opened, or another
/// global subscriber was installed by someone else.
pub fn apply(config: &LoggingConfig) -> Result<()> {
    let layer = RoutingLayer::from_config(config)?;
    state::install(layer)
}

/// Create `<base>/logs`, build the built-in configuration for it and apply
/// it. Returns the log directory.
pub fn init(base: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = ensure_log_directory(base)?;
    apply(&build_configuration(&dir))?;
    Ok(dir)
}

/// [`init`] with the directory of the running executable as base.
pub fn init_default() -> Result<PathBuf> {
    init(install_dir()?)
}

/// Load a configuration file and apply it.
///
/// Parent directories of file destinations are created first.
pub fn init_from_config(path: impl AsRef<Path>) -> Result<LoggingConfig> {
    let config = load_config(path)?;
    for file in config.file_paths() {
        if let Some(parent) = file.parent() {
            create_dir(parent)?;
        }
    }
    apply(&config)?;
    Ok(config)
}

/// Build a subscriber for `config` without installing it.
///
/// Useful with `tracing::subscriber::with_default` for scoped setups.
pub fn build_subscriber(config: &LoggingConfig) -> Result<Layered<RoutingLayer, Registry>> {
    Ok(tracing_subscriber::registry().with(RoutingLayer::from_config(config)?))
}

/// Whether a configuration has been applied in this process.
pub fn is_configured() -> bool {
    state::State::global().lock().is_configured()
}
