//! # applog core
//!
//! Process-wide logging setup: a console destination and a size-rotated
//! file destination, each with its own threshold and line format, routed
//! by named channels.
//!
//! This crate provides:
//!
//! - **Initialization**: log directory creation and one explicit apply call
//! - **Configuration**: the built-in layout plus YAML/JSON loading
//! - **Destinations**: console streams and a rotating file writer
//! - **Routing**: a `tracing_subscriber` layer applying channel and
//!   destination thresholds
//! - **Logger handles**: named loggers and macros capturing source location
//!
//! ## Example
//!
//! ```rust,no_run
//! use applog_core::log::{self, Logger};
//!
//! // Initialize logging under the install directory
//! let dir = log::init_default()?;
//!
//! let logger = Logger::get("my_module");
//! logger.info("started");
//! applog_core::error!(logger, "disk full on {}", dir.display());
//! # Ok::<(), applog_types::LogError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod log;
pub mod util;
pub mod state;
pub mod time;

// Re-export commonly used items
pub use config::build_configuration;
pub use log::{apply, init, init_default, Logger};
pub use applog_types::{LogError, LoggingConfig, Result, Severity};

/// applog version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
