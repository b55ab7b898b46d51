//! # applog types
//!
//! Core types shared across the applog crates.
//!
//! This crate provides the building blocks of the logging configuration:
//!
//! - [`Severity`], the ordered record severity used for every threshold
//! - [`ChannelName`], a validated logger/channel name with ancestry helpers
//! - The configuration data model ([`LoggingConfig`] and its parts)
//! - The [`RecordSink`] trait implemented by every destination
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```
//! use applog_types::{ChannelName, Severity};
//!
//! let channel = ChannelName::new("my_module").unwrap();
//! assert!(channel.matches("my_module.db"));
//! assert!(!channel.matches("my_modules"));
//!
//! assert!(Severity::Debug < Severity::Critical);
//! assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod identifiers;
pub mod enums;
pub mod traits;
pub mod config;

// Re-export common types for convenience
pub use errors::{LogError, Result};
pub use identifiers::ChannelName;
pub use enums::{ConsoleStream, Severity};
pub use traits::RecordSink;
pub use config::{ChannelConfig, DestinationConfig, DestinationKind, FormatterConfig, LoggingConfig};
