//! Configuration types and structures.
//!
//! A [`LoggingConfig`] is three ordered tables: formatters, destinations and
//! channels. Destinations refer to formatters by name and channels refer to
//! destinations by name; [`LoggingConfig::validate`] checks those references.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::enums::{ConsoleStream, Severity};
use crate::errors::{LogError, Result};
use crate::identifiers::ChannelName;

/// The only text encoding a file destination can be built with.
pub const UTF8: &str = "utf-8";

/// Formatter definition: a line template with `{field}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatterConfig {
    /// Line template, e.g. `{timestamp} - {level} - {message}`
    pub format: String,
}

impl FormatterConfig {
    /// Create a formatter definition from a template.
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }
}

/// Where a destination writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationKind {
    /// A standard stream of the process
    Console {
        /// Stream to write to
        #[serde(default)]
        stream: ConsoleStream,
    },
    /// A size-rotated file
    RotatingFile {
        /// Current log file; backups are `<path>.1` .. `<path>.<backup_count>`
        path: PathBuf,
        /// Size at which the file is rotated, 0 disables rotation
        max_bytes: u64,
        /// Number of rotated backups kept
        backup_count: u32,
        /// Text encoding of the file
        #[serde(default = "default_encoding")]
        encoding: String,
    },
}

fn default_encoding() -> String {
    UTF8.to_string()
}

/// Destination definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Minimum severity this destination renders
    pub level: Severity,
    /// Name of the formatter used to render records
    pub formatter: String,
    /// Sink type and its settings
    #[serde(flatten)]
    pub kind: DestinationKind,
}

/// Channel definition: routing for one logger name and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Destinations receiving this channel's records
    #[serde(default)]
    pub destinations: Vec<String>,
    /// Minimum severity accepted by this channel
    pub level: Severity,
    /// Whether records also flow to the closest configured ancestor channel
    #[serde(default)]
    pub propagate: bool,
}

/// Complete logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Formatters by name
    #[serde(default)]
    pub formatters: IndexMap<String, FormatterConfig>,
    /// Destinations by name
    #[serde(default)]
    pub destinations: IndexMap<String, DestinationConfig>,
    /// Channels by name; the empty name is the root channel
    #[serde(default)]
    pub channels: IndexMap<ChannelName, ChannelConfig>,
}

impl LoggingConfig {
    /// Check that every reference in the configuration resolves.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ConfigurationApplication`] naming the first
    /// dangling reference or unsupported setting.
    pub fn validate(&self) -> Result<()> {
        for (name, destination) in &self.destinations {
            if !self.formatters.contains_key(&destination.formatter) {
                return Err(LogError::ConfigurationApplication(format!(
                    "destination '{}' references unknown formatter '{}'",
                    name, destination.formatter
                )));
            }
            if let DestinationKind::RotatingFile { encoding, path, .. } = &destination.kind {
                if !is_utf8(encoding) {
                    return Err(LogError::ConfigurationApplication(format!(
                        "destination '{}' uses unsupported encoding '{}'",
                        name, encoding
                    )));
                }
                if path.as_os_str().is_empty() {
                    return Err(LogError::ConfigurationApplication(format!(
                        "destination '{}' has an empty file path",
                        name
                    )));
                }
            }
        }

        for (channel, config) in &self.channels {
            for destination in &config.destinations {
                if !self.destinations.contains_key(destination) {
                    return Err(LogError::ConfigurationApplication(format!(
                        "channel '{}' references unknown destination '{}'",
                        channel, destination
                    )));
                }
            }
        }

        Ok(())
    }

    /// Rewrite relative file destination paths to live under `base`.
    pub fn resolve_paths(&mut self, base: impl AsRef<Path>) {
        let base = base.as_ref();
        for destination in self.destinations.values_mut() {
            if let DestinationKind::RotatingFile { path, .. } = &mut destination.kind {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
    }

    /// Paths of every file destination, in declaration order.
    pub fn file_paths(&self) -> Vec<&Path> {
        self.destinations
            .values()
            .filter_map(|d| match &d.kind {
                DestinationKind::RotatingFile { path, .. } => Some(path.as_path()),
                DestinationKind::Console { .. } => None,
            })
            .collect()
    }
}

fn is_utf8(encoding: &str) -> bool {
    matches!(encoding.to_ascii_lowercase().as_str(), "utf-8" | "utf8")
}
