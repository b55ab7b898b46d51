//! Error types for applog operations.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for logging setup.
///
/// Both initialization failures ([`LogError::DirectoryCreation`] and
/// [`LogError::ConfigurationApplication`]) are fatal: there is no fallback
/// logging path, so callers are expected to abort startup.
#[derive(Error, Debug)]
pub enum LogError {
    /// The log directory could not be created
    #[error("Failed to create log directory {}: {source}", path.display())]
    DirectoryCreation {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be turned into a working subscriber
    #[error("Logging configuration error: {0}")]
    ConfigurationApplication(String),

    /// A severity, channel name or similar value failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal bug - should never happen in production
    #[error("Bug detected: {0}\n\nThis is an internal error. Please report this issue at:\nhttps://github.com/applog/applog/issues")]
    Bug(String),
}

/// A specialized Result type for applog operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Helper macro to create and return a LogError::Bug
///
/// This should be used for conditions that should never occur
/// in normal operation and indicate a bug in applog itself.
///
/// # Example
///
/// ```ignore
/// if some_impossible_condition {
///     bug!("This should never happen: {:?}", condition);
/// }
/// ```
#[macro_export]
macro_rules! bug {
    ($msg:expr) => {
        return Err($crate::LogError::Bug($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::Bug(format!($fmt, $($arg)*)))
    };
}

/// Helper macro to bail out with a LogError
///
/// Without a variant name the error is a configuration application failure.
///
/// # Example
///
/// ```ignore
/// if !known {
///     bail!(Validation, "Unknown severity: {}", text);
/// }
/// bail!("destination '{}' is not declared", name);
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::LogError::ConfigurationApplication($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::ConfigurationApplication(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_creation_display() {
        let err = LogError::DirectoryCreation {
            path: PathBuf::from("/nope/logs"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let text = err.to_string();
        assert!(text.contains("/nope/logs"));
        assert!(text.contains("denied"));
    }

    #[test]
    fn test_bail_defaults_to_configuration() {
        fn fails() -> Result<()> {
            bail!("destination '{}' is not declared", "file");
        }
        match fails() {
            Err(LogError::ConfigurationApplication(msg)) => {
                assert_eq!(msg, "destination 'file' is not declared")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
