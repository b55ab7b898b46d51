//! Common enumerations used throughout applog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogError, Result};

/// Record severity, ordered from least to most severe.
///
/// Every threshold in a configuration is a `Severity`: a record passes a
/// threshold when its severity is greater than or equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Diagnostic detail
    Debug,
    /// Informational messages
    Info,
    /// Something unexpected that did not stop the operation
    Warning,
    /// An operation failed
    Error,
    /// The process may not be able to continue
    Critical,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// Upper-case name as rendered by `{level}`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(Severity::Debug),
            "INFO" => Ok(Severity::Info),
            "WARN" | "WARNING" => Ok(Severity::Warning),
            "ERROR" => Ok(Severity::Error),
            "CRITICAL" | "FATAL" => Ok(Severity::Critical),
            _ => crate::bail!(Validation, "Invalid severity: {}", s),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard stream written by a console destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    /// Process standard output
    #[default]
    Stdout,
    /// Process standard error
    Stderr,
}

impl fmt::Display for ConsoleStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleStream::Stdout => write!(f, "stdout"),
            ConsoleStream::Stderr => write!(f, "stderr"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Critical);

        let mut shuffled = vec![Severity::Error, Severity::Debug, Severity::Critical, Severity::Info];
        shuffled.sort();
        assert_eq!(shuffled.first(), Some(&Severity::Debug));
        assert_eq!(shuffled.last(), Some(&Severity::Critical));
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("debug".parse::<Severity>().unwrap(), Severity::Debug);
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!(" warning ".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("fatal".parse::<Severity>().unwrap(), Severity::Critical);
        assert!("verbose".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_display_round_trips() {
        for severity in Severity::ALL {
            assert_eq!(severity.to_string().parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_severity_serde_uppercase() {
        let yaml = serde_yaml::to_string(&Severity::Warning).unwrap();
        assert_eq!(yaml.trim(), "WARNING");
        let parsed: ConsoleStream = serde_yaml::from_str("stderr").unwrap();
        assert_eq!(parsed, ConsoleStream::Stderr);
    }
}
