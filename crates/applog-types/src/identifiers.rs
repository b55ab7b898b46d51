//! Validated channel names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogError, Result};

/// A validated channel (logger) name.
///
/// The empty name is the root channel. Any other name is made of segments
/// separated by `.` or `::`:
/// - Segments must not be empty
/// - Segments must not contain whitespace or a lone `:`
///
/// # Example
///
/// ```
/// use applog_types::ChannelName;
///
/// let name = ChannelName::new("app.db.pool").unwrap();
/// assert_eq!(name.ancestors(), vec!["", "app", "app.db"]);
///
/// assert!(ChannelName::root().is_root());
/// assert!(ChannelName::new("app..db").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelName(String);

impl ChannelName {
    /// Name rendered for the root channel.
    pub const ROOT_DISPLAY: &'static str = "root";

    /// Create a new validated channel name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name doesn't meet validation requirements.
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        if !Self::is_valid(name) {
            return Err(LogError::Validation(format!(
                "Invalid channel name '{}': segments separated by '.' or '::' must be non-empty \
                and must not contain whitespace",
                name
            )));
        }
        Ok(Self(name.to_string()))
    }

    /// Channel name from a literal known to be valid.
    ///
    /// Validity is only checked in debug builds.
    pub fn from_static(name: &'static str) -> Self {
        debug_assert!(Self::is_valid(name), "invalid channel name literal: {:?}", name);
        Self(name.to_string())
    }

    /// The root channel.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Check if a name is valid without allocating.
    pub fn is_valid(name: &str) -> bool {
        if name.is_empty() {
            return true;
        }
        segments(name).all(|s| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == ':'))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root channel.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a record logged under `logger` belongs to this channel.
    ///
    /// True when the names are equal or `logger` continues this name at a
    /// segment boundary. The root channel matches every logger.
    pub fn matches(&self, logger: &str) -> bool {
        if self.is_root() {
            return true;
        }
        match logger.strip_prefix(self.0.as_str()) {
            Some("") => true,
            Some(rest) => rest.starts_with('.') || rest.starts_with("::"),
            None => false,
        }
    }

    /// Enclosing channel names, outermost first, starting with root.
    ///
    /// For example, "app.db.pool" returns ["", "app", "app.db"]
    pub fn ancestors(&self) -> Vec<String> {
        if self.is_root() {
            return Vec::new();
        }

        let mut ancestors = vec![String::new()];
        let mut end = 0;
        for (idx, _) in self.0.match_indices(|c: char| c == '.' || c == ':') {
            // "::" yields two matches; only the first one ends a segment
            if idx == end && idx > 0 {
                continue;
            }
            ancestors.push(self.0[..idx].to_string());
            end = idx + 1;
        }
        ancestors
    }

    /// Name rendered by `{logger_name}`.
    pub fn display_name(&self) -> &str {
        display_name(&self.0)
    }
}

/// Name rendered by `{logger_name}` for a raw logger name.
pub fn display_name(logger: &str) -> &str {
    if logger.is_empty() {
        ChannelName::ROOT_DISPLAY
    } else {
        logger
    }
}

fn segments(name: &str) -> impl Iterator<Item = &str> {
    name.split("::").flat_map(|part| part.split('.'))
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ChannelName {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ChannelName {
    type Error = LogError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ChannelName> for String {
    fn from(name: ChannelName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_validation() {
        assert!(ChannelName::new("").is_ok());
        assert!(ChannelName::new("my_module").is_ok());
        assert!(ChannelName::new("app.db").is_ok());
        assert!(ChannelName::new("my_crate::db").is_ok());

        assert!(ChannelName::new(".app").is_err());
        assert!(ChannelName::new("app.").is_err());
        assert!(ChannelName::new("app..db").is_err());
        assert!(ChannelName::new("my crate").is_err());
        assert!(ChannelName::new("a:::b").is_err());
    }

    #[test]
    fn test_channel_matching() {
        let channel = ChannelName::new("my_module").unwrap();
        assert!(channel.matches("my_module"));
        assert!(channel.matches("my_module.sub"));
        assert!(channel.matches("my_module::sub"));
        assert!(!channel.matches("my_module2"));
        assert!(!channel.matches("other"));
        assert!(!channel.matches(""));

        assert!(ChannelName::root().matches("anything::at::all"));
        assert!(ChannelName::root().matches(""));
    }

    #[test]
    fn test_channel_ancestors() {
        let name = ChannelName::new("app.db.pool").unwrap();
        assert_eq!(name.ancestors(), vec!["", "app", "app.db"]);

        let name = ChannelName::new("my_crate::net::tcp").unwrap();
        assert_eq!(name.ancestors(), vec!["", "my_crate", "my_crate::net"]);

        assert_eq!(ChannelName::new("solo").unwrap().ancestors(), vec![""]);
        assert!(ChannelName::root().ancestors().is_empty());
    }

    #[test]
    fn test_root_display() {
        assert_eq!(ChannelName::root().to_string(), "root");
        assert_eq!(ChannelName::new("my_module").unwrap().to_string(), "my_module");
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        assert!(serde_yaml::from_str::<ChannelName>("\"a..b\"").is_err());
        let name: ChannelName = serde_yaml::from_str("my_module").unwrap();
        assert_eq!(name.as_str(), "my_module");
    }
}
