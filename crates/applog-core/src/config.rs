//! Logging configuration: the built-in layout and file loading.
//!
//! The built-in layout has two formatters, two destinations and two
//! channels:
//!
//! | destination | writes to         | threshold | formatter  |
//! |-------------|-------------------|-----------|------------|
//! | `console`   | stdout            | DEBUG     | `standard` |
//! | `file`      | `<dir>/app.log`   | INFO      | `detailed` |
//!
//! Both the root channel (DEBUG) and `my_module` (INFO) route to both
//! destinations and do not propagate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use applog_core::config::{build_configuration, save_config};
//!
//! let config = build_configuration("/srv/app/logs");
//! save_config(&config, "/srv/app/logging.yml")?;
//! # Ok::<(), applog_types::LogError>(())
//! ```

use applog_types::config::UTF8;
use applog_types::{
    ChannelConfig, ChannelName, ConsoleStream, DestinationConfig, DestinationKind,
    FormatterConfig, LogError, LoggingConfig, Result, Severity,
};
use std::fs;
use std::path::Path;

/// Terse console format.
pub const STANDARD_FORMAT: &str = "{timestamp} - {logger_name} - {level} - {message}";

/// File format with source location.
pub const DETAILED_FORMAT: &str =
    "{timestamp} - {logger_name} - {level} - {filename}:{line} - {function}() - {message}";

/// File name of the rotating log inside the log directory.
pub const LOG_FILE_NAME: &str = "app.log";

/// Rotation threshold of the built-in file destination (5 MiB).
pub const MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Rotated backups kept by the built-in file destination.
pub const BACKUP_COUNT: u32 = 5;

/// Example of a module-scoped channel.
pub const MODULE_CHANNEL: &str = "my_module";

/// Build the built-in configuration with the log file inside `log_dir`.
///
/// Pure: nothing is created or opened.
pub fn build_configuration(log_dir: impl AsRef<Path>) -> LoggingConfig {
    let mut config = LoggingConfig::default();

    config
        .formatters
        .insert("standard".to_string(), FormatterConfig::new(STANDARD_FORMAT));
    config
        .formatters
        .insert("detailed".to_string(), FormatterConfig::new(DETAILED_FORMAT));

    config.destinations.insert(
        "console".to_string(),
        DestinationConfig {
            level: Severity::Debug,
            formatter: "standard".to_string(),
            kind: DestinationKind::Console { stream: ConsoleStream::Stdout },
        },
    );
    config.destinations.insert(
        "file".to_string(),
        DestinationConfig {
            level: Severity::Info,
            formatter: "detailed".to_string(),
            kind: DestinationKind::RotatingFile {
                path: log_dir.as_ref().join(LOG_FILE_NAME),
                max_bytes: MAX_BYTES,
                backup_count: BACKUP_COUNT,
                encoding: UTF8.to_string(),
            },
        },
    );

    let both = || vec!["console".to_string(), "file".to_string()];
    config.channels.insert(
        ChannelName::root(),
        ChannelConfig { destinations: both(), level: Severity::Debug, propagate: false },
    );
    config.channels.insert(
        ChannelName::from_static(MODULE_CHANNEL),
        ChannelConfig { destinations: both(), level: Severity::Info, propagate: false },
    );

    config
}

/// Load a configuration file. `.json` files are read as JSON, anything
/// else as YAML.
///
/// Relative file destination paths are resolved against the directory
/// containing the configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<LoggingConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        LogError::ConfigurationApplication(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config: LoggingConfig = if is_json(path) {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    if let Some(dir) = path.parent() {
        config.resolve_paths(dir);
    }

    Ok(config)
}

/// Save a configuration file, choosing the format like [`load_config`].
pub fn save_config(config: &LoggingConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = if is_json(path) {
        serde_json::to_string_pretty(config)?
    } else {
        serde_yaml::to_string(config)?
    };
    fs::write(path, text)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_configuration_formatters() {
        let config = build_configuration("/tmp/logs");
        assert_eq!(config.formatters["standard"].format, STANDARD_FORMAT);
        assert_eq!(config.formatters["detailed"].format, DETAILED_FORMAT);
    }

    #[test]
    fn test_build_configuration_destinations() {
        let config = build_configuration("/tmp/logs");

        let console = &config.destinations["console"];
        assert_eq!(console.level, Severity::Debug);
        assert_eq!(console.formatter, "standard");
        assert_eq!(console.kind, DestinationKind::Console { stream: ConsoleStream::Stdout });

        let file = &config.destinations["file"];
        assert_eq!(file.level, Severity::Info);
        assert_eq!(file.formatter, "detailed");
        assert_eq!(
            file.kind,
            DestinationKind::RotatingFile {
                path: PathBuf::from("/tmp/logs/app.log"),
                max_bytes: 5_242_880,
                backup_count: 5,
                encoding: "utf-8".to_string(),
            }
        );
    }

    #[test]
    fn test_build_configuration_channels() {
        let config = build_configuration("/tmp/logs");
        assert!(config.validate().is_ok());

        let root = &config.channels[&ChannelName::root()];
        assert_eq!(root.level, Severity::Debug);
        assert_eq!(root.destinations, vec!["console", "file"]);
        assert!(!root.propagate);

        let module = &config.channels[&ChannelName::new(MODULE_CHANNEL).unwrap()];
        assert_eq!(module.level, Severity::Info);
        assert_eq!(module.destinations, vec!["console", "file"]);
        assert!(!module.propagate);
    }

    #[test]
    fn test_save_and_load_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config = build_configuration(dir.path());
        let path = dir.path().join("logging.yml");

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_load_json_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logging.json");
        fs::write(
            &path,
            r#"{
                "formatters": {"plain": {"format": "{message}"}},
                "destinations": {
                    "file": {
                        "type": "rotating_file",
                        "level": "INFO",
                        "formatter": "plain",
                        "path": "out/app.log",
                        "max_bytes": 100,
                        "backup_count": 1
                    }
                },
                "channels": {"": {"destinations": ["file"], "level": "DEBUG"}}
            }"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.file_paths(), vec![dir.path().join("out/app.log").as_path()]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_config("/definitely/not/here.yml"),
            Err(LogError::ConfigurationApplication(_))
        ));
    }
}
