//! Line templates and the record they render.

use applog_types::identifiers::display_name;
use applog_types::{LogError, Result, Severity};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsStr;
use std::fmt::Write;
use std::path::Path;

use crate::time::format_timestamp;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("placeholder pattern compiles"));

/// Rendered in place of a source location field that is not known.
const UNKNOWN: &str = "?";

/// One log record, as seen by formatters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the record was emitted
    pub timestamp: DateTime<Local>,
    /// Logger (channel) name; empty for root
    pub logger: String,
    /// Record severity
    pub severity: Severity,
    /// Message text, including any extra fields
    pub message: String,
    /// Source file path
    pub file: Option<String>,
    /// Source line
    pub line: Option<u32>,
    /// Enclosing function
    pub function: Option<String>,
}

impl LogRecord {
    /// Record stamped with the current time and no source location.
    pub fn new(logger: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: crate::time::now(),
            logger: logger.into(),
            severity,
            message: message.into(),
            file: None,
            line: None,
            function: None,
        }
    }

    /// Base name of the source file.
    pub fn filename(&self) -> Option<&str> {
        self.file.as_deref().map(|file| {
            Path::new(file)
                .file_name()
                .and_then(OsStr::to_str)
                .unwrap_or(file)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Timestamp,
    LoggerName,
    Level,
    Message,
    Filename,
    Line,
    Function,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "timestamp" => Field::Timestamp,
            "logger_name" => Field::LoggerName,
            "level" => Field::Level,
            "message" => Field::Message,
            "filename" => Field::Filename,
            "line" => Field::Line,
            "function" => Field::Function,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed line template.
///
/// # Example
///
/// ```
/// use applog_core::log::{Formatter, LogRecord};
/// use applog_types::Severity;
///
/// let formatter = Formatter::parse("{logger_name} - {level} - {message}").unwrap();
/// let record = LogRecord::new("", Severity::Error, "disk full");
/// assert_eq!(formatter.render(&record), "root - ERROR - disk full");
///
/// assert!(Formatter::parse("{hostname} {message}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
    segments: Vec<Segment>,
}

impl Formatter {
    /// Parse a template.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::ConfigurationApplication`] for a placeholder that
    /// names no record field.
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut last = 0;

        for captures in PLACEHOLDER.captures_iter(template) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let field = Field::parse(name.as_str()).ok_or_else(|| {
                LogError::ConfigurationApplication(format!(
                    "unknown field '{}' in format '{}'",
                    name.as_str(),
                    template
                ))
            })?;

            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_string()));
            }
            segments.push(Segment::Field(field));
            last = whole.end();
        }

        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Ok(Self {
            template: template.to_string(),
            segments,
        })
    }

    /// The template this formatter was parsed from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render one record as a single line (no trailing newline).
    pub fn render(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(self.template.len() + record.message.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::Timestamp) => out.push_str(&format_timestamp(&record.timestamp)),
                Segment::Field(Field::LoggerName) => out.push_str(display_name(&record.logger)),
                Segment::Field(Field::Level) => out.push_str(record.severity.as_str()),
                Segment::Field(Field::Message) => out.push_str(&record.message),
                Segment::Field(Field::Filename) => out.push_str(record.filename().unwrap_or(UNKNOWN)),
                Segment::Field(Field::Line) => match record.line {
                    Some(line) => {
                        let _ = write!(out, "{}", line);
                    }
                    None => out.push_str(UNKNOWN),
                },
                Segment::Field(Field::Function) => {
                    out.push_str(record.function.as_deref().unwrap_or(UNKNOWN))
                }
            }
        }
        out
    }
}
