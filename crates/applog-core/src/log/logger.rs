//! Named logger handles.

use applog_types::identifiers::display_name;
use applog_types::Severity;
use std::borrow::Cow;
use std::fmt;
use tracing::Level;

/// Source location attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<'a> {
    /// Source file path
    pub file: &'a str,
    /// Source line
    pub line: u32,
    /// Enclosing function, when known
    pub function: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// Location from its parts.
    pub fn new(file: &'a str, line: u32, function: Option<&'a str>) -> Self {
        Self { file, line, function }
    }

    /// Location of the caller of a `#[track_caller]` function.
    #[track_caller]
    pub fn caller() -> Location<'static> {
        let caller = std::panic::Location::caller();
        Location::new(caller.file(), caller.line(), None)
    }
}

/// Frames belonging to event delivery rather than to the code that logged.
const DELIVERY_FRAMES: &[&str] = &[
    "backtrace::",
    "tracing::",
    "tracing_core::",
    "tracing_subscriber::",
    "core::",
    "std::",
    "alloc::",
    "dyn ",
    "applog_core::log::layer::RoutingLayer",
    "applog_core::log::layer::record_from_event",
    "applog_core::log::logger::caller_function",
    "applog_core::log::logger::Logger::",
];

/// Name of the function that emitted the event currently being delivered.
///
/// Walks the stack past the subscriber and `Logger` frames. `None` when
/// symbols are unavailable (stripped binaries).
#[inline(never)]
pub(crate) fn caller_function() -> Option<String> {
    let mut found = None;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let Some(name) = symbol.name() else { return };
            let name = format!("{:#}", name);
            let path = name.trim_start_matches(|c: char| c == '<' || c == '&');
            if !DELIVERY_FRAMES.iter().any(|prefix| path.starts_with(prefix)) {
                found = Some(short_name(&name).to_string());
            }
        });
        found.is_none()
    });
    found
}

/// Last segment of a Rust path, without closure suffixes.
pub(crate) fn short_name(path: &str) -> &str {
    let mut path = path;
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }
    match path.rfind("::") {
        Some(pos) => &path[pos + 2..],
        None => path,
    }
}

macro_rules! emit {
    ($level:expr, $logger:expr, $severity:expr, $location:expr, $args:expr) => {
        tracing::event!(
            target: "applog",
            $level,
            log.target = $logger.name(),
            log.severity = $severity.as_str(),
            log.file = $location.file,
            log.line = $location.line,
            log.function = $location.function.unwrap_or(""),
            "{}",
            $args
        )
    };
}

/// Handle for emitting records on one channel.
///
/// Records go through `tracing`, so whichever subscriber is current
/// (normally the one installed by [`apply`](super::apply)) routes them.
///
/// # Example
///
/// ```
/// use applog_core::log::Logger;
///
/// let logger = Logger::get("my_module");
/// logger.info("ready");
/// applog_core::warning!(logger, "{} retries left", 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Logger {
    name: Cow<'static, str>,
}

impl Logger {
    /// Logger for the channel `name`.
    pub fn get(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Logger for the root channel.
    pub fn root() -> Self {
        Self::get("")
    }

    /// Channel name; empty for root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Child logger, e.g. `my_module` → `my_module.db`.
    pub fn child(&self, suffix: &str) -> Self {
        if self.name.is_empty() {
            Self::get(suffix.to_string())
        } else {
            Self::get(format!("{}.{}", self.name, suffix))
        }
    }

    /// Emit a DEBUG record.
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(Severity::Debug, message);
    }

    /// Emit an INFO record.
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(Severity::Info, message);
    }

    /// Emit a WARNING record.
    #[track_caller]
    pub fn warning(&self, message: impl fmt::Display) {
        self.log(Severity::Warning, message);
    }

    /// Emit an ERROR record.
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(Severity::Error, message);
    }

    /// Emit a CRITICAL record.
    #[track_caller]
    pub fn critical(&self, message: impl fmt::Display) {
        self.log(Severity::Critical, message);
    }

    /// Emit a record at `severity`, located at the caller.
    #[track_caller]
    pub fn log(&self, severity: Severity, message: impl fmt::Display) {
        self.log_at(severity, Location::caller(), format_args!("{}", message));
    }

    /// Emit a record with an explicit location. Used by the logging macros.
    pub fn log_at(&self, severity: Severity, location: Location<'_>, args: fmt::Arguments<'_>) {
        match severity {
            Severity::Debug => emit!(Level::DEBUG, self, severity, location, args),
            Severity::Info => emit!(Level::INFO, self, severity, location, args),
            Severity::Warning => emit!(Level::WARN, self, severity, location, args),
            Severity::Error | Severity::Critical => {
                emit!(Level::ERROR, self, severity, location, args)
            }
        }
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(display_name(&self.name))
    }
}

/// Name of the enclosing function.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = &name[..name.len() - 3];
        let name = name.trim_end_matches("::{{closure}}");
        match name.rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }};
}

/// Logger for the current module path, or for an explicit channel.
///
/// ```
/// let logger = applog_core::logger!();
/// assert_eq!(logger.name(), module_path!());
///
/// let module = applog_core::logger!("my_module");
/// assert_eq!(module.name(), "my_module");
/// ```
#[macro_export]
macro_rules! logger {
    () => {
        $crate::log::Logger::get(::std::module_path!())
    };
    ($name:expr) => {
        $crate::log::Logger::get($name)
    };
}

/// Emit a record at a given severity with file, line and function.
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.log_at(
            $severity,
            $crate::log::Location::new(
                ::std::file!(),
                ::std::line!(),
                ::std::option::Option::Some($crate::function_name!()),
            ),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Emit a DEBUG record with file, line and function.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+) };
}

/// Emit an INFO record with file, line and function.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Info, $($arg)+) };
}

/// Emit a WARNING record with file, line and function.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Warning, $($arg)+) };
}

/// Emit an ERROR record with file, line and function.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Error, $($arg)+) };
}

/// Emit a CRITICAL record with file, line and function.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => { $crate::log_at!($logger, $crate::Severity::Critical, $($arg)+) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_name() {
        assert_eq!(crate::function_name!(), "test_function_name");
        let from_closure = || crate::function_name!();
        assert_eq!(from_closure(), "test_function_name");
    }

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("app::jobs::run"), "run");
        assert_eq!(short_name("app::jobs::run::{{closure}}::{{closure}}"), "run");
        assert_eq!(short_name("<app::Worker as app::Job>::execute"), "execute");
        assert_eq!(short_name("main"), "main");
    }

    #[test]
    fn test_logger_names() {
        assert_eq!(Logger::root().name(), "");
        assert_eq!(Logger::root().to_string(), "root");
        assert_eq!(Logger::get("my_module").to_string(), "my_module");
        assert_eq!(crate::logger!().name(), "applog_core::log::logger::tests");
    }

    #[test]
    fn test_child_logger() {
        assert_eq!(Logger::root().child("app").name(), "app");
        assert_eq!(Logger::get("app").child("db").name(), "app.db");
    }

    #[test]
    fn test_caller_location() {
        let expected = line!() + 1;
        let location = Location::caller();
        assert_eq!(location.line, expected);
        assert!(location.file.ends_with("logger.rs"));
        assert_eq!(location.function, None);
    }

    #[test]
    fn test_logging_without_subscriber_is_harmless() {
        let logger = Logger::get("nobody_listening");
        logger.info("dropped");
        crate::critical!(logger, "also {}", "dropped");
    }
}
