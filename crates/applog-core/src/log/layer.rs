//! Routing of tracing events to destinations.
//!
//! [`RoutingLayer`] is a `tracing_subscriber` layer holding every
//! destination of a [`LoggingConfig`] and the channel table. For each
//! event it resolves the closest configured channel for the logger name,
//! applies the channel threshold, collects destinations (following
//! propagation to ancestor channels), applies each destination threshold
//! and writes the rendered line.
//!
//! Events carry the logger name in their target, or in a `log.target`
//! field when emitted through [`Logger`](super::Logger). `log.severity`,
//! `log.file`, `log.line` and `log.function` override what the event
//! metadata says.

use applog_types::{
    ChannelName, DestinationKind, LogError, LoggingConfig, RecordSink, Result, Severity,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use super::console::ConsoleSink;
use super::format::{Formatter, LogRecord};
use super::logger::{caller_function, short_name};
use super::rotate::RotatingFileWriter;

/// Severity of an event at `level`, TRACE having none.
pub(crate) fn severity_for(level: &Level) -> Option<Severity> {
    match *level {
        Level::ERROR => Some(Severity::Error),
        Level::WARN => Some(Severity::Warning),
        Level::INFO => Some(Severity::Info),
        Level::DEBUG => Some(Severity::Debug),
        _ => None,
    }
}

/// Highest severity an event at `level` can carry. CRITICAL records are
/// emitted at ERROR, so an ERROR event must pass a CRITICAL-only floor.
fn ceiling_for(level: &Level) -> Option<Severity> {
    match *level {
        Level::ERROR => Some(Severity::Critical),
        _ => severity_for(level),
    }
}

struct Destination {
    name: String,
    level: Severity,
    formatter: Formatter,
    sink: Arc<dyn RecordSink>,
    failed: AtomicBool,
}

impl Destination {
    fn write(&self, record: &LogRecord) {
        let line = self.formatter.render(record);
        if let Err(e) = self.sink.write_line(&line) {
            self.report("write to", &e);
        }
    }

    fn flush(&self) {
        if let Err(e) = self.sink.flush() {
            self.report("flush", &e);
        }
    }

    /// Report a sink failure once per destination; there is nowhere else
    /// to log it.
    fn report(&self, action: &str, error: &std::io::Error) {
        if !self.failed.swap(true, Ordering::Relaxed) {
            eprintln!(
                "applog: failed to {} destination '{}' ({}): {}",
                action,
                self.name,
                self.sink.describe(),
                error
            );
        }
    }
}

struct Route {
    channel: ChannelName,
    level: Severity,
    destinations: Vec<usize>,
    propagate: bool,
}

/// Layer delivering events to the destinations of one configuration.
pub struct RoutingLayer {
    destinations: Vec<Destination>,
    routes: Vec<Route>,
    floor: Option<Severity>,
}

impl RoutingLayer {
    /// Validate `config`, parse its formatters and open its destinations.
    ///
    /// Nothing is installed; on error every sink opened so far is dropped.
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        config.validate()?;

        let mut formatters = HashMap::with_capacity(config.formatters.len());
        for (name, formatter) in &config.formatters {
            formatters.insert(name.as_str(), Formatter::parse(&formatter.format)?);
        }

        let mut destinations = Vec::with_capacity(config.destinations.len());
        for (name, destination) in &config.destinations {
            let Some(formatter) = formatters.get(destination.formatter.as_str()) else {
                applog_types::bug!(
                    "destination '{}' lost formatter '{}' after validation",
                    name,
                    destination.formatter
                );
            };

            let sink: Arc<dyn RecordSink> = match &destination.kind {
                DestinationKind::Console { stream } => Arc::new(ConsoleSink::new(*stream)),
                DestinationKind::RotatingFile { path, max_bytes, backup_count, .. } => Arc::new(
                    RotatingFileWriter::open(path, *max_bytes, *backup_count).map_err(|e| {
                        LogError::ConfigurationApplication(format!(
                            "cannot open log file {} for destination '{}': {}",
                            path.display(),
                            name,
                            e
                        ))
                    })?,
                ),
            };

            destinations.push(Destination {
                name: name.clone(),
                level: destination.level,
                formatter: formatter.clone(),
                sink,
                failed: AtomicBool::new(false),
            });
        }

        let routes = config
            .channels
            .iter()
            .map(|(channel, route)| Route {
                channel: channel.clone(),
                level: route.level,
                destinations: route
                    .destinations
                    .iter()
                    .filter_map(|name| config.destinations.get_index_of(name))
                    .collect(),
                propagate: route.propagate,
            })
            .collect::<Vec<_>>();

        // No record below both the lowest channel and the lowest
        // destination threshold can be delivered anywhere
        let floor = routes
            .iter()
            .map(|r| r.level)
            .min()
            .zip(destinations.iter().map(|d| d.level).min())
            .map(|(channel, destination)| channel.max(destination));

        Ok(Self { destinations, routes, floor })
    }

    /// Replace the sink of a destination, keeping its threshold and
    /// formatter. Unknown names are ignored.
    pub fn with_sink(mut self, destination: &str, sink: Arc<dyn RecordSink>) -> Self {
        if let Some(target) = self.destinations.iter_mut().find(|d| d.name == destination) {
            target.sink = sink;
        }
        self
    }

    /// Names of the destinations, in configuration order.
    pub fn destination_names(&self) -> Vec<&str> {
        self.destinations.iter().map(|d| d.name.as_str()).collect()
    }

    /// Flush every destination.
    pub fn flush(&self) {
        for destination in &self.destinations {
            destination.flush();
        }
    }

    /// Render and write `record` to every destination it is routed to.
    pub fn dispatch(&self, record: &LogRecord) {
        for index in self.targets(&record.logger, record.severity) {
            self.destinations[index].write(record);
        }
    }

    /// Closest configured channel for `logger`.
    fn resolve(&self, logger: &str) -> Option<usize> {
        self.closest(|route| route.channel.matches(logger))
    }

    /// Closest configured ancestor of the channel at `index`.
    fn parent_of(&self, index: usize) -> Option<usize> {
        self.routes[index]
            .channel
            .ancestors()
            .iter()
            .rev()
            .find_map(|name| self.routes.iter().position(|route| route.channel.as_str() == name))
    }

    fn closest(&self, accept: impl Fn(&Route) -> bool) -> Option<usize> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, route)| accept(route))
            .max_by_key(|(_, route)| route.channel.as_str().len())
            .map(|(index, _)| index)
    }

    /// Indices of the destinations a record reaches.
    fn targets(&self, logger: &str, severity: Severity) -> Vec<usize> {
        let Some(mut index) = self.resolve(logger) else {
            return Vec::new();
        };
        if severity < self.routes[index].level {
            return Vec::new();
        }

        let mut selected = vec![false; self.destinations.len()];
        loop {
            let route = &self.routes[index];
            for &destination in &route.destinations {
                selected[destination] = true;
            }
            if !route.propagate {
                break;
            }
            match self.parent_of(index) {
                Some(parent) => index = parent,
                None => break,
            }
        }

        selected
            .into_iter()
            .enumerate()
            .filter(|&(i, chosen)| chosen && severity >= self.destinations[i].level)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Debug for RoutingLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingLayer")
            .field("destinations", &self.destination_names())
            .field(
                "channels",
                &self.routes.iter().map(|r| r.channel.as_str()).collect::<Vec<_>>(),
            )
            .field("floor", &self.floor)
            .finish()
    }
}

impl<S> Layer<S> for RoutingLayer
where
    S: Subscriber,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        match (ceiling_for(metadata.level()), self.floor) {
            (Some(ceiling), Some(floor)) => ceiling >= floor,
            _ => false,
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        // CRITICAL arrives here as an ERROR event whose `log.severity`
        // field carries the real severity; see `ceiling_for`
        let Some(mut record) = record_from_event(event) else {
            return;
        };
        let targets = self.targets(&record.logger, record.severity);
        if targets.is_empty() {
            return;
        }

        if record.function.is_none() {
            record.function = caller_function().or_else(|| {
                event.metadata().module_path().map(|path| short_name(path).to_string())
            });
        }
        for index in targets {
            self.destinations[index].write(&record);
        }
    }
}

fn record_from_event(event: &Event<'_>) -> Option<LogRecord> {
    let metadata = event.metadata();
    let mut visitor = RecordVisitor::default();
    event.record(&mut visitor);

    let severity = visitor.severity.or_else(|| severity_for(metadata.level()))?;
    let message = visitor.message();

    Some(LogRecord {
        timestamp: crate::time::now(),
        logger: visitor
            .logger
            .unwrap_or_else(|| metadata.target().to_string()),
        severity,
        message,
        file: visitor.file.or_else(|| metadata.file().map(str::to_string)),
        line: visitor.line.or_else(|| metadata.line()),
        function: visitor.function,
    })
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    logger: Option<String>,
    severity: Option<Severity>,
    file: Option<String>,
    line: Option<u32>,
    function: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl RecordVisitor {
    fn record_text(&mut self, name: &'static str, value: String) {
        match name {
            "message" => self.message = Some(value),
            "log.target" => self.logger = Some(value),
            "log.severity" => self.severity = value.parse().ok(),
            "log.file" => self.file = Some(value),
            "log.line" => self.line = value.parse().ok(),
            "log.function" => self.function = Some(value).filter(|f| !f.is_empty()),
            "log.module_path" => {}
            _ => self.fields.push((name, value)),
        }
    }

    /// Message followed by any extra fields as `key=value`.
    fn message(&mut self) -> String {
        let mut message = self.message.take().unwrap_or_default();
        for (name, value) in self.fields.drain(..) {
            if !message.is_empty() {
                message.push(' ');
            }
            message.push_str(name);
            message.push('=');
            message.push_str(&value);
        }
        message
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field.name(), format!("{:?}", value));
    }
}
