//! Core trait definitions for applog abstractions.

use std::io;

/// A destination that accepts fully rendered log lines.
///
/// Implementers own whatever state they need (a file handle, a stream
/// lock) and must serialize concurrent writes themselves: the routing
/// layer calls `write_line` from whichever thread emitted the record.
pub trait RecordSink: Send + Sync {
    /// Write one rendered record. `line` carries no trailing newline.
    fn write_line(&self, line: &str) -> io::Result<()>;

    /// Flush anything the sink holds back.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Short description used in diagnostics (e.g. "stdout", a file path).
    fn describe(&self) -> String;
}
