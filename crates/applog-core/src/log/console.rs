//! Console destination.

use applog_types::{ConsoleStream, RecordSink};
use std::io::{self, Write};

/// Writes each record as one line to stdout or stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink {
    stream: ConsoleStream,
}

impl ConsoleSink {
    /// Sink for the given stream.
    pub fn new(stream: ConsoleStream) -> Self {
        Self { stream }
    }

    /// Stream this sink writes to.
    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl RecordSink for ConsoleSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => write_locked(&mut io::stdout().lock(), line),
            ConsoleStream::Stderr => write_locked(&mut io::stderr().lock(), line),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        }
    }

    fn describe(&self) -> String {
        self.stream.to_string()
    }
}

fn write_locked(out: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(out, "{}", line)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_locked_appends_newline() {
        let mut buf = Vec::new();
        write_locked(&mut buf, "hello").unwrap();
        assert_eq!(buf, b"hello\n");
    }

    #[test]
    fn test_describe() {
        assert_eq!(ConsoleSink::default().describe(), "stdout");
        assert_eq!(ConsoleSink::new(ConsoleStream::Stderr).describe(), "stderr");
    }
}
