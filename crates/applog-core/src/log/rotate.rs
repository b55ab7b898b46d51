//! Size-rotated log file.
//!
//! Backups are managed by `file-rotate` with an [`AppendCount`] suffix
//! scheme: `app.log.1` is the most recent backup and anything past
//! `backup_count` is deleted. The size check is done here, before each
//! line is written, so a record is never split across files: the file
//! rotates when the incoming line would bring it to `max_bytes` or beyond
//! and it is not empty. With no backups configured a rollover leaves only
//! the fresh file.

use applog_types::RecordSink;
use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A file destination rotated by size.
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    state: Mutex<FileState>,
}

struct FileState {
    file: FileRotate<AppendCount>,
    size: u64,
}

impl RotatingFileWriter {
    /// Open (or create) `path` for appending.
    ///
    /// The parent directory must already exist.
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, backup_count: u32) -> io::Result<Self> {
        let path = path.into();
        // Surface permission and missing-directory errors now; the
        // rotating writer only reports them on write.
        let size = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?
            .metadata()?
            .len();

        let file = FileRotate::new(
            &path,
            AppendCount::new(backup_count as usize),
            ContentLimit::None,
            Compression::None,
            #[cfg(unix)]
            None,
        );

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            state: Mutex::new(FileState { file, size }),
        })
    }

    /// Path of the current log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the `index`-th backup, `1` being the most recent.
    pub fn backup_path(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Bytes in the current file.
    pub fn current_size(&self) -> u64 {
        self.state.lock().size
    }

    fn should_rotate(&self, size: u64, incoming: u64) -> bool {
        self.max_bytes > 0 && size > 0 && size + incoming >= self.max_bytes
    }
}

impl RecordSink for RotatingFileWriter {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let mut state = self.state.lock();
        if self.should_rotate(state.size, buf.len() as u64) {
            state.file.rotate()?;
            state.size = 0;
        }

        state.file.write_all(&buf)?;
        state.file.flush()?;
        state.size += buf.len() as u64;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        self.state.lock().file.flush()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

impl fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingFileWriter")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backup_count", &self.backup_count)
            .finish_non_exhaustive()
    }
}
