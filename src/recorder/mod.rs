//! Run recorder
//!
//! Holds everything a run accumulates: the extracted records in traversal
//! order, the listing counters, and the timestamped run log. The log is kept
//! in memory, appended to the per-run log file, and mirrored to `tracing`.

pub mod stats;

pub use stats::{print_statistics, RunStats};

use crate::extract::ListingRecord;
use chrono::{DateTime, Local};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Timestamp format used in log lines and output file names
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Current local time in [`TIMESTAMP_FORMAT`]
pub fn run_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Severity of a run log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// One entry of the run log
#[derive(Debug, Clone)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[log: {}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.message
        )
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<ListingRecord>,
    pub stats: RunStats,
    pub lines: Vec<LogLine>,
}

struct LogFile {
    path: PathBuf,
    file: File,
    broken: bool,
}

/// Append-only accumulator for one run
///
/// There is exactly one writer, the pipeline driver, so no locking is
/// involved.
pub struct RunRecorder {
    records: Vec<ListingRecord>,
    stats: RunStats,
    lines: Vec<LogLine>,
    log_file: Option<LogFile>,
}

impl Default for RunRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl RunRecorder {
    /// Recorder without a log file
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            stats: RunStats::default(),
            lines: Vec::new(),
            log_file: None,
        }
    }

    /// Recorder appending its log to `path`
    ///
    /// Missing parent directories are created.
    pub fn with_log_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        let mut recorder = Self::new();
        recorder.log_file = Some(LogFile {
            path: path.to_path_buf(),
            file,
            broken: false,
        });
        Ok(recorder)
    }

    /// Path of the run log file, if any
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_ref().map(|f| f.path.as_path())
    }

    /// Counts a successful listing and keeps its record
    pub fn record_success(&mut self, record: ListingRecord) {
        self.stats.attempted += 1;
        self.stats.succeeded += 1;
        self.records.push(record);
    }

    /// Counts a failed listing
    pub fn record_failure(&mut self) {
        self.stats.attempted += 1;
        self.stats.failed += 1;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message.into());
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    /// Consumes the recorder, returning what the run accumulated
    pub fn finish(self) -> RunOutput {
        RunOutput {
            records: self.records,
            stats: self.stats,
            lines: self.lines,
        }
    }

    fn log(&mut self, level: LogLevel, message: String) {
        let line = LogLine {
            timestamp: Local::now(),
            level,
            message,
        };

        match level {
            LogLevel::Info => tracing::info!("{}", line.message),
            LogLevel::Warn => tracing::warn!("{}", line.message),
            LogLevel::Error => tracing::error!("{}", line.message),
        }

        if let Some(log_file) = self.log_file.as_mut() {
            if !log_file.broken {
                if let Err(e) = writeln!(log_file.file, "{}", line) {
                    // reported once, the run goes on without the file
                    log_file.broken = true;
                    tracing::warn!(
                        "Failed to write run log {}: {}",
                        log_file.path.display(),
                        e
                    );
                }
            }
        }

        self.lines.push(line);
    }
}
