//! Log writer module
//!
//! Thread-safe log writing to files or stdout/stderr.
//! Info and access lines share one target, warnings and errors the other.

use super::Logger;
use crate::config::{LogLevel, LoggingConfig};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Console or file backed [`Logger`]
pub struct LogWriter {
    level: LogLevel,
    /// Info/access log target
    access: LogTarget,
    /// Warn/error log target
    error: LogTarget,
}

impl LogWriter {
    /// Create a writer with optional file paths; `None` falls back to stdout/stderr
    pub fn new(
        level: LogLevel,
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
    ) -> io::Result<Self> {
        let access = match access_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stdout,
        };

        let error = match error_log_file {
            Some(path) => LogTarget::File(Mutex::new(open_log_file(path)?)),
            None => LogTarget::Stderr,
        };

        Ok(Self {
            level,
            access,
            error,
        })
    }

    pub fn from_config(config: &LoggingConfig) -> io::Result<Self> {
        Self::new(
            config.level,
            config.access_log_file.as_deref(),
            config.error_log_file.as_deref(),
        )
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

impl Logger for LogWriter {
    fn info(&self, message: &str) {
        if self.enabled(LogLevel::Info) {
            write_to_target(&self.access, message);
        }
    }

    fn warn(&self, message: &str) {
        if self.enabled(LogLevel::Warn) {
            write_to_target(&self.error, &format!("[WARN] {message}"));
        }
    }

    fn error(&self, message: &str) {
        write_to_target(&self.error, &format!("[ERROR] {message}"));
    }

    // Access lines are controlled by `logging.access_log`, not by the level
    fn access(&self, message: &str) {
        write_to_target(&self.access, message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_target(target: &LogTarget, message: &str) {
    match target {
        LogTarget::Stdout => {
            println!("{message}");
        }
        LogTarget::Stderr => {
            eprintln!("{message}");
        }
        LogTarget::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn test_file_targets_split_by_severity() {
        let dir = tempfile::tempdir().unwrap();
        let access = dir.path().join("logs/access.log");
        let error = dir.path().join("logs/error.log");

        let writer = LogWriter::new(LogLevel::Info, access.to_str(), error.to_str()).unwrap();
        writer.info("Incoming request: GET /version/firmware.bin.version");
        writer.warn("Version file not found.");
        writer.error("Error reading version file");

        let access_log = read(&access);
        let error_log = read(&error);
        assert!(access_log.contains("Incoming request: GET"));
        assert!(!access_log.contains("[WARN]"));
        assert!(error_log.contains("[WARN] Version file not found."));
        assert!(error_log.contains("[ERROR] Error reading version file"));
    }

    #[test]
    fn test_level_filter() {
        let dir = tempfile::tempdir().unwrap();
        let access = dir.path().join("access.log");
        let error = dir.path().join("error.log");

        let writer = LogWriter::new(LogLevel::Error, access.to_str(), error.to_str()).unwrap();
        writer.info("hidden info");
        writer.warn("hidden warning");
        writer.error("visible error");
        writer.access("access line");

        assert!(!read(&access).contains("hidden info"));
        assert!(read(&access).contains("access line"));
        assert!(!read(&error).contains("hidden warning"));
        assert!(read(&error).contains("visible error"));
    }
}
