//! Logger module
//!
//! Logging is an injected capability: components receive a [`SharedLogger`]
//! through `AppState` instead of writing to process streams directly.
//! - [`LogWriter`]: stdout/stderr or file targets with a level filter
//! - [`MemoryLogger`]: in-memory capture for tests
//! - [`AccessLogEntry`]: per-response access log lines in several formats

mod format;
mod memory;
mod writer;

pub use format::AccessLogEntry;
pub use memory::{LogRecord, MemoryLogger};
pub use writer::LogWriter;

use crate::config::{Config, LogLevel, FIRMWARE_FILE, VERSION_FILE};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

/// Logging capability over info/warn/error
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Access log lines go to the info target unless an implementation separates them
    fn access(&self, message: &str) {
        self.info(message);
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => self.error(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Info => self.info(message),
        }
    }
}

pub type SharedLogger = Arc<dyn Logger>;

pub fn log_server_start(logger: &dyn Logger, addr: &SocketAddr, config: &Config, base_dir: &Path) {
    logger.info("======================================");
    logger.info(&format!("OTA Update Server running at http://{addr}"));
    logger.info(&format!("Firmware directory: {}", base_dir.display()));
    logger.info(&format!(
        "Firmware file: {}",
        base_dir.join(FIRMWARE_FILE).display()
    ));
    logger.info(&format!(
        "Firmware version file: {}",
        base_dir.join(VERSION_FILE).display()
    ));
    logger.info(&format!("Log level: {}", config.logging.level));
    if let Some(ref path) = config.logging.access_log_file {
        logger.info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        logger.info(&format!("Error log: {path}"));
    }
    if let Some(max) = config.performance.max_connections {
        logger.info(&format!("Max connections: {max}"));
    }
    logger.info("======================================");

    if !base_dir.is_dir() {
        logger.warn(&format!(
            "Firmware directory does not exist yet: {}",
            base_dir.display()
        ));
    }
}

pub fn log_connection_accepted(logger: &dyn Logger, peer_addr: &SocketAddr) {
    logger.info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(logger: &dyn Logger, err: &impl std::fmt::Display) {
    logger.error(&format!("Failed to serve connection: {err}"));
}

pub fn log_request(logger: &dyn Logger, method: &hyper::Method, uri: &hyper::Uri) {
    logger.info(&format!("Incoming request: {method} {uri}"));
}

pub fn log_access(logger: &dyn Logger, entry: &AccessLogEntry, format: &str) {
    logger.access(&entry.format(format));
}

pub fn log_shutdown(logger: &dyn Logger, active: usize) {
    logger.info(&format!(
        "[Shutdown] Listener closed, {active} connection(s) still active"
    ));
}
