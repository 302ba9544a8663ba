/// Logging facilities to record deployment reports.
use std::fs::File;

use log::Level;
use serde::Serialize;

/// Sink for deployment log records.
pub trait Logger {
    fn log_error(&mut self, source: &str, message: String);

    fn log_warn(&mut self, source: &str, message: String);

    fn log_info(&mut self, source: &str, message: String);

    fn log_debug(&mut self, source: &str, message: String);

    fn log_trace(&mut self, source: &str, message: String);

    fn save_log(&self, _path: &str) -> Result<(), std::io::Error>;
}

/// Forwards all records to the `log` macros.
#[derive(Default)]
pub struct StdoutLogger {}

impl StdoutLogger {
    pub fn new() -> Self {
        Self {}
    }
}

impl Logger for StdoutLogger {
    fn log_error(&mut self, source: &str, message: String) {
        log::error!("[{}] {}", source, message);
    }

    fn log_warn(&mut self, source: &str, message: String) {
        log::warn!("[{}] {}", source, message);
    }

    fn log_info(&mut self, source: &str, message: String) {
        log::info!("[{}] {}", source, message);
    }

    fn log_debug(&mut self, source: &str, message: String) {
        log::debug!("[{}] {}", source, message);
    }

    fn log_trace(&mut self, source: &str, message: String) {
        log::trace!("[{}] {}", source, message);
    }

    fn save_log(&self, _path: &str) -> Result<(), std::io::Error> {
        Ok(())
    }
}

#[derive(Serialize)]
struct LogEntry {
    sequence: usize,
    source: String,
    message: String,
}

/// Collects records in memory; `save_log` writes them as CSV.
pub struct FileLogger {
    log: Vec<LogEntry>,
    level: Level,
}

impl Default for FileLogger {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            level: Level::Info,
        }
    }
}

impl FileLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: Level) -> Self {
        Self {
            log: Vec::new(),
            level,
        }
    }

    fn log_internal(&mut self, source: &str, message: String, level: Level) {
        if self.level < level {
            return;
        }
        self.log.push(LogEntry {
            sequence: self.log.len(),
            source: source.to_string(),
            message,
        });
    }
}

impl Logger for FileLogger {
    fn log_error(&mut self, source: &str, message: String) {
        self.log_internal(source, message, Level::Error)
    }

    fn log_warn(&mut self, source: &str, message: String) {
        self.log_internal(source, message, Level::Warn)
    }

    fn log_info(&mut self, source: &str, message: String) {
        self.log_internal(source, message, Level::Info)
    }

    fn log_debug(&mut self, source: &str, message: String) {
        self.log_internal(source, message, Level::Debug)
    }

    fn log_trace(&mut self, source: &str, message: String) {
        self.log_internal(source, message, Level::Trace)
    }

    fn save_log(&self, path: &str) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for entry in &self.log {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
