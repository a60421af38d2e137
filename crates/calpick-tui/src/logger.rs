/// Logger that captures records in a memory buffer instead of stdout, so
/// log output never tears the terminal UI.
use calpick_core::get_calpick_setting;
use log::{Level, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock};

/// A log entry with timestamp and formatted message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn format(&self) -> String {
        format!(
            "[{}] {} {}: {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

/// Thread-safe ring of the most recent log entries
#[derive(Clone)]
pub struct LogBuffer {
    logs: Arc<RwLock<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::with_capacity(get_calpick_setting!(CALPICK_LOG_BUFFER_LINES, usize))
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            logs: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity,
        }
    }

    pub fn add_log(&self, entry: LogEntry) {
        let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
        if logs.len() >= self.capacity {
            logs.pop_front();
        }
        logs.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.logs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.logs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|entry| entry.format())
            .collect()
    }
}

/// Custom logger that writes to memory buffer
pub struct BufferedLogger {
    buffer: LogBuffer,
    level: Level,
}

impl BufferedLogger {
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            level: Level::Debug,
        }
    }
}

impl log::Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let entry = LogEntry {
                timestamp: chrono::Local::now()
                    .format("%Y-%m-%d %H:%M:%S%.3f")
                    .to_string(),
                level: record.level().to_string(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            };
            self.buffer.add_log(entry);
        }
    }

    fn flush(&self) {}
}

/// Install the buffered logger and return the buffer for reading logs.
pub fn init_memory_logger() -> Result<LogBuffer, SetLoggerError> {
    let buffer = LogBuffer::new();
    // a logger may already be installed (tests, embedding apps); the buffer
    // still works, it just stays empty. Nothing is printed since that would
    // corrupt the TUI
    let _ = log::set_boxed_logger(Box::new(BufferedLogger::new(buffer.clone())));
    log::set_max_level(log::LevelFilter::Debug);
    Ok(buffer)
}
