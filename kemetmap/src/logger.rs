use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared buffer of recent log lines, shown by the session's `log` command.
/// Each line is (Level, String).
#[derive(Clone)]
pub struct ConsoleLog {
    buffer: Arc<Mutex<VecDeque<(Level, String)>>>,
    max_lines: usize,
}

impl ConsoleLog {
    pub fn new(max_lines: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::new())),
            max_lines,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<(Level, String)>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn push(&self, level: Level, msg: String) {
        let mut buf = self.lock();
        if buf.len() >= self.max_lines {
            buf.pop_front();
        }
        buf.push_back((level, msg));
    }

    pub fn get_lines(&self) -> Vec<(Level, String)> {
        self.lock().iter().cloned().collect()
    }
}

pub struct MultiLogger {
    console: ConsoleLog,
    level: LevelFilter,
}

impl log::Log for MultiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("{}", record.args());
            self.console.push(record.level(), msg.clone());
            // stdout carries the info panel; keep log lines off it
            eprintln!("[{}] {}", record.level(), msg);
        }
    }

    fn flush(&self) {}
}

/// Installs the buffering logger for the interactive session.
pub fn init(level: LevelFilter) -> Result<ConsoleLog, SetLoggerError> {
    let console = ConsoleLog::new(50); // Keep last 50 lines
    let logger = MultiLogger {
        console: console.clone(),
        level,
    };

    // Leak logger to make it static
    let logger: &'static MultiLogger = Box::leak(Box::new(logger));

    log::set_logger(logger)?;
    log::set_max_level(level);

    Ok(console)
}
