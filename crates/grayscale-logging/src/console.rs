//! Sink that prints accepted records as tagged lines

use crate::sink::LogSink;
use chrono::{Local, NaiveDateTime};
use grayscale_core::LogLevel;
use parking_lot::Mutex;
use std::io::Write;

/// Local time layout of the leading `[time]` field
pub const TIMESTAMP_FORMAT: &str = "%y/%m/%d %H:%M:%S%.3f";

/// Prints `[{time}][{tag}][{code}]{message}` lines to stdout or a custom writer
pub struct ConsoleSink {
    minimum_level: LogLevel,
    tag: String,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    /// Print records at `minimum_level` or more severe to stdout
    pub fn new(minimum_level: LogLevel) -> Self {
        Self::with_writer(minimum_level, Box::new(std::io::stdout()))
    }

    pub fn with_writer(minimum_level: LogLevel, writer: Box<dyn Write + Send>) -> Self {
        Self {
            minimum_level,
            tag: "SDK".to_string(),
            writer: Mutex::new(writer),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Format a line stamped with the current local time
    pub fn format_line(&self, message: &str, level: LogLevel) -> String {
        self.format_line_at(Local::now().naive_local(), message, level)
    }

    pub fn format_line_at(&self, time: NaiveDateTime, message: &str, level: LogLevel) -> String {
        format!(
            "[{}][{}][{}]{}",
            time.format(TIMESTAMP_FORMAT),
            self.tag,
            level.code(),
            message
        )
    }
}

impl LogSink for ConsoleSink {
    fn minimum_level(&self) -> LogLevel {
        self.minimum_level
    }

    fn on_log_message(&self, message: &str, level: LogLevel) {
        let line = self.format_line(message, level);
        let mut writer = self.writer.lock();
        // Write errors are ignored
        let _ = writeln!(writer, "{line}");
    }
}

#[cfg(test)]
#[path = "console/console_tests.rs"]
mod console_tests;
