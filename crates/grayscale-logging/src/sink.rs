//! Log sink trait and record type

use grayscale_core::LogLevel;

/// A single log event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub text: String,
    pub level: LogLevel,
}

impl LogRecord {
    pub fn new(text: impl Into<String>, level: LogLevel) -> Self {
        Self {
            text: text.into(),
            level,
        }
    }
}

/// Consumer of filtered log records (the log interceptor)
///
/// At most one sink is registered with a [`LogDispatcher`](crate::LogDispatcher)
/// at a time. The dispatcher reads [`minimum_level`](LogSink::minimum_level)
/// once per batch and calls [`on_log_message`](LogSink::on_log_message) for
/// every record that passes, in order, on the dispatching thread.
pub trait LogSink: Send + Sync {
    /// Threshold for this sink; [`LogLevel::None`] disables output
    fn minimum_level(&self) -> LogLevel;

    /// Receive one accepted record
    fn on_log_message(&self, message: &str, level: LogLevel);
}

/// Sink backed by a closure
pub struct FnSink<F> {
    minimum_level: LogLevel,
    callback: F,
}

impl<F> FnSink<F>
where
    F: Fn(&str, LogLevel) + Send + Sync,
{
    pub fn new(minimum_level: LogLevel, callback: F) -> Self {
        Self {
            minimum_level,
            callback,
        }
    }
}

impl<F> LogSink for FnSink<F>
where
    F: Fn(&str, LogLevel) + Send + Sync,
{
    fn minimum_level(&self) -> LogLevel {
        self.minimum_level
    }

    fn on_log_message(&self, message: &str, level: LogLevel) {
        (self.callback)(message, level);
    }
}
