//! Log dispatcher: one registered sink, severity filtering per batch

use crate::sink::{LogRecord, LogSink};
use grayscale_core::LogLevel;
use grayscale_transport::messages::WireLogRecord;
use parking_lot::RwLock;
use std::sync::Arc;

/// Routes log records to the currently registered [`LogSink`]
///
/// Shared by `Arc` between the facade, the log channel pump and the tracing
/// layer. Replacing the sink never affects a batch already being dispatched:
/// each batch clones the sink handle once and reads its threshold once.
pub struct LogDispatcher {
    sink: RwLock<Option<Arc<dyn LogSink>>>,
}

impl LogDispatcher {
    /// Create a dispatcher with no sink registered
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
        }
    }

    /// Replace the registered sink, returning the previous one
    ///
    /// Passing `None` detaches logging entirely.
    pub fn set_sink(&self, sink: Option<Arc<dyn LogSink>>) -> Option<Arc<dyn LogSink>> {
        let mut guard = self.sink.write();
        std::mem::replace(&mut *guard, sink)
    }

    /// Get the registered sink
    pub fn sink(&self) -> Option<Arc<dyn LogSink>> {
        self.sink.read().clone()
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    /// Threshold of the registered sink, [`LogLevel::None`] without one
    pub fn minimum_level(&self) -> LogLevel {
        self.sink
            .read()
            .as_ref()
            .map_or(LogLevel::None, |sink| sink.minimum_level())
    }

    /// Dispatch a single record
    pub fn log(&self, message: &str, level: LogLevel) -> usize {
        self.emit_batch(std::iter::once(Some((message, level))))
    }

    /// Dispatch a batch of records in order, returning how many were emitted
    pub fn dispatch(&self, records: &[LogRecord]) -> usize {
        if records.is_empty() {
            return 0;
        }
        self.emit_batch(
            records
                .iter()
                .map(|record| Some((record.text.as_str(), record.level))),
        )
    }

    /// Dispatch wire records (`{"text": .., "priority": ..}`)
    ///
    /// Entries that fail to decode are skipped without aborting the batch.
    pub fn dispatch_raw(&self, entries: &[serde_json::Value]) -> usize {
        if entries.is_empty() {
            return 0;
        }
        self.emit_batch(entries.iter().map(WireLogRecord::decode))
    }

    fn emit_batch<T, I>(&self, batch: I) -> usize
    where
        T: AsRef<str>,
        I: IntoIterator<Item = Option<(T, LogLevel)>>,
    {
        // The lock is released before any sink call so a sink may re-register.
        let Some(sink) = self.sink() else {
            return 0;
        };
        let threshold = sink.minimum_level();
        if threshold == LogLevel::None {
            return 0;
        }

        let mut emitted = 0;
        for (text, level) in batch.into_iter().flatten() {
            if threshold.permits(level) {
                sink.on_log_message(text.as_ref(), level);
                emitted += 1;
            }
        }
        emitted
    }
}

impl Default for LogDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogDispatcher")
            .field("has_sink", &self.has_sink())
            .field("minimum_level", &self.minimum_level())
            .finish()
    }
}
