//! Tracing layer that forwards SDK diagnostics to the log dispatcher

use crate::dispatcher::LogDispatcher;
use grayscale_core::LogLevel;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that turns events into log records for the registered sink
///
/// This is how the host side of the SDK reports its own diagnostics through
/// the same interceptor that receives worker logs.
pub struct DispatcherLayer {
    dispatcher: Arc<LogDispatcher>,
    target_prefix: Option<String>,
}

impl DispatcherLayer {
    /// Create a layer forwarding every event to `dispatcher`
    pub fn new(dispatcher: Arc<LogDispatcher>) -> Self {
        Self {
            dispatcher,
            target_prefix: None,
        }
    }

    /// Only forward events whose target starts with `prefix`
    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = Some(prefix.into());
        self
    }

    /// Convert tracing Level to our LogLevel
    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Verbose,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warning,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl<S> Layer<S> for DispatcherLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    // Filtering happens here rather than in `enabled` so that this layer
    // never suppresses events for sibling layers.
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if let Some(prefix) = &self.target_prefix {
            if !metadata.target().starts_with(prefix.as_str()) {
                return;
            }
        }

        let level = Self::convert_level(metadata.level());
        if !self.dispatcher.minimum_level().permits(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.dispatcher.log(&visitor.finish(), level);
    }
}

/// Visitor building `message key=value ...` from an event's fields
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match self.message {
            Some(message) if self.fields.is_empty() => message,
            Some(message) => format!("{}{}", message, self.fields),
            None => self.fields.trim_start().to_string(),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

/// Install the dispatcher layer as the global default subscriber
///
/// When `RUST_LOG` is set, events matching it are also printed to stderr.
/// Calling this more than once has no effect.
pub fn init_logging(dispatcher: Arc<LogDispatcher>) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let console = EnvFilter::try_from_default_env().ok().map(|filter| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter)
    });

    let subscriber = tracing_subscriber::registry()
        .with(DispatcherLayer::new(dispatcher))
        .with(console);

    // Ignore the error if a global default is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
}
