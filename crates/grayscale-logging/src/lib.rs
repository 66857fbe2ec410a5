//! grayscale-logging - Severity-filtered log dispatch
//!
//! This crate provides:
//! - [`LogSink`] trait for the registered log interceptor
//! - [`LogDispatcher`] holding at most one sink and filtering records by severity
//! - [`DispatcherLayer`] tracing layer that forwards SDK diagnostics to the dispatcher
//! - [`ConsoleSink`] that prints accepted records

mod console;
mod dispatcher;
mod layer;
mod sink;

pub use console::ConsoleSink;
pub use dispatcher::LogDispatcher;
pub use grayscale_core::LogLevel;
pub use layer::{DispatcherLayer, init_logging};
pub use sink::{FnSink, LogRecord, LogSink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ConsoleSink, DispatcherLayer, FnSink, LogDispatcher, LogLevel, LogRecord, LogSink,
        init_logging,
    };
}
