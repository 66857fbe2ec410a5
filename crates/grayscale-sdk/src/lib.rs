//! # grayscale-sdk
//!
//! Host-facing SDK that converts images to grayscale through a remote worker.
//!
//! The worker sits behind the [`Engine`] trait and is reached over two
//! channels: one carries conversion requests, the other carries log records
//! and log configuration. Log records are filtered by severity and forwarded
//! to whatever [`LogSink`] the host registers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use grayscale_sdk::prelude::*;
//! use std::sync::Arc;
//!
//! let sdk = GrayscaleSdk::new(Arc::new(MyEngine::default()));
//!
//! sdk.set_log_interceptor(Some(Arc::new(ConsoleSink::new(LogLevel::Info))))
//!     .await;
//! sdk.initialize().await?;
//!
//! match sdk.convert_to_grayscale("/tmp/photo.jpg").await {
//!     Ok(path) => println!("grayscale image at {path}"),
//!     Err(e) => eprintln!("{} ({})", e, e.failure_reason()),
//! }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`grayscale_core`] - Severity, error, configuration and lifecycle types
//! - [`grayscale_transport`] - Wire envelopes and codec
//! - [`grayscale_logging`] - Log sinks, dispatcher and tracing layer
//! - [`grayscale_runtime`] - Engine seam, method channels and the request bridge

mod blocking;
mod sdk;

pub use blocking::BlockingGrayscaleSdk;
pub use sdk::GrayscaleSdk;

pub use grayscale_core::{
    ErrorCode, LifecycleState, LogLevel, SdkConfig, SdkError, SdkResult,
};
pub use grayscale_logging::{
    ConsoleSink, DispatcherLayer, FnSink, LogDispatcher, LogRecord, LogSink, init_logging,
};
pub use grayscale_runtime::{ChannelError, Engine, HostEndpoint, Messenger};
pub use grayscale_transport::{JsonMethodCodec, MethodCall, MethodCodec, MethodReply, TransportError};

// Re-export dependencies engine implementors need
pub use async_trait::async_trait;
pub use serde_json;
pub use tokio;
pub use tracing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BlockingGrayscaleSdk, ConsoleSink, Engine, ErrorCode, FnSink, GrayscaleSdk, HostEndpoint,
        LogLevel, LogSink, Messenger, SdkConfig, SdkError, SdkResult, async_trait,
    };
}
