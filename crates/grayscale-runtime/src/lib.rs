//! grayscale-runtime - Request bridge to the remote worker
//!
//! This crate provides:
//! - [`Engine`] and [`Messenger`] seams behind which the remote worker lives
//! - [`MethodChannel`] for correlated request/reply and fire-and-forget calls
//! - [`RequestBridge`] composing the image and log channels
//! - [`AsyncRuntime`] for hosts that call the SDK from synchronous code
//! - Graceful shutdown support with broadcast signals

mod bridge;
mod channel;
mod error;
mod messenger;
mod runtime;
mod shutdown;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use bridge::RequestBridge;
pub use channel::MethodChannel;
pub use error::ChannelError;
pub use messenger::{Engine, HostEndpoint, Messenger};
pub use runtime::{AsyncRuntime, RuntimeConfig};
pub use shutdown::{ShutdownHandle, ShutdownSignal};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsyncRuntime, ChannelError, Engine, HostEndpoint, Messenger, MethodChannel,
        RequestBridge, RuntimeConfig, ShutdownHandle, ShutdownSignal,
    };
}
