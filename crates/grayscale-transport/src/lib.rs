//! grayscale-transport - Method call envelopes and codec
//!
//! This crate provides:
//! - [`MethodCall`] and [`MethodReply`] envelopes exchanged over a channel
//! - [`MethodCodec`] trait and the [`JsonMethodCodec`] implementation
//! - Typed payloads for the image and log channels in [`messages`]

mod codec;
mod envelope;
pub mod messages;

pub use codec::{CodecError, JsonMethodCodec, MethodCodec};
pub use envelope::{MethodCall, MethodReply, ReplyOutcome, ReplyStatus, TransportError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::messages::{
        ConvertRequest, ConvertResponse, LogMessages, SetLogInterceptorArgs,
        SetMinimumLogLevelArgs, WireLogRecord,
    };
    pub use crate::{
        CodecError, JsonMethodCodec, MethodCall, MethodCodec, MethodReply, ReplyOutcome,
        TransportError,
    };
}
