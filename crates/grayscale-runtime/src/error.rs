//! Channel-level errors

use grayscale_core::{ErrorCode, SdkError};
use grayscale_transport::CodecError;
use std::time::Duration;
use thiserror::Error;

/// Failure while moving a message across a channel
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No channel with this name is bound
    #[error("channel {0} is not bound")]
    UnknownChannel(String),

    /// Channel was closed while a reply was outstanding
    #[error("channel {0} closed before a reply arrived")]
    Closed(String),

    /// No reply within the request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The messenger could not deliver the message
    #[error("send failed: {0}")]
    Send(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<ChannelError> for SdkError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::UnknownChannel(_) => {
                SdkError::from_code(ErrorCode::MethodChannelNotInitialized)
            }
            ChannelError::Closed(_) => SdkError::from_code(ErrorCode::ChannelClosed),
            ChannelError::Timeout(_) => {
                SdkError::with_message(ErrorCode::RequestTimeout, err.to_string())
            }
            ChannelError::Send(_) | ChannelError::Codec(_) => {
                SdkError::with_message(ErrorCode::MethodCallError, err.to_string())
            }
        }
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
