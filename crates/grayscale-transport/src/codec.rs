//! Method codec trait and JSON implementation

use crate::envelope::{MethodCall, MethodReply};
use grayscale_core::{ErrorCode, SdkError};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            CodecError::Deserialization(err.to_string())
        } else {
            CodecError::Serialization(err.to_string())
        }
    }
}

impl From<CodecError> for SdkError {
    fn from(err: CodecError) -> Self {
        SdkError::with_message(ErrorCode::MethodCallError, err.to_string())
    }
}

/// Encodes method calls and replies to the bytes carried by a messenger
pub trait MethodCodec: Send + Sync {
    fn encode_call(&self, call: &MethodCall) -> Result<Vec<u8>, CodecError>;

    fn decode_call(&self, data: &[u8]) -> Result<MethodCall, CodecError>;

    fn encode_reply(&self, reply: &MethodReply) -> Result<Vec<u8>, CodecError>;

    fn decode_reply(&self, data: &[u8]) -> Result<MethodReply, CodecError>;
}

/// JSON codec implementation using serde_json
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMethodCodec;

impl JsonMethodCodec {
    /// Create a new JSON codec
    pub fn new() -> Self {
        Self
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(Into::into)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(data).map_err(Into::into)
    }
}

impl MethodCodec for JsonMethodCodec {
    fn encode_call(&self, call: &MethodCall) -> Result<Vec<u8>, CodecError> {
        self.encode(call)
    }

    fn decode_call(&self, data: &[u8]) -> Result<MethodCall, CodecError> {
        self.decode(data)
    }

    fn encode_reply(&self, reply: &MethodReply) -> Result<Vec<u8>, CodecError> {
        self.encode(reply)
    }

    fn decode_reply(&self, data: &[u8]) -> Result<MethodReply, CodecError> {
        self.decode(data)
    }
}
