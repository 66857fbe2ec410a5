//! Error types for the grayscale SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// Well-known error codes
///
/// Codes are grouped by range: 1000s for method dispatch, 1100s for image
/// handling, 1200s for logging configuration, 2000s for the channel layer and
/// 9000s for everything else.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    UnknownMethod = 1001,
    MethodCallError = 1002,

    MethodChannelNotInitialized = 2001,
    ChannelClosed = 2002,
    InvalidResponse = 2003,
    RequestTimeout = 2004,

    InvalidArgument = 1101,
    ImagePathRequired = 1102,
    ConversionError = 1103,
    ImageFileNotFound = 1104,

    SetLogInterceptorError = 1201,
    SetMinimumLogLevelError = 1202,

    UnknownError = 9001,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::UnknownMethod,
        ErrorCode::MethodCallError,
        ErrorCode::MethodChannelNotInitialized,
        ErrorCode::ChannelClosed,
        ErrorCode::InvalidResponse,
        ErrorCode::RequestTimeout,
        ErrorCode::InvalidArgument,
        ErrorCode::ImagePathRequired,
        ErrorCode::ConversionError,
        ErrorCode::ImageFileNotFound,
        ErrorCode::SetLogInterceptorError,
        ErrorCode::SetMinimumLogLevelError,
        ErrorCode::UnknownError,
    ];

    /// Numeric code carried on the wire and in [`SdkError::code`]
    pub fn code(self) -> i64 {
        self as i64
    }

    /// Look up a well-known code
    pub fn from_i64(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|known| known.code() == code)
    }

    /// Canonical message used when none is supplied
    pub fn default_message(self) -> &'static str {
        match self {
            ErrorCode::UnknownMethod => "Unknown method",
            ErrorCode::MethodCallError => "Error handling method call",
            ErrorCode::MethodChannelNotInitialized => "Method channel is not initialized",
            ErrorCode::ChannelClosed => "Channel was closed before a reply arrived",
            ErrorCode::InvalidResponse => "Invalid response from worker",
            ErrorCode::RequestTimeout => "Request timed out",
            ErrorCode::InvalidArgument => "Invalid argument",
            ErrorCode::ImagePathRequired => "imagePath is required",
            ErrorCode::ConversionError => "Failed to convert image to grayscale",
            ErrorCode::ImageFileNotFound => "Image file does not exist at path",
            ErrorCode::SetLogInterceptorError => "Failed to set log interceptor",
            ErrorCode::SetMinimumLogLevelError => "Failed to set minimum log level",
            ErrorCode::UnknownError => "Unknown error occurred",
        }
    }
}

/// Structured SDK error: a numeric code plus a human-readable message
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct SdkError {
    /// Error code, usually one of [`ErrorCode`]
    pub code: i64,
    /// Error message
    pub message: String,
}

/// `{"error": {"code": <int>, "message": <string>}}`
#[derive(Deserialize)]
struct ErrorMapping {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: i64,
    message: String,
}

impl SdkError {
    /// Create an error from an explicit code and message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create an error from a well-known code with its default message
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.code(), code.default_message())
    }

    /// Create an error from a well-known code, overriding the default message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.code(), message)
    }

    /// Extract an error from `{"error": {"code": <int>, "message": <string>}}`
    ///
    /// Returns `None` when the value does not have exactly that shape.
    pub fn from_mapping(mapping: &serde_json::Value) -> Option<Self> {
        let parsed = ErrorMapping::deserialize(mapping).ok()?;
        Some(Self::new(parsed.error.code, parsed.error.message))
    }

    /// The well-known code this error carries, if any
    pub fn known_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_i64(self.code)
    }

    /// Whether this error carries the given well-known code
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code.code()
    }

    pub fn failure_reason(&self) -> String {
        format!("Error code: {}", self.code)
    }
}

impl From<ErrorCode> for SdkError {
    fn from(code: ErrorCode) -> Self {
        SdkError::from_code(code)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::with_message(ErrorCode::InvalidArgument, err.to_string())
    }
}
