//! Method call and reply envelopes exchanged over a channel

use grayscale_core::{ErrorCode, SdkError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A method invocation sent over a channel
///
/// Calls that expect a reply carry an `id`; the worker echoes it back on the
/// reply so late or duplicate replies can be told apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name (e.g., "convertToGrayscale")
    pub method: String,

    /// Method arguments
    #[serde(default)]
    pub args: serde_json::Value,

    /// Correlation ID, absent for fire-and-forget calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl MethodCall {
    /// Create a new method call
    pub fn new(method: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            method: method.into(),
            args,
            id: None,
        }
    }

    /// Create from a method name and serializable arguments
    pub fn from_typed<T: Serialize>(
        method: impl Into<String>,
        args: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(method, serde_json::to_value(args)?))
    }

    /// Set the correlation ID
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Deserialize the arguments to a typed value
    pub fn args_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.args)
    }
}

/// Error reported by the worker at the transport level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportError {
    /// Worker-defined error code string
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Structured details, ideally `{"error": {"code", "message"}}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TransportError {
    pub fn new(code: impl Into<String>, message: Option<String>) -> Self {
        Self {
            code: code.into(),
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Convert to an [`SdkError`]
    ///
    /// Structured details win when they parse; otherwise the result is an
    /// `UnknownError` carrying this error's message, or "Unknown error".
    pub fn to_sdk_error(&self) -> SdkError {
        self.details
            .as_ref()
            .and_then(SdkError::from_mapping)
            .unwrap_or_else(|| {
                SdkError::with_message(
                    ErrorCode::UnknownError,
                    self.message.as_deref().unwrap_or("Unknown error"),
                )
            })
    }
}

impl From<TransportError> for SdkError {
    fn from(err: TransportError) -> Self {
        err.to_sdk_error()
    }
}

/// Reply status on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Reply to a [`MethodCall`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodReply {
    pub status: ReplyStatus,

    /// Result value (on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Transport error (on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TransportError>,

    /// Correlation ID copied from the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

/// Decoded outcome of a reply
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    Success(serde_json::Value),
    Error(TransportError),
}

impl MethodReply {
    /// Create a success reply
    pub fn success(result: serde_json::Value) -> Self {
        Self {
            status: ReplyStatus::Success,
            result: Some(result),
            error: None,
            id: None,
        }
    }

    /// Create an error reply
    pub fn error(error: TransportError) -> Self {
        Self {
            status: ReplyStatus::Error,
            result: None,
            error: Some(error),
            id: None,
        }
    }

    /// Set the correlation ID
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }

    /// Collapse the wire fields into a single outcome
    ///
    /// An error reply without an error body still yields an error.
    pub fn into_outcome(self) -> ReplyOutcome {
        match self.status {
            ReplyStatus::Success => {
                ReplyOutcome::Success(self.result.unwrap_or(serde_json::Value::Null))
            }
            ReplyStatus::Error => ReplyOutcome::Error(
                self.error
                    .unwrap_or_else(|| TransportError::new("MISSING_ERROR", None)),
            ),
        }
    }
}

#[cfg(test)]
#[path = "envelope/envelope_tests.rs"]
mod envelope_tests;
