//! Typed payloads for the image and log channels

use grayscale_core::LogLevel;
use serde::{Deserialize, Serialize};

/// Method names understood by either side of the bridge
pub mod method {
    /// Image channel, host → worker, unary
    pub const CONVERT_TO_GRAYSCALE: &str = "convertToGrayscale";
    /// Log channel, worker → host, fire-and-forget
    pub const ON_LOG_MESSAGE: &str = "onLogMessage";
    /// Log channel, host → worker, fire-and-forget
    pub const SET_LOG_INTERCEPTOR: &str = "setLogInterceptor";
    /// Log channel, host → worker, fire-and-forget
    pub const SET_MINIMUM_LOG_LEVEL: &str = "setMinimumLogLevel";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub image_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub result_path: String,
}

/// Arguments of `onLogMessage`
///
/// Entries stay untyped so one malformed record does not reject the batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessages {
    #[serde(default)]
    pub log_messages: Vec<serde_json::Value>,
}

/// A single log record as it travels on the log channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLogRecord {
    pub text: String,
    /// One-letter severity code
    pub priority: String,
}

impl WireLogRecord {
    pub fn new(text: impl Into<String>, level: LogLevel) -> Self {
        Self {
            text: text.into(),
            priority: level.code().to_string(),
        }
    }

    /// Decode an untyped entry; `None` when the shape or priority is invalid
    pub fn decode(value: &serde_json::Value) -> Option<(String, LogLevel)> {
        let record = WireLogRecord::deserialize(value).ok()?;
        let level = LogLevel::from_code(&record.priority)?;
        Some((record.text, level))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetLogInterceptorArgs {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetMinimumLogLevelArgs {
    pub minimum_log_level: LogLevel,
}
