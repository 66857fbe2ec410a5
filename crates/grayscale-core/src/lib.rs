//! grayscale-core - Severity, error, configuration and lifecycle types
//!
//! This crate provides the foundational types shared by every layer of the SDK:
//! - [`LogLevel`] ordered log severity with one-letter wire codes
//! - [`SdkError`] and [`ErrorCode`] for structured error propagation
//! - [`SdkConfig`] for SDK configuration
//! - [`LifecycleState`] for the worker lifecycle

mod config;
mod error;
mod lifecycle;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use config::SdkConfig;
pub use error::{ErrorCode, SdkError, SdkResult};
pub use lifecycle::LifecycleState;

/// Severity of a log message
///
/// Variants are declared from most restrictive to most permissive, so the
/// derived ordering is `None < Error < Warning < Info < Debug < Verbose`.
/// `None` is only meaningful as a threshold: it disables all output.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    None = 0,
    Error = 1,
    Warning = 2,
    Info = 3,
    Debug = 4,
    Verbose = 5,
}

impl LogLevel {
    /// All levels in ascending order
    pub const ALL: [LogLevel; 6] = [
        LogLevel::None,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Verbose,
    ];

    /// Parse a wire code, failing closed to [`LogLevel::None`]
    pub fn parse(code: &str) -> Self {
        Self::from_code(code).unwrap_or(LogLevel::None)
    }

    /// Parse a wire code, returning `None` for anything unrecognized
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "V" => Some(LogLevel::Verbose),
            "D" => Some(LogLevel::Debug),
            "I" => Some(LogLevel::Info),
            "W" => Some(LogLevel::Warning),
            "E" => Some(LogLevel::Error),
            "N" => Some(LogLevel::None),
            _ => None,
        }
    }

    /// One-letter wire code
    pub fn code(&self) -> &'static str {
        match self {
            LogLevel::Verbose => "V",
            LogLevel::Debug => "D",
            LogLevel::Info => "I",
            LogLevel::Warning => "W",
            LogLevel::Error => "E",
            LogLevel::None => "N",
        }
    }

    /// Whether a record at `record` severity passes when `self` is the threshold
    ///
    /// A `None` threshold passes nothing and a `None` record never passes.
    /// Otherwise the record must be at least as severe as the threshold.
    pub fn permits(self, record: LogLevel) -> bool {
        self != LogLevel::None && record != LogLevel::None && record <= self
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Verbose => write!(f, "VERBOSE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARNING"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::None => write!(f, "NONE"),
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(LogLevel::parse(&code))
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{ErrorCode, LifecycleState, LogLevel, SdkConfig, SdkError, SdkResult};
}
