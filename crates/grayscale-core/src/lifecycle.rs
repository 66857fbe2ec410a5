//! Worker lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle of the remote worker and its channels
///
/// State transitions:
/// ```text
/// Uninitialized → Starting → Ready → Stopping → Stopped
///                    ↑                             │
///                    └─────────────────────────────┘ (re-initialize)
///        Starting / Ready / Stopping → Failed
/// ```
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Worker has not been started
    #[default]
    Uninitialized = 0,
    /// Worker is starting and channels are being bound
    Starting = 1,
    /// Channels are open and requests can be sent
    Ready = 2,
    /// Channels are being torn down
    Stopping = 3,
    /// Worker has been stopped explicitly
    Stopped = 4,
    /// Worker failed to start or crashed; not retried
    Failed = 5,
}

impl LifecycleState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, target),
            (Uninitialized, Starting)
                | (Starting, Ready)
                | (Ready, Stopping)
                | (Stopping, Stopped)
                | (Stopped, Starting)
                | (Starting, Failed)
                | (Ready, Failed)
                | (Stopping, Failed)
        )
    }

    /// Check if requests can be sent in this state
    pub fn can_handle_requests(&self) -> bool {
        matches!(self, LifecycleState::Ready)
    }

    /// Check if this state cannot be left by `initialize`
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Failed)
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LifecycleState::Uninitialized,
            1 => LifecycleState::Starting,
            2 => LifecycleState::Ready,
            3 => LifecycleState::Stopping,
            4 => LifecycleState::Stopped,
            _ => LifecycleState::Failed,
        }
    }

    /// Get a human-readable description of this state
    pub fn description(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "Worker has not been started",
            LifecycleState::Starting => "Worker is starting",
            LifecycleState::Ready => "Worker is ready",
            LifecycleState::Stopping => "Worker is shutting down",
            LifecycleState::Stopped => "Worker has stopped",
            LifecycleState::Failed => "Worker has failed",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "Uninitialized"),
            LifecycleState::Starting => write!(f, "Starting"),
            LifecycleState::Ready => write!(f, "Ready"),
            LifecycleState::Stopping => write!(f, "Stopping"),
            LifecycleState::Stopped => write!(f, "Stopped"),
            LifecycleState::Failed => write!(f, "Failed"),
        }
    }
}
