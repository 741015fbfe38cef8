//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    duration::{format_time, DurationParts},
    services::DispatchOutcome,
    state::{CountdownState, NotificationService, Phase},
};

/// Window title shown while no countdown is running
pub const DEFAULT_TITLE: &str = "Countdown Timer";

/// Everything a front end needs to render the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    /// Remaining time as `HH:MM:SS`
    pub display: String,
    /// Document title: the remaining time while running
    pub title: String,
    pub remaining_seconds: u64,
    pub is_running: bool,
    pub phase: Phase,
    pub configured: DurationParts,
    /// Full-screen overlay keyed to the running state
    pub running_overlay: bool,
    /// Full-screen overlay shown once the countdown finished
    pub completed_overlay: bool,
}

impl TimerView {
    pub fn from_state(state: &CountdownState) -> Self {
        let display = format_time(state.remaining_seconds);
        let title = if state.is_running {
            display.clone()
        } else {
            DEFAULT_TITLE.to_string()
        };
        let phase = state.phase();

        Self {
            display,
            title,
            remaining_seconds: state.remaining_seconds,
            is_running: state.is_running,
            phase,
            configured: DurationParts::from_seconds(state.configured_seconds),
            running_overlay: phase == Phase::Running,
            completed_overlay: phase == Phase::Completed,
        }
    }
}

/// Response for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    pub fn new(message: impl Into<String>, state: &CountdownState) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            timer: TimerView::from_state(state),
        }
    }
}

/// Status response with timer and server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub notification_service: NotificationService,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Result of a test notification
#[derive(Debug, Clone, Serialize)]
pub struct TestNotificationResponse {
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    pub service: NotificationService,
    pub timestamp: DateTime<Utc>,
}

/// Error body returned alongside non-2xx status codes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
