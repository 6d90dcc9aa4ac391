//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    audio::{AudioReference, PlayerState},
    state::{CountdownState, TimerInput, TimerPhase},
};

/// Body of `POST /input` and the optional body of `POST /start`
///
/// Missing fields count as 0, negative ones are coerced to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputRequest {
    pub hours: Option<i64>,
    pub minutes: Option<i64>,
    pub seconds: Option<i64>,
}

impl InputRequest {
    pub fn to_input(&self) -> TimerInput {
        TimerInput::from_signed(
            self.hours.unwrap_or(0),
            self.minutes.unwrap_or(0),
            self.seconds.unwrap_or(0),
        )
    }
}

/// Body of `POST /sound`; no path selects the bundled alarm
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundRequest {
    pub path: Option<String>,
}

/// Countdown view shared by every response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub phase: TimerPhase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub remaining: String,
}

impl From<&CountdownState> for TimerView {
    fn from(state: &CountdownState) -> Self {
        Self {
            phase: state.phase,
            running: state.is_running(),
            remaining_seconds: state.remaining_seconds,
            remaining: state.formatted(),
        }
    }
}

/// API response structure for action endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: &CountdownState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    /// Create a success response
    pub fn ok(message: String, timer: &CountdownState) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: &CountdownState) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Full status of the timer screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub input: TimerInput,
    pub sound: AudioReference,
    pub player: PlayerState,
    /// Clip bound to the current run, which may differ from a newer `sound`
    pub player_sound: Option<AudioReference>,
    pub player_error: Option<String>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
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
