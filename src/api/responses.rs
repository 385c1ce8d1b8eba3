//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    collection::Counts,
    timer::{Band, Timer, TimerStatus},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body of POST /timers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTimerRequest {
    #[serde(default)]
    pub name: String,
    pub duration_seconds: Option<u64>,
    pub metadata: Option<Value>,
}

/// Body of POST /timers/:name/rename
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub new_name: String,
}

/// Query of GET /timers
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_group_active_first")]
    pub group_active_first: bool,
}

fn default_group_active_first() -> bool {
    true
}

/// Query of DELETE /timers/:name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveQuery {
    #[serde(default)]
    pub force: bool,
}

/// Presentation view of a single timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub name: String,
    pub duration_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
    pub status: TimerStatus,
    pub finished: bool,
    pub band: Band,
    pub display: String,
    pub progress: f64,
    pub metadata: Option<Value>,
}

impl From<&Timer> for TimerView {
    fn from(timer: &Timer) -> Self {
        Self {
            name: timer.name().to_string(),
            duration_seconds: timer.initial_duration_secs(),
            remaining_seconds: timer.remaining_secs(),
            running: timer.is_running(),
            status: timer.status(),
            finished: timer.is_finished(),
            band: timer.band(),
            display: timer.display_text(),
            progress: timer.progress_fraction(),
            metadata: timer.metadata().cloned(),
        }
    }
}

/// Listing of timers in presentation order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerListResponse {
    pub timers: Vec<TimerView>,
    pub counts: Counts,
}

/// Result of POST /clear-finished
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearFinishedResponse {
    pub removed: Vec<String>,
    pub counts: Counts,
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Status response with counts and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub counts: Counts,
    pub default_duration_seconds: u64,
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
            version: VERSION.to_string(),
        }
    }
}
