//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    services::{
        stats::{format_focus_duration, SessionSummary},
        StoreError,
    },
    state::{Rejected, TimerSnapshot},
};

/// Response body for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl TimerResponse {
    /// Create a new timer response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The requested transition took place
    pub fn applied(message: String, timer: TimerSnapshot) -> Self {
        Self::new("applied".to_string(), message, timer)
    }

    /// The requested transition was not valid in the current state
    pub fn ignored(reason: Rejected, timer: TimerSnapshot) -> Self {
        Self::new("ignored".to_string(), reason.to_string(), timer)
    }

    /// Plain view of the timer
    pub fn current(timer: TimerSnapshot) -> Self {
        Self::new("ok".to_string(), "Current timer state".to_string(), timer)
    }
}

/// Session statistics with the derived figures the dashboard shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub completion_rate: u64,
    pub focus_hours: f64,
    pub total_focus: String,
}

impl From<SessionSummary> for SummaryResponse {
    fn from(summary: SessionSummary) -> Self {
        Self {
            completion_rate: summary.completion_rate(),
            focus_hours: summary.focus_hours(),
            total_focus: format_focus_duration(summary.total_duration),
            summary,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok(uptime: String) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
        }
    }
}

/// Error body for the session record endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::EmptyUpdate | StoreError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            StoreError::Lock(_) | StoreError::Http(_) => {
                error!("Session store failure: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
