//! Timer endpoint handlers

use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::info;

use super::responses::{HealthResponse, TimerResponse};
use crate::state::{AppState, Rejected, SessionKind, TaskId, TimerSnapshot};

/// Body for POST /timer/start
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

/// Body for PUT /timer/task
#[derive(Debug, Default, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub task_id: Option<TaskId>,
}

/// Body for PUT /timer/session-kind
#[derive(Debug, Deserialize)]
pub struct SessionKindRequest {
    pub kind: SessionKind,
}

fn respond(
    state: &AppState,
    message: &str,
    result: Result<TimerSnapshot, Rejected>,
) -> Json<TimerResponse> {
    match result {
        Ok(timer) => Json(TimerResponse::applied(message.to_string(), timer)),
        Err(reason) => {
            info!("Timer request ignored: {}", reason);
            Json(TimerResponse::ignored(reason, state.timer.snapshot()))
        }
    }
}

/// Handle GET /timer - Return the current timer state
pub async fn timer_status_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    Json(TimerResponse::current(state.timer.snapshot()))
}

/// Handle POST /timer/start - Start a session or resume a paused one
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Json<TimerResponse> {
    let result = state.timer.start(request.task_id);
    respond(&state, "Timer started", result)
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let result = state.timer.pause();
    respond(&state, "Timer paused", result)
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let result = state.timer.resume();
    respond(&state, "Timer resumed", result)
}

/// Handle POST /timer/stop - Abandon the current session
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let result = state.timer.stop();
    respond(&state, "Timer stopped", result)
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    let timer = state.timer.reset();
    Json(TimerResponse::applied("Timer reset".to_string(), timer))
}

/// Handle PUT /timer/session-kind - Choose the kind of the next session
pub async fn session_kind_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SessionKindRequest>,
) -> Json<TimerResponse> {
    let result = state.timer.set_session_kind(request.kind);
    respond(&state, &format!("Session kind set to {}", request.kind), result)
}

/// Handle PUT /timer/task - Choose the task the next session is attributed to
pub async fn task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> Json<TimerResponse> {
    let result = state.timer.set_task(request.task_id);
    respond(&state, "Task selected", result)
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(state.get_uptime()))
}
