//! HTTP API module
//!
//! This module contains the timer and session record endpoint handlers and
//! their response structures.

pub mod handlers;
pub mod records;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;
use records::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_status_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/stop", post(stop_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/session-kind", put(session_kind_handler))
        .route("/timer/task", put(task_handler))
        // Session records
        .route(
            "/api/pomodoro",
            get(list_sessions_handler).post(create_session_handler),
        )
        .route("/api/pomodoro/stats/summary", get(summary_handler))
        .route("/api/pomodoro/stats/daily", get(daily_handler))
        .route("/api/pomodoro/stats/timeline", get(timeline_handler))
        .route(
            "/api/pomodoro/:id",
            get(get_session_handler)
                .patch(update_session_handler)
                .delete(delete_session_handler),
        )
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
