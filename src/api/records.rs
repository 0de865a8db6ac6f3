//! Session record endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::responses::SummaryResponse;
use crate::{
    services::{
        stats::{self, DailyStats, Period, TimelineStats},
        SessionFilter, StoreError,
    },
    state::{AppState, NewSession, RecordId, SessionRecord, SessionUpdate},
};

/// Query for GET /api/pomodoro/stats/summary
#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub user_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Query for GET /api/pomodoro/stats/daily
#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    pub user_id: Option<i64>,
    pub days: Option<i64>,
}

/// Query for GET /api/pomodoro/stats/timeline
#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub user_id: Option<i64>,
    pub period: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

const DEFAULT_DAILY_WINDOW: i64 = 7;

/// Handle GET /api/pomodoro - List session records
pub async fn list_sessions_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SessionFilter>,
) -> Result<Json<Vec<SessionRecord>>, StoreError> {
    state.records.list(&filter).map(Json)
}

/// Handle POST /api/pomodoro - Create a session record
pub async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    Json(session): Json<NewSession>,
) -> Result<(StatusCode, Json<SessionRecord>), StoreError> {
    let record = state.records.create(session)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handle GET /api/pomodoro/:id
pub async fn get_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<SessionRecord>, StoreError> {
    state.records.get(id).map(Json)
}

/// Handle PATCH /api/pomodoro/:id - Update completion and/or duration
pub async fn update_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(update): Json<SessionUpdate>,
) -> Result<Json<SessionRecord>, StoreError> {
    state.records.update(id, update).map(Json)
}

/// Handle DELETE /api/pomodoro/:id
pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, StoreError> {
    state.records.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /api/pomodoro/stats/summary
pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryResponse>, StoreError> {
    let records = state.records.list(&SessionFilter {
        user_id: query.user_id,
        task_id: None,
        start_date: query.start_date,
        end_date: query.end_date,
    })?;
    Ok(Json(stats::summarize(&records).into()))
}

/// Handle GET /api/pomodoro/stats/daily - Per-day totals for the last `days` days
pub async fn daily_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<Vec<DailyStats>>, StoreError> {
    let records = state.records.list(&SessionFilter {
        user_id: query.user_id,
        ..Default::default()
    })?;
    let days = query.days.unwrap_or(DEFAULT_DAILY_WINDOW);
    let stats = stats::daily(&records, days, Utc::now())
        .ok_or_else(|| StoreError::InvalidQuery(format!("days out of range: {}", days)))?;
    Ok(Json(stats))
}

/// Handle GET /api/pomodoro/stats/timeline - Totals per day, week, month or year
pub async fn timeline_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<Vec<TimelineStats>>, StoreError> {
    let records = state.records.list(&SessionFilter {
        user_id: query.user_id,
        task_id: None,
        start_date: query.start_date,
        end_date: query.end_date,
    })?;
    let period = query.period.as_deref().map(Period::parse).unwrap_or_default();
    Ok(Json(stats::timeline(&records, period)))
}
