use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use focus_timer::{
    api::create_router,
    services::{InMemorySessionStore, SessionStore},
    state::AppState,
    timer::FocusTimer,
};

fn test_app() -> (Router, FocusTimer, Arc<InMemorySessionStore>) {
    let records = Arc::new(InMemorySessionStore::new());
    let store: Arc<dyn SessionStore> = records.clone();
    let timer = FocusTimer::new(store);
    let state = Arc::new(AppState::new(
        timer.clone(),
        records.clone(),
        20554,
        "127.0.0.1".to_string(),
    ));
    (create_router(state), timer, records)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime"].is_string());
}

#[tokio::test]
async fn idle_timer_shows_full_work_session() {
    let (app, _, _) = test_app();
    let (status, body) = send(&app, Method::GET, "/timer", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["session_kind"], "work");
    assert_eq!(body["timer"]["formatted_time"], "25:00");
    assert_eq!(body["timer"]["progress_percent"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn start_opens_a_record_and_second_start_is_ignored() {
    let (app, timer, _) = test_app();

    let (status, body) = send(&app, Method::POST, "/timer/start", Some(json!({"task_id": 4}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["status"], "running");
    assert_eq!(body["timer"]["active_task_id"], 4);

    let (_, body) = send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["message"], "timer is already running");

    timer.settle().await;
    let (status, records) = send(&app, Method::GET, "/api/pomodoro", None).await;
    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["task_id"], 4);
    assert_eq!(records[0]["duration"], 1500);
    assert_eq!(records[0]["session_type"], "work");
    assert_eq!(records[0]["completed"], false);
}

#[tokio::test(start_paused = true)]
async fn stop_after_pause_records_elapsed_time() {
    let (app, timer, records) = test_app();

    send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    tokio::time::sleep(Duration::from_millis(10_500)).await;

    let (_, body) = send(&app, Method::POST, "/timer/pause", None).await;
    assert_eq!(body["timer"]["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 1490);
    assert_eq!(body["timer"]["formatted_time"], "24:50");

    let (_, body) = send(&app, Method::POST, "/timer/stop", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 1500);

    timer.settle().await;
    let record = records.get(1).unwrap();
    assert!(!record.completed);
    assert_eq!(record.duration, 10);
}

#[tokio::test(start_paused = true)]
async fn resume_through_start_keeps_one_record() {
    let (app, timer, records) = test_app();

    send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    send(&app, Method::POST, "/timer/pause", None).await;

    let (_, body) = send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["status"], "running");

    let (_, body) = send(&app, Method::POST, "/timer/resume", None).await;
    assert_eq!(body["status"], "ignored");

    timer.settle().await;
    assert_eq!(records.list(&Default::default()).unwrap().len(), 1);
}

#[tokio::test]
async fn session_kind_and_task_selection() {
    let (app, _, _) = test_app();

    let (_, body) = send(
        &app,
        Method::PUT,
        "/timer/session-kind",
        Some(json!({"kind": "long_break"})),
    )
    .await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["session_kind"], "long_break");
    assert_eq!(body["timer"]["remaining_seconds"], 900);

    let (_, body) = send(&app, Method::PUT, "/timer/task", Some(json!({"task_id": 9}))).await;
    assert_eq!(body["timer"]["active_task_id"], 9);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/timer/session-kind",
        Some(json!({"kind": "nap"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn session_kind_is_locked_while_running() {
    let (app, timer, _) = test_app();

    send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    let (_, body) = send(
        &app,
        Method::PUT,
        "/timer/session-kind",
        Some(json!({"kind": "short_break"})),
    )
    .await;
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["message"], "a session is in progress");
    assert_eq!(body["timer"]["session_kind"], "work");

    let (_, body) = send(&app, Method::POST, "/timer/reset", None).await;
    assert_eq!(body["timer"]["status"], "idle");
    timer.shutdown().await;
}

#[tokio::test]
async fn record_crud() {
    let (app, _, _) = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/pomodoro",
        Some(json!({"task_id": 3, "session_type": "short_break", "duration": 300})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["completed_at"], Value::Null);

    let (status, fetched) = send(&app, Method::GET, "/api/pomodoro/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["session_type"], "short_break");

    let (status, body) = send(&app, Method::PATCH, "/api/pomodoro/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no fields to update");

    let (status, updated) = send(
        &app,
        Method::PATCH,
        "/api/pomodoro/1",
        Some(json!({"completed": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["completed"], true);
    assert!(updated["completed_at"].is_string());
    assert_eq!(updated["duration"], 300);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/pomodoro/2",
        Some(json!({"duration": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/api/pomodoro/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, "/api/pomodoro/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session record 1 not found");
}

#[tokio::test]
async fn list_filters_by_task() {
    let (app, _, _) = test_app();
    for task in [1, 2, 1] {
        send(&app, Method::POST, "/api/pomodoro", Some(json!({"task_id": task}))).await;
    }

    let (_, body) = send(&app, Method::GET, "/api/pomodoro?task_id=1", None).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r["task_id"] == 1));
}

#[tokio::test]
async fn stats_endpoints() {
    let (app, _, _) = test_app();
    let sessions = [
        json!({"session_type": "work", "duration": 1500, "completed": true}),
        json!({"session_type": "work", "duration": 1500, "completed": true}),
        json!({"session_type": "short_break", "duration": 300, "completed": true}),
        json!({"session_type": "work", "duration": 700}),
    ];
    for session in sessions {
        send(&app, Method::POST, "/api/pomodoro", Some(session)).await;
    }

    let (status, summary) = send(&app, Method::GET, "/api/pomodoro/stats/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_sessions"], 4);
    assert_eq!(summary["completed_sessions"], 3);
    assert_eq!(summary["total_duration"], 3300);
    assert_eq!(summary["work_sessions"], 2);
    assert_eq!(summary["short_break_sessions"], 1);
    assert_eq!(summary["completion_rate"], 75);
    assert_eq!(summary["total_focus"], "55m");

    let (status, daily) = send(&app, Method::GET, "/api/pomodoro/stats/daily?days=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let daily = daily.as_array().unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0]["total_sessions"], 4);
    assert_eq!(daily[0]["completed_sessions"], 3);

    let (status, timeline) = send(
        &app,
        Method::GET,
        "/api/pomodoro/stats/timeline?period=year",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let timeline = timeline.as_array().unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline[0]["work_duration"], 3000);
    assert_eq!(timeline[0]["short_break_duration"], 300);
    assert!(timeline[0]["period"].as_str().unwrap().ends_with("-01-01"));
}

#[tokio::test]
async fn daily_stats_reject_out_of_range_windows() {
    let (app, _, _) = test_app();
    send(&app, Method::POST, "/api/pomodoro", Some(json!({"completed": true}))).await;

    for days in ["1000000000", "-3", "9223372036854775807"] {
        let uri = format!("/api/pomodoro/stats/daily?days={}", days);
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], format!("invalid query: days out of range: {}", days));
    }

    let (status, daily) = send(&app, Method::GET, "/api/pomodoro/stats/daily", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(daily.as_array().unwrap().len(), 1);
}
