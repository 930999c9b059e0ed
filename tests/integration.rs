//! End-to-end tests for the SoftSync API tester
//!
//! These tests run the real HTTP stack against an in-process mock of the
//! SoftSync API bound to an ephemeral port, and verify:
//! 1. A healthy backend passes every step and produces a report file
//! 2. Gating failures halt the run
//! 3. Best-effort failures are recorded without stopping the script
//! 4. Transport failures become failure details, not errors

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};

use softsync_tester::testing::{
    self, ApiTester, Report, ResultLog, RunOutcome, Session, TestAccount, CREATE_EVENT,
    DELETE_EVENT, HEALTH_CHECK, NO_EVENT_ID, UPDATE_PROFILE,
};
use softsync_tester::ApiClient;

const REG_TOKEN: &str = "reg-token";
const LOGIN_TOKEN: &str = "login-token";

/// Knobs and counters of the mock backend
#[derive(Default)]
struct MockState {
    health_status: Option<u16>,
    health_delay: Option<Duration>,
    omit_onboarding: bool,
    omit_event_id: bool,
    registered_email: Option<String>,
    events: Vec<Value>,
    cycles: Vec<Value>,
    delete_calls: usize,
    requests: usize,
}

type Shared = Arc<Mutex<MockState>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {LOGIN_TOKEN}")[..])
}

async fn health(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let (status, delay) = {
        let mut s = state.lock().unwrap();
        s.requests += 1;
        (s.health_status.unwrap_or(200), s.health_delay)
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    (
        StatusCode::from_u16(status).unwrap(),
        Json(json!({"status": "healthy"})),
    )
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    s.registered_email = body["email"].as_str().map(str::to_string);
    Json(json!({"token": REG_TOKEN, "user_id": "user-1"}))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    if body["email"].as_str() != s.registered_email.as_deref() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Invalid credentials"})),
        );
    }
    (StatusCode::OK, Json(json!({"token": LOGIN_TOKEN})))
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({"email": s.registered_email, "name": "Test User"})))
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if !s.omit_onboarding {
        body["onboarding_complete"] = json!(true);
    }
    Ok(Json(body))
}

async fn create_event(State(state): State<Shared>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    if !s.omit_event_id {
        body["event_id"] = json!(format!("event-{}", s.events.len() + 1));
    }
    s.events.push(body.clone());
    Json(body)
}

async fn list_events(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    Json(Value::Array(s.events.clone()))
}

async fn parse_event(State(state): State<Shared>, Json(_body): Json<Value>) -> Json<Value> {
    state.lock().unwrap().requests += 1;
    Json(json!({"title": "Reunión de trabajo", "date": "2026-10-17", "time": "14:00"}))
}

async fn delete_event(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    s.delete_calls += 1;
    s.events.retain(|e| e["event_id"].as_str() != Some(id.as_str()));
    Json(json!({"message": "Event deleted"}))
}

async fn create_cycle(State(state): State<Shared>, Json(mut body): Json<Value>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    body["cycle_id"] = json!("cycle-1");
    s.cycles.push(body.clone());
    Json(body)
}

async fn list_cycles(State(state): State<Shared>) -> Json<Value> {
    let mut s = state.lock().unwrap();
    s.requests += 1;
    Json(Value::Array(s.cycles.clone()))
}

async fn prediction(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().requests += 1;
    Json(json!({"message": "Need at least 2 cycles for prediction"}))
}

async fn notifications(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().requests += 1;
    Json(json!([]))
}

async fn logout(State(state): State<Shared>) -> Json<Value> {
    state.lock().unwrap().requests += 1;
    Json(json!({"message": "Logged out"}))
}

/// Start the mock backend and return its base URL
async fn spawn_mock(state: MockState) -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(state));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/profile", put(update_profile))
        .route("/api/auth/logout", post(logout))
        .route("/api/events", post(create_event).get(list_events))
        .route("/api/events/parse", post(parse_event))
        .route("/api/events/:id", delete(delete_event))
        .route("/api/cycle", post(create_cycle).get(list_cycles))
        .route("/api/cycle/prediction", get(prediction))
        .route("/api/notifications/upcoming", get(notifications))
        .with_state(Arc::clone(&shared));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), shared)
}

fn account() -> TestAccount {
    TestAccount {
        email: "test_101010@example.com".to_string(),
        password: "TestPass123!".to_string(),
        name: "Test User".to_string(),
    }
}

fn tester(base_url: &str, timeout: Duration) -> ApiTester {
    let client = ApiClient::new(base_url, timeout).expect("Failed to build client");
    let session = Session::new(account(), NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
    ApiTester::new(client, session, ResultLog::quiet())
}

fn result_names(t: &ApiTester) -> Vec<String> {
    t.log().results().iter().map(|r| r.name.clone()).collect()
}

#[tokio::test]
async fn test_healthy_backend_passes_and_writes_report() {
    let (url, state) = spawn_mock(MockState::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let report_path: PathBuf = dir.path().join("test_reports").join("results.json");

    let client = ApiClient::new(&url, Duration::from_secs(5)).unwrap();
    let outcome = testing::run_with_client(client, account(), Some(report_path.clone()))
        .await
        .expect("Run should not error");

    assert_eq!(outcome.outcome, RunOutcome::Completed);
    assert!(outcome.passed(), "failures: {:?}", outcome.summary.failures);
    assert_eq!(outcome.summary.total, 14);
    assert_eq!(state.lock().unwrap().delete_calls, 1);

    let report = Report::load(&report_path).expect("Report should be written");
    assert_eq!(report.total_tests, 14);
    assert_eq!(report.passed_tests, 14);
    assert_eq!(report.success_rate, 1.0);
    assert_eq!(report.results[0].name, HEALTH_CHECK);
}

#[tokio::test]
async fn test_best_effort_failure_completes_but_does_not_pass() {
    let (url, _state) = spawn_mock(MockState {
        omit_event_id: true,
        ..MockState::default()
    })
    .await;

    let client = ApiClient::new(&url, Duration::from_secs(5)).unwrap();
    let outcome = testing::run_with_client(client, account(), None)
        .await
        .expect("Run should not error");

    assert_eq!(outcome.outcome, RunOutcome::Completed);
    assert!(!outcome.passed());
    assert_eq!(outcome.summary.total, 14);
    assert_eq!(outcome.summary.failed(), 2);
    assert!(outcome.report_path.is_none());
}

#[tokio::test]
async fn test_halted_run_does_not_pass_and_still_writes_report() {
    let (url, _state) = spawn_mock(MockState {
        health_status: Some(503),
        ..MockState::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let report_path = dir.path().join("results.json");

    let client = ApiClient::new(&url, Duration::from_secs(5)).unwrap();
    let outcome = testing::run_with_client(client, account(), Some(report_path.clone()))
        .await
        .expect("Run should not error");

    assert_eq!(
        outcome.outcome,
        RunOutcome::Halted {
            step: "Health check"
        }
    );
    assert!(!outcome.passed());

    let report = Report::load(&report_path).unwrap();
    assert_eq!(report.total_tests, 1);
    assert_eq!(report.passed_tests, 0);
    assert_eq!(report.success_rate, 0.0);
}

#[tokio::test]
async fn test_health_failure_halts_run() {
    let (url, state) = spawn_mock(MockState {
        health_status: Some(503),
        ..MockState::default()
    })
    .await;
    let mut t = tester(&url, Duration::from_secs(5));

    let outcome = t.run_all().await;

    assert_eq!(
        outcome,
        RunOutcome::Halted {
            step: "Health check"
        }
    );
    assert_eq!(result_names(&t), vec![HEALTH_CHECK]);
    assert_eq!(state.lock().unwrap().requests, 1);
    assert!(t.log().results()[0]
        .details
        .starts_with("Expected 200, got 503. Response:"));
}

#[tokio::test]
async fn test_missing_onboarding_flag_fails_profile_update_and_halts() {
    let (url, _state) = spawn_mock(MockState {
        omit_onboarding: true,
        ..MockState::default()
    })
    .await;
    let mut t = tester(&url, Duration::from_secs(5));

    let outcome = t.run_all().await;

    assert_eq!(
        outcome,
        RunOutcome::Halted {
            step: "Profile update"
        }
    );
    let last = t.log().results().last().unwrap();
    assert_eq!(last.name, UPDATE_PROFILE);
    assert!(!last.success);
    assert!(last.details.contains(r#""country":"MX""#));
    assert!(!last.details.contains("onboarding_complete"));
    assert_eq!(t.log().tests_passed(), 4);
}

#[tokio::test]
async fn test_missing_event_id_skips_delete_call() {
    let (url, state) = spawn_mock(MockState {
        omit_event_id: true,
        ..MockState::default()
    })
    .await;
    let mut t = tester(&url, Duration::from_secs(5));

    let outcome = t.run_all().await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(t.log().tests_run(), 14);

    let failed: Vec<_> = t.log().failures().map(|r| r.name.as_str()).collect();
    assert_eq!(failed, vec![CREATE_EVENT, DELETE_EVENT]);

    let delete = t
        .log()
        .results()
        .iter()
        .find(|r| r.name == DELETE_EVENT)
        .unwrap();
    assert_eq!(delete.details, NO_EVENT_ID);
    assert_eq!(state.lock().unwrap().delete_calls, 0);
}

#[tokio::test]
async fn test_session_token_follows_login() {
    let (url, _state) = spawn_mock(MockState::default()).await;
    let mut t = tester(&url, Duration::from_secs(5));

    assert!(t.test_health_check().await);
    assert!(t.test_user_registration().await);
    assert_eq!(t.session().token(), Some(REG_TOKEN));
    assert_eq!(t.session().user_id.as_deref(), Some("user-1"));

    assert!(t.test_user_login().await);
    assert_eq!(t.session().token(), Some(LOGIN_TOKEN));

    // The mock only accepts the login token
    assert!(t.test_get_user_profile().await);
}

#[tokio::test]
async fn test_unauthenticated_profile_fetch_fails_server_side() {
    let (url, _state) = spawn_mock(MockState::default()).await;
    let mut t = tester(&url, Duration::from_secs(5));

    assert!(!t.test_get_user_profile().await);
    assert!(t.log().results()[0]
        .details
        .starts_with("Expected 200, got 401."));
}

#[tokio::test]
async fn test_connection_refused_is_recorded() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut t = tester(&format!("http://{addr}"), Duration::from_secs(5));
    let outcome = t.run_all().await;

    assert!(matches!(outcome, RunOutcome::Halted { .. }));
    let result = &t.log().results()[0];
    assert_eq!(result.details, "Connection error");
    assert_eq!(result.response_data, json!("Connection error"));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let (url, _state) = spawn_mock(MockState {
        health_delay: Some(Duration::from_secs(3)),
        ..MockState::default()
    })
    .await;
    let mut t = tester(&url, Duration::from_millis(200));

    assert!(!t.test_health_check().await);
    assert_eq!(t.log().results()[0].details, "Request timeout");
}
