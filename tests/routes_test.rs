// ABOUTME: HTTP-level tests driving the assembled router end to end
// ABOUTME: Covers signup/login, auth rejection, goal lifecycle, and progress preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 TrainLog

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use trainlog_server::auth::AuthManager;
use trainlog_server::config::environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig,
};
use trainlog_server::database::Database;
use trainlog_server::server::{HttpServer, ServerResources};

async fn test_router() -> Router {
    let config = ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        log_level: LogLevel::Info,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: Some("routes-test-secret".into()),
            jwt_expiry_hours: 24,
        },
        cors_origin: "*".into(),
    };

    let database = Database::new("sqlite::memory:").await.unwrap();
    let auth_manager = AuthManager::new(b"routes-test-secret".to_vec(), 24);
    let resources = Arc::new(ServerResources::new(
        database,
        auth_manager,
        Arc::new(config),
    ));

    HttpServer::new(resources).router()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register and log in a user, returning their bearer token
async fn signup_and_login(router: &Router, email: &str) -> String {
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/signup",
            None,
            &json!({ "email": email, "password": "hunter42x", "display_name": "Tester" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            &json!({ "email": email, "password": "hunter42x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["jwt_token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let router = test_router().await;

    let response = router.clone().oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");

    let response = router.oneshot(get_request("/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signup_rejects_weak_credentials() {
    let router = test_router().await;

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/auth/signup",
            None,
            &json!({ "email": "not-an-email", "password": "hunter42x" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/auth/signup",
            None,
            &json!({ "email": "weak@pass.io", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let router = test_router().await;
    signup_and_login(&router, "wrongpw@test.io").await;

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/auth/login",
            None,
            &json!({ "email": "wrongpw@test.io", "password": "incorrect1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let router = test_router().await;

    for uri in ["/api/goals", "/api/strength", "/api/cardio", "/api/users"] {
        let response = router.clone().oneshot(get_request(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[tokio::test]
async fn goal_lifecycle_keeps_progress_derived() {
    let router = test_router().await;
    let token = signup_and_login(&router, "lifecycle@test.io").await;
    let deadline = (chrono::Utc::now() + chrono::Duration::days(90)).to_rfc3339();

    // Create: derived progress starts at 0; a client-sent progress value is ignored
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/goals",
            Some(&token),
            &json!({
                "name": "Bench press 100kg",
                "metric": "strength",
                "direction": "ascending",
                "start_value": 80.0,
                "target": 100.0,
                "current": 80.0,
                "deadline": deadline,
                "priority": "high"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let goal = body_json(response).await;
    assert_eq!(goal["progress"], 0);
    let goal_id = goal["id"].as_i64().unwrap();

    // Update current: progress recomputes to the midpoint
    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            &format!("/api/goals/{goal_id}"),
            Some(&token),
            &json!({ "current": 90.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let goal = body_json(response).await;
    assert_eq!(goal["progress"], 50);

    // Append a measurement: history grows and progress follows
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/goals/{goal_id}/progress"),
            Some(&token),
            &json!({ "value": 95.0, "notes": "strong session" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let goal = body_json(response).await;
    assert_eq!(goal["progress"], 75);
    assert_eq!(goal["history"].as_array().unwrap().len(), 1);

    // Stats see the goal
    let response = router
        .clone()
        .oneshot(get_request("/api/goals/stats/summary", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["summary"]["total_goals"], 1);

    // Delete
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/goals/{goal_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get_request(&format!("/api/goals/{goal_id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preview_matches_persisted_progress() {
    let router = test_router().await;
    let token = signup_and_login(&router, "preview@test.io").await;

    // Preview for unsaved form state
    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/goals/preview",
            Some(&token),
            &json!({
                "start_value": 90.0,
                "current": 80.0,
                "target": 70.0,
                "direction": "descending"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let preview = body_json(response).await;
    assert_eq!(preview["progress"], 50);

    // Persisting the same values stores the same percentage
    let deadline = (chrono::Utc::now() + chrono::Duration::days(30)).to_rfc3339();
    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/goals",
            Some(&token),
            &json!({
                "name": "Cut to 70kg",
                "metric": "weight_loss",
                "direction": "descending",
                "start_value": 90.0,
                "target": 70.0,
                "current": 80.0,
                "deadline": deadline
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let goal = body_json(response).await;
    assert_eq!(goal["progress"], preview["progress"]);
}

#[tokio::test]
async fn goal_with_past_deadline_is_rejected() {
    let router = test_router().await;
    let token = signup_and_login(&router, "pastdue@test.io").await;
    let deadline = (chrono::Utc::now() - chrono::Duration::days(1)).to_rfc3339();

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/goals",
            Some(&token),
            &json!({
                "name": "Too late",
                "target": 100.0,
                "deadline": deadline
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn strength_workout_flow() {
    let router = test_router().await;
    let token = signup_and_login(&router, "lifter@test.io").await;

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/strength",
            Some(&token),
            &json!({
                "date": chrono::Utc::now().to_rfc3339(),
                "name": "Push day",
                "duration_minutes": 45,
                "rpe": 8,
                "exercises": [
                    { "name": "Bench press", "sets": [
                        { "weight": 80.0, "reps": 5 },
                        { "weight": 85.0, "reps": 3 }
                    ]}
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let workout = body_json(response).await;
    assert_eq!(workout["total_volume"], 655.0);

    let response = router
        .oneshot(get_request("/api/strength/records", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    assert_eq!(records["max_weight"]["Bench press"]["weight"], 85.0);
}

#[tokio::test]
async fn profile_update_round_trips() {
    let router = test_router().await;
    let token = signup_and_login(&router, "profile@test.io").await;

    let response = router
        .clone()
        .oneshot(json_request(
            Method::PUT,
            "/api/users",
            Some(&token),
            &json!({ "age": 30, "weight_kg": 82.5, "distance_unit": "mi" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get_request("/api/users", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["age"], 30);
    assert_eq!(profile["weight_kg"], 82.5);
    assert_eq!(profile["distance_unit"], "mi");
}

#[tokio::test]
async fn schedule_week_replacement() {
    let router = test_router().await;
    let token = signup_and_login(&router, "planner@test.io").await;

    let response = router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/schedule/weekly",
            Some(&token),
            &json!({
                "week_start": "2025-11-03",
                "schedules": [
                    { "day": "Mon", "session_type": "strength", "details": "Push day" },
                    { "day": "Wed", "session_type": "cardio", "details": "Easy run" }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved.as_array().unwrap().len(), 2);

    let response = router
        .oneshot(get_request(
            "/api/schedule/weekly?week_start=2025-11-03",
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let week = body_json(response).await;
    assert_eq!(week.as_array().unwrap().len(), 2);
    assert_eq!(week[0]["day"], "Mon");
}
