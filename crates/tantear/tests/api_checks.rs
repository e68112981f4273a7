//! Black-box API checks.
//!
//! The suite under test points at an echo/status service; here that service
//! is an in-process server so the checks are hermetic. Each check is an
//! independent request/assert pair with no retry: a failed assertion is the
//! terminal outcome.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use tantear::{init_test_tracing, ApiClient, RESPONSE_TIME_BUDGET};

fn valid_credentials() -> Value {
    json!({"email": "test@example.com", "password": "Password123"})
}

// ============================================================================
// In-process echo service
// ============================================================================

async fn echo_post(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "json": body }))
}

async fn echo_get(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "args": params }))
}

async fn status_code(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Start the echo service on an ephemeral port, serving from its own thread
/// and runtime so the blocking client in the test body stays synchronous.
fn start_echo_service() -> String {
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/post", post(echo_post))
                .route("/get", get(echo_get))
                .route("/status/{code}", get(status_code));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind echo service");
            tx.send(listener.local_addr().expect("local addr"))
                .expect("report addr");
            axum::serve(listener, app).await.expect("serve");
        });
    });
    let addr = rx.recv().expect("echo service address");
    format!("http://{addr}")
}

fn client() -> ApiClient {
    init_test_tracing();
    ApiClient::new(start_echo_service()).expect("api client")
}

// ============================================================================
// POST echo checks
// ============================================================================

#[test]
fn test_login_api_valid_credentials() {
    let api = client();
    let response = api.post_json("/post", &valid_credentials()).unwrap();

    response.expect_status(200).unwrap();
    let body = response.json().unwrap();
    assert_eq!(body["json"]["email"], "test@example.com");
}

#[test]
fn test_api_empty_request_body() {
    let api = client();
    let response = api.post_json("/post", &json!({})).unwrap();

    response.expect_status(200).unwrap();
    assert_eq!(response.json().unwrap()["json"], json!({}));
}

#[test]
fn test_login_api_incomplete_data() {
    let api = client();
    let response = api
        .post_json("/post", &json!({"email": "test@example.com"}))
        .unwrap();

    response.expect_status(200).unwrap();
    let echoed = &response.json().unwrap()["json"];
    assert_eq!(echoed["email"], "test@example.com");
    assert!(echoed.get("password").is_none());
}

// ============================================================================
// Response metadata checks
// ============================================================================

#[test]
fn test_api_content_type_header() {
    let api = client();
    let response = api.post_json("/post", &valid_credentials()).unwrap();

    response.expect_content_type("application/json").unwrap();
}

#[test]
fn test_api_response_time() {
    let api = client();
    let response = api.post_json("/post", &valid_credentials()).unwrap();

    response.expect_elapsed_under(RESPONSE_TIME_BUDGET).unwrap();
}

// ============================================================================
// GET and status checks
// ============================================================================

#[test]
fn test_get_user_profile_success() {
    let api = client();
    let response = api
        .get_with_query("/get", &[("user_id", "123"), ("include", "profile")])
        .unwrap();

    response.expect_status(200).unwrap();
    assert_eq!(response.json().unwrap()["args"]["user_id"], "123");
}

#[test]
fn test_error_status_code_400() {
    let api = client();
    let response = api.get("/status/400").unwrap();
    response.expect_status(400).unwrap();
}

#[test]
fn test_error_status_code_401() {
    let api = client();
    let response = api.get("/status/401").unwrap();
    response.expect_status(401).unwrap();
}

#[test]
fn test_get_nonexistent_resource() {
    let api = client();
    let response = api.get("/status/404").unwrap();
    response.expect_status(404).unwrap();
}
