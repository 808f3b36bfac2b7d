use std::sync::Arc;
use std::time::Duration;

use api::rate_limit::RateLimitPolicy;
use api::state::AppState;
use api::{app, app_with_limits};
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use db::test_utils::setup_test_db;
use serde_json::Value;
use services::MetricGenerator;

/// Fresh in-memory database plus the full router with the default limits.
/// The periodic generator is built but never started.
pub async fn make_test_app() -> (Router, AppState) {
    let state = test_state().await;
    (app(state.clone()), state)
}

/// Same as [`make_test_app`] but with custom limiter policies.
pub async fn make_test_app_with_limits(
    global: RateLimitPolicy,
    strict: RateLimitPolicy,
) -> (Router, AppState) {
    let state = test_state().await;
    (app_with_limits(state.clone(), global, strict), state)
}

async fn test_state() -> AppState {
    let db = setup_test_db().await;
    let generator = Arc::new(MetricGenerator::with_interval(
        db.clone(),
        Duration::from_secs(3600),
    ));
    AppState::with_generator(db, generator)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    json_request("POST", uri, body.to_string())
}

pub fn put_json(uri: &str, body: Value) -> Request<Body> {
    json_request("PUT", uri, body.to_string())
}

pub fn json_request(method: &str, uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub async fn get_json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
