//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness and detailed checks
//! - `/metrics` → generated time series, summary and manual generation
//! - `/users` → user CRUD, behind the strict rate limiter

use std::sync::Arc;

use axum::{Json, Router, middleware::from_fn_with_state, response::IntoResponse};
use serde_json::json;
use util::config::AppConfig;

use crate::rate_limit::{RateLimiter, enforce_rate_limit};
use crate::routes::{health::health_routes, metrics::metrics_routes, users::users_routes};
use crate::state::AppState;

pub mod common;
pub mod health;
pub mod metrics;
pub mod users;

/// Builds every `/api` route group. `strict` throttles the users group on top
/// of whatever limiter wraps the whole application.
pub fn routes(strict: Arc<RateLimiter>) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/metrics", metrics_routes())
        .nest(
            "/users",
            users_routes().layer(from_fn_with_state(strict, enforce_rate_limit)),
        )
}

/// GET /
///
/// Service descriptor listing the top-level route groups.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Metrics and users REST service",
        "version": AppConfig::global().version.clone(),
        "endpoints": ["/api/health", "/api/metrics", "/api/users"],
    }))
}
