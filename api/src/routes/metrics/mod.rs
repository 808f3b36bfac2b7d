//! # Metrics Routes Module
//!
//! Read access to the generated time series plus a manual generation trigger.
//! Metrics are append-only; there is no update or delete route.

use axum::{
    Router,
    routing::{get, post},
};
use get::{list_metrics, metric_by_name, metrics_summary};
use post::generate_metrics;

use crate::state::AppState;

pub mod get;
pub mod post;

/// Builds the `/metrics` route group.
///
/// - `GET /metrics` → `list_metrics`
/// - `GET /metrics/summary/all` → `metrics_summary`
/// - `POST /metrics/generate` → `generate_metrics`
/// - `GET /metrics/{name}` → `metric_by_name`
pub fn metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_metrics))
        .route("/summary/all", get(metrics_summary))
        .route("/generate", post(generate_metrics))
        .route("/{name}", get(metric_by_name))
}
