use std::time::Instant;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};
use util::config::AppConfig;
use util::system_health::sample_system_snapshot;

use crate::state::AppState;

/// Builds the `/health` route group.
///
/// - `GET /health` → liveness with database round trip
/// - `GET /health/detailed` → per-check report
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/detailed", get(detailed_health_check))
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Pings the database and returns the round trip in milliseconds.
async fn ping_db(state: &AppState) -> Result<u128, sea_orm::DbErr> {
    let started = Instant::now();
    state.db().ping().await?;
    Ok(started.elapsed().as_millis())
}

/// GET /health
///
/// ### Response: 200 OK
/// ```json
/// {
///   "status": "healthy",
///   "timestamp": "2025-01-01T00:00:00.000Z",
///   "uptime": 12.5,
///   "database": { "status": "connected", "responseTime": "1ms" },
///   "memory": { "rss": 1024, "virtual": 4096, "systemTotal": 8192, "systemUsed": 2048 },
///   "version": "1.0.0"
/// }
/// ```
///
/// ### Response: 503 Service Unavailable
/// `{ "status": "unhealthy", "timestamp": "...", "error": "Database connection failed" }`
pub async fn health_check(State(state): State<AppState>) -> Response {
    match ping_db(&state).await {
        Ok(ms) => {
            let snapshot = sample_system_snapshot();
            Json(json!({
                "status": "healthy",
                "timestamp": now_rfc3339(),
                "uptime": state.uptime_secs(),
                "database": {
                    "status": "connected",
                    "responseTime": format!("{ms}ms"),
                },
                "memory": snapshot.memory_json(),
                "version": AppConfig::global().version.clone(),
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": now_rfc3339(),
                    "error": "Database connection failed",
                })),
            )
                .into_response()
        }
    }
}

/// GET /health/detailed
///
/// Runs the `database` (pass/fail) and `memory` (pass/warn) checks. Any check
/// other than `pass` turns the response into 503 with status `degraded`.
pub async fn detailed_health_check(State(state): State<AppState>) -> Response {
    let mut checks: Vec<Value> = Vec::with_capacity(2);

    checks.push(match ping_db(&state).await {
        Ok(ms) => json!({
            "name": "database",
            "status": "pass",
            "responseTime": format!("{ms}ms"),
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Database check failed");
            json!({ "name": "database", "status": "fail", "error": e.to_string() })
        }
    });

    let snapshot = sample_system_snapshot();
    checks.push(json!({
        "name": "memory",
        "status": snapshot.memory_status(),
        "usage": format!("{}%", snapshot.memory_usage_pct().round()),
        "details": snapshot.memory_json(),
    }));

    let all_passed = checks.iter().all(|c| c["status"] == "pass");
    let status = if all_passed {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if all_passed { "healthy" } else { "degraded" },
            "timestamp": now_rfc3339(),
            "checks": checks,
            "system": {
                "uptime": state.uptime_secs(),
                "platform": snapshot.platform,
                "pid": snapshot.pid,
                "loadAverage": [snapshot.load_one, snapshot.load_five, snapshot.load_fifteen],
                "hostUptime": snapshot.host_uptime_seconds,
                "version": AppConfig::global().version.clone(),
            },
        })),
    )
        .into_response()
}
