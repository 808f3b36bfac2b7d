use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::{QueryParams, path_param};
use crate::state::AppState;
use services::metric_service::Statistics;

pub const DEFAULT_METRICS_LIMIT: u64 = 100;
pub const MAX_METRICS_LIMIT: u64 = 1000;

fn metrics_limit(query: &QueryParams) -> u64 {
    query
        .int("limit")
        .filter(|l| *l > 0)
        .map(|l| (l as u64).min(MAX_METRICS_LIMIT))
        .unwrap_or(DEFAULT_METRICS_LIMIT)
}

/// GET /api/metrics
///
/// Most recent samples across every series, newest first.
///
/// ### Query Parameters
/// - `limit` (optional): default 100, capped at 1000; a repeated key keeps the first value
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "count": 1,
///   "data": [
///     { "id": 7, "name": "active_users", "value": 312.0, "timestamp": "...", "metadata": { ... } }
///   ]
/// }
/// ```
pub async fn list_metrics(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<impl IntoResponse, ApiError> {
    let metrics = state
        .generator()
        .recent(metrics_limit(&query))
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch metrics"))?;

    let count = metrics.len();
    Ok(ApiResponse::success(metrics).with("count", json!(count)))
}

/// GET /api/metrics/{name}
///
/// Samples of one series inside the trailing window, with statistics.
///
/// ### Query Parameters
/// - `hours` (optional): window length, default 24
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "metric": "cpu_usage",
///   "period": "24 hours",
///   "statistics": { "count": 2, "min": 10.5, "max": 42.0, "average": 26.25, "latest": 42.0 },
///   "data": [ ... ]
/// }
/// ```
///
/// ### Errors
/// - 400 `Invalid metric name` when the segment is not valid UTF-8
/// - 404 when the series has no samples in the window
pub async fn metric_by_name(
    State(state): State<AppState>,
    name: Result<Path<String>, PathRejection>,
    query: QueryParams,
) -> Result<impl IntoResponse, ApiError> {
    let name = path_param(name, "Invalid metric name")?;
    let hours = query.hours();
    let metrics = state
        .generator()
        .by_name(&name, hours)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch metric data"))?;

    let values: Vec<f64> = metrics.iter().map(|m| m.value).collect();
    let Some(statistics) = Statistics::from_values(&values) else {
        return Err(ApiError::not_found(format!(
            "No metrics found for '{name}' in the last {hours} hours"
        )));
    };

    Ok(ApiResponse::success(metrics)
        .with("metric", json!(name))
        .with("period", json!(format!("{hours} hours")))
        .with("statistics", json!(statistics)))
}

/// GET /api/metrics/summary/all
///
/// One entry per fixed series. Series without samples in the window report
/// `{ "count": 0, "message": "No data available" }`.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "period": "24 hours",
///   "summary": {
///     "cpu_usage": { "count": 3, "latest": 41.2, "average": 38.1, "min": 30.0, "max": 43.1, "lastUpdated": "..." },
///     "error_rate": { "count": 0, "message": "No data available" }
///   },
///   "generatedAt": "..."
/// }
/// ```
pub async fn metrics_summary(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<impl IntoResponse, ApiError> {
    let hours = query.hours();
    let series = state
        .generator()
        .metrics()
        .summary(hours)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to generate metrics summary"))?;

    let mut summary = Map::new();
    for entry in series {
        let value = match (entry.statistics, entry.last_updated) {
            (Some(stats), Some(last_updated)) => json!({
                "count": stats.count,
                "latest": stats.latest,
                "average": stats.average,
                "min": stats.min,
                "max": stats.max,
                "lastUpdated": last_updated,
            }),
            _ => json!({ "count": 0, "message": "No data available" }),
        };
        summary.insert(entry.name.to_string(), value);
    }

    Ok(ApiResponse::ok()
        .with("period", json!(format!("{hours} hours")))
        .with("summary", Value::Object(summary))
        .with(
            "generatedAt",
            json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        ))
}
