use axum::{extract::State, response::IntoResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

/// POST /api/metrics/generate
///
/// Runs one generation cycle on the request task and waits for it, regardless
/// of whether the periodic job is running.
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "message": "Data generation triggered successfully",
///   "timestamp": "2025-01-01T00:00:00.000Z"
/// }
/// ```
///
/// ### Errors
/// - 500 when any insert of the cycle fails
pub async fn generate_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .generator()
        .generate()
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to trigger data generation"))?;

    Ok(ApiResponse::message("Data generation triggered successfully").with(
        "timestamp",
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    ))
}
