use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::response::{ApiError, ApiResponse};
use crate::routes::users::common::{UserRequest, user_input};
use crate::state::AppState;

/// POST /api/users
///
/// ### Request Body
/// ```json
/// { "name": "Ada Lovelace", "email": "Ada@Example.com" }
/// ```
///
/// The name is trimmed and the email trimmed and lower-cased before storage.
///
/// ### Response: 201 Created
/// ```json
/// {
///   "success": true,
///   "message": "User created successfully",
///   "data": { "id": 4, "name": "Ada Lovelace", "email": "ada@example.com", ... }
/// }
/// ```
///
/// ### Errors
/// - 400 missing name/email, malformed email or unparsable body
/// - 409 `Email already exists`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let input = user_input(payload)?;
    let user = state
        .users()
        .create(input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to create user"))?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(user).with_message("User created successfully"),
    ))
}
