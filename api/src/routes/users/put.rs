use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::IntoResponse,
};

use crate::response::{ApiError, ApiResponse};
use crate::routes::users::common::{UserRequest, parse_user_id, user_input};
use crate::state::AppState;

/// PUT /api/users/{user_id}
///
/// Replaces name and email with the same validation as create and bumps
/// `updated_at`.
///
/// ### Errors
/// - 400 invalid id or payload
/// - 404 `User not found`
/// - 409 `Email already exists`
pub async fn update_user(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_user_id(user_id)?;
    let input = user_input(payload)?;

    let user = state
        .users()
        .update(id, input)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update user"))?;

    Ok(ApiResponse::success(user).with_message("User updated successfully"))
}
