use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};

use crate::response::{ApiError, ApiResponse};
use crate::routes::users::common::parse_user_id;
use crate::state::AppState;

/// DELETE /api/users/{user_id}
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "message": "User deleted successfully",
///   "data": { "id": 4, "name": "Ada Lovelace", "email": "ada@example.com" }
/// }
/// ```
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_user_id(user_id)?;
    let deleted = state
        .users()
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to delete user"))?;

    Ok(ApiResponse::success(deleted).with_message("User deleted successfully"))
}
