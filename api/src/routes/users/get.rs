use axum::{
    extract::{Path, State, rejection::PathRejection},
    response::IntoResponse,
};
use serde_json::json;
use services::user_service::PageRequest;

use crate::response::{ApiError, ApiResponse};
use crate::routes::common::QueryParams;
use crate::routes::users::common::parse_user_id;
use crate::state::AppState;

/// GET /api/users
///
/// Newest-first page of users.
///
/// ### Query Parameters
/// - `page` (optional): default 1
/// - `limit` (optional): default 10, capped at 50
///
/// ### Response: 200 OK
/// ```json
/// {
///   "success": true,
///   "data": [ { "id": 3, "name": "Bob Johnson", "email": "bob.johnson@example.com", ... } ],
///   "pagination": { "page": 1, "limit": 10, "total": 3, "totalPages": 1, "hasNext": false, "hasPrev": false }
/// }
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<impl IntoResponse, ApiError> {
    let request = PageRequest::new(query.int("page"), query.int("limit"));

    let page = state
        .users()
        .list(request)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch users"))?;

    Ok(ApiResponse::success(page.users).with("pagination", json!(page.pagination)))
}

/// GET /api/users/{user_id}
///
/// ### Errors
/// - 400 `Invalid user ID` for a non-numeric id
/// - 404 `User not found`
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_user_id(user_id)?;
    let user = state
        .users()
        .find(id)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to fetch user"))?;

    Ok(ApiResponse::success(user))
}
