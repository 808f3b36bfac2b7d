use axum::{
    Json,
    extract::{
        Path,
        rejection::{JsonRejection, PathRejection},
    },
};
use serde::Deserialize;
use services::user_service::UserInput;

use crate::response::ApiError;
use crate::routes::common::path_param;

const INVALID_USER_ID: &str = "Invalid user ID";

/// Body of `POST /api/users` and `PUT /api/users/{id}`.
#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Parses the `{id}` path segment, rejecting anything that is not an integer.
pub fn parse_user_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    path_param(path, INVALID_USER_ID)?
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(INVALID_USER_ID))
}

/// Unwraps the JSON body and normalizes it into a validated [`UserInput`].
pub fn user_input(payload: Result<Json<UserRequest>, JsonRejection>) -> Result<UserInput, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected user body");
        ApiError::bad_request("Invalid JSON body")
    })?;

    UserInput::parse(body.name.as_deref(), body.email.as_deref())
        .map_err(|e| ApiError::from_service(e, "Invalid user payload"))
}
