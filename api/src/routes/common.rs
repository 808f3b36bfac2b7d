use axum::{
    extract::{FromRequestParts, Path, Query, rejection::PathRejection},
    http::request::Parts,
};

use crate::response::ApiError;

pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Parses an optional query value as an integer. Blank or non-numeric input
/// counts as absent so the route default applies.
pub fn lenient_int(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

/// Raw query pairs in request order.
///
/// Never rejects on content: unknown keys are ignored and a repeated key keeps
/// its first value, so every route falls back to its defaults instead of
/// failing on a sloppy query string.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(pub Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        lenient_int(self.get(key))
    }

    /// `hours` window length; missing or non-positive values mean 24.
    pub fn hours(&self) -> i64 {
        self.int("hours")
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_WINDOW_HOURS)
    }
}

impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection, "Rejected query string");
                ApiError::bad_request("Invalid query string")
            })?;
        Ok(Self(pairs))
    }
}

/// Unwraps a single path segment, reporting extraction failures (such as
/// invalid UTF-8 after percent-decoding) as `400 { error }`.
pub fn path_param(
    path: Result<Path<String>, PathRejection>,
    error: &str,
) -> Result<String, ApiError> {
    let Path(value) = path.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected path parameter");
        ApiError::bad_request(error)
    })?;
    Ok(value)
}
