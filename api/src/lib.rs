pub mod middleware;
pub mod rate_limit;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::middleware::{handle_panic, log_request, not_found, security_headers};
use crate::rate_limit::{RateLimitPolicy, RateLimiter, enforce_rate_limit};
use crate::state::AppState;

/// Builds the full application with the default rate limits.
pub fn app(state: AppState) -> Router {
    app_with_limits(state, RateLimitPolicy::global(), RateLimitPolicy::strict())
}

/// Builds the full application.
///
/// Layers, outermost first: request logging, CORS, security headers, panic
/// recovery, global rate limit. The users group adds the `strict` limiter.
pub fn app_with_limits(
    state: AppState,
    global: RateLimitPolicy,
    strict: RateLimitPolicy,
) -> Router {
    let global = Arc::new(RateLimiter::new(global));
    let strict = Arc::new(RateLimiter::new(strict));

    Router::new()
        .route("/", get(routes::index))
        .nest("/api", routes::routes(strict))
        .fallback(not_found)
        .with_state(state)
        .layer(from_fn_with_state(global, enforce_rate_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(security_headers))
        .layer(CorsLayer::very_permissive())
        .layer(from_fn(log_request))
}
