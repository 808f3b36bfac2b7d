//! # Users Routes Module
//!
//! CRUD over the `users` table. The whole group sits behind the strict rate
//! limiter (see [`crate::app`]).
//!
//! ## Structure
//! - `get.rs` — list and fetch
//! - `post.rs` — create
//! - `put.rs` — update
//! - `delete.rs` — delete

use axum::{Router, routing::get};
use delete::delete_user;
use get::{get_user, list_users};
use post::create_user;
use put::update_user;

use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds the `/users` route group.
///
/// - `GET /users` → `list_users`
/// - `POST /users` → `create_user`
/// - `GET /users/{user_id}` → `get_user`
/// - `PUT /users/{user_id}` → `update_user`
/// - `DELETE /users/{user_id}` → `delete_user`
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
