pub mod auth;
pub mod middleware;
pub mod users;
pub mod ws;

use crate::errors::ApiError;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub(crate) fn parse_id_param(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::Validation(format!("Invalid user id: {raw}")))
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Auth routes
        .route("/login", get(auth::current_session).post(auth::login))
        .route("/logout", post(auth::logout))
        // User CRUD
        .route("/user", post(users::create_user))
        .route(
            "/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users", get(users::list_users))
        // WebSocket event relay
        .route("/ws", get(ws::relay_socket))
        .with_state(state)
}
