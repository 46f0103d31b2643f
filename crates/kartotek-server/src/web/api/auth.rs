use crate::auth::digest_password;
use crate::errors::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::{SessionUser, SESSION_USER_KEY};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kartotek_common::models::user::User;
use kartotek_db::UserRepo;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    // Absent fields read as empty strings; an empty value simply matches no
    // stored digest.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login
#[tracing::instrument(skip(state, session, req))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let digest = digest_password(&req.password);

    let matches = UserRepo::find_by_credentials(&state.pool, &req.username, &digest).await?;

    // Anything other than exactly one row is incorrect credentials; duplicate
    // usernames cannot occur, but >=2 matches must not log anyone in.
    let row = match matches.as_slice() {
        [row] => row.clone(),
        _ => return Err(ApiError::InvalidCredentials),
    };

    let user = User::from(row);
    session
        .insert(SESSION_USER_KEY, &user)
        .await
        .map_err(|e| ApiError::Store(e.into()))?;

    tracing::info!("User '{}' logged in", user.username);
    Ok(Json(user).into_response())
}

/// GET /login -- the authenticated user's session snapshot
pub async fn current_session(SessionUser(user): SessionUser) -> Json<User> {
    Json(user)
}

/// POST /logout
///
/// Idempotent: clearing an anonymous session is also a success.
#[tracing::instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = session.flush().await {
        tracing::warn!("Failed to clear session on logout: {}", e);
    }
    Json(json!({"status": "ok"})).into_response()
}
