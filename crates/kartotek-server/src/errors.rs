use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Every failure a route can produce. Responses are JSON of the shape
/// `{"error": <code>, "message": <human text>}`; the code is stable so
/// clients can branch on it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Your session has expired. Please log in again.")]
    SessionExpired,
    #[error("You are not allowed to perform this action.")]
    NotAuthorized,
    #[error("Username or password is incorrect.")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// The store rejected a write, or a write matched no row. The cause is
    /// deliberately not distinguished for create (duplicate usernames report
    /// the same generic message as any other rejection).
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionExpired | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotAuthorized => StatusCode::FORBIDDEN,
            ApiError::Validation(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::SessionExpired => "SessionExpired",
            ApiError::NotAuthorized => "NotAuthorized",
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::Validation(_) => "ValidationFailed",
            ApiError::NotFound(_) => "NotFound",
            ApiError::Rejected(_) => "Rejected",
            ApiError::Store(_) => "StoreError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            tracing::error!("Store error: {:#}", e);
        }
        let body = json!({
            "error": self.code(),
            "message": self.to_string(),
        });
        (self.status(), Json(body)).into_response()
    }
}
