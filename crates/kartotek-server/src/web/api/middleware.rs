use crate::errors::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kartotek_common::models::user::{Rights, User};
use tower_sessions::Session;

/// Session slot holding the authenticated user snapshot.
pub const SESSION_USER_KEY: &str = "user";

/// Extractor guarding a route on an authenticated session.
///
/// Rejects with a 401 `SessionExpired` outcome before the handler runs when
/// the session holds no user snapshot.
#[derive(Debug)]
pub struct SessionUser(pub User);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, err)| {
                tracing::error!("Session layer missing or failed: {}", err);
                ApiError::SessionExpired
            })?;

        match session.get::<User>(SESSION_USER_KEY).await {
            Ok(Some(user)) => Ok(SessionUser(user)),
            Ok(None) => Err(ApiError::SessionExpired),
            Err(err) => {
                tracing::error!("Failed to read session: {}", err);
                Err(ApiError::SessionExpired)
            }
        }
    }
}

/// Extractor guarding a route on Admin rights.
///
/// Runs the session check first, then the rights comparison, so an
/// unauthenticated request is reported as 401 rather than 403.
#[derive(Debug)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let SessionUser(user) = SessionUser::from_request_parts(parts, state).await?;
        require_rights(&user, Rights::Admin)?;
        Ok(AdminUser(user))
    }
}

/// "At least" comparison on role ordinals.
pub fn require_rights(user: &User, minimum: Rights) -> Result<(), ApiError> {
    if user.rights >= minimum {
        Ok(())
    } else {
        Err(ApiError::NotAuthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DbConfig, ServerConfig, SessionConfig};
    use crate::state::AppState;
    use crate::web::build_router;
    use axum::body::Body;
    use http::Request;
    use http_body_util::BodyExt;
    use sqlx::PgPool;
    use tower::ServiceExt;

    fn sample_user(rights: Rights) -> User {
        User {
            id: 1,
            username: "grete".to_string(),
            first_name: "Grete".to_string(),
            last_name: "Gade".to_string(),
            rights,
            created_at: "2025-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_require_rights_at_or_above_minimum() {
        assert!(require_rights(&sample_user(Rights::Admin), Rights::Admin).is_ok());
        assert!(require_rights(&sample_user(Rights::Admin), Rights::User).is_ok());
        assert!(require_rights(&sample_user(Rights::User), Rights::User).is_ok());
    }

    #[test]
    fn test_require_rights_below_minimum() {
        let err = require_rights(&sample_user(Rights::User), Rights::Admin).unwrap_err();
        assert!(matches!(err, ApiError::NotAuthorized));
    }

    // The lazily connected pool never reaches a database: a guard rejection
    // must short-circuit before any handler issues a query.
    fn test_state() -> AppState {
        let config = ServerConfig {
            listen: "127.0.0.1:0".to_string(),
            db: DbConfig {
                url: "postgres://invalid:5432/db".to_string(),
            },
            session: SessionConfig::default(),
            static_dir: None,
            initial_admin: None,
        };
        let pool = PgPool::connect_lazy("postgres://invalid:5432/db").unwrap();
        AppState::new(pool, config)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_session_guard_rejects_without_session() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
        let body = body_json(response).await;
        assert_eq!(body["error"], "SessionExpired");
        assert!(body["message"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_admin_guard_rejects_without_session() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/user/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // No session at all reads as 401, not 403
        assert_eq!(response.status(), 401);
        let body = body_json(response).await;
        assert_eq!(body["error"], "SessionExpired");
    }

    #[tokio::test]
    async fn test_current_session_requires_session() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 401);
    }
}
