use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use verda_common::error::{VerdaError, VerdaResult};
use verda_db::users::models::User;
use verda_db::users::repositories::UserRepository;

use crate::AppState;

/// Opaque session token taken from the `X-Auth-Token` header. Resolving
/// it to a user happens in the handlers via [`require_user`].
pub struct AuthToken(pub String);

#[derive(Debug)]
pub struct AuthTokenRejection(String);

impl IntoResponse for AuthTokenRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0 });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthToken {
    type Rejection = AuthTokenRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("X-Auth-Token")
            .ok_or_else(|| AuthTokenRejection("missing X-Auth-Token header".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| AuthTokenRejection("invalid X-Auth-Token header value".to_string()))?;

        if value.is_empty() {
            return Err(AuthTokenRejection("empty X-Auth-Token header".to_string()));
        }

        Ok(AuthToken(value.to_string()))
    }
}

/// Resolve a session token to its user, or fail with 401.
pub async fn require_user(state: &AppState, token: &str) -> VerdaResult<User> {
    state
        .user_repo
        .get_by_token(token)
        .await?
        .ok_or_else(|| VerdaError::Unauthorized("invalid token".to_string()))
}
