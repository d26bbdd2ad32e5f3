use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use verda_common::error::VerdaError;

pub struct ApiError(pub VerdaError);

impl From<VerdaError> for ApiError {
    fn from(err: VerdaError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            VerdaError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            VerdaError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            VerdaError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
