pub mod handlers;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos", post(handlers::upload_photo))
        .route("/photos", get(handlers::list_photos))
}
