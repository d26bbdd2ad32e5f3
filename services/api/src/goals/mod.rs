pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/goals", post(handlers::create_goal))
        .route("/goals", get(handlers::list_goals))
}
