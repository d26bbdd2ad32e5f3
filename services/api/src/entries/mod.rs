pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", post(handlers::create_entry))
        .route("/entries", get(handlers::list_entries))
}
