mod assistant;
mod auth;
mod entries;
mod error;
mod extractors;
mod goals;
mod leaderboard;
mod photos;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use verda_common::types::ServiceInfo;
use verda_config::{init_tracing, AppConfig};
use verda_db::entries::pg_repository::PgEntryRepository;
use verda_db::goals::pg_repository::PgGoalRepository;
use verda_db::photos::pg_repository::PgPhotoRepository;
use verda_db::users::pg_repository::PgUserRepository;
use verda_estimation::EstimationConfig;

use assistant::client::{GeminiClient, GeminiClientConfig};

#[derive(Clone)]
pub struct AppState {
    pub user_repo: PgUserRepository,
    pub entry_repo: PgEntryRepository,
    pub photo_repo: PgPhotoRepository,
    pub goal_repo: PgGoalRepository,
    pub estimation: Arc<EstimationConfig>,
    pub gemini: Option<GeminiClient>,
    pub upload_dir: PathBuf,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("verda-api"))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP verda_up Service up indicator\n\
# TYPE verda_up gauge\n\
verda_up 1\n\
# HELP verda_info Service info\n\
# TYPE verda_info gauge\n\
verda_info{service=\"verda-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(auth::router())
        .merge(entries::router())
        .merge(photos::router())
        .merge(goals::router())
        .merge(leaderboard::router())
        .merge(assistant::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = AppConfig::from_env().expect("failed to load config");
    tracing::info!(service = "verda-api", "starting");

    let pool = verda_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");
    verda_db::ensure_schema(&pool)
        .await
        .expect("failed to ensure schema");

    let gemini = match GeminiClientConfig::from_env() {
        Some(client_config) => Some(GeminiClient::new(client_config).expect("gemini client")),
        None => {
            tracing::info!("GEMINI_API_KEY not set, assistant and photo analysis degrade");
            None
        }
    };

    let state = AppState {
        user_repo: PgUserRepository::new(pool.clone()),
        entry_repo: PgEntryRepository::new(pool.clone()),
        photo_repo: PgPhotoRepository::new(pool.clone()),
        goal_repo: PgGoalRepository::new(pool),
        estimation: Arc::new(EstimationConfig::default()),
        gemini,
        upload_dir: PathBuf::from(&config.upload_dir),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
