use axum::extract::State;
use axum::Json;
use chrono::Utc;
use verda_db::entries::repositories::EntryRepository;
use verda_db::users::repositories::UserRepository;
use verda_estimation::{
    compute_leaderboard, EntrySnapshot, UserSnapshot, DEFAULT_WINDOW_DAYS,
};

use crate::error::ApiError;
use crate::leaderboard::responses::{LeaderboardResponse, LeaderboardRowResponse};
use crate::AppState;

/// Rank all users by their emissions over the trailing week, lowest
/// first. Public: the dashboard shows it pre-login.
pub async fn get_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let entries = state.entry_repo.list_all().await?;
    let users = state.user_repo.list().await?;

    let entry_snapshots: Vec<EntrySnapshot> = entries
        .iter()
        .map(|e| EntrySnapshot {
            user_id: e.user_id,
            timestamp: e.created_at,
            emissions_kgco2: Some(e.emissions_kgco2),
        })
        .collect();
    let user_snapshots: Vec<UserSnapshot> = users
        .iter()
        .map(|u| UserSnapshot {
            user_id: u.id,
            display_name: u.display_name(),
        })
        .collect();

    let rows = compute_leaderboard(
        &entry_snapshots,
        &user_snapshots,
        DEFAULT_WINDOW_DAYS,
        Utc::now(),
    );

    let data: Vec<LeaderboardRowResponse> = rows
        .into_iter()
        .map(|row| LeaderboardRowResponse {
            user_id: row.user_id,
            name: row.display_name,
            last7_kgco2: row.total_kgco2,
        })
        .collect();
    let count = data.len();

    Ok(Json(LeaderboardResponse { data, count }))
}
