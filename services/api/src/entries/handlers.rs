use axum::extract::State;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use verda_db::entries::models::Entry;
use verda_db::entries::repositories::EntryRepository;
use verda_estimation::{resolve_entry_emissions, round4};

use crate::entries::requests::CreateEntryRequest;
use crate::entries::responses::{CreateEntryResponse, EntryResponse, ListEntriesResponse};
use crate::error::ApiError;
use crate::extractors::{require_user, AuthToken};
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<Json<CreateEntryResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    // Server computes emissions unless the payload carries an override
    let emissions = resolve_entry_emissions(&state.estimation, &payload.category, &payload.details);

    let entry = state
        .entry_repo
        .create(Entry {
            id: Uuid::new_v4(),
            user_id: user.id,
            category: payload.category,
            details: payload.details,
            emissions_kgco2: emissions,
            created_at: Utc::now(),
        })
        .await?;

    tracing::info!(
        entry_id = %entry.id,
        category = %entry.category,
        emissions_kgco2 = entry.emissions_kgco2,
        "entry created"
    );

    Ok(Json(CreateEntryResponse {
        entry_id: entry.id,
        emissions_kgco2: round4(entry.emissions_kgco2),
    }))
}

pub async fn list_entries(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<ListEntriesResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let entries = state.entry_repo.list_for_user(user.id).await?;
    let data: Vec<EntryResponse> = entries
        .into_iter()
        .map(|e| EntryResponse {
            id: e.id,
            timestamp: e.created_at,
            category: e.category,
            details: e.details,
            emissions_kgco2: e.emissions_kgco2,
        })
        .collect();
    let count = data.len();

    Ok(Json(ListEntriesResponse { data, count }))
}
