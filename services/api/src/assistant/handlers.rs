use axum::extract::State;
use axum::Json;
use verda_db::entries::repositories::EntryRepository;
use verda_estimation::round4;

use crate::assistant::requests::AssistantRequest;
use crate::assistant::responses::AssistantResponse;
use crate::error::ApiError;
use crate::extractors::{require_user, AuthToken};
use crate::AppState;

/// How many of the caller's most recent entries seed the prompt context.
const CONTEXT_ENTRIES: usize = 50;

/// Ask the generative-AI assistant for suggestions, seeded with a short
/// summary of the caller's recent emissions. Upstream failures degrade to
/// an explanatory string in the response body, never a 5xx.
pub async fn assistant_query(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    Json(payload): Json<AssistantRequest>,
) -> Result<Json<AssistantResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let entries = state.entry_repo.list_for_user(user.id).await?;
    let recent_total: f64 = entries
        .iter()
        .take(CONTEXT_ENTRIES)
        .map(|e| e.emissions_kgco2)
        .sum();
    let context = format!(
        "User {} has recent total emissions ~{} kgCO2 across {} entries.",
        user.display_name(),
        round4(recent_total),
        entries.len()
    );
    let full_prompt = format!("{context}\n\nUser prompt:\n{}", payload.prompt);

    let response = match &state.gemini {
        Some(client) => match client.generate_text(&full_prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "assistant call failed");
                format!("Assistant error: {e}")
            }
        },
        None => "Assistant is not configured.".to_string(),
    };

    Ok(Json(AssistantResponse { response }))
}
