use std::str::FromStr;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use verda_common::error::VerdaError;
use verda_db::goals::models::{Goal, GoalType};
use verda_db::goals::repositories::GoalRepository;

use crate::error::ApiError;
use crate::extractors::{require_user, AuthToken};
use crate::goals::requests::CreateGoalRequest;
use crate::goals::responses::{CreateGoalResponse, GoalResponse, ListGoalsResponse};
use crate::AppState;

pub async fn create_goal(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
    Json(payload): Json<CreateGoalRequest>,
) -> Result<Json<CreateGoalResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let goal_type = GoalType::from_str(&payload.goal_type).map_err(VerdaError::Validation)?;

    let goal = state
        .goal_repo
        .create(Goal {
            id: Uuid::new_v4(),
            user_id: user.id,
            goal_type,
            params: payload.params,
            created_at: Utc::now(),
        })
        .await?;

    Ok(Json(CreateGoalResponse { goal_id: goal.id }))
}

pub async fn list_goals(
    State(state): State<AppState>,
    AuthToken(token): AuthToken,
) -> Result<Json<ListGoalsResponse>, ApiError> {
    let user = require_user(&state, &token).await?;

    let goals = state.goal_repo.list_for_user(user.id).await?;
    let data: Vec<GoalResponse> = goals
        .into_iter()
        .map(|g| GoalResponse {
            id: g.id,
            goal_type: g.goal_type.as_str().to_string(),
            params: g.params,
            created_at: g.created_at,
        })
        .collect();
    let count = data.len();

    Ok(Json(ListGoalsResponse { data, count }))
}
