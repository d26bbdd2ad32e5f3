use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateGoalResponse {
    pub goal_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub goal_type: String,
    pub params: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListGoalsResponse {
    pub data: Vec<GoalResponse>,
    pub count: usize,
}
