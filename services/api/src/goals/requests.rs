use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// "reduce_percent" or "absolute_target"
    #[serde(rename = "type")]
    pub goal_type: String,
    #[serde(default)]
    pub params: serde_json::Value,
}
