use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LeaderboardRowResponse {
    pub user_id: Uuid,
    pub name: String,
    pub last7_kgco2: f64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub data: Vec<LeaderboardRowResponse>,
    pub count: usize,
}
