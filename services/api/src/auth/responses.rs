use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
