use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An uploaded photo with the raw detections the vision call returned
/// and the total estimate derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Stored filename under the upload directory.
    pub filename: String,
    pub detections: serde_json::Value,
    pub estimated_kgco2: f64,
    pub created_at: DateTime<Utc>,
}
