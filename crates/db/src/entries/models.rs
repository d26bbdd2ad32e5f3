use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged activity with its computed emissions. Immutable once
/// created; there is no update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    /// transport | electricity | food | waste | purchase | photo-analysis | other
    pub category: String,
    /// Category-specific key/value payload, stored as given.
    pub details: serde_json::Value,
    pub emissions_kgco2: f64,
    pub created_at: DateTime<Utc>,
}
