use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct CreateEntryResponse {
    pub entry_id: Uuid,
    pub emissions_kgco2: f64,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub details: serde_json::Value,
    pub emissions_kgco2: f64,
}

#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub data: Vec<EntryResponse>,
    pub count: usize,
}
