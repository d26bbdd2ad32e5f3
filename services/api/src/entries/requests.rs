use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub category: String,
    /// Category-specific payload; may carry an `estimated_kgco2` override.
    #[serde(default)]
    pub details: serde_json::Value,
}
