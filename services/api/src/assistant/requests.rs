use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub prompt: String,
}
