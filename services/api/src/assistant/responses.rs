use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AssistantResponse {
    pub response: String,
}
