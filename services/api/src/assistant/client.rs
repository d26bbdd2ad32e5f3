use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use verda_estimation::Detection;

#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
}

impl GeminiClientConfig {
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let base_url = std::env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string());
        let max_retries = std::env::var("GEMINI_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);
        let timeout_secs = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        Some(Self {
            base_url,
            api_key,
            model,
            max_retries,
            timeout_secs,
        })
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiClientError {
    #[error("HTTP {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// For testing: create a client pointing at a specific base URL (e.g., wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Free-text generation for the assistant. Returns the first
    /// candidate's text, or "No response" when the API answers with an
    /// empty candidate.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GeminiClientError> {
        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });

        let data = self.request_with_retry(&body).await?;
        Ok(extract_text(&data)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| "No response".to_string()))
    }

    /// Label detection for photo analysis: sends the image inline and asks
    /// for a JSON array of {label, confidence} objects. An answer that is
    /// not parseable as that array yields an empty vec; the caller decides
    /// how to degrade.
    pub async fn detect_labels(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Vec<Detection>, GeminiClientError> {
        let instruction = "Identify the distinct food, drink, or household items in this photo. \
                           Respond with only a JSON array, one object per item, shaped like \
                           [{\"label\": \"beef burger\", \"confidence\": 0.85}]. \
                           Confidence is between 0 and 1.";
        let body = json!({
            "contents": [
                { "parts": [
                    { "text": instruction },
                    { "inline_data": { "mime_type": mime_type, "data": BASE64.encode(image) } }
                ] }
            ]
        });

        let data = self.request_with_retry(&body).await?;
        Ok(extract_text(&data)
            .map(|text| parse_detections(&text))
            .unwrap_or_default())
    }

    async fn request_with_retry(&self, body: &Value) -> Result<Value, GeminiClientError> {
        let url = self.generate_url();
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff_secs = std::cmp::min(1u64 << attempt, 30);
                tracing::warn!(attempt, backoff_secs, "retrying after backoff");
                tokio::time::sleep(Duration::from_secs(backoff_secs)).await;
            }

            let response = match self
                .client
                .post(&url)
                .query(&[("key", &self.config.api_key)])
                .json(body)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() || e.is_connect() {
                        continue;
                    }
                    return Err(GeminiClientError::RequestError(e));
                }
            };

            let status = response.status();

            if status.is_success() {
                return response
                    .json::<Value>()
                    .await
                    .map_err(GeminiClientError::RequestError);
            }

            // Honor Retry-After header for 429
            if status == StatusCode::TOO_MANY_REQUESTS {
                if let Some(retry_after) = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                {
                    let wait = std::cmp::min(retry_after, 60);
                    tracing::warn!(wait, "rate-limited, waiting Retry-After");
                    tokio::time::sleep(Duration::from_secs(wait)).await;
                }
                last_error = "429 Too Many Requests".to_string();
                continue;
            }

            // Retry on 5xx
            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                last_error = format!("{status}: {body}");
                continue;
            }

            // Fail fast on 4xx (except 429 handled above)
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiClientError::HttpError { status, body });
        }

        Err(GeminiClientError::MaxRetriesExceeded {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }
}

fn extract_text(data: &Value) -> Option<String> {
    data.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// The model tends to wrap JSON in markdown fences; strip them before
/// parsing.
fn parse_detections(text: &str) -> Vec<Detection> {
    let trimmed = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str::<Vec<Detection>>(trimmed).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> GeminiClientConfig {
        GeminiClientConfig {
            base_url: "http://localhost".to_string(),
            api_key: "fake-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
            max_retries: 2,
            timeout_secs: 5,
        }
    }

    fn candidate_body(text: &str) -> serde_json::Value {
        json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ] } }
            ]
        })
    }

    #[tokio::test]
    async fn generate_text_returns_candidate_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .and(query_param("key", "fake-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("try cycling")))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let text = client.generate_text("how do I cut transport?").await.expect("text");
        assert_eq!(text, "try cycling");
    }

    #[tokio::test]
    async fn generate_text_defaults_when_candidate_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let text = client.generate_text("anything").await.expect("text");
        assert_eq!(text, "No response");
    }

    #[tokio::test]
    async fn generate_text_retries_server_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("recovered")))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let text = client.generate_text("anything").await.expect("text");
        assert_eq!(text, "recovered");
    }

    #[tokio::test]
    async fn generate_text_fails_fast_on_client_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let result = client.generate_text("anything").await;
        assert!(matches!(
            result,
            Err(GeminiClientError::HttpError { status, .. }) if status == StatusCode::BAD_REQUEST
        ));
    }

    #[tokio::test]
    async fn detect_labels_parses_fenced_json_array() {
        let server = MockServer::start().await;
        let answer = "```json\n[{\"label\": \"Beef Burger\", \"confidence\": 0.85}]\n```";

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(answer)))
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let detections = client
            .detect_labels(b"not-really-a-jpeg", "image/jpeg")
            .await
            .expect("detections");
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "Beef Burger");
        assert!((detections[0].confidence - 0.85).abs() < 1e-9);
    }

    #[tokio::test]
    async fn detect_labels_with_unparseable_answer_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body("I see a burger!")),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(test_config())
            .expect("client")
            .with_base_url(&server.uri());

        let detections = client
            .detect_labels(b"not-really-a-jpeg", "image/jpeg")
            .await
            .expect("detections");
        assert!(detections.is_empty());
    }

    #[test]
    fn parse_detections_handles_plain_and_fenced_json() {
        let plain = "[{\"label\": \"beef\", \"confidence\": 0.5}]";
        assert_eq!(parse_detections(plain).len(), 1);

        let fenced = "```json\n[{\"label\": \"beef\", \"confidence\": 0.5}]\n```";
        assert_eq!(parse_detections(fenced).len(), 1);

        assert!(parse_detections("no json here").is_empty());
    }
}
