use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::generation::{build_http_client, status_error, transport_error, GenerationClient};
use crate::{
    config::GenerationConfig,
    error::{Result, ServiceError},
};

/// Client for OpenAI-compatible chat-completions endpoints (OpenRouter by default)
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl OpenAIClient {
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[async_trait]
impl GenerationClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError> {
        debug!(target: "itinerary::client", model = %self.model, prompt_len = prompt.len(), "calling chat completions");

        let response = self
            .http
            .post(build_chat_url(&self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "itinerary-rs")
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| ServiceError::new(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(status_error(status, &response_text));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|err| ServiceError::new(format!("Failed to parse JSON: {err}")))?;

        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(ServiceError::new(format!("API error: {}", error_message)));
        }

        response_json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .filter(|content| !content.trim().is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::new("Malformed service response: no message content in first choice")
            })
    }
}
