use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::generation::{build_http_client, status_error, transport_error, GenerationClient};
use crate::{
    config::GenerationConfig,
    error::{Result, ServiceError},
};

/// Client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout)?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let model = self.model.trim_start_matches("models/");
        format!("{}/models/{}:generateContent", base, model)
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        debug!(target: "itinerary::client", model = %self.model, prompt_len = prompt.len(), "calling Gemini");

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
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
            .map_err(|err| ServiceError::new(format!("Failed to parse service response: {err}")))?;

        extract_candidate_text(&response_json)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_candidate_text(response: &Value) -> std::result::Result<String, ServiceError> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(ServiceError::new(format!("API error: {}", message)));
    }

    let candidate = response
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .ok_or_else(|| {
            let reason = response
                .pointer("/promptFeedback/blockReason")
                .and_then(Value::as_str)
                .unwrap_or("no candidates returned");
            ServiceError::new(format!("Malformed service response: {}", reason))
        })?;

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("empty content");
        return Err(ServiceError::new(format!(
            "Malformed service response: candidate has no text ({})",
            reason
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_joined_parts() {
        let response = json!({
            "candidates": [{
                "content": {"parts": [{"text": "```json\n{"}, {"text": "}\n```"}]},
                "finishReason": "STOP"
            }]
        });
        assert_eq!(extract_candidate_text(&response).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn test_blocked_prompt_is_service_error() {
        let response = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_candidate_text(&response).unwrap_err();
        assert!(err.message().contains("SAFETY"));
    }

    #[test]
    fn test_endpoint_accepts_prefixed_model() {
        let config = GenerationConfig::new(crate::config::Provider::Gemini, "k")
            .with_base_url("http://localhost:1234/")
            .with_model("models/gemini-1.5-pro");
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1234/models/gemini-1.5-pro:generateContent"
        );
    }
}
