use std::{fmt::Debug, sync::Arc, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use super::{gemini_client::GeminiClient, openai_client::OpenAIClient};
use crate::{
    config::{GenerationConfig, Provider},
    error::{ItineraryError, Result, ServiceError},
};

/// A text-generation backend: one prompt in, raw text out.
///
/// Implementations make exactly one outbound call per invocation and never
/// retry.
#[async_trait]
pub trait GenerationClient: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ServiceError>;
}

/// Create the client selected by `config.provider`
pub fn create_client(config: &GenerationConfig) -> Result<Arc<dyn GenerationClient>> {
    debug!(
        target: "itinerary::client",
        provider = %config.provider,
        model = %config.model,
        "creating generation client"
    );
    match config.provider {
        Provider::Gemini => Ok(Arc::new(GeminiClient::from_config(config)?)),
        Provider::OpenAi => Ok(Arc::new(OpenAIClient::from_config(config)?)),
    }
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| ItineraryError::Config(format!("Failed to build HTTP client: {err}")))
}

/// Map a transport-level failure to a service error.
pub(crate) fn transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        ServiceError::new(format!("request timed out: {err}"))
    } else {
        ServiceError::new(format!("HTTP request failed: {err}"))
    }
}

/// Build the error for a non-success HTTP status, preferring the API's own message.
pub(crate) fn status_error(status: reqwest::StatusCode, body: &str) -> ServiceError {
    let api_message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());

    let message = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        format!("rate limit or quota exceeded (HTTP {}): {}", status, api_message)
    } else {
        format!("HTTP {} error: {}", status, api_message)
    };
    ServiceError::new(message).with_status(status.as_u16())
}
