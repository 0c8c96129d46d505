use std::{env, fmt, str::FromStr, time::Duration};

use tracing::debug;

use crate::error::{ItineraryError, Result};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_DAILY_PAUSE: Duration = Duration::from_millis(500);

/// Which text-generation backend to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
        }
    }

    /// Environment variable holding the credential for this provider
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_BASE_URL,
            Provider::OpenAi => DEFAULT_OPENAI_BASE_URL,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => DEFAULT_GEMINI_MODEL,
            Provider::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ItineraryError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" | "openrouter" => Ok(Provider::OpenAi),
            other => Err(ItineraryError::Config(format!(
                "Unknown provider '{}'. Supported: gemini, openai",
                other
            ))),
        }
    }
}

/// Settings for the generation client and pipeline pacing.
///
/// Built once at startup and handed to
/// [`crate::services::create_client`] and [`crate::ItineraryPipeline::from_config`].
#[derive(Clone)]
pub struct GenerationConfig {
    pub provider: Provider,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Upper bound for a single generation call
    pub timeout: Duration,
    /// Minimum spacing between consecutive daily-plan calls
    pub daily_pause: Duration,
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("daily_pause", &self.daily_pause)
            .finish()
    }
}

impl GenerationConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: provider.default_model().to_string(),
            base_url: provider.default_base_url().to_string(),
            timeout: DEFAULT_TIMEOUT,
            daily_pause: DEFAULT_DAILY_PAUSE,
        }
    }

    /// Read configuration from the process environment.
    ///
    /// Fails with [`ItineraryError::Config`] when the provider credential is
    /// absent, before any generation attempt is possible.
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("ITINERARY_PROVIDER") {
            Ok(value) if !value.trim().is_empty() => value.parse()?,
            _ => Provider::default(),
        };
        Self::from_env_for(provider)
    }

    /// Like [`GenerationConfig::from_env`] with the provider chosen by the caller.
    pub fn from_env_for(provider: Provider) -> Result<Self> {
        Self::from_env_with_key(provider, None)
    }

    /// Read the environment, taking the credential from `api_key` when given.
    ///
    /// Every other variable is still applied and still validated.
    pub fn from_env_with_key(provider: Provider, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .or_else(|| non_empty_var(provider.api_key_var()))
            .ok_or_else(|| missing_key_error(provider))?;

        let mut config = Self::new(provider, api_key);

        if let Some(model) = non_empty_var("ITINERARY_MODEL") {
            config.model = model;
        }

        let base_url = match provider {
            Provider::Gemini => non_empty_var("ITINERARY_BASE_URL"),
            Provider::OpenAi => non_empty_var("ITINERARY_BASE_URL")
                .or_else(|| non_empty_var("OPENAI_BASE_URL"))
                .or_else(|| non_empty_var("OPENROUTER_BASE_URL")),
        };
        if let Some(base_url) = base_url {
            config.base_url = base_url;
        }

        if let Some(secs) = non_empty_var("ITINERARY_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("ITINERARY_TIMEOUT_SECS", &secs)?);
        }

        if let Some(ms) = non_empty_var("ITINERARY_DAILY_PAUSE_MS") {
            config.daily_pause =
                Duration::from_millis(parse_number("ITINERARY_DAILY_PAUSE_MS", &ms)?);
        }

        debug!(target: "itinerary::config", ?config, "loaded configuration from environment");
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_daily_pause(mut self, daily_pause: Duration) -> Self {
        self.daily_pause = daily_pause;
        self
    }
}

/// The error reported when no credential is configured for `provider`.
pub fn missing_key_error(provider: Provider) -> ItineraryError {
    let var = provider.api_key_var();
    ItineraryError::Config(format!(
        "{var} not found. Set the {var} environment variable or add `{var}=your_api_key_here` to a .env file before generating an itinerary"
    ))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.parse().map_err(|_| {
        ItineraryError::Config(format!(
            "{name} must be a non-negative integer, got '{raw}'"
        ))
    })
}

/// Serializes tests that touch process-wide environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
