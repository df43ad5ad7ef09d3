//! Model client for text generation using the Anthropic Messages API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::sleep;

/// Default endpoint of the Messages API.
pub const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Value sent in the `anthropic-version` header.
pub const API_VERSION: &str = "2023-06-01";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default output token ceiling.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default number of attempts per request (the first try plus two retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default wall-clock budget for a single attempt in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default flat delay after a transport failure in seconds.
pub const DEFAULT_TRANSPORT_DELAY_SECS: u64 = 2;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Terminal failure of one generation request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("API returned status {status}")]
    Http { status: u16, body: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Retries exhausted after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

impl ModelError {
    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Generated text, or the reason no text is available.
pub type Outcome = Result<String, ModelError>;

/// Retry policy applied by [`ModelClient::send`].
///
/// Rate-limited and rejected attempts wait `backoff_unit * 2^attempt`;
/// transport failures wait the flat `transport_delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_unit: Duration,
    pub transport_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_unit: Duration::from_secs(1),
            transport_delay: Duration::from_secs(DEFAULT_TRANSPORT_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Set the number of attempts. Values below one are raised to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the unit the exponential backoff is multiplied from.
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Set the flat delay used after transport failures.
    pub fn with_transport_delay(mut self, delay: Duration) -> Self {
        self.transport_delay = delay;
        self
    }

    /// Backoff before the attempt following `attempt` (0-indexed).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.backoff_unit
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }
}

/// Configuration for the model client.
#[derive(Clone)]
pub struct ModelConfig {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
    pub max_tokens: u32,
    /// Language of the task templates ("ru" or "en").
    pub lang: String,
    /// Budget for a single attempt.
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("max_tokens", &self.max_tokens)
            .field("lang", &self.lang)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model_name: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            lang: "ru".to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

impl ModelConfig {
    /// Create a new ModelConfig with custom endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Create a new ModelConfig with custom API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Create a new ModelConfig with custom model name.
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Set the output token ceiling used by templated tasks.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }

    /// Set the template language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// A single generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    prompt: String,
    system: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

impl GenerationRequest {
    /// Create a request with the default temperature and no system directive.
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: max_tokens.max(1),
        }
    }

    /// Attach a system directive. Blank directives are dropped.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        let system = system.into();
        self.system = if system.trim().is_empty() {
            None
        } else {
            Some(system)
        };
        self
    }

    /// Set the sampling temperature, clamped into 0.0..=1.0.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = if temperature.is_nan() {
            DEFAULT_TEMPERATURE
        } else {
            temperature.clamp(0.0, 1.0)
        };
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

/// Wire body of a Messages API call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireMessage {
    pub role: &'static str,
    pub content: String,
}

/// Messages API response structures.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Result of one delivery attempt, before the retry policy is applied.
#[derive(Debug)]
enum AttemptError {
    RateLimited,
    Status { status: u16, body: String },
    Transport(String),
    Parse(String),
}

/// Client for the text-generation endpoint.
///
/// Holds only configuration and a pooled HTTP client, so one instance can be
/// shared behind an `Arc` by every caller.
pub struct ModelClient {
    config: ModelConfig,
    client: Client,
}

impl ModelClient {
    /// Create a new ModelClient with the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Build the wire payload for a request.
    pub fn build_payload(&self, request: &GenerationRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model_name.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![WireMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            system: request.system.clone(),
        }
    }

    /// Serialize the wire payload for a request.
    pub fn payload_json(&self, request: &GenerationRequest) -> Result<String, ModelError> {
        serde_json::to_string(&self.build_payload(request))
            .map_err(|e| ModelError::Parse(format!("failed to encode payload: {}", e)))
    }

    /// Send a request, retrying transient failures.
    ///
    /// # Returns
    /// The text of the first content block, or the terminal failure.
    pub async fn send(&self, request: &GenerationRequest) -> Outcome {
        let body = self.payload_json(request)?;
        let policy = &self.config.retry;
        let max_attempts = policy.max_attempts.max(1);

        for attempt in 0..max_attempts {
            let has_next = attempt + 1 < max_attempts;

            match self.send_once(&body).await {
                Ok(text) => {
                    tracing::debug!(attempt, "Model request succeeded");
                    return Ok(text);
                }
                Err(AttemptError::Parse(msg)) => {
                    tracing::error!(attempt, "Malformed model response: {}", msg);
                    return Err(ModelError::Parse(msg));
                }
                Err(AttemptError::RateLimited) => {
                    let delay = policy.backoff_for(attempt);
                    tracing::warn!(attempt, ?delay, "Model API rate limited, backing off");
                    sleep(delay).await;
                }
                Err(AttemptError::Status { status, body }) => {
                    tracing::error!(attempt, status, "Model API error: {}", body);
                    if !has_next {
                        return Err(ModelError::Http { status, body });
                    }
                    sleep(policy.backoff_for(attempt)).await;
                }
                Err(AttemptError::Transport(msg)) => {
                    tracing::error!(attempt, "Model request failed: {}", msg);
                    if !has_next {
                        return Err(ModelError::Transport(msg));
                    }
                    sleep(policy.transport_delay).await;
                }
            }
        }

        Err(ModelError::Exhausted {
            attempts: max_attempts,
        })
    }

    /// Perform a single attempt against the endpoint.
    async fn send_once(&self, body: &str) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .timeout(self.config.request_timeout)
            .header("x-api-key", self.config.api_key.as_str())
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptError::RateLimited);
        }
        if status != StatusCode::OK {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(status = status.as_u16(), "Failed to read error body: {}", e);
                    String::new()
                }
            };
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        Self::extract_text(&text).map_err(AttemptError::Parse)
    }

    /// Extract the text of the first content block.
    fn extract_text(body: &str) -> Result<String, String> {
        let parsed: MessagesResponse =
            serde_json::from_str(body).map_err(|e| format!("invalid response body: {}", e))?;

        let first = parsed
            .content
            .into_iter()
            .next()
            .ok_or_else(|| "response has no content blocks".to_string())?;

        match first.text {
            Some(text) if !text.is_empty() => Ok(text),
            Some(_) => Err("first content block is empty".to_string()),
            None => Err("first content block has no text".to_string()),
        }
    }
}
