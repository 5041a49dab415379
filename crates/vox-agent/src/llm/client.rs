//! Multi-provider LLM client.
//!
//! Supports **OpenAI-compatible Chat Completions** endpoints (Groq, OpenAI,
//! Ollama, vLLM) and the **Anthropic Messages API**, non-streaming only: the
//! fallback responder is a single blocking call per exchange.  Groq with
//! `llama-3.3-70b-versatile` is the default stack.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::error::{AgentError, Result};
use crate::llm::types::{Message, Role};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default Groq API base URL (OpenAI-compatible).
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default OpenAI API base URL.
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default Anthropic API base URL.
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model per provider.
const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const ANTHROPIC_DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Maximum tokens per reply.  Replies are read aloud, so short is right.
const DEFAULT_MAX_TOKENS: u32 = 1024;

// ---------------------------------------------------------------------------
// Provider enum and configuration
// ---------------------------------------------------------------------------

/// Identifies which wire format the client speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI Chat Completions API (covers Groq and other compatible
    /// endpoints).
    OpenAiCompatible,
    /// Anthropic Messages API.
    Anthropic,
}

/// Configuration for connecting to a single LLM provider endpoint.
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    /// Which wire format this configuration targets.
    pub provider: LlmProvider,
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens the model may generate per reply.
    pub max_tokens: u32,
}

impl LlmClientConfig {
    /// Create a configuration for the Groq API with the default model.
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::OpenAiCompatible,
            api_key: api_key.into(),
            base_url: GROQ_BASE_URL.to_owned(),
            model: GROQ_DEFAULT_MODEL.to_owned(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Create a configuration for any OpenAI-compatible API.
    pub fn openai_compatible(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            provider: LlmProvider::OpenAiCompatible,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Create a configuration for the Anthropic Claude API.
    pub fn anthropic(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: LlmProvider::Anthropic,
            api_key: api_key.into(),
            base_url: ANTHROPIC_BASE_URL.to_owned(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build a configuration from the process environment.
    ///
    /// `VOX_PROVIDER` selects the provider (`groq`, `openai`, `anthropic`);
    /// when unset the provider is inferred from which API key variable is
    /// present, preferring Groq.  `VOX_MODEL` and `VOX_BASE_URL` override
    /// the per-provider defaults.
    pub fn from_env() -> Result<Self> {
        let provider = std::env::var("VOX_PROVIDER").unwrap_or_default();

        let mut config = match provider.as_str() {
            "groq" => Self::groq(require_key("GROQ_API_KEY", "groq")?),
            "openai" => Self::openai_compatible(
                require_key("OPENAI_API_KEY", "openai")?,
                OPENAI_DEFAULT_MODEL,
                OPENAI_BASE_URL,
            ),
            "anthropic" => Self::anthropic(
                require_key("ANTHROPIC_API_KEY", "anthropic")?,
                ANTHROPIC_DEFAULT_MODEL,
            ),
            // No explicit provider: take the first configured key.
            _ => {
                if let Some(key) = env_key("GROQ_API_KEY") {
                    Self::groq(key)
                } else if let Some(key) = env_key("OPENAI_API_KEY") {
                    Self::openai_compatible(key, OPENAI_DEFAULT_MODEL, OPENAI_BASE_URL)
                } else if let Some(key) = env_key("ANTHROPIC_API_KEY") {
                    Self::anthropic(key, ANTHROPIC_DEFAULT_MODEL)
                } else {
                    return Err(AgentError::MissingApiKey {
                        provider: "groq".to_owned(),
                    });
                }
            }
        };

        if let Ok(model) = std::env::var("VOX_MODEL") {
            if !model.is_empty() {
                config.model = model;
            }
        }
        if let Ok(base_url) = std::env::var("VOX_BASE_URL") {
            if !base_url.is_empty() {
                config.base_url = base_url;
            }
        }

        Ok(config)
    }
}

fn env_key(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|k| !k.is_empty())
}

fn require_key(var: &str, provider: &str) -> Result<String> {
    env_key(var).ok_or_else(|| AgentError::MissingApiKey {
        provider: provider.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// An LLM client that turns a conversation history into one assistant turn.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: Arc<LlmClientConfig>,
    http: reqwest::Client,
}

impl LlmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            let provider = match config.provider {
                LlmProvider::OpenAiCompatible => "openai-compatible",
                LlmProvider::Anthropic => "anthropic",
            };
            return Err(AgentError::MissingApiKey {
                provider: provider.to_owned(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| AgentError::RequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send the full history and return the assistant's reply turn.
    ///
    /// One synchronous call, no internal retry: transport, auth, and quota
    /// failures propagate as [`AgentError`] for the caller to surface.
    pub async fn complete(&self, history: &[Message]) -> Result<Message> {
        let text = match self.config.provider {
            LlmProvider::OpenAiCompatible => self.complete_openai(history).await?,
            LlmProvider::Anthropic => self.complete_anthropic(history).await?,
        };
        Ok(Message::assistant(text))
    }

    // -- OpenAI-compatible ---------------------------------------------------

    async fn complete_openai(&self, history: &[Message]) -> Result<String> {
        let body = build_openai_body(&self.config.model, history, self.config.max_tokens);
        let url = format!("{}/chat/completions", self.config.base_url);

        tracing::debug!(model = %self.config.model, turns = history.len(), "completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::RequestFailed {
                reason: e.to_string(),
            })?;

        let value = read_json_response(response).await?;
        parse_openai_reply(&value)
    }

    // -- Anthropic -----------------------------------------------------------

    async fn complete_anthropic(&self, history: &[Message]) -> Result<String> {
        let body = build_anthropic_body(&self.config.model, history, self.config.max_tokens);
        let url = format!("{}/v1/messages", self.config.base_url);

        tracing::debug!(model = %self.config.model, turns = history.len(), "completion request");

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::RequestFailed {
                reason: e.to_string(),
            })?;

        let value = read_json_response(response).await?;
        parse_anthropic_reply(&value)
    }
}

/// Read a response body, mapping non-success statuses to [`AgentError::Api`].
async fn read_json_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AgentError::RequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

    if !status.is_success() {
        return Err(AgentError::Api {
            status: status.as_u16(),
            detail: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| AgentError::ParseFailed {
        reason: format!("invalid JSON response: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Wire format helpers
// ---------------------------------------------------------------------------

fn build_openai_body(model: &str, history: &[Message], max_tokens: u32) -> Value {
    json!({
        "model": model,
        "messages": history,
        "max_tokens": max_tokens,
    })
}

fn parse_openai_reply(value: &Value) -> Result<String> {
    value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AgentError::ParseFailed {
            reason: "response has no choices[0].message.content".to_owned(),
        })
}

/// The Messages API takes the system prompt as a top-level field, so system
/// turns are lifted out of the message list.
fn build_anthropic_body(model: &str, history: &[Message], max_tokens: u32) -> Value {
    let system: Vec<&str> = history
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let messages: Vec<&Message> = history.iter().filter(|m| m.role != Role::System).collect();

    let mut body = json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": messages,
    });
    if !system.is_empty() {
        body["system"] = Value::String(system.join("\n\n"));
    }
    body
}

fn parse_anthropic_reply(value: &Value) -> Result<String> {
    value
        .pointer("/content/0/text")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| AgentError::ParseFailed {
            reason: "response has no content[0].text".to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
