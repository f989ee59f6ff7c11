use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, GenerationRequest};
use crate::{Result, TextGenError};

// ─── TextGenerator trait ──────────────────────────────────────────────────

/// A text-generation service: prompt in, raw text out.
///
/// Every failure (transport, non-2xx, undecodable body) is an `Err`. A reply
/// the caller does not like is still `Ok`; judging content is the caller's job.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Backend name for logs and status output.
    fn name(&self) -> &str;
}

// ─── OpenAI-compatible provider ───────────────────────────────────────────

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Speaks the `/chat/completions` protocol shared by OpenAI and most
/// self-hosted gateways.
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Build a provider whose API key is read from the environment variable
    /// `api_key_env`.
    pub fn from_env(
        base_url: impl Into<String>,
        api_key_env: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| TextGenError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(base_url, api_key, timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = ChatCompletionRequest::from(request);
        debug!(
            model = %request.model,
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "sending generation request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(TextGenError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Err(TextGenError::EmptyBody);
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|source| TextGenError::Parse {
                body: text.clone(),
                source,
            })?;
        let reply = parsed.first_text().ok_or(TextGenError::NoChoices)?;
        debug!(reply = %reply, "generation reply");
        Ok(reply.to_string())
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ─── Offline provider ─────────────────────────────────────────────────────

/// A generator that is never reachable. Callers fall back to their
/// deterministic behaviour on every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

#[async_trait]
impl TextGenerator for OfflineProvider {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        Err(TextGenError::Offline)
    }

    fn name(&self) -> &str {
        "offline"
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
