//! Client for the hosted LLM gateway (OpenAI-compatible chat completions)
//!
//! Used by both the remote classifier and the follow-up assistant.
//!
//! Env vars:
//! - `SMISH_SENTINEL_API_KEY` (required unless `gateway.api_key` is configured)

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

pub const API_KEY_ENV: &str = "SMISH_SENTINEL_API_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_attempts: u32,
    retry_backoff: Duration,
}

impl GatewayClient {
    /// Build a client, resolving the API key from config or the environment
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
            .ok_or(GatewayError::MissingApiKey)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run a chat completion and return the first choice's text.
    ///
    /// Transport failures and 5xx responses are retried with linear backoff;
    /// any other status fails immediately.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        let mut attempt = 1;
        loop {
            match self.call_chat(messages, options).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        "AI gateway attempt {}/{} failed: {}",
                        attempt, self.max_attempts, e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_chat(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        debug!("POST {} ({} messages)", url, messages.len());
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited,
                StatusCode::PAYMENT_REQUIRED => GatewayError::CreditsExhausted,
                _ => {
                    let body = resp.text().await.unwrap_or_default();
                    error!("AI gateway error: {} {}", status.as_u16(), body);
                    GatewayError::Status {
                        status: status.as_u16(),
                        body,
                    }
                }
            });
        }

        let bytes = resp.bytes().await?;
        let v: serde_json::Value = serde_json::from_slice(&bytes)?;
        extract_content(&v)
    }
}

/// `choices[0].message.content` of a completion response
pub fn extract_content(response: &serde_json::Value) -> Result<String, GatewayError> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or(GatewayError::EmptyResponse)
}
