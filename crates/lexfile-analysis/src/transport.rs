//! HTTP transport for the external text-generation service.
//!
//! One synchronous call per request, bounded by the configured timeout. No
//! retries: a timeout or transport error surfaces to the client layer, which
//! converts it into a presentable failure.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One completion request, provider-agnostic.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Transport seam for the reasoning service.
///
/// The client owns failure classification; implementations just move one
/// request and return the assistant text (possibly empty).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

// Chat completions API request/response structures
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// reqwest-backed transport against an OpenAI-compatible chat completions
/// endpoint.
pub struct HttpChatTransport {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpChatTransport {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for analysis service")?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .http_client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to analysis service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Analysis service request failed: {} - {}", status, error_text);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse analysis service response")?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}
