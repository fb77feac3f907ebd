//! Completion-service boundary.
//!
//! [`CompletionProvider`] is the seam between card generation and the
//! network. The shipped implementation, [`HttpCompletionClient`], speaks the
//! OpenAI-compatible `POST {base_url}/chat/completions` dialect, which
//! Anthropic also serves under `https://api.anthropic.com/v1`. Tests and
//! library callers can inject their own provider through
//! [`crate::config::FlashcardConfigBuilder::provider`].

use crate::config::FlashcardConfig;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    /// Some providers send `null` for refusals; treated as empty text.
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Convenience constructor for a single-choice reply.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChoiceMessage {
                    content: Some(text.into()),
                },
            }],
            usage: None,
        }
    }
}

// ── Provider trait ───────────────────────────────────────────────────────

/// Anything that can answer one chat-completion request.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Send `request` and return the decoded response.
    ///
    /// Implementations must not retry; the caller applies the timeout.
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError>;
}

// ── HTTP implementation ──────────────────────────────────────────────────

/// reqwest-backed client for OpenAI-compatible chat-completion endpoints.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
}

impl HttpCompletionClient {
    pub fn new(config: &FlashcardConfig) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url),
            api_key: config.api_key.clone(),
            timeout_secs: config.api_timeout_secs,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            GenerationError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        debug!("POST {} (model {})", self.endpoint, request.model);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| self.map_error(e))
    }
}

/// Use the configured provider, or build the HTTP client from the config.
pub fn resolve_provider(
    config: &FlashcardConfig,
) -> Result<Arc<dyn CompletionProvider>, GenerationError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }
    Ok(Arc::new(HttpCompletionClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_openai_shape() {
        let req = ChatCompletionRequest {
            model: "claude-3-5-haiku-20241022".into(),
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            max_tokens: 2000,
            temperature: 0.5,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["model"], "claude-3-5-haiku-20241022");
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "hi");
        assert_eq!(v["max_tokens"], 2000);
        assert_eq!(v["temperature"], 0.5);
    }

    #[test]
    fn response_decodes_choices_and_usage() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "[]"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 3, "total_tokens": 123}
        }"#;
        let r: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(r.choices.len(), 1);
        assert_eq!(r.choices[0].message.content.as_deref(), Some("[]"));
        assert_eq!(r.usage.unwrap().prompt_tokens, 120);
    }

    #[test]
    fn response_without_choices_decodes_empty() {
        let r: ChatCompletionResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(r.choices.is_empty());
        assert!(r.usage.is_none());
    }

    #[test]
    fn null_content_decodes_as_none() {
        let r: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(r.choices[0].message.content.is_none());
    }

    #[test]
    fn endpoint_joins_base_url() {
        let config = FlashcardConfig::builder()
            .api_key("k")
            .base_url("https://api.example.com/v1/")
            .build()
            .unwrap();
        let client = HttpCompletionClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "https://api.example.com/v1/chat/completions");
    }
}
