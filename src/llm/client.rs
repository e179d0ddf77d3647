//! Async LLM client used by the pluggable plan and response generators
//!
//! Model-agnostic HTTP client for Anthropic and OpenAI-compatible APIs
//! (DeepSeek, etc). The LLM only proposes; every plan it returns is parsed
//! into closed action types and falls back to rules on any failure.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::error::{AiError, Result};

/// Plans and chat replies are short
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// Anything that can turn a system + user prompt into text
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Async LLM client for making API calls
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
    max_tokens: u32,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Detect API format from URL
    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to Anthropic API)
    /// Optional: LLM_MODEL (defaults to claude-3-haiku-20240307)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| AiError::LlmError("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "claude-3-haiku-20240307".into());

        Ok(Self::new(api_key, api_url, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_anthropic(&self, system: &str, user: &str) -> Result<String> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [Message::user(user)],
        };
        let request = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body);

        let reply: AnthropicResponse = self.send(request).await?;
        reply.into_text()
    }

    async fn complete_openai(&self, system: &str, user: &str) -> Result<String> {
        let body = OpenAIRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [
                Message {
                    role: "system",
                    content: system,
                },
                Message::user(user),
            ],
        };
        let request = self.client.post(&self.api_url).bearer_auth(&self.api_key).json(&body);

        let reply: OpenAIResponse = self.send(request).await?;
        reply.into_text()
    }

    /// Send a prepared request and decode the JSON body, mapping every
    /// transport or status failure onto `AiError::LlmError`
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AiError::LlmError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::LlmError(format!("API error {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::LlmError(e.to_string()))
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(system, user).await,
            ApiFormat::OpenAI => self.complete_openai(system, user).await,
        }
    }
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

impl<'a> Message<'a> {
    fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

/// Only the text blocks of a Messages API reply are read
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<TextBlock>,
}

#[derive(Deserialize)]
struct TextBlock {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicResponse {
    fn into_text(self) -> Result<String> {
        self.content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| AiError::LlmError("Empty response".into()))
    }
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 2],
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIResponse {
    fn into_text(self) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::LlmError("Empty response".into()))
    }
}
