//! Groq HTTP backend
//!
//! Groq serves an OpenAI-compatible chat completions API, so this backend
//! also works against any other OpenAI-compatible endpoint via `base_url`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::LlmError;
use crate::http_client::HttpClient;
use crate::types::{LlmBackend, LlmInvocation, LlmResult, Message};

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Clone)]
pub(crate) struct GroqBackend {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl GroqBackend {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the HTTP client cannot be constructed
    pub fn new(api_key: String, base_url: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: HttpClient::new()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
        })
    }

    fn request_body(inv: &LlmInvocation) -> ChatRequest {
        ChatRequest {
            model: inv.model.clone(),
            messages: inv.messages.iter().map(ChatMessage::from).collect(),
            max_tokens: inv.max_tokens,
            temperature: inv.temperature,
            stream: false,
        }
    }

    /// First choice's text. Missing or null content is an empty response,
    /// not a transport error.
    fn into_result(body: ChatResponse, model: String) -> LlmResult {
        let (content, finish_reason) = body
            .choices
            .into_iter()
            .next()
            .map(|choice| (choice.message.content.unwrap_or_default(), choice.finish_reason))
            .unwrap_or_default();

        let mut result = LlmResult::new(content, "groq", body.model.unwrap_or(model));
        result.finish_reason = finish_reason;
        if let Some(usage) = body.usage {
            result = result.with_tokens(usage.prompt_tokens, usage.completion_tokens);
        }
        result
    }
}

#[async_trait]
impl LlmBackend for GroqBackend {
    fn provider(&self) -> &'static str {
        "groq"
    }

    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        debug!(
            provider = "groq",
            model = %inv.model,
            attempt = inv.attempt,
            max_tokens = inv.max_tokens,
            temperature = inv.temperature,
            timeout_secs = inv.timeout.as_secs(),
            "Invoking Groq backend"
        );

        let request = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(&inv));

        let response = self.client.execute(request, inv.timeout, "groq").await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("Failed to parse Groq response: {e}")))?;

        let result = Self::into_result(body, inv.model);

        debug!(
            provider = "groq",
            tokens_input = ?result.tokens_input,
            tokens_output = ?result.tokens_output,
            finish_reason = ?result.finish_reason,
            "Groq invocation completed"
        );

        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
