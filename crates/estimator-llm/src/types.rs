//! Core types for LLM backend abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use estimator_utils::error::LlmError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
}

/// Input to one model request.
#[derive(Debug, Clone)]
pub struct LlmInvocation {
    pub model: String,
    pub timeout: Duration,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// 1-based attempt number within the run, for logging.
    pub attempt: u32,
}

impl LlmInvocation {
    /// Single user-message invocation, which is how the estimation prompt is sent.
    #[must_use]
    pub fn from_prompt(
        prompt: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.into(),
            timeout,
            messages: vec![Message::user(prompt)],
            max_tokens,
            temperature,
            attempt: 1,
        }
    }

    #[must_use]
    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }
}

/// Result from a model request.
///
/// `raw_response` may be empty; length checks belong to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResult {
    pub raw_response: String,
    /// `groq`, `anthropic` or `replay`
    pub provider: String,
    pub model_used: String,
    pub tokens_input: Option<u64>,
    pub tokens_output: Option<u64>,
    /// Provider's stop reason (`stop`, `length`, `end_turn`, `max_tokens`, ...).
    pub finish_reason: Option<String>,
}

impl LlmResult {
    #[must_use]
    pub fn new(
        raw_response: impl Into<String>,
        provider: impl Into<String>,
        model_used: impl Into<String>,
    ) -> Self {
        Self {
            raw_response: raw_response.into(),
            provider: provider.into(),
            model_used: model_used.into(),
            tokens_input: None,
            tokens_output: None,
            finish_reason: None,
        }
    }

    #[must_use]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.tokens_input = Some(input);
        self.tokens_output = Some(output);
        self
    }

    /// Whether the provider stopped because the output token limit was hit,
    /// which usually means the JSON is truncated.
    #[must_use]
    pub fn hit_token_limit(&self) -> bool {
        matches!(self.finish_reason.as_deref(), Some("length" | "max_tokens"))
    }
}

/// Trait for LLM backend implementations
///
/// Each call makes exactly one request; regeneration is decided by the
/// caller.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Provider name, as used in configuration.
    fn provider(&self) -> &'static str;

    /// Invoke the model once.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` for transport failures, provider errors (auth,
    /// quota, outage) and timeouts.
    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError>;
}
