//! Scripted backend for exercising the regeneration loop in tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::LlmError;
use crate::types::{LlmBackend, LlmInvocation, LlmResult};

/// Plays back a fixed sequence of outcomes, one per invocation, and records
/// every invocation it receives.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
    seen: Mutex<Vec<LlmInvocation>>,
}

impl ScriptedBackend {
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Backend that answers every call with the same text.
    #[must_use]
    pub fn always(text: &str) -> Self {
        Self::new(std::iter::repeat_n(Ok(text.to_string()), 16))
    }

    /// Invocations received so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<LlmInvocation> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.invocations().len()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    fn provider(&self) -> &'static str {
        "scripted"
    }

    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        let model = inv.model.clone();
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(inv);
        }
        let next = self
            .outcomes
            .lock()
            .ok()
            .and_then(|mut outcomes| outcomes.pop_front())
            .unwrap_or_else(|| Err(LlmError::Transport("script exhausted".to_string())));
        next.map(|text| LlmResult::new(text, "scripted", model))
    }
}
