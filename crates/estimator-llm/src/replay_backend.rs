//! Offline backend that answers every request with a saved response.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use tracing::debug;

use crate::LlmError;
use crate::types::{LlmBackend, LlmInvocation, LlmResult};

/// Returns the contents of `response_file` for every invocation.
///
/// Lets a captured model response (for example a debug-mode `response.txt`)
/// be pushed through the full pipeline without network access.
#[derive(Debug, Clone)]
pub struct ReplayBackend {
    response_file: Utf8PathBuf,
}

impl ReplayBackend {
    #[must_use]
    pub fn new(response_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            response_file: response_file.into(),
        }
    }
}

#[async_trait]
impl LlmBackend for ReplayBackend {
    fn provider(&self) -> &'static str {
        "replay"
    }

    async fn invoke(&self, inv: LlmInvocation) -> Result<LlmResult, LlmError> {
        let text = tokio::fs::read_to_string(&self.response_file)
            .await
            .map_err(|e| {
                LlmError::Misconfiguration(format!(
                    "cannot read replay response '{}': {e}",
                    self.response_file
                ))
            })?;

        debug!(
            provider = "replay",
            file = %self.response_file,
            attempt = inv.attempt,
            chars = text.chars().count(),
            "Replaying saved response"
        );

        Ok(LlmResult::new(text, "replay", inv.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn invocation() -> LlmInvocation {
        LlmInvocation::from_prompt("p", "replayed-model", Duration::from_secs(5), 10, 0.0)
    }

    #[tokio::test]
    async fn test_replays_file_contents() {
        let dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("response.txt")).unwrap();
        std::fs::write(&path, "```json\n{\"phases\":[]}\n```").unwrap();

        let backend = ReplayBackend::new(&path);
        let result = backend.invoke(invocation()).await.unwrap();
        assert_eq!(result.raw_response, "```json\n{\"phases\":[]}\n```");
        assert_eq!(result.provider, "replay");
        assert_eq!(result.model_used, "replayed-model");

        // Same answer on a second attempt.
        let again = backend.invoke(invocation().with_attempt(2)).await.unwrap();
        assert_eq!(again.raw_response, result.raw_response);
    }

    #[tokio::test]
    async fn test_missing_file_is_misconfiguration() {
        let backend = ReplayBackend::new("/nonexistent/response.txt");
        let err = backend.invoke(invocation()).await.unwrap_err();
        assert!(matches!(err, LlmError::Misconfiguration(_)));
        assert!(!err.is_transient());
    }
}
