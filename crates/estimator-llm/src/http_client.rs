//! Shared HTTP client for the HTTP-based providers
//!
//! One `reqwest::Client` per backend, one request per call. There is no
//! retry here: the engine's attempt loop is the only regeneration policy.

use estimator_utils::error::LlmError;
use estimator_utils::redaction::redact_secrets;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Upper bound on any single request, whatever the configured timeout.
const DEFAULT_MAX_HTTP_TIMEOUT: Duration = Duration::from_secs(3600);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error-body excerpt carried into an error message.
const ERROR_BODY_EXCERPT: usize = 300;

#[derive(Clone)]
pub(crate) struct HttpClient {
    client: Client,
    max_timeout: Duration,
}

impl HttpClient {
    /// # Errors
    ///
    /// Returns `LlmError::Misconfiguration` if the client cannot be constructed
    pub fn new() -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Misconfiguration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_timeout: DEFAULT_MAX_HTTP_TIMEOUT,
        })
    }

    pub fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Send `request` once with timeout `min(request_timeout, max)`.
    ///
    /// Non-success statuses are mapped:
    /// - 401/403 → `ProviderAuth`
    /// - 429 → `ProviderQuota`
    /// - 5xx → `ProviderOutage`
    /// - other 4xx → `Transport`
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        request_timeout: Duration,
        provider_name: &str,
    ) -> Result<Response, LlmError> {
        let effective_timeout = request_timeout.min(self.max_timeout);

        debug!(
            provider = provider_name,
            timeout_secs = effective_timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = request
            .timeout(effective_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        duration: effective_timeout,
                    }
                } else {
                    LlmError::Transport(format!(
                        "{provider_name} request failed: {}",
                        redact_secrets(&e.to_string())
                    ))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status, provider_name, &body))
    }
}

pub(crate) fn map_status(status: StatusCode, provider_name: &str, body: &str) -> LlmError {
    let detail = excerpt(body);
    let message = if detail.is_empty() {
        format!("{provider_name} returned {status}")
    } else {
        format!("{provider_name} returned {status}: {detail}")
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::ProviderAuth(message),
        StatusCode::TOO_MANY_REQUESTS => LlmError::ProviderQuota(message),
        s if s.is_server_error() => LlmError::ProviderOutage(message),
        _ => LlmError::Transport(message),
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    let cut: String = trimmed.chars().take(ERROR_BODY_EXCERPT).collect();
    let cut = if cut.len() < trimmed.len() {
        format!("{cut}...")
    } else {
        cut
    };
    redact_secrets(&cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            map_status(StatusCode::UNAUTHORIZED, "groq", ""),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            map_status(StatusCode::FORBIDDEN, "groq", ""),
            LlmError::ProviderAuth(_)
        ));
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, "groq", ""),
            LlmError::ProviderQuota(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_GATEWAY, "groq", ""),
            LlmError::ProviderOutage(_)
        ));
        assert!(matches!(
            map_status(StatusCode::BAD_REQUEST, "groq", ""),
            LlmError::Transport(_)
        ));
    }

    #[test]
    fn test_error_body_is_included_and_redacted() {
        let body = r#"{"error":{"message":"Invalid API Key gsk_abcdefghijklmnopqrstuvwxyz0123456789"}}"#;
        let err = map_status(StatusCode::UNAUTHORIZED, "groq", body);
        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Invalid API Key"));
        assert!(!text.contains("gsk_abcdefghijklmnopqrstuvwxyz0123456789"));
    }

    #[test]
    fn test_long_body_is_truncated() {
        let body = "x ".repeat(1000);
        let err = map_status(StatusCode::BAD_REQUEST, "anthropic", &body);
        assert!(err.to_string().ends_with("..."));
        assert!(err.to_string().len() < 500);
    }
}
