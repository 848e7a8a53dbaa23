//! LLM backend abstraction
//!
//! Every provider implements [`LlmBackend`], so the engine works with any
//! of them without knowing implementation details. Supported providers:
//!
//! - **`groq`** (default): Groq's OpenAI-compatible chat completions API
//! - **`anthropic`**: Anthropic Messages API
//! - **`replay`**: answers with a saved response file, for offline runs

mod anthropic_backend;
mod groq_backend;
pub(crate) mod http_client;
mod replay_backend;
#[cfg(any(test, feature = "test-utils"))]
mod scripted;
mod types;

pub use estimator_utils::error::LlmError;
pub use replay_backend::ReplayBackend;
#[cfg(any(test, feature = "test-utils"))]
pub use scripted::ScriptedBackend;
pub use types::{LlmBackend, LlmInvocation, LlmResult, Message, Role};

use anthropic_backend::AnthropicBackend;
use estimator_config::Config;
use groq_backend::GroqBackend;

/// Create the backend named by `config.provider()`, reading the API
/// credential from the process environment.
///
/// # Errors
///
/// Returns `LlmError::Misconfiguration` when the credential variable is
/// unset or the replay file is not configured, and `LlmError::Unsupported`
/// for an unknown provider.
pub fn from_config(config: &Config) -> Result<Box<dyn LlmBackend>, LlmError> {
    from_config_with_env(config, |key| std::env::var(key).ok())
}

/// [`from_config`] with an explicit environment lookup.
pub fn from_config_with_env(
    config: &Config,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn LlmBackend>, LlmError> {
    let provider = config.provider();
    let base_url = config
        .provider_settings()
        .and_then(|settings| settings.base_url.clone());

    match provider {
        "groq" => {
            let api_key = api_key(config, &env, "[llm.groq]")?;
            Ok(Box::new(GroqBackend::new(api_key, base_url)?))
        }
        "anthropic" => {
            let api_key = api_key(config, &env, "[llm.anthropic]")?;
            Ok(Box::new(AnthropicBackend::new(api_key, base_url)?))
        }
        "replay" => {
            let file = config.replay_file().ok_or_else(|| {
                LlmError::Misconfiguration(
                    "replay provider selected but no response file configured; \
                     pass --replay <FILE> or set [llm.replay] response_file"
                        .to_string(),
                )
            })?;
            Ok(Box::new(ReplayBackend::new(file)))
        }
        unknown => Err(LlmError::Unsupported(format!(
            "Unknown LLM provider '{unknown}'. Supported providers: groq, anthropic, replay."
        ))),
    }
}

fn api_key(
    config: &Config,
    env: &impl Fn(&str) -> Option<String>,
    section: &str,
) -> Result<String, LlmError> {
    let var = config.api_key_env();
    env(&var)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            LlmError::Misconfiguration(format!(
                "API key not found in environment variable '{var}'. \
                 Set it (a .env file works) or configure a different api_key_env in {section}."
            ))
        })
}
