use estimator_utils::error::ConfigError;

use crate::Config;

/// Providers the LLM layer knows how to build.
pub const KNOWN_PROVIDERS: [&str; 3] = ["groq", "anthropic", "replay"];

fn invalid(key: &str, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.into(),
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model().trim().is_empty() {
            return Err(invalid("model", "must not be empty"));
        }

        let provider = self.provider();
        if !KNOWN_PROVIDERS.contains(&provider) {
            return Err(invalid(
                "llm_provider",
                format!(
                    "unknown provider '{provider}' (expected one of: {})",
                    KNOWN_PROVIDERS.join(", ")
                ),
            ));
        }

        // Bounded regeneration: one request plus at most one retry.
        let attempts = self.max_attempts();
        if !(1..=2).contains(&attempts) {
            return Err(invalid(
                "max_attempts",
                format!("{attempts} is outside 1..=2"),
            ));
        }

        if let Some(timeout) = self.defaults.timeout_secs {
            if timeout < 5 {
                return Err(invalid("timeout_secs", "must be at least 5 seconds"));
            }
            if timeout > 3600 {
                return Err(invalid(
                    "timeout_secs",
                    "exceeds maximum limit of 3600 seconds (1 hour)",
                ));
            }
        }

        let temperature = self.temperature();
        if !(0.0..=2.0).contains(&temperature) {
            return Err(invalid(
                "temperature",
                format!("{temperature} is outside 0.0..=2.0"),
            ));
        }

        if self.max_tokens() == 0 {
            return Err(invalid("max_tokens", "must be greater than 0"));
        }

        if provider == "replay" && self.replay_file().is_none() {
            return Err(invalid(
                "llm_replay",
                "the replay provider needs [llm.replay] response_file",
            ));
        }

        Ok(())
    }
}
