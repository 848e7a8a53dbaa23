use std::collections::HashMap;
use std::time::Duration;

use estimator_utils::error::ConfigError;

use crate::{Config, ConfigSource, Defaults, DEFAULT_PROVIDER, LlmConfig, PathsConfig, ReplayConfig};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Skips environment variables and config files entirely, so embedders
    /// and tests get deterministic settings.
    ///
    /// ```rust,no_run
    /// use estimator_config::Config;
    ///
    /// let config = Config::builder()
    ///     .provider("replay")
    ///     .replay_file("fixtures/response.txt")
    ///     .output("out/estimate.json")
    ///     .build()
    ///     .expect("valid config");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder for [`Config`].
///
/// Every value set here is attributed to `ConfigSource::Programmatic`.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    max_attempts: Option<u32>,
    min_response_chars: Option<usize>,
    debug: Option<bool>,
    verbose: Option<bool>,
    document: Option<String>,
    output: Option<String>,
    xlsx: Option<String>,
    debug_dir: Option<String>,
    replay_file: Option<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `groq`, `anthropic` or `replay`.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Per-request model timeout (5 seconds to 1 hour).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Total model attempts per run, 1 or 2.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    #[must_use]
    pub fn min_response_chars(mut self, chars: usize) -> Self {
        self.min_response_chars = Some(chars);
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    #[must_use]
    pub fn document(mut self, path: impl Into<String>) -> Self {
        self.document = Some(path.into());
        self
    }

    #[must_use]
    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.output = Some(path.into());
        self
    }

    #[must_use]
    pub fn xlsx(mut self, path: impl Into<String>) -> Self {
        self.xlsx = Some(path.into());
        self
    }

    #[must_use]
    pub fn debug_dir(mut self, path: impl Into<String>) -> Self {
        self.debug_dir = Some(path.into());
        self
    }

    /// Saved response for the `replay` provider.
    #[must_use]
    pub fn replay_file(mut self, path: impl Into<String>) -> Self {
        self.replay_file = Some(path.into());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<Config, ConfigError> {
        let mut source_attribution = HashMap::new();
        let mut defaults = Defaults::default();
        let mut llm = LlmConfig {
            provider: Some(DEFAULT_PROVIDER.to_string()),
            ..LlmConfig::default()
        };
        let mut paths = PathsConfig::default();

        let mut set = |key: &str, present: bool| {
            let source = if present {
                ConfigSource::Programmatic
            } else {
                ConfigSource::Default
            };
            source_attribution.insert(key.to_string(), source);
        };

        set("llm_provider", self.provider.is_some());
        if let Some(provider) = self.provider {
            llm.provider = Some(provider);
        }
        set("model", self.model.is_some());
        if self.model.is_some() {
            defaults.model = self.model;
        }
        set("temperature", self.temperature.is_some());
        if self.temperature.is_some() {
            defaults.temperature = self.temperature;
        }
        set("max_tokens", self.max_tokens.is_some());
        if self.max_tokens.is_some() {
            defaults.max_tokens = self.max_tokens;
        }
        set("timeout_secs", self.timeout.is_some());
        if let Some(timeout) = self.timeout {
            defaults.timeout_secs = Some(timeout.as_secs());
        }
        set("max_attempts", self.max_attempts.is_some());
        if self.max_attempts.is_some() {
            defaults.max_attempts = self.max_attempts;
        }
        set("min_response_chars", self.min_response_chars.is_some());
        if self.min_response_chars.is_some() {
            defaults.min_response_chars = self.min_response_chars;
        }
        set("debug", self.debug.is_some());
        if self.debug.is_some() {
            defaults.debug = self.debug;
        }
        set("verbose", self.verbose.is_some());
        if self.verbose.is_some() {
            defaults.verbose = self.verbose;
        }
        set("document", self.document.is_some());
        if self.document.is_some() {
            paths.document = self.document;
        }
        set("output", self.output.is_some());
        if self.output.is_some() {
            paths.output = self.output;
        }
        set("xlsx", self.xlsx.is_some());
        if self.xlsx.is_some() {
            paths.xlsx = self.xlsx;
        }
        set("debug_dir", self.debug_dir.is_some());
        if self.debug_dir.is_some() {
            paths.debug_dir = self.debug_dir;
        }
        if let Some(file) = self.replay_file {
            llm.replay = Some(ReplayConfig {
                response_file: Some(file),
            });
            set("llm_replay", true);
        }

        let config = Config {
            defaults,
            llm,
            paths,
            source_attribution,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = Config::builder().build().unwrap();
        assert_eq!(config.provider(), "groq");
        assert_eq!(config.max_attempts(), 2);
        assert_eq!(config.source_attribution["model"], ConfigSource::Default);
    }

    #[test]
    fn test_builder_values_are_programmatic() {
        let config = Config::builder()
            .provider("replay")
            .replay_file("saved.txt")
            .output("out/estimate.json")
            .timeout(Duration::from_secs(30))
            .max_attempts(1)
            .build()
            .unwrap();

        assert_eq!(config.provider(), "replay");
        assert_eq!(config.replay_file().unwrap(), "saved.txt");
        assert_eq!(config.output_path(), "out/estimate.json");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_attempts(), 1);
        assert_eq!(
            config.source_attribution["output"],
            ConfigSource::Programmatic
        );
        assert_eq!(
            config.source_attribution["llm_provider"],
            ConfigSource::Programmatic
        );
        assert_eq!(config.source_attribution["xlsx"], ConfigSource::Default);
    }

    #[test]
    fn test_builder_validates() {
        let err = Config::builder().max_attempts(5).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = Config::builder().provider("replay").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "llm_replay"));
    }
}
