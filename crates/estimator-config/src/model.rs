use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use estimator_utils::types::ConfigSource;

pub const DEFAULT_PROVIDER: &str = "groq";
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// One request plus at most one regeneration.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
pub const DEFAULT_MIN_RESPONSE_CHARS: usize = 10;
pub const DEFAULT_DOCUMENT_PATH: &str = "sampleproject.pdf";
pub const DEFAULT_OUTPUT_PATH: &str = "project_estimation.json";
pub const DEFAULT_XLSX_PATH: &str = "estimation_data.xlsx";
pub const DEFAULT_DEBUG_DIR: &str = ".";

pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Configuration for an estimation run.
///
/// Built once at startup and passed by reference into each component.
/// Precedence: CLI arguments > environment > config file > built-in defaults.
///
/// # Configuration File Format
///
/// ```toml
/// [defaults]
/// model = "openai/gpt-oss-20b"
/// temperature = 0.3
/// timeout_secs = 300
/// debug = false
///
/// [llm]
/// provider = "groq"
///
/// [llm.groq]
/// api_key_env = "GROQ_API_KEY"
///
/// [paths]
/// document = "sampleproject.pdf"
/// output = "project_estimation.json"
/// xlsx = "estimation_data.xlsx"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub defaults: Defaults,
    pub llm: LlmConfig,
    pub paths: PathsConfig,
    /// Where each setting came from (for `estimator config`).
    pub source_attribution: HashMap<String, ConfigSource>,
}

/// Run-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// Total model attempts per run (1 or 2).
    pub max_attempts: Option<u32>,
    /// Responses shorter than this (after trimming) count as empty.
    pub min_response_chars: Option<usize>,
    /// Persist prompt, raw response and intermediate recovery text.
    pub debug: Option<bool>,
    pub verbose: Option<bool>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            model: Some(DEFAULT_MODEL.to_string()),
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
            min_response_chars: Some(DEFAULT_MIN_RESPONSE_CHARS),
            debug: Some(false),
            verbose: Some(false),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// `groq`, `anthropic` or `replay`
    pub provider: Option<String>,
    pub groq: Option<HttpProviderConfig>,
    pub anthropic: Option<HttpProviderConfig>,
    pub replay: Option<ReplayConfig>,
}

/// Settings for an HTTP provider (`[llm.groq]`, `[llm.anthropic]`).
///
/// `max_tokens` and `temperature` override `[defaults]` for that provider.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpProviderConfig {
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// Offline provider that returns a saved model response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReplayConfig {
    pub response_file: Option<String>,
}

/// Input and output locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub document: Option<String>,
    pub output: Option<String>,
    pub xlsx: Option<String>,
    pub debug_dir: Option<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            document: Some(DEFAULT_DOCUMENT_PATH.to_string()),
            output: Some(DEFAULT_OUTPUT_PATH.to_string()),
            xlsx: Some(DEFAULT_XLSX_PATH.to_string()),
            debug_dir: Some(DEFAULT_DEBUG_DIR.to_string()),
        }
    }
}

impl Config {
    #[must_use]
    pub fn provider(&self) -> &str {
        self.llm.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    #[must_use]
    pub fn model(&self) -> &str {
        self.defaults.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    /// Settings block for the active HTTP provider, if configured.
    #[must_use]
    pub fn provider_settings(&self) -> Option<&HttpProviderConfig> {
        match self.provider() {
            "groq" => self.llm.groq.as_ref(),
            "anthropic" => self.llm.anthropic.as_ref(),
            _ => None,
        }
    }

    /// Environment variable holding the API credential for the active provider.
    #[must_use]
    pub fn api_key_env(&self) -> String {
        if let Some(name) = self
            .provider_settings()
            .and_then(|settings| settings.api_key_env.clone())
        {
            return name;
        }
        match self.provider() {
            "anthropic" => ANTHROPIC_API_KEY_ENV.to_string(),
            _ => GROQ_API_KEY_ENV.to_string(),
        }
    }

    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.provider_settings()
            .and_then(|settings| settings.temperature)
            .or(self.defaults.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.provider_settings()
            .and_then(|settings| settings.max_tokens)
            .or(self.defaults.max_tokens)
            .unwrap_or(DEFAULT_MAX_TOKENS)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.defaults.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)
    }

    #[must_use]
    pub fn min_response_chars(&self) -> usize {
        self.defaults
            .min_response_chars
            .unwrap_or(DEFAULT_MIN_RESPONSE_CHARS)
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.defaults.debug.unwrap_or(false)
    }

    #[must_use]
    pub fn verbose(&self) -> bool {
        self.defaults.verbose.unwrap_or(false)
    }

    #[must_use]
    pub fn document_path(&self) -> Utf8PathBuf {
        path_or(self.paths.document.as_deref(), DEFAULT_DOCUMENT_PATH)
    }

    #[must_use]
    pub fn output_path(&self) -> Utf8PathBuf {
        path_or(self.paths.output.as_deref(), DEFAULT_OUTPUT_PATH)
    }

    #[must_use]
    pub fn xlsx_path(&self) -> Utf8PathBuf {
        path_or(self.paths.xlsx.as_deref(), DEFAULT_XLSX_PATH)
    }

    #[must_use]
    pub fn debug_dir(&self) -> Utf8PathBuf {
        path_or(self.paths.debug_dir.as_deref(), DEFAULT_DEBUG_DIR)
    }

    /// Saved response used by the `replay` provider.
    #[must_use]
    pub fn replay_file(&self) -> Option<Utf8PathBuf> {
        self.llm
            .replay
            .as_ref()
            .and_then(|replay| replay.response_file.as_deref())
            .map(Utf8PathBuf::from)
    }

    /// Defaults only, attributed to `default`. Used by tests and embedders.
    #[cfg(any(test, feature = "test-utils"))]
    #[must_use]
    pub fn minimal_for_testing() -> Self {
        Self {
            defaults: Defaults::default(),
            llm: LlmConfig {
                provider: Some(DEFAULT_PROVIDER.to_string()),
                ..LlmConfig::default()
            },
            paths: PathsConfig::default(),
            source_attribution: HashMap::new(),
        }
    }
}

fn path_or(value: Option<&str>, default: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(value.filter(|v| !v.is_empty()).unwrap_or(default))
}
