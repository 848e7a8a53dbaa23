use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use estimator_utils::error::ConfigError;
use tracing::debug;

use crate::{CliArgs, Config, ConfigSource, Defaults, LlmConfig, PathsConfig, ReplayConfig};

pub const CONFIG_FILE_NAME: &str = "estimator.toml";
pub const HOME_ENV: &str = "ESTIMATOR_HOME";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    defaults: Option<Defaults>,
    llm: Option<LlmConfig>,
    paths: Option<PathsConfig>,
}

/// Keys attributed to `default` before any override is applied.
const DEFAULT_KEYS: [&str; 13] = [
    "model",
    "temperature",
    "max_tokens",
    "timeout_secs",
    "max_attempts",
    "min_response_chars",
    "debug",
    "verbose",
    "llm_provider",
    "document",
    "output",
    "xlsx",
    "debug_dir",
];

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults.
    ///
    /// Looks for `estimator.toml` in the current directory, then in
    /// `$ESTIMATOR_HOME`, unless `--config` names a file explicitly.
    pub fn discover(cli_args: &CliArgs) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir()
            .map_err(|e| ConfigError::InvalidFile(format!("cannot read current directory: {e}")))?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// [`discover`](Self::discover) rooted at `start_dir`, reading the process environment.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self, ConfigError> {
        Self::discover_with_env(start_dir, cli_args, |key| std::env::var(key).ok())
    }

    /// Path- and environment-driven variant used by tests to avoid
    /// process-global state.
    pub fn discover_with_env(
        start_dir: &Path,
        cli_args: &CliArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let mut source_attribution = HashMap::new();
        for key in DEFAULT_KEYS {
            source_attribution.insert(key.to_string(), ConfigSource::Default);
        }

        let mut defaults = Defaults::default();
        let mut llm = LlmConfig::default();
        let mut paths = PathsConfig::default();

        // Config file
        let config_path = match &cli_args.config_path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    });
                }
                Some(explicit.clone())
            }
            None => Self::discover_config_file(start_dir, env(HOME_ENV).map(PathBuf::from)),
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file = Self::load_config_file(path)?;
            let source = ConfigSource::Config;
            let mut mark = |key: &str| {
                source_attribution.insert(key.to_string(), source.clone());
            };

            if let Some(file_defaults) = file.defaults {
                if file_defaults.model.is_some() {
                    defaults.model = file_defaults.model;
                    mark("model");
                }
                if file_defaults.temperature.is_some() {
                    defaults.temperature = file_defaults.temperature;
                    mark("temperature");
                }
                if file_defaults.max_tokens.is_some() {
                    defaults.max_tokens = file_defaults.max_tokens;
                    mark("max_tokens");
                }
                if file_defaults.timeout_secs.is_some() {
                    defaults.timeout_secs = file_defaults.timeout_secs;
                    mark("timeout_secs");
                }
                if file_defaults.max_attempts.is_some() {
                    defaults.max_attempts = file_defaults.max_attempts;
                    mark("max_attempts");
                }
                if file_defaults.min_response_chars.is_some() {
                    defaults.min_response_chars = file_defaults.min_response_chars;
                    mark("min_response_chars");
                }
                if file_defaults.debug.is_some() {
                    defaults.debug = file_defaults.debug;
                    mark("debug");
                }
                if file_defaults.verbose.is_some() {
                    defaults.verbose = file_defaults.verbose;
                    mark("verbose");
                }
            }

            if let Some(file_llm) = file.llm {
                if file_llm.provider.is_some() {
                    llm.provider = file_llm.provider;
                    mark("llm_provider");
                }
                if file_llm.groq.is_some() {
                    llm.groq = file_llm.groq;
                    mark("llm_groq");
                }
                if file_llm.anthropic.is_some() {
                    llm.anthropic = file_llm.anthropic;
                    mark("llm_anthropic");
                }
                if file_llm.replay.is_some() {
                    llm.replay = file_llm.replay;
                    mark("llm_replay");
                }
            }

            if let Some(file_paths) = file.paths {
                if file_paths.document.is_some() {
                    paths.document = file_paths.document;
                    mark("document");
                }
                if file_paths.output.is_some() {
                    paths.output = file_paths.output;
                    mark("output");
                }
                if file_paths.xlsx.is_some() {
                    paths.xlsx = file_paths.xlsx;
                    mark("xlsx");
                }
                if file_paths.debug_dir.is_some() {
                    paths.debug_dir = file_paths.debug_dir;
                    mark("debug_dir");
                }
            }
        }

        // Environment (overrides config file)
        let mut from_env = |key: &str, var: &str, slot: &mut Option<String>| {
            if let Some(value) = env(var) {
                *slot = Some(value);
                source_attribution.insert(key.to_string(), ConfigSource::Env);
            }
        };
        from_env("model", "GROQ_MODEL", &mut defaults.model);
        from_env("model", "ESTIMATOR_MODEL", &mut defaults.model);
        from_env("llm_provider", "ESTIMATOR_PROVIDER", &mut llm.provider);
        from_env("document", "DOCUMENT_PATH", &mut paths.document);
        from_env("output", "OUTPUT_PATH", &mut paths.output);
        from_env("xlsx", "XLSX_PATH", &mut paths.xlsx);
        from_env("debug_dir", "ESTIMATOR_DEBUG_DIR", &mut paths.debug_dir);

        if let Some(raw) = env("ESTIMATOR_DEBUG") {
            defaults.debug = Some(parse_bool("ESTIMATOR_DEBUG", &raw)?);
            source_attribution.insert("debug".to_string(), ConfigSource::Env);
        }

        // CLI overrides (highest priority)
        let mut from_cli = |key: &str, value: &Option<String>, slot: &mut Option<String>| {
            if let Some(value) = value {
                *slot = Some(value.clone());
                source_attribution.insert(key.to_string(), ConfigSource::Cli);
            }
        };
        from_cli("model", &cli_args.model, &mut defaults.model);
        from_cli("llm_provider", &cli_args.provider, &mut llm.provider);
        from_cli("document", &cli_args.document, &mut paths.document);
        from_cli("output", &cli_args.output, &mut paths.output);
        from_cli("xlsx", &cli_args.xlsx, &mut paths.xlsx);
        from_cli("debug_dir", &cli_args.debug_dir, &mut paths.debug_dir);

        if cli_args.debug {
            defaults.debug = Some(true);
            source_attribution.insert("debug".to_string(), ConfigSource::Cli);
        }
        if let Some(verbose) = cli_args.verbose {
            defaults.verbose = Some(verbose);
            source_attribution.insert("verbose".to_string(), ConfigSource::Cli);
        }
        if let Some(replay_file) = &cli_args.replay_file {
            llm.replay = Some(ReplayConfig {
                response_file: Some(replay_file.clone()),
            });
            source_attribution.insert("llm_replay".to_string(), ConfigSource::Cli);
        }

        if llm.provider.is_none() {
            llm.provider = Some(crate::DEFAULT_PROVIDER.to_string());
        }

        let config = Self {
            defaults,
            llm,
            paths,
            source_attribution,
        };

        config.validate()?;

        Ok(config)
    }

    /// `./estimator.toml` first, then `$ESTIMATOR_HOME/estimator.toml`.
    pub fn discover_config_file(start_dir: &Path, home: Option<PathBuf>) -> Option<PathBuf> {
        std::iter::once(start_dir.to_path_buf())
            .chain(home)
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    fn load_config_file(path: &Path) -> Result<TomlConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidFile(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {e}", path.display())))
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("expected true/false, got '{raw}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let dir = TempDir::new().unwrap();
        let config = Config::discover_with_env(dir.path(), &CliArgs::default(), no_env).unwrap();

        assert_eq!(config.provider(), "groq");
        assert_eq!(config.model(), "openai/gpt-oss-20b");
        assert_eq!(config.max_attempts(), 2);
        assert_eq!(config.min_response_chars(), 10);
        assert!(!config.debug());
        assert_eq!(config.document_path(), "sampleproject.pdf");
        assert_eq!(config.output_path(), "project_estimation.json");
        assert_eq!(config.xlsx_path(), "estimation_data.xlsx");
        assert_eq!(config.source_attribution["model"], ConfigSource::Default);
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[defaults]
model = "file-model"
timeout_secs = 120

[paths]
document = "file.pdf"
output = "file.json"
"#,
        )
        .unwrap();

        let env = env_from(&[("DOCUMENT_PATH", "env.pdf"), ("ESTIMATOR_MODEL", "env-model")]);
        let cli = CliArgs {
            model: Some("cli-model".to_string()),
            ..CliArgs::default()
        };
        let config = Config::discover_with_env(dir.path(), &cli, env).unwrap();

        assert_eq!(config.model(), "cli-model");
        assert_eq!(config.source_attribution["model"], ConfigSource::Cli);
        assert_eq!(config.document_path(), "env.pdf");
        assert_eq!(config.source_attribution["document"], ConfigSource::Env);
        assert_eq!(config.output_path(), "file.json");
        assert_eq!(config.source_attribution["output"], ConfigSource::Config);
        assert_eq!(config.timeout().as_secs(), 120);
        assert_eq!(config.source_attribution["xlsx"], ConfigSource::Default);
    }

    #[test]
    fn test_groq_model_alias_loses_to_estimator_model() {
        let dir = TempDir::new().unwrap();
        let only_alias = env_from(&[("GROQ_MODEL", "llama-3.3-70b")]);
        let config =
            Config::discover_with_env(dir.path(), &CliArgs::default(), only_alias).unwrap();
        assert_eq!(config.model(), "llama-3.3-70b");

        let both = env_from(&[("GROQ_MODEL", "llama-3.3-70b"), ("ESTIMATOR_MODEL", "qwen")]);
        let config = Config::discover_with_env(dir.path(), &CliArgs::default(), both).unwrap();
        assert_eq!(config.model(), "qwen");
    }

    #[test]
    fn test_debug_from_env_and_cli() {
        let dir = TempDir::new().unwrap();
        let env = env_from(&[("ESTIMATOR_DEBUG", "true")]);
        let config = Config::discover_with_env(dir.path(), &CliArgs::default(), env).unwrap();
        assert!(config.debug());

        let cli = CliArgs {
            debug: true,
            ..CliArgs::default()
        };
        let config = Config::discover_with_env(dir.path(), &cli, no_env).unwrap();
        assert!(config.debug());
        assert_eq!(config.source_attribution["debug"], ConfigSource::Cli);
    }

    #[test]
    fn test_invalid_debug_env_is_rejected() {
        let dir = TempDir::new().unwrap();
        let env = env_from(&[("ESTIMATOR_DEBUG", "sometimes")]);
        let err = Config::discover_with_env(dir.path(), &CliArgs::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "ESTIMATOR_DEBUG"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let dir = TempDir::new().unwrap();
        let env = env_from(&[("OUTPUT_PATH", "  ")]);
        let config = Config::discover_with_env(dir.path(), &CliArgs::default(), env).unwrap();
        assert_eq!(config.output_path(), "project_estimation.json");
    }

    #[test]
    fn test_home_config_is_discovered() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join(CONFIG_FILE_NAME),
            "[llm]\nprovider = \"anthropic\"\n",
        )
        .unwrap();

        let home_path = home.path().to_string_lossy().into_owned();
        let env = move |key: &str| (key == HOME_ENV).then(|| home_path.clone());
        let config = Config::discover_with_env(cwd.path(), &CliArgs::default(), env).unwrap();

        assert_eq!(config.provider(), "anthropic");
        assert_eq!(config.api_key_env(), "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            config_path: Some(dir.path().join("nope.toml")),
            ..CliArgs::default()
        };
        let err = Config::discover_with_env(dir.path(), &cli, no_env).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_toml_is_invalid_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[defaults\nmodel = 1").unwrap();
        let err = Config::discover_with_env(dir.path(), &CliArgs::default(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFile(_)));
    }

    #[test]
    fn test_provider_section_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"
[defaults]
temperature = 0.5

[llm.groq]
api_key_env = "MY_GROQ_KEY"
temperature = 0.1
max_tokens = 4096
"#,
        )
        .unwrap();
        let config = Config::discover_with_env(dir.path(), &CliArgs::default(), no_env).unwrap();
        assert_eq!(config.api_key_env(), "MY_GROQ_KEY");
        assert!((config.temperature() - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens(), 4096);
    }

    #[test]
    fn test_replay_file_from_cli() {
        let dir = TempDir::new().unwrap();
        let cli = CliArgs {
            provider: Some("replay".to_string()),
            replay_file: Some("saved/response.txt".to_string()),
            ..CliArgs::default()
        };
        let config = Config::discover_with_env(dir.path(), &cli, no_env).unwrap();
        assert_eq!(config.provider(), "replay");
        assert_eq!(config.replay_file().unwrap(), "saved/response.txt");
    }
}
