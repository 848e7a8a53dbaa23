//! Shared enums used across the estimator crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage identifiers.
///
/// Every fatal error names the stage it came from so the CLI can tell the
/// user where the run stopped:
/// Config → Extraction → Prompt → Model → Normalize → Repair → Validate → Report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Config,
    Extraction,
    Prompt,
    Model,
    Normalize,
    Repair,
    Validate,
    Metrics,
    Report,
}

impl Stage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Extraction => "extraction",
            Self::Prompt => "prompt",
            Self::Model => "model",
            Self::Normalize => "normalize",
            Self::Repair => "repair",
            Self::Validate => "validate",
            Self::Metrics => "metrics",
            Self::Report => "report",
        }
    }

    /// Stages that operate on model output; a failure here is eligible for
    /// the single regeneration attempt.
    #[must_use]
    pub const fn is_recovery(&self) -> bool {
        matches!(self, Self::Normalize | Self::Repair | Self::Validate)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of a configuration value.
///
/// Used by `Config::effective_config()` to show where each value came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    /// Value provided via CLI argument (highest precedence).
    Cli,
    /// Value read from an environment variable.
    Env,
    /// Value loaded from configuration file.
    Config,
    /// Value provided programmatically (e.g., `Config::builder()`).
    Programmatic,
    /// Built-in default value (lowest precedence).
    Default,
}

impl ConfigSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Env => "env",
            Self::Config => "config",
            Self::Programmatic => "programmatic",
            Self::Default => "default",
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&Stage::Repair).unwrap();
        assert_eq!(json, r#""repair""#);

        let stage: Stage = serde_json::from_str(r#""validate""#).unwrap();
        assert_eq!(stage, Stage::Validate);
    }

    #[test]
    fn test_recovery_stages() {
        assert!(Stage::Normalize.is_recovery());
        assert!(Stage::Repair.is_recovery());
        assert!(Stage::Validate.is_recovery());
        assert!(!Stage::Model.is_recovery());
        assert!(!Stage::Report.is_recovery());
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Env.to_string(), "env");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }
}
