use std::collections::BTreeMap;

use crate::{Config, ConfigSource};

fn source_label(source: Option<&ConfigSource>) -> String {
    source.unwrap_or(&ConfigSource::Default).as_str().to_string()
}

impl Config {
    /// Effective configuration as `key -> (value, source)`, sorted by key.
    ///
    /// The API credential itself is never listed, only the variable it is
    /// read from.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let mut config = BTreeMap::new();

        let mut add = |key: &str, attribution: &str, value: String| {
            let source = source_label(self.source_attribution.get(attribution));
            config.insert(key.to_string(), (value, source));
        };

        add("provider", "llm_provider", self.provider().to_string());
        add("model", "model", self.model().to_string());
        add("temperature", "temperature", self.temperature().to_string());
        add("max_tokens", "max_tokens", self.max_tokens().to_string());
        add("timeout_secs", "timeout_secs", self.timeout().as_secs().to_string());
        add("max_attempts", "max_attempts", self.max_attempts().to_string());
        add(
            "min_response_chars",
            "min_response_chars",
            self.min_response_chars().to_string(),
        );
        add("debug", "debug", self.debug().to_string());
        add("debug_dir", "debug_dir", self.debug_dir().to_string());
        add("document", "document", self.document_path().to_string());
        add("output", "output", self.output_path().to_string());
        add("xlsx", "xlsx", self.xlsx_path().to_string());

        let provider_key = format!("llm_{}", self.provider());
        match self.provider() {
            "replay" => {
                if let Some(file) = self.replay_file() {
                    add("replay_file", &provider_key, file.to_string());
                }
            }
            _ => add("api_key_env", &provider_key, self.api_key_env()),
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_config_lists_sources() {
        let mut config = Config::minimal_for_testing();
        config.defaults.model = Some("llama".to_string());
        config
            .source_attribution
            .insert("model".to_string(), ConfigSource::Cli);

        let effective = config.effective_config();
        assert_eq!(
            effective["model"],
            ("llama".to_string(), "cli".to_string())
        );
        assert_eq!(
            effective["output"],
            ("project_estimation.json".to_string(), "default".to_string())
        );
        assert_eq!(effective["api_key_env"].0, "GROQ_API_KEY");
        assert!(!effective.contains_key("replay_file"));
    }
}
