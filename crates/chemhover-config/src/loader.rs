//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}").expect("static pattern");

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    /// Expand shell-style paths (e.g., `~/.chemhover/filters.json`).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.classifier.threshold, 1.0);
        assert_eq!(config.channel.max_id, 1024);
    }

    #[test]
    fn test_load_basic_config() {
        let content = r#"
            [classifier]
            threshold = 0.5
            model_url = "https://models.example.org/ngram.json"

            [channel]
            max_id = 64
            request_timeout_ms = 2000
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.classifier.threshold, 0.5);
        assert_eq!(
            config.classifier.model_url.as_deref(),
            Some("https://models.example.org/ngram.json")
        );
        assert_eq!(config.channel.max_id, 64);
        assert_eq!(config.channel.request_timeout_ms, Some(2000));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[walker]").unwrap();
        writeln!(file, "min_text_len = 5").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.walker.min_text_len, 5);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/chemhover.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config =
            ConfigLoader::load_or_default(Path::new("/nonexistent/path/chemhover.toml")).unwrap();
        assert_eq!(config.walker.overlay_id_prefix, "_ch");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("threshold = [unclosed");
        assert!(result.is_err());
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("CHEMHOVER_TEST_MODEL_HOST", "models.example.org");
        }
        let content = "model_url = \"https://${CHEMHOVER_TEST_MODEL_HOST}/m.json\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("https://models.example.org/m.json"));
        unsafe {
            std::env::remove_var("CHEMHOVER_TEST_MODEL_HOST");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${CHEMHOVER_NONEXISTENT_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/filters.json");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.ends_with("filters.json"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        let expanded = ConfigLoader::expand_path("/tmp/filters.json");
        assert_eq!(expanded, PathBuf::from("/tmp/filters.json"));
    }
}
