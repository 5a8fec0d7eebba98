//! Application configuration for the standalone binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::receiver::ReceiverConfig;
use super::validation::{ConfigError, expand_env_vars};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Receiver settings.
    pub receiver: ReceiverConfig,

    /// File that receives forwarded metrics as JSON lines (default: stdout).
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl AppConfig {
    /// Read and parse a YAML file without validating it.
    ///
    /// `${VAR}` and `${VAR:-default}` references are expanded before parsing.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&expand_env_vars(&content))?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.receiver.validate()?;

        if self
            .output
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::ValidationError(
                "output path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid() {
        let file = write_config(
            r#"
receiver:
  interval: 2m
  script: /scripts/m.py
output: /var/lib/execreceiver/metrics.jsonl
"#,
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.receiver.interval, "2m");
        assert_eq!(
            config.output,
            Some(PathBuf::from("/var/lib/execreceiver/metrics.jsonl"))
        );
    }

    #[test]
    fn test_load_expands_env_defaults() {
        let file = write_config(
            r#"
receiver:
  script: ${EXECRECEIVER_UNSET_SCRIPT_7731:-/scripts/fallback.py}
"#,
        );

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(
            config.receiver.script,
            PathBuf::from("/scripts/fallback.py")
        );
    }

    #[test]
    fn test_load_rejects_short_interval() {
        let file = write_config(
            r#"
receiver:
  interval: 15s
  script: /scripts/m.py
"#,
        );

        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { .. }));
    }

    #[test]
    fn test_from_file_skips_validation() {
        let file = write_config("receiver: {}\n");

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::MissingScript)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/execreceiver.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let file = write_config("receiver: [not, a, map\n");
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
