//! Receiver configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::{ConfigError, parse_duration};

/// Minimum allowed polling interval (1 minute).
pub const MIN_INTERVAL: Duration = Duration::from_secs(60);

/// Default polling interval literal.
pub const DEFAULT_INTERVAL: &str = "1m";

/// Default interpreter used to run the script.
pub const DEFAULT_INTERPRETER: &str = "/usr/bin/python3";

fn default_interval() -> String {
    DEFAULT_INTERVAL.to_string()
}

fn default_interpreter() -> PathBuf {
    PathBuf::from(DEFAULT_INTERPRETER)
}

/// Settings for one exec receiver instance.
///
/// The interval is kept as the raw duration literal so that validation can
/// report exactly what the user wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverConfig {
    /// Polling interval literal, e.g. `"1m"` or `"90s"` (default: 1m, minimum: 1m).
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Path to the script handed to the interpreter.
    #[serde(default)]
    pub script: PathBuf,

    /// Interpreter binary (default: /usr/bin/python3).
    #[serde(default = "default_interpreter")]
    pub interpreter: PathBuf,

    /// Optional upper bound for a single script run.
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            script: PathBuf::new(),
            interpreter: default_interpreter(),
            timeout: None,
        }
    }
}

impl ReceiverConfig {
    /// Create a configuration for the given script with default settings.
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Set the interval literal.
    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    /// Set the interpreter binary.
    pub fn with_interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    /// Set the per-run timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Parse the interval literal and enforce [`MIN_INTERVAL`].
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidInterval` if the literal cannot be parsed
    /// or is shorter than one minute.
    pub fn parse_interval(&self) -> Result<Duration, ConfigError> {
        let interval = parse_duration(&self.interval).map_err(|reason| {
            ConfigError::InvalidInterval {
                interval: self.interval.clone(),
                reason,
            }
        })?;

        if interval < MIN_INTERVAL {
            return Err(ConfigError::InvalidInterval {
                interval: self.interval.clone(),
                reason: format!(
                    "interval has to be at least {}",
                    humantime::format_duration(MIN_INTERVAL)
                ),
            });
        }

        Ok(interval)
    }

    /// Validate the configuration and return the parsed interval.
    ///
    /// # Errors
    /// - `ConfigError::InvalidInterval` for an unparsable or too short interval
    /// - `ConfigError::MissingScript` for an empty script path
    /// - `ConfigError::ValidationError` for an empty interpreter or zero timeout
    pub fn validate(&self) -> Result<Duration, ConfigError> {
        let interval = self.parse_interval()?;

        if self.script.as_os_str().is_empty() {
            return Err(ConfigError::MissingScript);
        }

        if self.interpreter.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "interpreter path cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::ValidationError(
                "timeout must be positive when set".to_string(),
            ));
        }

        Ok(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_config_defaults() {
        let config = ReceiverConfig::new("/scripts/m.py");
        assert_eq!(config.interval, "1m");
        assert_eq!(config.interpreter, PathBuf::from(DEFAULT_INTERPRETER));
        assert!(config.timeout.is_none());
        assert_eq!(config.validate().unwrap(), Duration::from_secs(60));
    }

    #[test]
    fn test_interval_below_minimum() {
        for literal in ["30s", "59s", "100ms", "0s"] {
            let config = ReceiverConfig::new("/scripts/m.py").with_interval(literal);
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidInterval { ref interval, .. } if interval == literal),
                "unexpected error for {literal}: {err}"
            );
        }
    }

    #[test]
    fn test_interval_unparsable() {
        for literal in ["", "soon", "5", "1 minute-ish"] {
            let config = ReceiverConfig::new("/scripts/m.py").with_interval(literal);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidInterval { .. })
            ));
        }
    }

    #[test]
    fn test_interval_accepted() {
        let config = ReceiverConfig::new("/scripts/m.py").with_interval("1h30m");
        assert_eq!(config.validate().unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_missing_script() {
        let config = ReceiverConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingScript)));
    }

    #[test]
    fn test_interval_checked_before_script() {
        let config = ReceiverConfig::default().with_interval("10s");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = ReceiverConfig::new("/scripts/m.py").with_timeout(Duration::ZERO);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_empty_interpreter_rejected() {
        let config = ReceiverConfig::new("/scripts/m.py").with_interpreter("");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("interpreter"));
    }

    #[test]
    fn test_receiver_config_serde() {
        let yaml = r#"
interval: 5m
script: /scripts/m.py
interpreter: /opt/venv/bin/python
timeout: 30s
"#;

        let config: ReceiverConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.interval, "5m");
        assert_eq!(config.script, PathBuf::from("/scripts/m.py"));
        assert_eq!(config.interpreter, PathBuf::from("/opt/venv/bin/python"));
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_receiver_config_serde_defaults() {
        let config: ReceiverConfig = serde_yaml::from_str("script: /scripts/m.py").unwrap();
        assert_eq!(config.interval, DEFAULT_INTERVAL);
        assert_eq!(config.interpreter, PathBuf::from(DEFAULT_INTERPRETER));
        assert!(config.timeout.is_none());
    }
}
