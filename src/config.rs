//! Configuration module for the exec receiver.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Receiver settings (interval, script, interpreter, timeout)
//! - Output settings for the standalone binary

mod app;
mod receiver;
mod validation;

pub use app::AppConfig;
pub use receiver::{DEFAULT_INTERPRETER, DEFAULT_INTERVAL, MIN_INTERVAL, ReceiverConfig};
pub use validation::{ConfigError, expand_env_vars, parse_duration};
