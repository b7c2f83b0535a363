//! Storage infrastructure: configuration file loading.
//!
//! The overlay itself is never persisted; it lives in process memory for the
//! session's duration.  The only file the agent reads is its TOML config.

pub mod config;

pub use config::{load_config, AppConfig, ConfigError};
