//! TOML-based configuration for the agent.
//!
//! Looked up, in order:
//! 1. The path given with `--config` (or `CURSOR_AGENT_CONFIG`).
//! 2. The platform config file:
//!    - Linux:   `$XDG_CONFIG_HOME/cursor-agent/config.toml` (or `~/.config/...`)
//!    - macOS:   `~/Library/Application Support/CursorAgent/config.toml`
//!    - Windows: `%APPDATA%\CursorAgent\config.toml`
//! 3. Built-in defaults when neither exists.
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0"
//! port = 8100
//!
//! [display]
//! width = 393.0
//! height = 852.0
//!
//! [cursor]
//! command_timeout_ms = 2000
//! show_position = "origin"
//!
//! [journal]
//! capacity = 2000
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a `#[serde(default = ...)]`, so a partial file (or an empty
//! one) is valid and missing values fall back to the table above.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use cursor_core::{DisplayBounds, ShowPosition};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dispatch::DispatcherConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// `server.bind_address` is not an IP address.
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    /// `display.width` / `display.height` are not positive.
    #[error("invalid display size {width}x{height}: both must be positive")]
    InvalidDisplay { width: f64, height: f64 },

    /// `cursor.command_timeout_ms` is zero.
    #[error("cursor.command_timeout_ms must be greater than zero")]
    ZeroTimeout,
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// IP address to bind.  `"0.0.0.0"` accepts connections on all interfaces.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// TCP port.  8100 matches the conventional WebDriverAgent port.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Initial display bounds, until the geometry owner publishes real ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

/// Overlay command policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CursorConfig {
    /// Per-command budget for the UI context, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub command_timeout_ms: u64,
    /// Where `Show` creates the overlay: `"origin"` or `"center"`.
    #[serde(default)]
    pub show_position: ShowPosition,
}

/// Command journal settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalConfig {
    #[serde(default = "default_journal_capacity")]
    pub capacity: usize,
}

/// Logging settings.  `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `"info"` or `"cursor_agent=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8100
}
fn default_width() -> f64 {
    393.0
}
fn default_height() -> f64 {
    852.0
}
fn default_timeout_ms() -> u64 {
    2000
}
fn default_journal_capacity() -> usize {
    crate::application::journal::DEFAULT_JOURNAL_CAPACITY
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_timeout_ms(),
            show_position: ShowPosition::default(),
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: default_journal_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Derived runtime values ────────────────────────────────────────────────────

impl AppConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Checks the values that would otherwise fail later at startup.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        self.display_bounds()?;
        if self.cursor.command_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// The socket address the HTTP listener binds to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] if `server.bind_address`
    /// is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind_address.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    /// The initial display bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDisplay`] if either dimension is not positive.
    pub fn display_bounds(&self) -> Result<DisplayBounds, ConfigError> {
        let bounds = DisplayBounds::new(self.display.width, self.display.height);
        if !bounds.is_valid() {
            return Err(ConfigError::InvalidDisplay {
                width: self.display.width,
                height: self.display.height,
            });
        }
        Ok(bounds)
    }

    /// Dispatcher policy derived from the `[cursor]` table.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            command_timeout: Duration::from_millis(self.cursor.command_timeout_ms),
            show_position: self.cursor.show_position,
        }
    }
}

// ── Config loading ────────────────────────────────────────────────────────────

/// Loads the configuration.
///
/// With `Some(path)` the file must exist.  With `None` the platform config file
/// is used if present, otherwise [`AppConfig::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match platform_config_file() {
            Some(p) => (p, false),
            None => return Ok(AppConfig::default()),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => AppConfig::from_toml_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            Ok(AppConfig::default())
        }
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

/// Resolves the platform config file path, if the platform has one.
fn platform_config_file() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(|p| PathBuf::from(p).join("CursorAgent").join("config.toml"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("cursor-agent").join("config.toml"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CursorAgent")
                .join("config.toml")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.server.port, 8100);
        assert_eq!(cfg.server.bind_address, "0.0.0.0");
        assert_eq!(cfg.display.width, 393.0);
        assert_eq!(cfg.display.height, 852.0);
        assert_eq!(cfg.cursor.command_timeout_ms, 2000);
        assert_eq!(cfg.cursor.show_position, ShowPosition::Origin);
        assert_eq!(cfg.journal.capacity, 2000);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let cfg = AppConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        // Arrange
        let toml_str = r#"
            [cursor]
            show_position = "center"

            [server]
            port = 9000
        "#;

        // Act
        let cfg = AppConfig::from_toml_str(toml_str).unwrap();

        // Assert
        assert_eq!(cfg.cursor.show_position, ShowPosition::Center);
        assert_eq!(cfg.cursor.command_timeout_ms, 2000);
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.bind_address, "0.0.0.0");
    }

    #[test]
    fn test_unknown_show_position_is_a_parse_error() {
        let result = AppConfig::from_toml_str("[cursor]\nshow_position = \"corner\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut cfg = AppConfig::default();
        cfg.display.width = 1170.0;
        cfg.cursor.command_timeout_ms = 500;

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored = AppConfig::from_toml_str(&text).expect("deserialize");

        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_bind_addr_combines_ip_and_port() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr().unwrap().to_string(), "0.0.0.0:8100");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut bad_ip = AppConfig::default();
        bad_ip.server.bind_address = "not.an.ip".to_string();
        assert!(matches!(
            bad_ip.validate(),
            Err(ConfigError::InvalidBindAddress(_))
        ));

        let mut bad_display = AppConfig::default();
        bad_display.display.height = 0.0;
        assert!(matches!(
            bad_display.validate(),
            Err(ConfigError::InvalidDisplay { .. })
        ));

        let mut zero_timeout = AppConfig::default();
        zero_timeout.cursor.command_timeout_ms = 0;
        assert!(matches!(zero_timeout.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn test_dispatcher_config_conversion() {
        let mut cfg = AppConfig::default();
        cfg.cursor.command_timeout_ms = 750;
        let dc = cfg.dispatcher_config();
        assert_eq!(dc.command_timeout, Duration::from_millis(750));
        assert_eq!(dc.show_position, ShowPosition::Origin);
    }

    #[test]
    fn test_load_config_with_missing_explicit_path_is_io_error() {
        let path = Path::new("/definitely/not/here/cursor-agent.toml");
        assert!(matches!(load_config(Some(path)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_reads_explicit_file() {
        // Arrange: write a temporary config file
        let path = std::env::temp_dir().join(format!(
            "cursor-agent-test-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, "[display]\nwidth = 1024.0\nheight = 768.0\n").unwrap();

        // Act
        let cfg = load_config(Some(&path)).unwrap();
        let _ = std::fs::remove_file(&path);

        // Assert
        assert_eq!(cfg.display_bounds().unwrap(), DisplayBounds::new(1024.0, 768.0));
    }
}
