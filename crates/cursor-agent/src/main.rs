//! Cursor overlay agent: entry point.
//!
//! Serves the `/wda/cursor/*` command endpoints used by test automation to
//! show, hide, and move an on-screen cursor overlay, plus a few `/api/*`
//! diagnostics.
//!
//! # Usage
//!
//! ```text
//! cursor-agent [OPTIONS]
//!
//! Options:
//!   --config <PATH>         TOML config file
//!   --bind <IP>             HTTP bind address [default from config: 0.0.0.0]
//!   --port <PORT>           HTTP port [default from config: 8100]
//!   --screen-width <PX>     Initial logical display width
//!   --screen-height <PX>    Initial logical display height
//!   --timeout-ms <MS>       Per-command UI budget
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Flag              |
//! |-----------------------|-------------------|
//! | `CURSOR_AGENT_CONFIG` | `--config`        |
//! | `CURSOR_AGENT_BIND`   | `--bind`          |
//! | `CURSOR_AGENT_PORT`   | `--port`          |
//! | `SCREEN_WIDTH`        | `--screen-width`  |
//! | `SCREEN_HEIGHT`       | `--screen-height` |
//! | `CURSOR_TIMEOUT_MS`   | `--timeout-ms`    |
//!
//! Precedence: CLI flag, then environment variable, then config file, then
//! built-in default.  `RUST_LOG` overrides `[logging] level`.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cursor_agent::application::{CommandDispatcher, EventJournal};
use cursor_agent::infrastructure::display::SharedDisplayBounds;
use cursor_agent::infrastructure::http::{run_server, AppState};
use cursor_agent::infrastructure::storage::{load_config, AppConfig};
use cursor_agent::infrastructure::surface::TracingSurface;
use cursor_agent::infrastructure::ui_executor::{DedicatedUiThread, UiAffinityExecutor};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote-control agent for the test-automation cursor overlay.
#[derive(Debug, Parser)]
#[command(
    name = "cursor-agent",
    about = "HTTP command endpoint for the UI test-automation cursor overlay",
    version
)]
struct Cli {
    /// Path to a TOML config file.  Without it the platform config file is
    /// used when present.
    #[arg(long, env = "CURSOR_AGENT_CONFIG")]
    config: Option<PathBuf>,

    /// IP address to bind the HTTP listener to.
    #[arg(long, env = "CURSOR_AGENT_BIND")]
    bind: Option<String>,

    /// TCP port for the HTTP listener.
    #[arg(long, env = "CURSOR_AGENT_PORT")]
    port: Option<u16>,

    /// Initial logical display width in points.
    #[arg(long, env = "SCREEN_WIDTH")]
    screen_width: Option<f64>,

    /// Initial logical display height in points.
    #[arg(long, env = "SCREEN_HEIGHT")]
    screen_height: Option<f64>,

    /// How long a command waits for the UI context, in milliseconds.
    #[arg(long, env = "CURSOR_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    /// Loads the config file and applies the CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, or if
    /// the merged values are invalid.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let mut config = load_config(self.config.as_deref()).context("failed to load config")?;
        self.apply_overrides(&mut config);
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn apply_overrides(self, config: &mut AppConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(width) = self.screen_width {
            config.display.width = width;
        }
        if let Some(height) = self.screen_height {
            config.display.height = height;
        }
        if let Some(ms) = self.timeout_ms {
            config.cursor.command_timeout_ms = ms;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_app_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // RUST_LOG wins; otherwise the `[logging] level` from the config applies.
    let fallback = config.logging.level.clone();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();

    let addr = config.bind_addr()?;
    let bounds = config.display_bounds()?;
    info!(
        "cursor agent starting: http={addr}, screen={bounds}, timeout={}ms",
        config.cursor.command_timeout_ms
    );

    // ── Wiring ────────────────────────────────────────────────────────────────
    let ui = Arc::new(DedicatedUiThread::spawn("overlay-ui").context("failed to spawn UI thread")?);
    let executor = UiAffinityExecutor::new(ui.clone());
    let display = Arc::new(SharedDisplayBounds::new(bounds)?);
    let journal = Arc::new(EventJournal::new(config.journal.capacity));

    let dispatcher = Arc::new(CommandDispatcher::new(
        executor,
        Arc::new(TracingSurface),
        display.clone(),
        journal.clone(),
        config.dispatcher_config(),
    ));

    let state = AppState {
        dispatcher: dispatcher.clone(),
        bounds: display,
        journal,
    };

    // ── Graceful shutdown flag ────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_server(addr, state, running).await?;

    // The session ends with the overlay removed from the screen.
    if let Err(e) = dispatcher.reset().await {
        tracing::warn!("overlay could not be hidden at shutdown: {e}");
    }
    ui.close().await;

    info!("cursor agent stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_core::ShowPosition;

    fn bare_cli() -> Cli {
        Cli {
            config: None,
            bind: None,
            port: None,
            screen_width: None,
            screen_height: None,
            timeout_ms: None,
        }
    }

    #[test]
    fn test_cli_flags_are_optional() {
        let cli = Cli::try_parse_from(["cursor-agent"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_port_override() {
        let cli = Cli::parse_from(["cursor-agent", "--port", "9100"]);
        assert_eq!(cli.port, Some(9100));
    }

    #[test]
    fn test_cli_screen_size_override() {
        let cli = Cli::parse_from([
            "cursor-agent",
            "--screen-width",
            "852",
            "--screen-height",
            "393",
        ]);
        assert_eq!(cli.screen_width, Some(852.0));
        assert_eq!(cli.screen_height, Some(393.0));
    }

    #[test]
    fn test_cli_rejects_non_numeric_timeout() {
        let result = Cli::try_parse_from(["cursor-agent", "--timeout-ms", "soon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        // Arrange
        let mut config = AppConfig::default();
        let cli = Cli {
            port: Some(9000),
            timeout_ms: Some(250),
            ..bare_cli()
        };

        // Act
        cli.apply_overrides(&mut config);

        // Assert
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.cursor.command_timeout_ms, 250);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.display.width, 393.0);
        assert_eq!(config.cursor.show_position, ShowPosition::Origin);
    }

    #[test]
    fn test_into_app_config_with_missing_file_fails() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/cursor-agent.toml")),
            ..bare_cli()
        };
        assert!(cli.into_app_config().is_err());
    }

    #[test]
    fn test_zero_screen_width_fails_validation() {
        let mut config = AppConfig::default();
        Cli {
            screen_width: Some(0.0),
            ..bare_cli()
        }
        .apply_overrides(&mut config);

        assert!(config.validate().is_err());
    }
}
