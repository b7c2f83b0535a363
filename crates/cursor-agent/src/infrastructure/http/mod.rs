//! HTTP adapter: translates requests into dispatcher commands.
//!
//! Handlers hold no overlay state of their own.  Each one parses its body,
//! calls the [`CommandDispatcher`], and turns the result into JSON; failures go
//! through [`ApiError`] so the status code always matches the error kind.
//!
//! # Routes
//!
//! | Method | Path                | Purpose                               |
//! |--------|---------------------|---------------------------------------|
//! | POST   | `/wda/cursor/show`  | show the overlay                      |
//! | POST   | `/wda/cursor/hide`  | hide the overlay                      |
//! | POST   | `/wda/cursor/move`  | move it to `{"x":..,"y":..}`          |
//! | GET    | `/wda/cursor`       | committed overlay state               |
//! | GET    | `/api/ping`         | liveness                              |
//! | GET    | `/api/status`       | session id, screen size, cursor state |
//! | POST   | `/api/screen`       | publish new display bounds            |
//! | GET    | `/api/events`       | recent command journal                |
//! | POST   | `/api/events/clear` | empty the journal                     |

mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

use crate::application::{CommandDispatcher, EventJournal};
use crate::infrastructure::display::SharedDisplayBounds;

pub use error::ApiError;
pub use handlers::EVENTS_PAGE;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CommandDispatcher>,
    pub bounds: Arc<SharedDisplayBounds>,
    pub journal: Arc<EventJournal>,
}

/// Builds the router with all routes attached to `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/wda/cursor", get(handlers::cursor_state))
        .route("/wda/cursor/show", post(handlers::cursor_show))
        .route("/wda/cursor/hide", post(handlers::cursor_hide))
        .route("/wda/cursor/move", post(handlers::cursor_move))
        .route("/api/ping", get(handlers::ping))
        .route("/api/status", get(handlers::status))
        .route("/api/screen", post(handlers::update_screen))
        .route("/api/events", get(handlers::events))
        .route("/api/events/clear", post(handlers::events_clear))
        .with_state(state)
}

/// Binds `addr` and serves the router until `running` is cleared.
///
/// The flag is polled every 200 ms.  In-flight requests are allowed to finish
/// before this returns.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn run_server(
    addr: SocketAddr,
    state: AppState,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP listener on {addr}"))?;

    info!("cursor agent listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            while running.load(Ordering::Relaxed) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            info!("shutdown flag set; draining HTTP requests");
        })
        .await
        .context("HTTP server failed")?;

    Ok(())
}
