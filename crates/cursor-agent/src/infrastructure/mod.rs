//! Infrastructure layer for cursor-agent.
//!
//! Everything that touches threads, sockets, files, or the host UI lives here.
//!
//! - `ui_executor` – the single UI-owning execution context and the executor
//!   that runs units of work on it with a timeout.
//! - `surface`     – the rendered overlay (headless tracing surface and mock).
//! - `display`     – the current display bounds.
//! - `http`        – the command handler adapter (axum router).
//! - `storage`     – TOML configuration.

pub mod display;
pub mod http;
pub mod storage;
pub mod surface;
pub mod ui_executor;
