//! cursor-agent library crate.
//!
//! The remote-control layer of a UI test-automation agent: network-addressable
//! commands that show, hide, and move an on-screen cursor overlay.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Caller (JSON over HTTP)
//!         ↕
//! [cursor-agent]
//!   ├── application/          CommandDispatcher (state machine), EventJournal
//!   └── infrastructure/
//!         ├── http/           axum router: /wda/cursor/*, /api/*
//!         ├── ui_executor/    UI-owning thread + run_exclusive(work, timeout)
//!         ├── surface/        OverlaySurface (tracing, mock)
//!         ├── display/        DisplayBoundsSource
//!         └── storage/        TOML AppConfig
//! ```
//!
//! Request flow: the HTTP adapter decodes a request into a `Command`, the
//! dispatcher validates it and admits it through its sequence point, the UI
//! executor runs the rendering on the UI thread, and the committed state flows
//! back to the caller.

/// Application layer: overlay state machine and command journal.
pub mod application;

/// Infrastructure layer: UI thread, HTTP adapter, configuration.
pub mod infrastructure;
