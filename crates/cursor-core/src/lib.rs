//! # cursor-core
//!
//! Shared library for the cursor overlay agent containing the overlay domain
//! entities, the coordinate validator, and the JSON wire messages exchanged
//! with remote callers.
//!
//! It has zero dependencies on OS APIs, UI frameworks, async runtimes, or
//! network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! A UI test-automation agent draws a small cursor overlay on screen so that
//! recorded or live test sessions show *where* automated interactions happen.
//! Remote callers drive that overlay with three commands: show, hide, and
//! move-to-coordinate.
//!
//! This crate (`cursor-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure business logic.  `Point` and `DisplayBounds` describe
//!   screen geometry, [`validate`] decides whether a requested coordinate is
//!   on screen, and `OverlayState` / `Command` describe the overlay and the
//!   operations that mutate it.
//!
//! - **`protocol`** – The JSON shapes of request bodies, responses, and error
//!   payloads.  The agent's HTTP adapter serialises these with `serde_json`.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `cursor_core::OverlayState` instead of the full module path.
pub use domain::geometry::{validate, BoundsError, DisplayBounds, Point};
pub use domain::overlay::{Command, OverlayPhase, OverlayState, SessionId, ShowPosition};
pub use protocol::messages::{
    CursorStateDto, ErrorKind, ErrorPayload, EventDto, EventListDto, MoveRequest, PingDto,
    ScreenDto, StatusDto,
};
