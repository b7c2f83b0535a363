//! JSON message types for the overlay command protocol.
//!
//! # Message flow
//!
//! ```text
//! Caller → Agent:  POST /wda/cursor/move  {"x":50,"y":50}          (MoveRequest)
//! Agent  → Caller: 200                    {"visible":true,"x":50,"y":50,"revision":2}
//! Agent  → Caller: 400                    {"error":"OutOfBounds","message":"..."}
//! ```
//!
//! Every success response is a [`CursorStateDto`]; every failure is an
//! [`ErrorPayload`].  Callers can branch on the presence of the `"error"` key
//! without knowing which endpoint they called.

use serde::{Deserialize, Serialize};

use crate::domain::geometry::DisplayBounds;
use crate::domain::overlay::{OverlayState, SessionId};

// ── Requests ──────────────────────────────────────────────────────────────────

/// Body of `POST /wda/cursor/move`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub x: f64,
    pub y: f64,
}

// ── Responses ─────────────────────────────────────────────────────────────────

/// Committed overlay state as returned to callers.
///
/// `x` and `y` are omitted while the overlay is hidden, so a hide response
/// reads `{"visible":false,"revision":3}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorStateDto {
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub revision: u64,
}

impl From<&OverlayState> for CursorStateDto {
    fn from(state: &OverlayState) -> Self {
        let (x, y) = if state.visible {
            (Some(state.position.x), Some(state.position.y))
        } else {
            (None, None)
        };
        Self {
            visible: state.visible,
            x,
            y,
            revision: state.revision,
        }
    }
}

/// Machine-readable failure category carried in [`ErrorPayload::error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Coordinate outside the display bounds.  Resubmit a valid coordinate.
    OutOfBounds,
    /// `MoveTo` while the overlay is hidden.  Issue `Show` first.
    NotVisible,
    /// The request itself was malformed (bad JSON, non-finite numbers).
    InvalidArgument,
    /// The UI context did not finish within the command budget.  State is
    /// unchanged and the command is safe to retry.
    Timeout,
    /// The UI system refused or failed the mutation.
    Faulted,
}

impl ErrorKind {
    /// Returns `true` for errors caused by the caller (4xx class).
    pub fn is_caller_error(self) -> bool {
        matches!(
            self,
            ErrorKind::OutOfBounds | ErrorKind::NotVisible | ErrorKind::InvalidArgument
        )
    }
}

/// Structured error body returned by every endpoint on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: ErrorKind,
    pub message: String,
}

impl ErrorPayload {
    pub fn new(error: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error,
            message: message.into(),
        }
    }
}

/// Display extent, as reported by `/api/status` and accepted by `/api/screen`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenDto {
    pub width: f64,
    pub height: f64,
}

impl From<DisplayBounds> for ScreenDto {
    fn from(b: DisplayBounds) -> Self {
        Self {
            width: b.width,
            height: b.height,
        }
    }
}

impl From<ScreenDto> for DisplayBounds {
    fn from(s: ScreenDto) -> Self {
        DisplayBounds::new(s.width, s.height)
    }
}

/// Body of `GET /api/ping`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingDto {
    pub status: String,
}

impl PingDto {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Body of `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDto {
    pub session: SessionId,
    pub screen: ScreenDto,
    pub cursor: CursorStateDto,
}

/// One entry of the command journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDto {
    /// Command kind: `"show"`, `"hide"`, `"move"`, `"screen"`, or `"reset"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Milliseconds since the Unix epoch when the outcome was recorded.
    pub ts_ms: u64,
    /// `"ok"` or the [`ErrorKind`] name of the failure.
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Revision after the command, for successful commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
}

/// Body of `GET /api/events`: the most recent entries plus the total retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventListDto {
    pub events: Vec<EventDto>,
    pub count: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
