//! Overlay state, lifecycle phase, and the command set.
//!
//! # Lifecycle
//!
//! ```text
//!                 first command
//! Uninitialized ───────────────► Hidden ◄──── Hide ────┐
//!       ▲                          │                   │
//!       │ session reset            │ Show              │
//!       │                          ▼                   │
//!       └──────────────────────  Visible ──────────────┘
//!                                  │  ▲
//!                                  └──┘ MoveTo(x, y)
//! ```
//!
//! `Uninitialized` behaves exactly like `Hidden`; it only records that no
//! command has been processed since the session started (or was reset).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geometry::Point;

/// Coarse lifecycle phase of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    /// No command has been processed yet in this session.
    Uninitialized,
    /// The overlay is not drawn.
    Hidden,
    /// The overlay is drawn at the committed position.
    Visible,
}

impl OverlayPhase {
    /// Returns the phase that a first command starts from.
    ///
    /// `Uninitialized` resolves to `Hidden`; every other phase is unchanged.
    pub fn effective(self) -> OverlayPhase {
        match self {
            OverlayPhase::Uninitialized => OverlayPhase::Hidden,
            other => other,
        }
    }
}

/// The single authoritative record of the cursor overlay.
///
/// `position` is only meaningful while `visible` is `true`.  `revision`
/// increases by exactly one on every committed mutation and never decreases;
/// it identifies the freshness of the state so late asynchronous completions
/// can be recognised as stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayState {
    pub visible: bool,
    pub position: Point,
    pub revision: u64,
}

impl Default for OverlayState {
    /// Hidden at the origin, revision 0.
    fn default() -> Self {
        Self {
            visible: false,
            position: Point::ORIGIN,
            revision: 0,
        }
    }
}

impl OverlayState {
    /// The phase this state represents (never `Uninitialized`).
    pub fn phase(&self) -> OverlayPhase {
        if self.visible {
            OverlayPhase::Visible
        } else {
            OverlayPhase::Hidden
        }
    }

    /// The next state after showing the overlay at `at`.
    pub fn shown_at(&self, at: Point) -> Self {
        Self {
            visible: true,
            position: at,
            revision: self.revision + 1,
        }
    }

    /// The next state after repositioning a visible overlay.
    pub fn moved_to(&self, at: Point) -> Self {
        Self {
            visible: true,
            position: at,
            revision: self.revision + 1,
        }
    }

    /// The next state after removing the overlay.
    pub fn hidden(&self) -> Self {
        Self {
            visible: false,
            position: self.position,
            revision: self.revision + 1,
        }
    }
}

/// A requested overlay operation.  Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Show,
    Hide,
    MoveTo { x: f64, y: f64 },
}

impl Command {
    /// Short, stable name used in logs and the event journal.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::Show => "show",
            Command::Hide => "hide",
            Command::MoveTo { .. } => "move",
        }
    }
}

/// Where `Show` places a freshly created overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowPosition {
    /// The top-left corner, `(0, 0)`.
    #[default]
    Origin,
    /// The centre of the current display bounds.
    Center,
}

/// Identifies one automation session, i.e. one overlay store and its dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generates a fresh random session identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
