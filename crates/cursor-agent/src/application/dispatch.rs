//! Command dispatcher: the overlay state machine.
//!
//! The dispatcher is the only owner of the overlay store.  It receives typed
//! [`Command`]s, decides the transition, routes the rendering work through the
//! [`UiAffinityExecutor`], and commits the new [`OverlayState`] once the UI
//! context confirms it.
//!
//! # State machine
//!
//! | Current  | Command      | Next    | Effect                              |
//! |----------|--------------|---------|-------------------------------------|
//! | Hidden   | Show         | Visible | overlay created at the show position |
//! | Visible  | Show         | Visible | no-op, success                      |
//! | Visible  | Hide         | Hidden  | overlay removed                     |
//! | Hidden   | Hide         | Hidden  | no-op, success                      |
//! | Visible  | MoveTo(x, y) | Visible | validate, then reposition           |
//! | Hidden   | MoveTo(x, y) | Hidden  | fails with `NotVisible`             |
//!
//! `Uninitialized` is treated as `Hidden` by the first command.
//!
//! # Ordering
//!
//! Commands are admitted one at a time through a private `tokio::sync::Mutex`
//! around the store.  Tokio's mutex is fair: waiters acquire it in the order
//! they called `lock()`, so concurrently issued commands are decided and
//! committed in arrival order.  Each admitted mutation also gets a ticket from
//! a monotonically increasing counter.
//!
//! # Timeouts and late completions
//!
//! A unit of work that exceeds the command budget keeps running on the UI
//! context.  The caller gets `Timeout` immediately and the store is left
//! unchanged.  A background task then waits for the unit to finish:
//!
//! - if no later-admitted mutation has been committed meanwhile, the late
//!   result is applied (the screen really does show it);
//! - otherwise it is stale and discarded, so it can never overwrite a newer
//!   position.
//!
//! While any timed-out unit is still outstanding, `Show` and `Hide` are never
//! short-circuited as no-ops: they are rendered behind the late unit and
//! their commit supersedes it, so the last command to succeed is what the
//! screen shows.
//!
//! # Display changes
//!
//! [`CommandDispatcher::update_bounds`] publishes new bounds from inside the
//! sequence point.  A visible overlay whose position falls outside the new
//! extent is hidden through the executor first.

use std::sync::Arc;
use std::time::Duration;

use cursor_core::{
    validate, BoundsError, Command, DisplayBounds, ErrorKind, OverlayPhase, OverlayState, Point,
    SessionId, ShowPosition,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::application::journal::{saturating_millis, EventJournal};
use crate::infrastructure::display::DisplayBoundsSource;
use crate::infrastructure::surface::OverlaySurface;
use crate::infrastructure::ui_executor::{ExecOutcome, PendingCompletion, UiAffinityExecutor, UiFault};

/// Default per-command budget for the UI context.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Policy knobs for the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// How long a command waits for the UI context before reporting `Timeout`.
    pub command_timeout: Duration,
    /// Where `Show` places a freshly created overlay.
    pub show_position: ShowPosition,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            show_position: ShowPosition::Origin,
        }
    }
}

/// Errors returned by [`CommandDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The requested coordinate lies outside the display.
    #[error("{0}")]
    OutOfBounds(BoundsError),

    /// The requested coordinate is not a finite number.
    #[error("{0}")]
    InvalidArgument(BoundsError),

    /// The display bounds source returned unusable bounds.
    #[error("display bounds unavailable: {0}")]
    InvalidDisplay(BoundsError),

    /// `MoveTo` was issued while the overlay is hidden.
    #[error("cannot move the overlay while it is hidden; show it first")]
    NotVisible,

    /// The UI context did not finish within the command budget.
    #[error("UI context did not complete '{command}' within {budget:?}; state is unchanged")]
    Timeout {
        command: &'static str,
        budget: Duration,
    },

    /// The UI system refused or failed the mutation.
    #[error("UI system failed '{command}': {fault}")]
    Faulted {
        command: &'static str,
        #[source]
        fault: UiFault,
    },
}

impl DispatchError {
    /// Wire category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::OutOfBounds(_) => ErrorKind::OutOfBounds,
            DispatchError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            DispatchError::NotVisible => ErrorKind::NotVisible,
            DispatchError::Timeout { .. } => ErrorKind::Timeout,
            DispatchError::InvalidDisplay(_) | DispatchError::Faulted { .. } => ErrorKind::Faulted,
        }
    }
}

impl From<BoundsError> for DispatchError {
    fn from(err: BoundsError) -> Self {
        match err {
            BoundsError::OutOfBounds { .. } => DispatchError::OutOfBounds(err),
            BoundsError::NonFinite { .. } => DispatchError::InvalidArgument(err),
            BoundsError::InvalidBounds(_) => DispatchError::InvalidDisplay(err),
        }
    }
}

/// A decided mutation, ready to be rendered on the UI context.
#[derive(Debug, Clone, Copy)]
enum SurfaceOp {
    Show(Point),
    Move(Point),
    Hide,
}

impl SurfaceOp {
    fn render(self, surface: &dyn OverlaySurface) -> Result<(), UiFault> {
        match self {
            SurfaceOp::Show(at) => surface.show(at),
            SurfaceOp::Move(at) => surface.move_to(at),
            SurfaceOp::Hide => surface.hide(),
        }
    }

    fn next_state(self, current: &OverlayState) -> OverlayState {
        match self {
            SurfaceOp::Show(at) => current.shown_at(at),
            SurfaceOp::Move(at) => current.moved_to(at),
            SurfaceOp::Hide => current.hidden(),
        }
    }
}

/// The overlay store.  Never handed out; only copies of `state` leave.
#[derive(Debug)]
struct OverlayStore {
    phase: OverlayPhase,
    state: OverlayState,
    /// Ticket of the most recently committed mutation.
    committed_ticket: u64,
    /// Ticket the next admitted mutation will receive.
    next_ticket: u64,
    /// Timed-out units whose late completion has not been reconciled yet.
    outstanding: usize,
}

impl OverlayStore {
    fn new() -> Self {
        Self {
            phase: OverlayPhase::Uninitialized,
            state: OverlayState::default(),
            committed_ticket: 0,
            next_ticket: 1,
            outstanding: 0,
        }
    }

    fn admit(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    fn commit(&mut self, ticket: u64, state: OverlayState) {
        self.state = state;
        self.phase = state.phase();
        self.committed_ticket = ticket;
    }
}

/// Receives overlay commands and serialises them against the UI context.
pub struct CommandDispatcher {
    session: SessionId,
    executor: UiAffinityExecutor,
    surface: Arc<dyn OverlaySurface>,
    bounds: Arc<dyn DisplayBoundsSource>,
    journal: Arc<EventJournal>,
    config: DispatcherConfig,
    store: Arc<Mutex<OverlayStore>>,
}

impl CommandDispatcher {
    /// Creates a dispatcher for a new session with a default (hidden) overlay.
    pub fn new(
        executor: UiAffinityExecutor,
        surface: Arc<dyn OverlaySurface>,
        bounds: Arc<dyn DisplayBoundsSource>,
        journal: Arc<EventJournal>,
        config: DispatcherConfig,
    ) -> Self {
        let session = SessionId::new();
        info!(
            %session,
            timeout_ms = saturating_millis(config.command_timeout),
            "overlay session started"
        );
        Self {
            session,
            executor,
            surface,
            bounds,
            journal,
            config,
            store: Arc::new(Mutex::new(OverlayStore::new())),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    /// Shows the overlay.
    pub async fn show(&self) -> Result<OverlayState, DispatchError> {
        self.dispatch(Command::Show).await
    }

    /// Hides the overlay.
    pub async fn hide(&self) -> Result<OverlayState, DispatchError> {
        self.dispatch(Command::Hide).await
    }

    /// Moves the visible overlay to `(x, y)`.
    pub async fn move_to(&self, x: f64, y: f64) -> Result<OverlayState, DispatchError> {
        self.dispatch(Command::MoveTo { x, y }).await
    }

    /// Returns the current committed state.
    ///
    /// Waits behind commands that are already being processed, so the answer
    /// reflects everything admitted before this call.
    pub async fn state(&self) -> OverlayState {
        self.store.lock().await.state
    }

    /// Returns the current lifecycle phase.
    pub async fn phase(&self) -> OverlayPhase {
        self.store.lock().await.phase
    }

    /// Applies `command` and returns the resulting committed state.
    ///
    /// The call does not return until the mutation is committed, has failed,
    /// or has timed out.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`].  On every error the committed state is unchanged.
    pub async fn dispatch(&self, command: Command) -> Result<OverlayState, DispatchError> {
        let result = self.apply(command).await;

        match &result {
            Ok(state) => {
                debug!(
                    command = command.kind(),
                    revision = state.revision,
                    visible = state.visible,
                    "command committed"
                );
                let at = state.visible.then_some((state.position.x, state.position.y));
                self.journal
                    .record(command.kind(), "ok", at, Some(state.revision));
            }
            Err(err) => {
                if err.kind().is_caller_error() {
                    debug!(command = command.kind(), "command rejected: {err}");
                } else {
                    warn!(command = command.kind(), "command failed: {err}");
                }
                let at = match command {
                    Command::MoveTo { x, y } => Some((x, y)),
                    _ => None,
                };
                self.journal
                    .record(command.kind(), &format!("{:?}", err.kind()), at, None);
            }
        }

        result
    }

    /// Tears the session down: hides a visible overlay and returns the store
    /// to its initial `Uninitialized` phase.
    ///
    /// The revision counter is not rewound, and every mutation still pending
    /// on the UI context is invalidated, so nothing from before the reset can
    /// be applied after it.
    ///
    /// # Errors
    ///
    /// Returns the error of the final hide, if any.  The store is reset
    /// regardless.
    pub async fn reset(&self) -> Result<OverlayState, DispatchError> {
        let mut store = self.store.lock().await;

        let mut outcome = Ok(());
        // A late unit may still put the overlay on screen; hide behind it.
        if store.state.visible || store.outstanding > 0 {
            let ticket = store.admit();
            let current = store.state;
            match self.render(SurfaceOp::Hide).await {
                ExecOutcome::Completed(()) => store.commit(ticket, current.hidden()),
                ExecOutcome::TimedOut(_) => {
                    outcome = Err(DispatchError::Timeout {
                        command: "reset",
                        budget: self.config.command_timeout,
                    })
                }
                ExecOutcome::Faulted(fault) => {
                    outcome = Err(DispatchError::Faulted {
                        command: "reset",
                        fault,
                    })
                }
            }
        }

        store.state = OverlayState {
            revision: store.state.revision,
            ..OverlayState::default()
        };
        store.phase = OverlayPhase::Uninitialized;
        store.committed_ticket = store.next_ticket;
        store.next_ticket += 1;

        let state = store.state;
        drop(store);

        info!(session = %self.session, revision = state.revision, "overlay session reset");
        let outcome_name = match &outcome {
            Ok(()) => "ok".to_string(),
            Err(err) => format!("{:?}", err.kind()),
        };
        self.journal
            .record("reset", &outcome_name, None, Some(state.revision));

        outcome.map(|()| state)
    }

    /// Publishes new display bounds, e.g. after a rotation.
    ///
    /// Runs inside the sequence point, so commands admitted after this call
    /// are validated against the new extent.  If the overlay is visible at a
    /// position outside `bounds` it is hidden first; if a timed-out unit is
    /// still outstanding, the committed state is rendered again so the late
    /// unit cannot land afterwards.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `bounds` is not a positive, finite extent.
    /// - `Timeout` or `Faulted` if the required hide could not be rendered.
    ///   The previous bounds stay in effect.
    pub async fn update_bounds(&self, bounds: DisplayBounds) -> Result<OverlayState, DispatchError> {
        let result = self.apply_bounds(bounds).await;

        let outcome = match &result {
            Ok(state) => {
                info!(%bounds, visible = state.visible, "display bounds published");
                "ok".to_string()
            }
            Err(err) => {
                warn!(%bounds, "display bounds not published: {err}");
                format!("{:?}", err.kind())
            }
        };
        let revision = result.as_ref().ok().map(|state| state.revision);
        self.journal.record("screen", &outcome, None, revision);

        result
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    async fn apply(&self, command: Command) -> Result<OverlayState, DispatchError> {
        // Single sequence point: held until this command is committed, failed,
        // or timed out.
        let mut store = self.store.lock().await;

        store.phase = store.phase.effective();
        let current = store.state;
        let visible = store.phase == OverlayPhase::Visible;
        let pending = store.outstanding > 0;

        let op = match command {
            Command::Show if visible && pending => Some(SurfaceOp::Show(current.position)),
            Command::Show if visible => None,
            Command::Show => Some(SurfaceOp::Show(self.show_position()?)),
            Command::Hide if !visible && !pending => None,
            Command::Hide => Some(SurfaceOp::Hide),
            Command::MoveTo { .. } if !visible => return Err(DispatchError::NotVisible),
            Command::MoveTo { x, y } => {
                Some(SurfaceOp::Move(validate(x, y, self.bounds.current_bounds())?))
            }
        };

        let Some(op) = op else {
            // Idempotent no-op: nothing to render, nothing to commit.
            return Ok(current);
        };

        let ticket = store.admit();
        let target = op.next_state(&current);

        match self.render(op).await {
            ExecOutcome::Completed(()) => {
                store.commit(ticket, target);
                Ok(target)
            }
            ExecOutcome::Faulted(fault) => Err(DispatchError::Faulted {
                command: command.kind(),
                fault,
            }),
            ExecOutcome::TimedOut(pending) => {
                store.outstanding += 1;
                self.reconcile_late(pending, op, ticket, command.kind());
                Err(DispatchError::Timeout {
                    command: command.kind(),
                    budget: self.config.command_timeout,
                })
            }
        }
    }

    async fn apply_bounds(&self, bounds: DisplayBounds) -> Result<OverlayState, DispatchError> {
        if !bounds.is_valid() {
            return Err(DispatchError::InvalidArgument(BoundsError::InvalidBounds(
                bounds,
            )));
        }

        let mut store = self.store.lock().await;
        let current = store.state;

        let op = if current.visible && !bounds.contains(current.position.x, current.position.y) {
            Some(SurfaceOp::Hide)
        } else if store.outstanding > 0 {
            Some(if current.visible {
                SurfaceOp::Show(current.position)
            } else {
                SurfaceOp::Hide
            })
        } else {
            None
        };

        if let Some(op) = op {
            let ticket = store.admit();
            let target = op.next_state(&current);
            match self.render(op).await {
                ExecOutcome::Completed(()) => store.commit(ticket, target),
                ExecOutcome::Faulted(fault) => {
                    return Err(DispatchError::Faulted {
                        command: "screen",
                        fault,
                    })
                }
                ExecOutcome::TimedOut(pending) => {
                    store.outstanding += 1;
                    self.reconcile_late(pending, op, ticket, "screen");
                    return Err(DispatchError::Timeout {
                        command: "screen",
                        budget: self.config.command_timeout,
                    });
                }
            }
        }

        self.bounds
            .publish(bounds)
            .map_err(DispatchError::InvalidArgument)?;
        Ok(store.state)
    }

    async fn render(&self, op: SurfaceOp) -> ExecOutcome<()> {
        let surface = Arc::clone(&self.surface);
        self.executor
            .run_exclusive(move || op.render(surface.as_ref()), self.config.command_timeout)
            .await
    }

    fn show_position(&self) -> Result<Point, DispatchError> {
        match self.config.show_position {
            ShowPosition::Origin => Ok(Point::ORIGIN),
            ShowPosition::Center => {
                let bounds: DisplayBounds = self.bounds.current_bounds();
                if !bounds.is_valid() {
                    return Err(DispatchError::InvalidDisplay(BoundsError::InvalidBounds(
                        bounds,
                    )));
                }
                Ok(bounds.center())
            }
        }
    }

    /// Waits in the background for a timed-out unit and applies its result
    /// only if nothing newer has been committed.
    fn reconcile_late(
        &self,
        pending: PendingCompletion<()>,
        op: SurfaceOp,
        ticket: u64,
        command: &'static str,
    ) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let result = pending.wait().await;
            let mut store = store.lock().await;
            store.outstanding = store.outstanding.saturating_sub(1);
            match result {
                Ok(()) => {
                    if ticket > store.committed_ticket {
                        let next = op.next_state(&store.state);
                        store.commit(ticket, next);
                        info!(
                            command,
                            ticket,
                            revision = next.revision,
                            "late completion applied"
                        );
                    } else {
                        debug!(
                            command,
                            ticket,
                            committed_ticket = store.committed_ticket,
                            "stale late completion discarded"
                        );
                    }
                }
                Err(fault) => {
                    warn!(command, ticket, "timed-out unit of work later failed: {fault}");
                }
            }
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
