//! UI affinity executor: run work on the single UI-owning execution context.
//!
//! Platform UI systems only accept mutations from one designated thread (the
//! "main" or "UI" thread).  Request handlers, however, run on arbitrary Tokio
//! worker threads.  This module bridges the two:
//!
//! ```text
//! request task ──run_exclusive(work)──► UiContext queue ──► UI thread runs work
//!      ▲                                                          │
//!      └──────────── oneshot result (or timeout) ◄────────────────┘
//! ```
//!
//! # Contract
//!
//! - Exactly one unit of work runs at a time.  Units queue in arrival order
//!   (FIFO): no reordering, no priority.
//! - A unit that returns an error, or panics, surfaces as
//!   [`ExecOutcome::Faulted`]; it is never silently dropped, and a panic does
//!   not take the UI thread down.
//! - If the budget elapses first the caller gets [`ExecOutcome::TimedOut`].
//!   The unit is **not** cancelled: the UI context has no safe preemption
//!   point.  The returned [`PendingCompletion`] can be awaited to learn how
//!   the unit eventually ended.
//!
//! Nothing here knows about cursors.  Any future UI-affecting command can use
//! the same executor.
//!
//! # Testability
//!
//! The [`UiContext`] trait is the seam.  Production uses
//! [`thread::DedicatedUiThread`]; any single-threaded event loop that drains
//! jobs in order satisfies the same contract.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

pub mod thread;

pub use thread::DedicatedUiThread;

/// A type-erased unit of work queued on a [`UiContext`].
pub type UiJob = Box<dyn FnOnce() + Send + 'static>;

/// Failures reported by the UI context or by a unit of work running on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UiFault {
    /// The UI system refused or failed the mutation.
    #[error("UI system refused the mutation: {0}")]
    Refused(String),

    /// The unit of work panicked while running on the UI context.
    #[error("unit of work panicked on the UI context: {0}")]
    Panicked(String),

    /// The UI context has shut down and no longer accepts work.
    #[error("UI context is not running")]
    Unavailable,
}

/// An execution context that runs queued jobs one at a time, in FIFO order.
pub trait UiContext: Send + Sync {
    /// Queues `job` behind every previously submitted job.
    ///
    /// # Errors
    ///
    /// Returns [`UiFault::Unavailable`] if the context has shut down.
    fn submit(&self, job: UiJob) -> Result<(), UiFault>;
}

/// Result of [`UiAffinityExecutor::run_exclusive`].
#[derive(Debug)]
pub enum ExecOutcome<T> {
    /// The unit ran to completion within the budget.
    Completed(T),
    /// The budget elapsed before the unit finished.  The unit is still queued
    /// or running.
    TimedOut(PendingCompletion<T>),
    /// The unit failed, panicked, or could not be queued.
    Faulted(UiFault),
}

/// Handle to a unit of work that outlived its caller's budget.
#[derive(Debug)]
pub struct PendingCompletion<T> {
    rx: oneshot::Receiver<Result<T, UiFault>>,
}

impl<T> PendingCompletion<T> {
    /// Waits for the unit to finish on the UI context.
    ///
    /// Resolves to `Err(UiFault::Unavailable)` if the context shut down before
    /// running it.
    pub async fn wait(self) -> Result<T, UiFault> {
        self.rx.await.unwrap_or(Err(UiFault::Unavailable))
    }
}

/// Runs units of work on a [`UiContext`] and waits for them with a budget.
///
/// Cheap to clone; all clones share the same context and therefore the same
/// FIFO queue.
#[derive(Clone)]
pub struct UiAffinityExecutor {
    context: Arc<dyn UiContext>,
}

impl UiAffinityExecutor {
    pub fn new(context: Arc<dyn UiContext>) -> Self {
        Self { context }
    }

    /// Runs `work` on the UI context and waits up to `budget` for it to finish.
    ///
    /// The budget covers both the time spent queued behind earlier units and
    /// the time the unit itself takes.
    pub async fn run_exclusive<T, F>(&self, work: F, budget: Duration) -> ExecOutcome<T>
    where
        F: FnOnce() -> Result<T, UiFault> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, mut rx) = oneshot::channel();

        let job: UiJob = Box::new(move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(work)) {
                Ok(result) => result,
                Err(payload) => Err(UiFault::Panicked(panic_message(payload.as_ref()))),
            };
            // The receiver is gone when nobody waits for a late completion.
            let _ = tx.send(result);
        });

        if let Err(fault) = self.context.submit(job) {
            return ExecOutcome::Faulted(fault);
        }

        match tokio::time::timeout(budget, &mut rx).await {
            Ok(Ok(Ok(value))) => ExecOutcome::Completed(value),
            Ok(Ok(Err(fault))) => ExecOutcome::Faulted(fault),
            // The job was dropped unrun: the context shut down with it queued.
            Ok(Err(_)) => ExecOutcome::Faulted(UiFault::Unavailable),
            Err(_) => ExecOutcome::TimedOut(PendingCompletion { rx }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn executor() -> (UiAffinityExecutor, Arc<DedicatedUiThread>) {
        let ui = Arc::new(DedicatedUiThread::spawn("test-ui").expect("spawn UI thread"));
        (UiAffinityExecutor::new(ui.clone()), ui)
    }

    const BUDGET: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_completed_returns_value() {
        // Arrange
        let (exec, _ui) = executor();

        // Act
        let outcome = exec.run_exclusive(|| Ok(41 + 1), BUDGET).await;

        // Assert
        assert!(matches!(outcome, ExecOutcome::Completed(42)));
    }

    #[tokio::test]
    async fn test_work_runs_on_the_ui_thread() {
        let (exec, _ui) = executor();
        let outcome = exec
            .run_exclusive(
                || Ok(std::thread::current().name().map(str::to_string)),
                BUDGET,
            )
            .await;
        match outcome {
            ExecOutcome::Completed(name) => assert_eq!(name.as_deref(), Some("test-ui")),
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_from_work_surfaces_as_faulted() {
        let (exec, _ui) = executor();
        let outcome = exec
            .run_exclusive(|| Err::<(), _>(UiFault::Refused("no window".into())), BUDGET)
            .await;
        assert!(matches!(outcome, ExecOutcome::Faulted(UiFault::Refused(ref m)) if m == "no window"));
    }

    #[tokio::test]
    async fn test_panic_is_faulted_and_thread_survives() {
        // Arrange
        let (exec, _ui) = executor();

        // Act
        let first = exec
            .run_exclusive(|| -> Result<(), UiFault> { panic!("boom") }, BUDGET)
            .await;
        let second = exec.run_exclusive(|| Ok("still alive"), BUDGET).await;

        // Assert
        assert!(matches!(first, ExecOutcome::Faulted(UiFault::Panicked(ref m)) if m == "boom"));
        assert!(matches!(second, ExecOutcome::Completed("still alive")));
    }

    #[tokio::test]
    async fn test_timeout_does_not_cancel_the_work() {
        // Arrange: a unit that takes longer than its budget
        let (exec, _ui) = executor();

        // Act
        let outcome = exec
            .run_exclusive(
                || {
                    std::thread::sleep(Duration::from_millis(150));
                    Ok("late")
                },
                Duration::from_millis(20),
            )
            .await;

        // Assert: timed out, but the unit still finishes and reports its value
        let pending = match outcome {
            ExecOutcome::TimedOut(pending) => pending,
            other => panic!("expected TimedOut, got {other:?}"),
        };
        assert_eq!(pending.wait().await, Ok("late"));
    }

    #[tokio::test]
    async fn test_units_run_in_fifo_order() {
        // Arrange
        let (exec, _ui) = executor();
        let order = Arc::new(Mutex::new(Vec::new()));

        // Act: queue a slow unit, then several fast ones while it is still running
        let mut handles = Vec::new();
        for i in 0..8 {
            let exec = exec.clone();
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                exec.run_exclusive(
                    move || {
                        if i == 0 {
                            std::thread::sleep(Duration::from_millis(50));
                        }
                        order.lock().unwrap().push(i);
                        Ok(())
                    },
                    BUDGET,
                )
                .await
            }));
            // Give each submission a moment so arrival order is well defined.
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        for h in handles {
            assert!(matches!(h.await.unwrap(), ExecOutcome::Completed(())));
        }

        // Assert
        assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_shut_down_context_is_unavailable() {
        let (exec, ui) = executor();
        ui.shutdown();
        let outcome = exec.run_exclusive(|| Ok(()), BUDGET).await;
        assert!(matches!(outcome, ExecOutcome::Faulted(UiFault::Unavailable)));
    }
}
