//! The rendered overlay, as seen from the UI context.
//!
//! Actual pixel drawing, animation, and compositing belong to the host
//! platform.  The agent only needs three primitive mutations, expressed by the
//! [`OverlaySurface`] trait.  Implementations are invoked exclusively from
//! units of work running on the UI affinity executor, never from request
//! handlers directly.
//!
//! | Implementation                  | Use                                          |
//! |---------------------------------|----------------------------------------------|
//! | [`TracingSurface`]              | Headless agents: logs each mutation          |
//! | [`mock::MockOverlaySurface`]    | Tests: records calls, injects faults/delays |

use cursor_core::Point;
use tracing::info;

use crate::infrastructure::ui_executor::UiFault;

pub mod mock;

/// Primitive overlay mutations provided by the host platform.
pub trait OverlaySurface: Send + Sync {
    /// Creates the overlay at `at`.
    fn show(&self, at: Point) -> Result<(), UiFault>;

    /// Repositions an existing overlay.
    fn move_to(&self, at: Point) -> Result<(), UiFault>;

    /// Removes the overlay.
    fn hide(&self) -> Result<(), UiFault>;
}

/// Surface for headless runs.  Every mutation succeeds and is logged.
#[derive(Debug, Default)]
pub struct TracingSurface;

impl OverlaySurface for TracingSurface {
    fn show(&self, at: Point) -> Result<(), UiFault> {
        info!(x = at.x, y = at.y, "overlay shown");
        Ok(())
    }

    fn move_to(&self, at: Point) -> Result<(), UiFault> {
        info!(x = at.x, y = at.y, "overlay moved");
        Ok(())
    }

    fn hide(&self) -> Result<(), UiFault> {
        info!("overlay hidden");
        Ok(())
    }
}
