//! Display bounds source.
//!
//! The collaborator that owns screen geometry (device calibration, orientation
//! tracking) publishes the current logical extent here.  The dispatcher reads
//! a fresh snapshot for every `MoveTo` and never keeps it beyond that call,
//! because bounds change whenever the device rotates.
//!
//! Runtime changes go through `CommandDispatcher::update_bounds`, which calls
//! [`DisplayBoundsSource::publish`] while it holds the overlay store, so a
//! visible overlay is never left outside the published extent.

use std::sync::RwLock;

use cursor_core::{BoundsError, DisplayBounds};
use tracing::info;

/// Access to the current display extent.
pub trait DisplayBoundsSource: Send + Sync {
    /// Returns the bounds as of this instant.
    fn current_bounds(&self) -> DisplayBounds;

    /// Replaces the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError::InvalidBounds`] and keeps the previous bounds if
    /// `bounds` is not a positive, finite extent.
    fn publish(&self, bounds: DisplayBounds) -> Result<(), BoundsError>;
}

/// In-memory bounds that can be replaced at runtime (e.g. on rotation).
#[derive(Debug)]
pub struct SharedDisplayBounds {
    inner: RwLock<DisplayBounds>,
}

impl SharedDisplayBounds {
    /// Creates the source with initial bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError::InvalidBounds`] if `initial` is not a positive,
    /// finite extent.
    pub fn new(initial: DisplayBounds) -> Result<Self, BoundsError> {
        if !initial.is_valid() {
            return Err(BoundsError::InvalidBounds(initial));
        }
        Ok(Self {
            inner: RwLock::new(initial),
        })
    }

    /// Replaces the current bounds.
    ///
    /// # Errors
    ///
    /// Returns [`BoundsError::InvalidBounds`] and keeps the previous bounds if
    /// `bounds` is not a positive, finite extent.
    pub fn update(&self, bounds: DisplayBounds) -> Result<(), BoundsError> {
        if !bounds.is_valid() {
            return Err(BoundsError::InvalidBounds(bounds));
        }
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if *guard != bounds {
            info!("display bounds changed: {} -> {}", *guard, bounds);
            *guard = bounds;
        }
        Ok(())
    }
}

impl DisplayBoundsSource for SharedDisplayBounds {
    fn current_bounds(&self) -> DisplayBounds {
        *self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, bounds: DisplayBounds) -> Result<(), BoundsError> {
        self.update(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_width() {
        let result = SharedDisplayBounds::new(DisplayBounds::new(0.0, 10.0));
        assert!(matches!(result, Err(BoundsError::InvalidBounds(_))));
    }

    #[test]
    fn test_update_replaces_bounds() {
        // Arrange
        let source = SharedDisplayBounds::new(DisplayBounds::new(393.0, 852.0)).unwrap();

        // Act: rotate to landscape
        source.update(DisplayBounds::new(852.0, 393.0)).unwrap();

        // Assert
        assert_eq!(source.current_bounds(), DisplayBounds::new(852.0, 393.0));
    }

    #[test]
    fn test_invalid_update_keeps_previous_bounds() {
        let source = SharedDisplayBounds::new(DisplayBounds::new(100.0, 200.0)).unwrap();

        let result = source.update(DisplayBounds::new(-1.0, 200.0));

        assert!(result.is_err());
        assert_eq!(source.current_bounds(), DisplayBounds::new(100.0, 200.0));
    }
}
