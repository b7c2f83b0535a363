//! Screen geometry and the coordinate validator.
//!
//! All coordinates are expressed in the display's logical point space with the
//! origin at the top-left corner.  A display of `width × height` accepts every
//! coordinate in the closed rectangle `[0, width] × [0, height]`.
//!
//! # Reject, never clamp
//!
//! [`validate`] refuses coordinates outside the display instead of pulling them
//! back onto the nearest edge.  A caller that asks for `(150, 50)` on a display
//! that is only 100 points wide has a bug, and the overlay silently appearing
//! at `(100, 50)` would hide it.  Rejection also keeps "move then read back"
//! checks exact: whatever position a caller committed is the position it reads.

use std::fmt;

use thiserror::Error;

/// A position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The top-left corner of the display.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Read-only snapshot of the current display extent.
///
/// Supplied by whichever collaborator owns screen geometry.  Bounds change when
/// the device rotates, so a snapshot is only valid for the validation call it
/// was fetched for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayBounds {
    pub width: f64,
    pub height: f64,
}

impl DisplayBounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns `true` if `(x, y)` lies inside the closed display rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }

    /// The centre of the display.
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl fmt::Display for DisplayBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reasons a requested coordinate is refused by [`validate`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BoundsError {
    /// The coordinate lies outside `[0, width] × [0, height]`.
    #[error("coordinate ({x}, {y}) is outside display bounds {bounds}")]
    OutOfBounds {
        x: f64,
        y: f64,
        bounds: DisplayBounds,
    },

    /// `x` or `y` is NaN or infinite.
    #[error("coordinate ({x}, {y}) is not a finite number")]
    NonFinite { x: f64, y: f64 },

    /// The display bounds themselves are unusable (zero, negative, or not finite).
    #[error("display bounds {0} are invalid: width and height must be positive")]
    InvalidBounds(DisplayBounds),
}

/// Validates a requested coordinate against the given display bounds.
///
/// Pure function: no side effects, and `bounds` is not retained after the call.
///
/// # Errors
///
/// - [`BoundsError::InvalidBounds`] if `bounds` is not a positive, finite extent.
/// - [`BoundsError::NonFinite`] if `x` or `y` is NaN or infinite.
/// - [`BoundsError::OutOfBounds`] if the coordinate is off screen.  The error
///   carries the offending values and the bounds that were used.
///
/// # Example
///
/// ```rust
/// use cursor_core::{validate, BoundsError, DisplayBounds, Point};
///
/// let bounds = DisplayBounds::new(100.0, 200.0);
/// assert_eq!(validate(50.0, 50.0, bounds), Ok(Point::new(50.0, 50.0)));
/// assert!(matches!(
///     validate(150.0, 50.0, bounds),
///     Err(BoundsError::OutOfBounds { .. })
/// ));
/// ```
pub fn validate(x: f64, y: f64, bounds: DisplayBounds) -> Result<Point, BoundsError> {
    if !bounds.is_valid() {
        return Err(BoundsError::InvalidBounds(bounds));
    }
    if !x.is_finite() || !y.is_finite() {
        return Err(BoundsError::NonFinite { x, y });
    }
    if !bounds.contains(x, y) {
        return Err(BoundsError::OutOfBounds { x, y, bounds });
    }
    Ok(Point::new(x, y))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
