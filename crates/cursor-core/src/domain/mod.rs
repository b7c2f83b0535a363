//! Domain entities for the cursor overlay agent.
//!
//! This module contains pure business logic with no infrastructure dependencies.
//!
//! # What is "domain" in Clean Architecture? (for beginners)
//!
//! Clean Architecture organises code into concentric layers.  The innermost
//! layer is called the **domain**.  Domain code:
//!
//! - Contains the core business rules of the application.
//! - Has **no** imports from OS APIs, network libraries, or UI frameworks.
//! - Can be compiled and tested on any platform without any external setup.
//!
//! Here the business rules are small but strict: a coordinate is either on
//! screen or rejected (never clamped), and the overlay is either hidden or
//! visible at a committed position.

/// Screen geometry and the coordinate validator.
pub mod geometry;

/// Overlay state, lifecycle phase, and the command set.
pub mod overlay;
