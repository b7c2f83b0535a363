//! Application layer for cursor-agent.
//!
//! The application layer orchestrates the business logic: it knows *what* to
//! do with an overlay command, but delegates *how* pixels change and *where*
//! work runs to the infrastructure layer.
//!
//! # Responsibilities
//!
//! - Applying the show / hide / move state machine ([`dispatch`])
//! - Serialising commands against the UI context and the overlay store
//! - Recording command outcomes in the session journal ([`journal`])
//!
//! # What does NOT belong here?
//!
//! - HTTP routing or JSON decoding (that is the infrastructure `http` module)
//! - Spawning the UI thread (that happens in `main.rs`)

pub mod dispatch;
pub mod journal;

pub use dispatch::{CommandDispatcher, DispatchError, DispatcherConfig};
pub use journal::EventJournal;
