//! Wire-format definitions for the cursor overlay agent.
//!
//! The agent speaks JSON over HTTP.  The request and response shapes live here
//! (rather than next to the HTTP handlers) so that test harnesses and other
//! tools can build and parse them without pulling in the agent's runtime.

pub mod messages;

pub use messages::{
    CursorStateDto, ErrorKind, ErrorPayload, EventDto, EventListDto, MoveRequest, PingDto,
    ScreenDto, StatusDto,
};
