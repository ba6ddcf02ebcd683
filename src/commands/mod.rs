//! # Command System
//!
//! Chat command parsing and routing for the hydration bot. The surface is
//! platform-agnostic: whatever transport delivers user text hands it to the
//! [`CommandRouter`] and sends the returned reply back.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod parser;
pub mod router;

pub use parser::parse_command;
pub use router::CommandRouter;
