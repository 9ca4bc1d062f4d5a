//! # Actor Protocol
//!
//! Type-safe message and state definitions for the control engine.
//!
//! This crate has no threading or transport code, so everything in it is
//! testable in isolation:
//!
//! - **UiCommand**: operator intents from the render thread → Worker Loop
//! - **LinkEvent**: transport notifications → Worker Loop
//! - **Intent**: the single message type carried by the Command Queue
//! - **ConnectionStatus**: explicit transition table (pure logic, no side effects)
//! - **StateSnapshot**: the value copied between the active, cached and
//!   ui-visible buffers
//!
//! ## Message Flow
//!
//! ```text
//! UI ──UiCommand──┐
//!                 ├──► Intent ──► Command Queue ──► Worker Loop ──► StateSnapshot
//! Transport ──LinkEvent──┘
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod errors;
pub mod messages;
pub mod state;

pub use errors::ActorError;
pub use messages::{Intent, LinkEvent, UiCommand};
pub use state::{ConnectionStatus, ConnectionTrigger, PlayStatus, StateSnapshot};
