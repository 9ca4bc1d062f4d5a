//! # Path Compiler
//!
//! Turns an operator-drawn polyline on the tile grid into the move/turn
//! commands the device executes.
//!
//! - [`compile`]: points → [`CommandSequence`](core_types::CommandSequence)
//! - [`snap_to_tile`]: raw pixel position → tile anchor
//! - [`replay`]: pure simulator that executes a sequence back into points
//!
//! Everything here is pure and may be called from any thread.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod compiler;
pub mod error;
pub mod simulate;

pub use compiler::{compile, snap_to_tile};
pub use error::{CompileError, SimulationError};
pub use simulate::{replay, Trace};
