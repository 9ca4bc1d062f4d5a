//! # Actor Runtime
//!
//! Runtime infrastructure shared by the Worker Loop and its producers.
//!
//! This crate defines:
//! - **Command Queue**: bounded, non-blocking push from any thread; the worker
//!   blocks only while the queue is empty
//! - **Snapshot exchange**: active → cached → ui-visible copies behind one
//!   mutex and one generation counter
//! - **Actor trait**: sequential message handling on a dedicated thread
//! - **Logging macros**: `actor_debug!` and friends, backed by `tracing`
//!
//! ## Architecture
//!
//! The runtime follows these principles:
//! - **Zero shared state**: the worker owns the active snapshot; the render
//!   thread owns its visible copy; only the cached copy is shared
//! - **Message passing**: producers never touch worker state, they push intents
//! - **Sequential processing**: intents are handled one at a time, FIFO per producer
//! - **Failure isolation**: handler errors are reported, never fatal to the loop
//!
//! ## Example
//!
//! ```ignore
//! use actor_runtime::{command_queue, spawn_worker, SnapshotExchange};
//!
//! let (intent_tx, intent_rx) = command_queue(256);
//! let (writer, mut reader) = SnapshotExchange::new(StateSnapshot::default());
//! let worker = spawn_worker(ControlActor::new(writer, /* ... */), intent_rx)?;
//!
//! intent_tx.push(UiCommand::Stop)?;
//! reader.publish();
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod actor;
pub mod channels;
pub mod logging;
pub mod snapshot;

pub use actor::{spawn_worker, Actor};
pub use channels::{command_queue, IntentReceiver, IntentSender, QueueError};
pub use snapshot::{SnapshotExchange, SnapshotReader, SnapshotWriter};

// Re-exported so the logging macros work in crates without a direct dependency.
pub use tracing;
