//! # Connection Actors
//!
//! The worker side of the engine and the facade the UI talks to.
//!
//! ## Components
//!
//! - **Engine**: render-thread facade; validates requests, queues intents,
//!   publishes snapshots
//! - **ConnectionBridge**: request surface, transport notifier and the
//!   worker-side link driver
//! - **ControlActor**: the Worker Loop; owns the active snapshot, applies
//!   connection transitions and drives playback
//! - **EngineConfig**: JSON configuration with defaults from [`constants`]

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod bridge;
pub mod config;
pub mod constants;
pub mod control_actor;
pub mod engine;
pub mod error;

pub use bridge::{ConnectionBridge, LinkDriver, LinkNotifier};
pub use config::EngineConfig;
pub use control_actor::ControlActor;
pub use engine::Engine;
pub use error::EngineError;
