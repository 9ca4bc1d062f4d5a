//! # Framing
//!
//! Wire format between the worker and the device.
//!
//! - [`command_codec`]: one motion command per frame, device acknowledgements
//! - [`cobs_impl`]: incremental deframer for the inbound byte stream
//!
//! Every frame on the wire is COBS-encoded and terminated by `0x00`.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

pub mod cobs_impl;
pub mod command_codec;

pub use cobs_impl::CobsFramer;
pub use command_codec::{
    decode_ack, decode_command, encode_ack, encode_command, frame_id, Ack, FrameError,
    FrameOptions,
};

/// Trait for converting a stream of bytes into discrete frame payloads.
pub trait Framer: Send {
    /// Ingest new bytes and return every frame completed by them.
    ///
    /// A frame that cannot be decoded is returned as an error in its slot, so
    /// the caller decides whether corruption matters in its current state.
    fn push(&mut self, bytes: &[u8]) -> Vec<Result<Vec<u8>, FrameError>>;

    /// Reset internal state (e.g., clear buffers).
    fn reset(&mut self);

    /// Get the name of the framer.
    fn name(&self) -> &'static str;
}
