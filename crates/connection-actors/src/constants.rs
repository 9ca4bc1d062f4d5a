//! Centralized configuration constants for the engine
//!
//! Every default an [`EngineConfig`](crate::EngineConfig) falls back to is
//! defined here.

/// Command Queue sizing
pub mod queue {
    /// Pending intents the Command Queue holds before `push` reports overflow
    ///
    /// **Value**: 256 intents
    ///
    /// A drawn path is one intent no matter how many commands it compiles to,
    /// so the bound is only reached when the worker is stuck.
    ///
    /// **Used in**: engine.rs, config.rs
    pub const DEFAULT_CAPACITY: usize = 256;
}

/// Tile grid
pub mod grid {
    /// Edge length of one tile in pixels
    ///
    /// **Value**: 80px
    ///
    /// **Used in**: engine.rs (Path Compiler input)
    pub const DEFAULT_TILE_SIZE: u32 = 80;
}

/// Device link
pub mod link {
    /// Address used when the operator presses Play without connecting first
    ///
    /// **Value**: `00:16:53:18:8E:08`
    pub const DEFAULT_ADDRESS: &str = "00:16:53:18:8E:08";

    /// RFCOMM channel
    ///
    /// **Value**: 1
    pub const DEFAULT_CHANNEL: u8 = 1;
}

/// Command frame format
pub mod frame {
    /// Set bit 7 of each frame id to even parity
    ///
    /// **Value**: true
    ///
    /// **Used in**: control_actor.rs (frame ids and ack matching)
    pub const DEFAULT_ID_PARITY: bool = true;

    /// Append an XOR checksum byte to each command frame
    ///
    /// **Value**: false
    pub const DEFAULT_CHECKSUM: bool = false;
}
