use core_types::{CommandSequence, ConnectionParameters};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Commands from the UI/render thread to the Worker Loop.
///
/// Every field has already been validated at the call boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum UiCommand {
    /// Open a link to the device
    Connect { params: ConnectionParameters },

    /// Close the current link
    Disconnect,

    /// Send raw bytes over an open link
    Send { data: Vec<u8> },

    /// Run a compiled path, connecting first with `params` if the link is closed
    Play {
        sequence: CommandSequence,
        params: ConnectionParameters,
    },

    /// Abort the running sequence
    Stop,

    /// Close the link and leave the Worker Loop
    Shutdown,
}

/// Notifications from the transport thread(s).
///
/// Delivered through the Connection Bridge, never applied inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkEvent {
    /// Incoming connection accepted (server role)
    Accepted { address: String, channel: u8 },

    /// Outgoing connection established
    Connected { address: String, channel: u8 },

    /// A send completed
    Sent { bytes: usize },

    /// Bytes arrived from the device
    Received { data: Vec<u8> },

    /// Transport timer tick
    Timer { delta: Duration },

    /// Transport failure (refused, dropped, timed out, ...)
    Error { code: i32, message: String },

    /// The link finished closing after a disconnect request
    Closed,
}

/// A deferred, single-shot action consumed exactly once by the Worker Loop.
#[derive(Debug, Clone)]
pub enum Intent {
    Ui(UiCommand),
    Link(LinkEvent),
}

impl From<UiCommand> for Intent {
    fn from(cmd: UiCommand) -> Self {
        Intent::Ui(cmd)
    }
}

impl From<LinkEvent> for Intent {
    fn from(event: LinkEvent) -> Self {
        Intent::Link(event)
    }
}
