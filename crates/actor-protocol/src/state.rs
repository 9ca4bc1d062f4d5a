use serde::{Deserialize, Serialize};

/// # Connection State Machine
///
/// Status of the device link as seen by the Worker Loop. Transitions are only
/// ever applied by the worker while it executes a dequeued intent.
///
/// ## State Transition Diagram
///
/// ```text
///            requestConnect            onConnect
///   Closed ─────────────────► Connecting ─────────► Connected ◄──┐
///     ▲  ▲                      │   │                 │  │       │ onReceive
///     │  │       onError        │   │ requestDisc.    │  └──► Received
///     │  └──────────────────────┘   │                 │         │
///     │                             ▼                 │         │
///     │   onError / close-ack    Closing ◄────────────┴─────────┘
///     └──────────────────────────────┘  requestDisconnect
///
///   Connected / Received ──onError | ack failure──► Closed
/// ```
///
/// ## State Invariants
///
/// - **Closed**: no link, no transport call outstanding
/// - **Connecting**: connect issued, waiting for onConnect or onError
/// - **Connected**: link open, nothing received yet
/// - **Received**: link open, the device has sent data (behaves exactly like Connected)
/// - **Closing**: disconnect issued, waiting for close-ack or onError
///
/// Any trigger not listed in [`ConnectionStatus::next`] is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    #[default]
    Closed,
    Closing,
    Connecting,
    Connected,
    Received,
}

/// Everything that can drive a connection transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionTrigger {
    /// Operator asked to connect
    RequestConnect,
    /// Operator asked to disconnect
    RequestDisconnect,
    /// Transport reported onConnect
    LinkConnected,
    /// Transport reported onError (or a transport call failed to start)
    LinkError,
    /// Transport confirmed the link is closed
    CloseAck,
    /// Transport delivered bytes
    DataReceived,
    /// The device rejected a command or sent an undecodable reply
    AckFailure,
}

impl ConnectionTrigger {
    pub const ALL: [ConnectionTrigger; 7] = [
        ConnectionTrigger::RequestConnect,
        ConnectionTrigger::RequestDisconnect,
        ConnectionTrigger::LinkConnected,
        ConnectionTrigger::LinkError,
        ConnectionTrigger::CloseAck,
        ConnectionTrigger::DataReceived,
        ConnectionTrigger::AckFailure,
    ];
}

impl ConnectionStatus {
    pub const ALL: [ConnectionStatus; 5] = [
        ConnectionStatus::Closed,
        ConnectionStatus::Closing,
        ConnectionStatus::Connecting,
        ConnectionStatus::Connected,
        ConnectionStatus::Received,
    ];

    /// The transition table.
    ///
    /// Returns the new status, or None when the trigger is a no-op in this state.
    pub fn next(self, trigger: ConnectionTrigger) -> Option<ConnectionStatus> {
        use ConnectionStatus::*;
        use ConnectionTrigger::*;

        match (self, trigger) {
            (Closed, RequestConnect) => Some(Connecting),

            (Connecting, LinkConnected) => Some(Connected),
            (Connecting, LinkError) => Some(Closed),
            (Connecting, RequestDisconnect) => Some(Closing),

            (Connected | Received, LinkError) => Some(Closed),
            (Connected | Received, AckFailure) => Some(Closed),
            (Connected | Received, RequestDisconnect) => Some(Closing),
            (Connected | Received, DataReceived) => Some(Received),

            (Closing, LinkError) => Some(Closed),
            (Closing, CloseAck) => Some(Closed),

            _ => None,
        }
    }

    /// Is the link open for sending?
    pub fn is_link_up(&self) -> bool {
        matches!(self, Self::Connected | Self::Received)
    }

    /// User-facing status text
    pub fn status_text(&self) -> &'static str {
        match self {
            Self::Closed => "Disconnected",
            Self::Closing => "Disconnecting...",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Received => "Connected (receiving)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayStatus {
    #[default]
    Stopped,
    Playing,
}

/// Control and connection status at one instant.
///
/// Copied whole between buffers, never field by field across iterations.
/// `active_step` is only meaningful while playing and is reset to 0 on stop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub connection: ConnectionStatus,
    pub play: PlayStatus,
    pub active_step: usize,
    pub status_message: String,
    /// Bumped every time `status_message` is replaced
    pub message_serial: u64,
}

impl StateSnapshot {
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.message_serial = self.message_serial.wrapping_add(1);
    }

    pub fn is_playing(&self) -> bool {
        self.play == PlayStatus::Playing
    }

    /// Leave playback; the step counter is meaningless once stopped.
    pub fn stop_playback(&mut self) {
        self.play = PlayStatus::Stopped;
        self.active_step = 0;
    }
}
