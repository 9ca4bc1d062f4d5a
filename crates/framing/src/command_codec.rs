//! Command and acknowledgement frames.
//!
//! Outbound, one frame per motion command:
//!
//! ```text
//! ┌────┬────────┬────────┬─────────┬──────────────┐
//! │ id │ opcode │ length │ heading │ xor (opt.)   │
//! └────┴────────┴────────┴─────────┴──────────────┘
//!   id      step % 128, bit 7 = even parity when enabled
//!   opcode  b'M' move, b'L' turn left, b'R' turn right
//!   length  tiles for a move, 0 for a turn
//!   heading 1 Up, 2 Down, 3 Left, 4 Right (after the command)
//! ```
//!
//! Inbound, `[ACK, id]` or `[NAK, id]`.
use core_types::{Heading, MotionCommand, Rotation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;

pub const OP_MOVE: u8 = b'M';
pub const OP_TURN_LEFT: u8 = b'L';
pub const OP_TURN_RIGHT: u8 = b'R';

const ID_MASK: u8 = 0x7F;
const PARITY_BIT: u8 = 0x80;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Empty frame")]
    Empty,
    #[error("Truncated frame: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    BadChecksum { expected: u8, actual: u8 },
    #[error("Parity check failed for id byte {0:#04x}")]
    BadParity(u8),
    #[error("Unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("Unknown acknowledgement byte {0:#04x}")]
    UnknownAck(u8),
    #[error("Invalid heading byte {0}")]
    BadHeading(u8),
    #[error("Move of {0} tiles does not fit in one frame (max 255). Split the path.")]
    LengthOverflow(u32),
    #[error("Invalid COBS encoding")]
    Cobs,
    #[error("Frame longer than {0} bytes discarded")]
    Oversized(usize),
}

/// Per-link framing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOptions {
    pub id_parity: bool,
    pub checksum: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            id_parity: true,
            checksum: false,
        }
    }
}

/// A decoded device reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub id: u8,
    pub ok: bool,
}

/// Id byte for the command at `step`.
pub fn frame_id(step: usize, parity: bool) -> u8 {
    let id = (step & usize::from(ID_MASK)) as u8;
    if parity && id.count_ones() % 2 == 1 {
        id | PARITY_BIT
    } else {
        id
    }
}

fn xor(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

fn wire(payload: &[u8]) -> Vec<u8> {
    let mut out = cobs::encode_vec(payload);
    out.push(0x00);
    out
}

/// Encode one command as a complete, delimited wire frame.
pub fn encode_command(
    step: usize,
    command: &MotionCommand,
    options: FrameOptions,
) -> Result<Vec<u8>, FrameError> {
    let (opcode, length) = match *command {
        MotionCommand::Move { length, .. } => {
            let length = u8::try_from(length).map_err(|_| FrameError::LengthOverflow(length))?;
            (OP_MOVE, length)
        }
        MotionCommand::Turn { rotation: Rotation::Left, .. } => (OP_TURN_LEFT, 0),
        MotionCommand::Turn { rotation: Rotation::Right, .. } => (OP_TURN_RIGHT, 0),
    };

    let mut payload = vec![
        frame_id(step, options.id_parity),
        opcode,
        length,
        command.heading().to_u8(),
    ];
    if options.checksum {
        payload.push(xor(&payload));
    }
    Ok(wire(&payload))
}

/// Decode a command payload (already COBS-decoded). Returns the raw id byte.
pub fn decode_command(
    payload: &[u8],
    options: FrameOptions,
) -> Result<(u8, MotionCommand), FrameError> {
    let expected = if options.checksum { 5 } else { 4 };
    let (id, opcode, length, heading, check) = match *payload {
        [] => return Err(FrameError::Empty),
        [id, opcode, length, heading] if !options.checksum => (id, opcode, length, heading, None),
        [id, opcode, length, heading, check] if options.checksum => {
            (id, opcode, length, heading, Some(check))
        }
        _ => {
            return Err(FrameError::Truncated {
                expected,
                actual: payload.len(),
            })
        }
    };

    if let Some(actual) = check {
        let computed = xor(&[id, opcode, length, heading]);
        if computed != actual {
            return Err(FrameError::BadChecksum {
                expected: computed,
                actual,
            });
        }
    }
    if options.id_parity && id.count_ones() % 2 == 1 {
        return Err(FrameError::BadParity(id));
    }

    let heading = Heading::from_u8(heading).ok_or(FrameError::BadHeading(heading))?;
    let command = match opcode {
        OP_MOVE => MotionCommand::Move {
            length: u32::from(length),
            heading,
        },
        OP_TURN_LEFT => MotionCommand::Turn {
            rotation: Rotation::Left,
            heading,
        },
        OP_TURN_RIGHT => MotionCommand::Turn {
            rotation: Rotation::Right,
            heading,
        },
        other => return Err(FrameError::UnknownOpcode(other)),
    };
    Ok((id, command))
}

/// Encode a device reply as a complete, delimited wire frame.
pub fn encode_ack(id: u8, ok: bool) -> Vec<u8> {
    wire(&[if ok { ACK } else { NAK }, id])
}

/// Decode a device reply payload (already COBS-decoded).
pub fn decode_ack(payload: &[u8]) -> Result<Ack, FrameError> {
    match *payload {
        [] => Err(FrameError::Empty),
        [ACK, id] => Ok(Ack { id, ok: true }),
        [NAK, id] => Ok(Ack { id, ok: false }),
        [kind, _] => Err(FrameError::UnknownAck(kind)),
        _ => Err(FrameError::Truncated {
            expected: 2,
            actual: payload.len(),
        }),
    }
}
