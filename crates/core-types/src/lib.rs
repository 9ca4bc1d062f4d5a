#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::todo
)]

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod address;
pub mod transport;
pub use address::{AddressError, ConnectionParameters, DeviceAddress};
pub use transport::{Transport, TransportError};

/// Axis-aligned facing of the device on the tile grid.
///
/// Screen coordinates grow downwards, so `Up` is negative Y.
/// The discriminants match the heading byte sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Up = 1,
    Down = 2,
    Left = 3,
    Right = 4,
}

impl Heading {
    /// Orientation every compiled sequence starts from.
    pub const START: Heading = Heading::Up;

    /// Heading after a 90° clockwise rotation.
    pub fn turned_right(self) -> Self {
        match self {
            Heading::Up => Heading::Right,
            Heading::Right => Heading::Down,
            Heading::Down => Heading::Left,
            Heading::Left => Heading::Up,
        }
    }

    /// Heading after a 90° counter-clockwise rotation.
    pub fn turned_left(self) -> Self {
        match self {
            Heading::Up => Heading::Left,
            Heading::Left => Heading::Down,
            Heading::Down => Heading::Right,
            Heading::Right => Heading::Up,
        }
    }

    /// The single 90° rotation taking `self` to `target`.
    ///
    /// Returns None when no quarter turn gets there (same heading or a reversal).
    pub fn rotation_to(self, target: Heading) -> Option<Rotation> {
        if self.turned_right() == target {
            Some(Rotation::Right)
        } else if self.turned_left() == target {
            Some(Rotation::Left)
        } else {
            None
        }
    }

    /// Unit step in screen coordinates.
    pub fn unit(self) -> (i32, i32) {
        match self {
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
            Heading::Left => (-1, 0),
            Heading::Right => (1, 0),
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Heading::Up),
            2 => Some(Heading::Down),
            3 => Some(Heading::Left),
            4 => Some(Heading::Right),
            _ => None,
        }
    }
}

/// Direction of a quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    Left,
    Right,
}

impl Rotation {
    pub fn apply(self, heading: Heading) -> Heading {
        match self {
            Rotation::Left => heading.turned_left(),
            Rotation::Right => heading.turned_right(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandKind {
    Move,
    Turn,
}

/// One motion primitive sent to the device.
///
/// `heading` is always the orientation the device holds *after* the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionCommand {
    /// Drive `length` tiles forward.
    Move { length: u32, heading: Heading },
    /// Rotate in place by 90°.
    Turn { rotation: Rotation, heading: Heading },
}

impl MotionCommand {
    /// Longest move a single command frame can carry, in tiles.
    pub const MAX_MOVE_LENGTH: u32 = u8::MAX as u32;

    pub fn kind(&self) -> CommandKind {
        match self {
            MotionCommand::Move { .. } => CommandKind::Move,
            MotionCommand::Turn { .. } => CommandKind::Turn,
        }
    }

    pub fn heading(&self) -> Heading {
        match self {
            MotionCommand::Move { heading, .. } | MotionCommand::Turn { heading, .. } => *heading,
        }
    }

    /// Tile count for moves, zero for turns.
    pub fn length(&self) -> u32 {
        match self {
            MotionCommand::Move { length, .. } => *length,
            MotionCommand::Turn { .. } => 0,
        }
    }
}

/// Ordered list of motion commands. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSequence {
    commands: Vec<MotionCommand>,
}

impl CommandSequence {
    pub fn new(commands: Vec<MotionCommand>) -> Self {
        Self { commands }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MotionCommand> {
        self.commands.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MotionCommand> {
        self.commands.iter()
    }

    pub fn as_slice(&self) -> &[MotionCommand] {
        &self.commands
    }
}

impl<'a> IntoIterator for &'a CommandSequence {
    type Item = &'a MotionCommand;
    type IntoIter = std::slice::Iter<'a, MotionCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

/// A point already snapped to the tile grid, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TilePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for TilePoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}
