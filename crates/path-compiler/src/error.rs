use core_types::{Heading, TilePoint};
use thiserror::Error;

/// Reasons a polyline cannot be compiled.
///
/// `segment` is the index of the offending pair: segment 0 joins points 0 and 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Path needs at least 2 points, got {0}. Add another point.")]
    TooFewPoints(usize),

    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(u32),

    #[error("Point ({x}, {y}) has no tile anchor in range")]
    PointOutOfRange { x: i32, y: i32 },

    #[error("Segment {segment} is {offset} px long, not a multiple of the {tile_size} px tile. Snap the points to the grid.")]
    NotSnapped {
        segment: usize,
        offset: i64,
        tile_size: u32,
    },

    #[error("Segment {segment} has zero length: point {point} repeats. Remove the duplicate point.")]
    ZeroLengthSegment { segment: usize, point: TilePoint },

    #[error("Segment {segment} from {from} to {to} is diagonal. Only horizontal and vertical moves are possible.")]
    Diagonal {
        segment: usize,
        from: TilePoint,
        to: TilePoint,
    },

    #[error("Segment {segment} moves {tiles} tiles; at most {max} fit in one command. Insert an intermediate point.")]
    MoveTooLong { segment: usize, tiles: u32, max: u32 },

    #[error("Segment {segment} reverses from {from:?} to {to:?}; a 180° turn is not a single quarter turn. Insert a sideways point.")]
    Reversal {
        segment: usize,
        from: Heading,
        to: Heading,
    },
}

/// Reasons a command sequence cannot be replayed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Step {step}: turning {rotation:?} from {from:?} cannot end facing {claimed:?}")]
    InconsistentTurn {
        step: usize,
        rotation: core_types::Rotation,
        from: Heading,
        claimed: Heading,
    },

    #[error("Step {step}: move heads {claimed:?} while the device faces {facing:?}")]
    HeadingMismatch {
        step: usize,
        facing: Heading,
        claimed: Heading,
    },

    #[error("Step {step}: position leaves the coordinate range")]
    OutOfRange { step: usize },
}
