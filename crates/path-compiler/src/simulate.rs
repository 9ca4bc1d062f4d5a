use crate::SimulationError;
use core_types::{CommandSequence, Heading, MotionCommand, TilePoint};

/// Where a replayed sequence went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    /// Start point, then the position after every `Move`
    pub waypoints: Vec<TilePoint>,
    pub heading: Heading,
}

impl Trace {
    pub fn end(&self) -> Option<TilePoint> {
        self.waypoints.last().copied()
    }
}

/// Execute `sequence` from `start`, facing [`Heading::START`].
///
/// Commands are checked against the simulated device: a turn must land on the
/// heading it claims and a move must go the way the device faces.
pub fn replay(
    start: TilePoint,
    sequence: &CommandSequence,
    tile_size: u32,
) -> Result<Trace, SimulationError> {
    let mut heading = Heading::START;
    let mut position = start;
    let mut waypoints = vec![start];

    for (step, command) in sequence.iter().enumerate() {
        match *command {
            MotionCommand::Turn {
                rotation,
                heading: claimed,
            } => {
                if rotation.apply(heading) != claimed {
                    return Err(SimulationError::InconsistentTurn {
                        step,
                        rotation,
                        from: heading,
                        claimed,
                    });
                }
                heading = claimed;
            }
            MotionCommand::Move {
                length,
                heading: claimed,
            } => {
                if claimed != heading {
                    return Err(SimulationError::HeadingMismatch {
                        step,
                        facing: heading,
                        claimed,
                    });
                }
                let distance = i64::from(length) * i64::from(tile_size);
                let (ux, uy) = heading.unit();
                let x = i64::from(position.x) + i64::from(ux) * distance;
                let y = i64::from(position.y) + i64::from(uy) * distance;
                position = match (i32::try_from(x), i32::try_from(y)) {
                    (Ok(x), Ok(y)) => TilePoint::new(x, y),
                    _ => return Err(SimulationError::OutOfRange { step }),
                };
                waypoints.push(position);
            }
        }
    }

    Ok(Trace { waypoints, heading })
}
