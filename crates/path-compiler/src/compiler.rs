use crate::CompileError;
use core_types::{CommandSequence, Heading, MotionCommand, TilePoint};

/// Compile a tile-aligned polyline into motion commands.
///
/// The device starts facing [`Heading::START`]. For every segment, a heading
/// change emits exactly one quarter `Turn` and then a `Move` of
/// `offset / tile_size` tiles. Segments that would need a diagonal move or a
/// 180° turn are rejected, never approximated, and so are moves longer than
/// [`MotionCommand::MAX_MOVE_LENGTH`].
///
/// Same input, same output: the function is pure.
pub fn compile(points: &[TilePoint], tile_size: u32) -> Result<CommandSequence, CompileError> {
    if tile_size == 0 {
        return Err(CompileError::InvalidTileSize(tile_size));
    }
    if points.len() < 2 {
        return Err(CompileError::TooFewPoints(points.len()));
    }

    let mut heading = Heading::START;
    let mut commands = Vec::with_capacity(points.len() * 2);

    for (segment, pair) in points.windows(2).enumerate() {
        let &[from, to] = pair else {
            continue;
        };
        let (next, offset) = classify(segment, from, to)?;

        let tile = i64::from(tile_size);
        if offset % tile != 0 {
            return Err(CompileError::NotSnapped {
                segment,
                offset,
                tile_size,
            });
        }
        // |offset| < 2^32 and tile >= 1, so this always fits
        let length = u32::try_from(offset / tile).unwrap_or(u32::MAX);
        if length > MotionCommand::MAX_MOVE_LENGTH {
            return Err(CompileError::MoveTooLong {
                segment,
                tiles: length,
                max: MotionCommand::MAX_MOVE_LENGTH,
            });
        }

        if next != heading {
            let rotation = heading.rotation_to(next).ok_or(CompileError::Reversal {
                segment,
                from: heading,
                to: next,
            })?;
            commands.push(MotionCommand::Turn {
                rotation,
                heading: next,
            });
        }
        commands.push(MotionCommand::Move {
            length,
            heading: next,
        });
        heading = next;
    }

    Ok(CommandSequence::new(commands))
}

/// Heading and absolute pixel length of one segment.
fn classify(segment: usize, from: TilePoint, to: TilePoint) -> Result<(Heading, i64), CompileError> {
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);

    match (dx, dy) {
        (0, 0) => Err(CompileError::ZeroLengthSegment {
            segment,
            point: from,
        }),
        (0, dy) if dy < 0 => Ok((Heading::Up, -dy)),
        (0, dy) => Ok((Heading::Down, dy)),
        (dx, 0) if dx < 0 => Ok((Heading::Left, -dx)),
        (dx, 0) => Ok((Heading::Right, dx)),
        _ => Err(CompileError::Diagonal { segment, from, to }),
    }
}

/// Anchor (top-left corner) of the tile containing pixel `(x, y)`.
///
/// Negative coordinates snap towards negative infinity, so every pixel maps
/// into exactly one tile.
pub fn snap_to_tile(x: i32, y: i32, tile_size: u32) -> Result<TilePoint, CompileError> {
    let tile = match i32::try_from(tile_size) {
        Ok(tile) if tile > 0 => tile,
        _ => return Err(CompileError::InvalidTileSize(tile_size)),
    };
    let anchor = |v: i32| v.checked_sub(v.rem_euclid(tile));
    match (anchor(x), anchor(y)) {
        (Some(ax), Some(ay)) => Ok(TilePoint::new(ax, ay)),
        _ => Err(CompileError::PointOutOfRange { x, y }),
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use core_types::Rotation;

    fn pts(raw: &[(i32, i32)]) -> Vec<TilePoint> {
        raw.iter().copied().map(TilePoint::from).collect()
    }

    #[test]
    fn test_right_then_down_scenario() {
        let seq = compile(&pts(&[(0, 0), (80, 0), (80, 160)]), 80).unwrap();
        assert_eq!(
            seq.as_slice(),
            &[
                MotionCommand::Turn {
                    rotation: Rotation::Right,
                    heading: Heading::Right
                },
                MotionCommand::Move {
                    length: 1,
                    heading: Heading::Right
                },
                MotionCommand::Turn {
                    rotation: Rotation::Right,
                    heading: Heading::Down
                },
                MotionCommand::Move {
                    length: 2,
                    heading: Heading::Down
                },
            ]
        );
    }

    #[test]
    fn test_straight_up_needs_no_turn() {
        let seq = compile(&pts(&[(0, 240), (0, 0)]), 80).unwrap();
        assert_eq!(
            seq.as_slice(),
            &[MotionCommand::Move {
                length: 3,
                heading: Heading::Up
            }]
        );
    }

    #[test]
    fn test_collinear_segments_stay_separate_moves() {
        let seq = compile(&pts(&[(0, 0), (0, -80), (0, -160)]), 80).unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq.iter().all(|c| *c
            == MotionCommand::Move {
                length: 1,
                heading: Heading::Up
            }));
    }

    #[test]
    fn test_left_turn() {
        let seq = compile(&pts(&[(160, 0), (0, 0)]), 80).unwrap();
        assert_eq!(
            seq.get(0),
            Some(&MotionCommand::Turn {
                rotation: Rotation::Left,
                heading: Heading::Left
            })
        );
        assert_eq!(seq.get(1).map(MotionCommand::length), Some(2));
    }

    #[test]
    fn test_deterministic() {
        let path = pts(&[(0, 0), (0, -80), (160, -80), (160, 80), (0, 80)]);
        let first = compile(&path, 80).unwrap();
        for _ in 0..10 {
            assert_eq!(compile(&path, 80).unwrap(), first);
        }
    }

    #[test]
    fn test_diagonal_rejected() {
        assert_eq!(
            compile(&pts(&[(0, 0), (1, 1)]), 1),
            Err(CompileError::Diagonal {
                segment: 0,
                from: TilePoint::new(0, 0),
                to: TilePoint::new(1, 1)
            })
        );
    }

    #[test]
    fn test_diagonal_later_segment_reports_index() {
        let err = compile(&pts(&[(0, 0), (0, -80), (80, 0)]), 80).unwrap_err();
        assert!(matches!(err, CompileError::Diagonal { segment: 1, .. }));
    }

    #[test]
    fn test_reversal_rejected() {
        let err = compile(&pts(&[(0, 0), (80, 0), (0, 0)]), 80).unwrap_err();
        assert_eq!(
            err,
            CompileError::Reversal {
                segment: 1,
                from: Heading::Right,
                to: Heading::Left
            }
        );
    }

    #[test]
    fn test_reversal_from_start_heading() {
        // Device starts facing Up; heading straight Down is a 180° turn
        let err = compile(&pts(&[(0, 0), (0, 80)]), 80).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Reversal {
                segment: 0,
                from: Heading::Up,
                to: Heading::Down
            }
        ));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(compile(&[], 80), Err(CompileError::TooFewPoints(0)));
        assert_eq!(
            compile(&pts(&[(0, 0)]), 80),
            Err(CompileError::TooFewPoints(1))
        );
        assert_eq!(
            compile(&pts(&[(0, 0), (80, 0)]), 0),
            Err(CompileError::InvalidTileSize(0))
        );
        assert_eq!(
            compile(&pts(&[(0, 0), (0, 0)]), 80),
            Err(CompileError::ZeroLengthSegment {
                segment: 0,
                point: TilePoint::new(0, 0)
            })
        );
    }

    #[test]
    fn test_unsnapped_offset_rejected() {
        assert_eq!(
            compile(&pts(&[(0, 0), (0, -100)]), 80),
            Err(CompileError::NotSnapped {
                segment: 0,
                offset: 100,
                tile_size: 80
            })
        );
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        assert_eq!(
            compile(&pts(&[(i32::MIN, 0), (i32::MAX, 0)]), 1),
            Err(CompileError::MoveTooLong {
                segment: 0,
                tiles: u32::MAX,
                max: 255
            })
        );
        let far = i32::MAX - (1 << 24) + 1;
        let seq = compile(&pts(&[(i32::MIN, 0), (far, 0)]), 1 << 24).unwrap();
        assert_eq!(seq.get(1).map(MotionCommand::length), Some(255));
    }

    #[test]
    fn test_move_longer_than_one_frame_rejected() {
        let seq = compile(&pts(&[(0, 255), (0, 0)]), 1).unwrap();
        assert_eq!(seq.get(0).map(MotionCommand::length), Some(255));

        // A later segment fails the whole path, not just its own step
        assert_eq!(
            compile(&pts(&[(0, 0), (5, 0), (5, 305)]), 1),
            Err(CompileError::MoveTooLong {
                segment: 1,
                tiles: 300,
                max: 255
            })
        );
    }

    #[test]
    fn test_snap_to_tile() {
        assert_eq!(snap_to_tile(0, 0, 80).unwrap(), TilePoint::new(0, 0));
        assert_eq!(snap_to_tile(79, 81, 80).unwrap(), TilePoint::new(0, 80));
        assert_eq!(snap_to_tile(-1, -80, 80).unwrap(), TilePoint::new(-80, -80));
        assert_eq!(snap_to_tile(5, 5, 0), Err(CompileError::InvalidTileSize(0)));
        assert_eq!(
            snap_to_tile(5, 5, u32::MAX),
            Err(CompileError::InvalidTileSize(u32::MAX))
        );
        assert_eq!(
            snap_to_tile(i32::MIN, 0, 80),
            Err(CompileError::PointOutOfRange { x: i32::MIN, y: 0 })
        );
    }

    #[test]
    fn test_snapped_points_always_compile_axis_aligned() {
        let a = snap_to_tile(13, 170, 80).unwrap();
        let b = snap_to_tile(250, 161, 80).unwrap();
        let seq = compile(&[a, b], 80).unwrap();
        assert_eq!(seq.get(1).map(MotionCommand::length), Some(3));
    }
}
