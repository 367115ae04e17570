//! Greedy single-cell stepping toward a target
//!
//! Candidate order: the direction along the axis with the larger distance
//! (ties go vertical), the orthogonal fallback, then the two remaining
//! directions shuffled. A zero delta on the minor axis picks the fallback
//! sign at random so neither side is favoured.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::collision::is_move_valid;
use super::state::{Board, Cell, Direction, Enemy};

/// Target as seen by the anchor: multi-cell enemies aim their block's middle
/// at the target rather than their top-left cell
pub fn effective_target(board: &Board, enemy: &Enemy, target: Cell) -> Cell {
    if enemy.footprint <= 1 {
        return target;
    }
    let shifted = target - Cell::splat(enemy.footprint / 2);
    let max = if board.allow_overhang {
        Cell::new(board.width - 1, board.height - 1)
    } else {
        Cell::new(board.width - enemy.footprint, board.height - enemy.footprint)
    };
    shifted.clamp(Cell::ZERO, max.max(Cell::ZERO))
}

/// Ordered directions to try for `delta`; empty when already there
pub fn candidate_directions(delta: Cell, rng: &mut Pcg32) -> Vec<Direction> {
    if delta == Cell::ZERO {
        return Vec::new();
    }

    let horizontal = delta.x.abs() > delta.y.abs();
    let (major, minor) = if horizontal {
        (delta.x, delta.y)
    } else {
        (delta.y, delta.x)
    };
    let minor_positive = match minor.signum() {
        0 => rng.random_bool(0.5),
        s => s > 0,
    };

    let (preferred, fallback) = if horizontal {
        (
            if major > 0 { Direction::Right } else { Direction::Left },
            if minor_positive { Direction::Down } else { Direction::Up },
        )
    } else {
        (
            if major > 0 { Direction::Down } else { Direction::Up },
            if minor_positive { Direction::Right } else { Direction::Left },
        )
    };

    let mut rest: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|d| *d != preferred && *d != fallback)
        .collect();
    rest.shuffle(rng);

    let mut order = vec![preferred, fallback];
    order.extend(rest);
    order
}

/// Next anchor for `enemy` heading to `target`, or its current anchor when
/// there is no target, it has arrived, or every candidate is blocked
pub fn step(
    board: &Board,
    enemy: &Enemy,
    target: Option<Cell>,
    enemies: &[Enemy],
    rng: &mut Pcg32,
) -> Cell {
    let Some(target) = target else {
        return enemy.position;
    };
    let delta = effective_target(board, enemy, target) - enemy.position;

    candidate_directions(delta, rng)
        .into_iter()
        .map(|dir| enemy.position + dir.delta())
        .find(|anchor| is_move_valid(board, enemy, *anchor, enemies))
        .unwrap_or(enemy.position)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use glam::IVec2;
    use rand::SeedableRng;

    use super::*;
    use crate::sim::state::{EnemyKind, EnemyState, ExitRegion};

    fn open_board(width: i32, height: i32) -> Board {
        Board {
            width,
            height,
            racks: HashSet::new(),
            exit: ExitRegion {
                origin: IVec2::new(width - 1, height / 2),
                size: 1,
            },
            spawn: IVec2::new(1, 1),
            allow_overhang: false,
        }
    }

    fn patroller(position: Cell) -> Enemy {
        Enemy {
            id: 1,
            kind: EnemyKind::Patroller,
            position,
            footprint: 1,
            move_counter: 0,
            speed: 1,
            state: EnemyState::Patrolling,
            patrol_target: None,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_prefers_larger_axis() {
        let mut rng = Pcg32::seed_from_u64(1);
        let dirs = candidate_directions(IVec2::new(5, -2), &mut rng);
        assert_eq!(&dirs[..2], &[Direction::Right, Direction::Up]);
        assert_eq!(dirs.len(), 4);

        let dirs = candidate_directions(IVec2::new(1, 4), &mut rng);
        assert_eq!(&dirs[..2], &[Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_tie_prefers_vertical() {
        let mut rng = Pcg32::seed_from_u64(2);
        let dirs = candidate_directions(IVec2::new(-3, 3), &mut rng);
        assert_eq!(&dirs[..2], &[Direction::Down, Direction::Left]);
    }

    #[test]
    fn test_candidates_cover_all_directions() {
        let mut rng = Pcg32::seed_from_u64(3);
        for (x, y) in [(4, 0), (0, -4), (2, 2), (-1, 7)] {
            let dirs: HashSet<Direction> =
                candidate_directions(IVec2::new(x, y), &mut rng).into_iter().collect();
            assert_eq!(dirs.len(), 4);
        }
        assert!(candidate_directions(IVec2::ZERO, &mut rng).is_empty());
    }

    #[test]
    fn test_step_stays_without_target_or_when_arrived() {
        let board = open_board(10, 10);
        let mut rng = Pcg32::seed_from_u64(4);
        let e = patroller(IVec2::new(3, 3));
        assert_eq!(step(&board, &e, None, &[], &mut rng), e.position);
        assert_eq!(step(&board, &e, Some(e.position), &[], &mut rng), e.position);
    }

    #[test]
    fn test_step_falls_back_when_blocked() {
        let mut board = open_board(10, 10);
        board.racks.insert(IVec2::new(4, 3));
        let mut rng = Pcg32::seed_from_u64(5);
        let e = patroller(IVec2::new(3, 3));
        // Preferred right is a rack, fallback goes down
        assert_eq!(
            step(&board, &e, Some(IVec2::new(8, 5)), &[], &mut rng),
            IVec2::new(3, 4)
        );
    }

    #[test]
    fn test_step_boxed_in_stays() {
        let mut board = open_board(10, 10);
        for c in [(2, 3), (4, 3), (3, 2), (3, 4)] {
            board.racks.insert(IVec2::new(c.0, c.1));
        }
        let mut rng = Pcg32::seed_from_u64(6);
        let e = patroller(IVec2::new(3, 3));
        assert_eq!(step(&board, &e, Some(IVec2::new(9, 9)), &[], &mut rng), e.position);
    }

    #[test]
    fn test_hauler_aims_block_middle() {
        let board = open_board(20, 20);
        let hauler = Enemy {
            kind: EnemyKind::Hauler,
            footprint: 3,
            ..patroller(IVec2::new(5, 5))
        };
        assert_eq!(effective_target(&board, &hauler, IVec2::new(6, 6)), IVec2::new(5, 5));
        // Target in the corner is clamped to the last legal anchor
        assert_eq!(effective_target(&board, &hauler, IVec2::new(19, 19)), IVec2::new(17, 17));
        assert_eq!(effective_target(&board, &hauler, IVec2::new(0, 0)), IVec2::ZERO);
    }

    #[test]
    fn test_zero_minor_delta_has_no_side_bias() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut right = 0;
        let trials = 4_000;
        for _ in 0..trials {
            let dirs = candidate_directions(IVec2::new(0, 5), &mut rng);
            if dirs[1] == Direction::Right {
                right += 1;
            }
        }
        let share = right as f64 / trials as f64;
        assert!((0.45..0.55).contains(&share), "share {share}");
    }
}
