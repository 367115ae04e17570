//! Level population: player spawn, enemy placement and food scatter

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{fully_on_board, overlaps};
use super::state::{Board, Cell, Enemy, EnemyKind, EnemyState, FoodItem, FoodKind, footprint_at};
use crate::consts::MIN_SPAWN_DISTANCE;
use crate::settings::Settings;

const FOOD_ATTEMPTS: usize = 1_000;

/// (1, 1) shifted right past any racks
pub fn player_spawn(width: i32, is_rack: impl Fn(Cell) -> bool) -> Cell {
    let mut cell = IVec2::new(1, 1);
    while is_rack(cell) && cell.x < width - 1 {
        cell.x += 1;
    }
    cell
}

/// Monotonic id source shared by enemies and food
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

/// Enemies for a level, sorted by id
pub fn place_enemies(
    level_number: u32,
    is_boss: bool,
    board: &Board,
    settings: &Settings,
    ids: &mut IdAllocator,
    rng: &mut Pcg32,
) -> Vec<Enemy> {
    let roster: Vec<EnemyKind> = if is_boss {
        std::iter::once(EnemyKind::Boss)
            .chain(std::iter::repeat_n(EnemyKind::Patroller, settings.enemy_base_count))
            .collect()
    } else {
        let count = settings.enemy_base_count + level_number as usize;
        (0..count)
            .map(|i| if i % 2 == 0 { EnemyKind::Patroller } else { EnemyKind::Hauler })
            .collect()
    };

    let mut enemies: Vec<Enemy> = Vec::with_capacity(roster.len());
    for (i, kind) in roster.into_iter().enumerate() {
        let footprint = match kind {
            EnemyKind::Patroller => 1,
            EnemyKind::Hauler | EnemyKind::Boss => settings.hauler_footprint,
        };
        let preferred = preferred_anchor(board, kind, i);
        let anchor = if anchor_is_free(board, preferred, footprint, &enemies) {
            Some(preferred)
        } else {
            scan_for_anchor(board, footprint, &enemies)
        };
        let Some(position) = anchor else {
            log::warn!("No room for {kind:?} #{i} on level {level_number}, skipping");
            continue;
        };

        let (speed, state, patrol_target) = match kind {
            EnemyKind::Patroller => (
                settings.patroller_speed,
                EnemyState::Patrolling,
                Some(board.random_open_cell(rng)),
            ),
            EnemyKind::Hauler => (settings.hauler_speed, EnemyState::Chasing, None),
            EnemyKind::Boss => (settings.boss_speed, EnemyState::Chasing, None),
        };

        enemies.push(Enemy {
            id: ids.allocate(),
            kind,
            position,
            footprint,
            move_counter: 0,
            speed,
            state,
            patrol_target,
            history: Vec::new(),
        });
    }
    enemies
}

fn preferred_anchor(board: &Board, kind: EnemyKind, index: usize) -> Cell {
    let exit = board.exit.origin;
    let dx = match kind {
        EnemyKind::Patroller => 2,
        EnemyKind::Hauler | EnemyKind::Boss => 4,
    };
    IVec2::new(exit.x - dx, exit.y + (index % 5) as i32 - 2)
}

/// Footprint fits on the board clear of racks, other enemies, the exit and
/// the spawn neighbourhood
fn anchor_is_free(board: &Board, anchor: Cell, footprint: i32, enemies: &[Enemy]) -> bool {
    if !fully_on_board(board, anchor, footprint) {
        return false;
    }
    if overlaps(anchor, footprint, board.exit.origin, board.exit.size) {
        return false;
    }
    if enemies
        .iter()
        .any(|e| overlaps(anchor, footprint, e.position, e.footprint))
    {
        return false;
    }
    footprint_at(anchor, footprint).into_iter().all(|cell| {
        !board.is_rack(cell) && manhattan(cell, board.spawn) >= MIN_SPAWN_DISTANCE
    })
}

/// Columns right to left, rows top to bottom
fn scan_for_anchor(board: &Board, footprint: i32, enemies: &[Enemy]) -> Option<Cell> {
    (0..board.width)
        .rev()
        .flat_map(|x| (0..board.height).map(move |y| IVec2::new(x, y)))
        .find(|anchor| anchor_is_free(board, *anchor, footprint, enemies))
}

/// Food on distinct open cells away from the spawn, enemies and exit
pub fn scatter_food(
    board: &Board,
    enemies: &[Enemy],
    count: usize,
    ids: &mut IdAllocator,
    rng: &mut Pcg32,
) -> Vec<FoodItem> {
    let mut food: Vec<FoodItem> = Vec::with_capacity(count);
    let blocked = |cell: Cell, food: &[FoodItem]| {
        board.is_rack(cell)
            || cell == board.spawn
            || board.exit.contains(cell)
            || enemies.iter().any(|e| e.occupies(cell))
            || food.iter().any(|f| f.position == cell)
    };

    for _ in 0..count {
        let spot = (0..FOOD_ATTEMPTS)
            .map(|_| {
                IVec2::new(
                    rng.random_range(0..board.width),
                    rng.random_range(0..board.height),
                )
            })
            .find(|cell| !blocked(*cell, &food));
        let Some(position) = spot else {
            log::warn!("Board too crowded, placed {} of {count} food", food.len());
            break;
        };
        let kind = if rng.random_bool(0.5) {
            FoodKind::Fish
        } else {
            FoodKind::Meat
        };
        food.push(FoodItem {
            id: ids.allocate(),
            position,
            kind,
        });
    }
    food
}

fn manhattan(a: Cell, b: Cell) -> i32 {
    (a - b).abs().element_sum()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;

    use super::*;
    use crate::sim::layout::{LayoutParams, LayoutPolicy, generate_layout};
    use crate::sim::state::ExitRegion;

    fn board_for(policy: LayoutPolicy, seed: u64) -> Board {
        let params = LayoutParams {
            width: 25,
            height: 18,
            policy,
        };
        let layout = generate_layout(&params, &mut Pcg32::seed_from_u64(seed));
        let spawn = player_spawn(25, |c| layout.racks.contains(&c));
        Board {
            width: 25,
            height: 18,
            racks: layout.racks,
            exit: layout.exit,
            spawn,
            allow_overhang: policy == LayoutPolicy::Fixed,
        }
    }

    #[test]
    fn test_player_spawn_shifts_past_racks() {
        let racks: HashSet<Cell> = [IVec2::new(1, 1), IVec2::new(2, 1)].into_iter().collect();
        assert_eq!(player_spawn(25, |c| racks.contains(&c)), IVec2::new(3, 1));
        assert_eq!(player_spawn(25, |_| false), IVec2::new(1, 1));
    }

    #[test]
    fn test_regular_roster_alternates() {
        let board = board_for(LayoutPolicy::Procedural, 1);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ids = IdAllocator::default();
        let enemies = place_enemies(3, false, &board, &Settings::default(), &mut ids, &mut rng);

        assert_eq!(enemies.len(), 5);
        let kinds: Vec<EnemyKind> = enemies.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                EnemyKind::Patroller,
                EnemyKind::Hauler,
                EnemyKind::Patroller,
                EnemyKind::Hauler,
                EnemyKind::Patroller
            ]
        );
        assert!(enemies.windows(2).all(|w| w[0].id < w[1].id));
        for e in &enemies {
            match e.kind {
                EnemyKind::Patroller => {
                    assert_eq!(e.state, EnemyState::Patrolling);
                    assert!(e.patrol_target.is_some());
                }
                _ => assert_eq!(e.state, EnemyState::Chasing),
            }
        }
    }

    #[test]
    fn test_placement_invariants() {
        let settings = Settings::default();
        for seed in 0..40 {
            for (policy, is_boss) in [(LayoutPolicy::Procedural, false), (LayoutPolicy::Fixed, true)] {
                let board = board_for(policy, seed);
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut ids = IdAllocator::default();
                let enemies = place_enemies(4, is_boss, &board, &settings, &mut ids, &mut rng);

                for (i, a) in enemies.iter().enumerate() {
                    assert!(fully_on_board(&board, a.position, a.footprint));
                    for cell in a.occupied_cells() {
                        assert!(!board.is_rack(cell));
                        assert!(!board.exit.contains(cell));
                        assert!(manhattan(cell, board.spawn) >= MIN_SPAWN_DISTANCE);
                    }
                    for b in &enemies[i + 1..] {
                        assert!(!overlaps(a.position, a.footprint, b.position, b.footprint));
                    }
                }
            }
        }
    }

    #[test]
    fn test_boss_roster() {
        let board = board_for(LayoutPolicy::Fixed, 3);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut ids = IdAllocator::default();
        let enemies = place_enemies(5, true, &board, &Settings::default(), &mut ids, &mut rng);

        assert_eq!(enemies.len(), 3);
        assert_eq!(enemies[0].kind, EnemyKind::Boss);
        assert_eq!(enemies[0].speed, Settings::default().boss_speed);
        assert!(enemies[1..].iter().all(|e| e.kind == EnemyKind::Patroller));
    }

    #[test]
    fn test_crowded_board_skips_enemies() {
        let board = Board {
            width: 8,
            height: 8,
            racks: HashSet::new(),
            exit: ExitRegion {
                origin: IVec2::new(7, 4),
                size: 1,
            },
            spawn: IVec2::new(1, 1),
            allow_overhang: false,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut ids = IdAllocator::default();
        let enemies = place_enemies(20, false, &board, &Settings::default(), &mut ids, &mut rng);
        assert!(enemies.len() < 22);
        for (i, a) in enemies.iter().enumerate() {
            for b in &enemies[i + 1..] {
                assert!(!overlaps(a.position, a.footprint, b.position, b.footprint));
            }
        }
    }

    #[test]
    fn test_food_avoids_everything() {
        for seed in 0..40 {
            let board = board_for(LayoutPolicy::Procedural, seed);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ids = IdAllocator::default();
            let settings = Settings::default();
            let enemies = place_enemies(2, false, &board, &settings, &mut ids, &mut rng);
            let food = scatter_food(&board, &enemies, 5, &mut ids, &mut rng);

            assert_eq!(food.len(), 5);
            let cells: HashSet<Cell> = food.iter().map(|f| f.position).collect();
            assert_eq!(cells.len(), 5);
            for f in &food {
                assert!(!board.is_wall(f.position));
                assert!(!board.is_rack(f.position));
                assert_ne!(f.position, board.spawn);
                assert!(!board.exit.contains(f.position));
                assert!(enemies.iter().all(|e| !e.occupies(f.position)));
            }
        }
    }
}
