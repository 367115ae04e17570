//! Entity model
//!
//! Plain records for the board, player, food and enemies, plus the small
//! pure queries every other simulation module relies on.

use std::collections::HashSet;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// One grid square; y grows downward
pub type Cell = IVec2;

/// Cardinal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step for this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Accepts intent names, arrow-key names and WASD
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "up" | "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "down" | "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "left" | "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "right" | "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Square goal area anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRegion {
    pub origin: Cell,
    pub size: i32,
}

impl ExitRegion {
    pub fn contains(&self, cell: Cell) -> bool {
        let rel = cell - self.origin;
        rel.x >= 0 && rel.y >= 0 && rel.x < self.size && rel.y < self.size
    }

    pub fn cells(&self) -> Vec<Cell> {
        square(self.origin, self.size)
    }
}

/// Static geometry of one level
#[derive(Debug, Clone)]
pub struct Board {
    pub width: i32,
    pub height: i32,
    pub racks: HashSet<Cell>,
    pub exit: ExitRegion,
    /// Player start and respawn cell
    pub spawn: Cell,
    /// Multi-cell enemies may hang over the board edge (anchor stays on-board)
    pub allow_overhang: bool,
}

impl Board {
    /// Outside the board bounds
    pub fn is_wall(&self, cell: Cell) -> bool {
        cell.x < 0 || cell.y < 0 || cell.x >= self.width || cell.y >= self.height
    }

    pub fn is_rack(&self, cell: Cell) -> bool {
        self.racks.contains(&cell)
    }

    /// Uniformly random on-board cell that is not a rack
    pub fn random_open_cell(&self, rng: &mut Pcg32) -> Cell {
        for _ in 0..256 {
            let cell = IVec2::new(
                rng.random_range(0..self.width),
                rng.random_range(0..self.height),
            );
            if !self.is_rack(cell) {
                return cell;
            }
        }
        // Rack-saturated board: take the first open cell in scan order
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| IVec2::new(x, y)))
            .find(|c| !self.is_rack(*c))
            .unwrap_or(self.spawn)
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Single cell, slow, limited vision
    Patroller,
    /// N×N block, fast, always chasing
    Hauler,
    /// Hauler variant with elevated speed
    Boss,
}

impl EnemyKind {
    pub fn is_multi_cell(self) -> bool {
        !matches!(self, EnemyKind::Patroller)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyState {
    Patrolling,
    Chasing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left cell of the footprint
    pub position: Cell,
    /// Side of the square footprint (1 for patrollers)
    pub footprint: i32,
    /// Ticks accumulated toward the next move attempt
    pub move_counter: u32,
    /// Ticks per move attempt
    pub speed: u32,
    pub state: EnemyState,
    pub patrol_target: Option<Cell>,
    /// Recently vacated cells, oldest first
    pub history: Vec<Cell>,
}

impl Enemy {
    pub fn occupied_cells(&self) -> Vec<Cell> {
        footprint_at(self.position, self.footprint)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        let rel = cell - self.position;
        rel.x >= 0 && rel.y >= 0 && rel.x < self.footprint && rel.y < self.footprint
    }

    /// Remember a vacated cell, keeping at most `limit`
    pub fn record_departure(&mut self, from: Cell, limit: usize) {
        self.history.push(from);
        if self.history.len() > limit {
            let excess = self.history.len() - limit;
            self.history.drain(..excess);
        }
    }
}

/// Cells covered by a footprint anchored at `anchor`
pub fn footprint_at(anchor: Cell, size: i32) -> Vec<Cell> {
    square(anchor, size)
}

fn square(origin: Cell, size: i32) -> Vec<Cell> {
    let mut cells = Vec::with_capacity((size * size).max(0) as usize);
    for dx in 0..size {
        for dy in 0..size {
            cells.push(origin + IVec2::new(dx, dy));
        }
    }
    cells
}

/// Decorative food tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Fish,
    Meat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u32,
    pub position: Cell,
    pub kind: FoodKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Player {
    pub position: Cell,
    /// Standing on a rack inside the hide window
    pub hidden: bool,
    /// Inside the post-respawn grace window
    pub invulnerable: bool,
}

/// Everything regenerated at level start
#[derive(Debug, Clone)]
pub struct Level {
    pub board: Board,
    pub food: Vec<FoodItem>,
    pub enemies: Vec<Enemy>,
    pub all_food_collected: bool,
    pub is_boss: bool,
}

impl Level {
    /// Any enemy footprint covers `cell`
    pub fn enemy_at(&self, cell: Cell) -> bool {
        self.enemies.iter().any(|e| e.occupies(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn board() -> Board {
        Board {
            width: 10,
            height: 8,
            racks: [IVec2::new(2, 2), IVec2::new(3, 2)].into_iter().collect(),
            exit: ExitRegion {
                origin: IVec2::new(9, 4),
                size: 1,
            },
            spawn: IVec2::new(1, 1),
            allow_overhang: false,
        }
    }

    fn enemy(kind: EnemyKind, position: Cell, footprint: i32) -> Enemy {
        Enemy {
            id: 1,
            kind,
            position,
            footprint,
            move_counter: 0,
            speed: 1,
            state: EnemyState::Chasing,
            patrol_target: None,
            history: Vec::new(),
        }
    }

    #[test]
    fn test_is_wall_bounds() {
        let b = board();
        assert!(b.is_wall(IVec2::new(-1, 0)));
        assert!(b.is_wall(IVec2::new(10, 0)));
        assert!(b.is_wall(IVec2::new(0, 8)));
        assert!(!b.is_wall(IVec2::new(9, 7)));
    }

    #[test]
    fn test_occupied_cells_by_kind() {
        let worker = enemy(EnemyKind::Patroller, IVec2::new(4, 4), 1);
        assert_eq!(worker.occupied_cells(), vec![IVec2::new(4, 4)]);

        let hauler = enemy(EnemyKind::Hauler, IVec2::new(4, 4), 3);
        let cells = hauler.occupied_cells();
        assert_eq!(cells.len(), 9);
        assert!(cells.contains(&IVec2::new(6, 6)));
        assert!(hauler.occupies(IVec2::new(5, 6)));
        assert!(!hauler.occupies(IVec2::new(7, 6)));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut e = enemy(EnemyKind::Hauler, IVec2::ZERO, 3);
        for x in 0..6 {
            e.record_departure(IVec2::new(x, 0), 4);
        }
        assert_eq!(
            e.history,
            vec![IVec2::new(2, 0), IVec2::new(3, 0), IVec2::new(4, 0), IVec2::new(5, 0)]
        );
    }

    #[test]
    fn test_random_open_cell_avoids_racks() {
        let b = board();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let c = b.random_open_cell(&mut rng);
            assert!(!b.is_wall(c));
            assert!(!b.is_rack(c));
        }
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("ArrowLeft"), Some(Direction::Left));
        assert_eq!(Direction::parse("s"), Some(Direction::Down));
        assert_eq!(Direction::parse("jump"), None);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
    }
}
