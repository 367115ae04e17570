//! Read-only view of the game for the presentation layer

use serde::Serialize;

use super::game::{GamePhase, GameState};
use super::state::{Cell, EnemyKind, EnemyState, FoodKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub cell: Cell,
    pub size: i32,
    pub state: EnemyState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodView {
    pub id: u32,
    pub cell: Cell,
    pub kind: FoodKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub player: Cell,
    pub hidden: bool,
    pub invulnerable: bool,
    pub capture_in_progress: bool,
    pub captured_cell: Option<Cell>,
    pub enemies: Vec<EnemyView>,
    pub food: Vec<FoodView>,
    /// Sorted row-major
    pub racks: Vec<Cell>,
    pub exit: Vec<Cell>,
    pub level: u32,
    pub lives: u8,
    pub level_food: u32,
    pub total_food: u32,
    pub phase: GamePhase,
    pub message: Option<String>,
    pub is_boss: bool,
}

impl Snapshot {
    pub fn capture(game: &GameState) -> Self {
        let level = &game.level;
        let mut racks: Vec<Cell> = level.board.racks.iter().copied().collect();
        racks.sort_by_key(|c| (c.y, c.x));

        Self {
            width: level.board.width,
            height: level.board.height,
            player: game.player.position,
            hidden: game.player.hidden,
            invulnerable: game.player.invulnerable,
            capture_in_progress: game.is_capturing(),
            captured_cell: game.captured_at,
            enemies: level
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    cell: e.position,
                    size: e.footprint,
                    state: e.state,
                })
                .collect(),
            food: level
                .food
                .iter()
                .map(|f| FoodView {
                    id: f.id,
                    cell: f.position,
                    kind: f.kind,
                })
                .collect(),
            racks,
            exit: level.board.exit.cells(),
            level: game.level_number,
            lives: game.lives,
            level_food: game.level_food,
            total_food: game.total_food,
            phase: game.phase,
            message: game.message.clone(),
            is_boss: level.is_boss,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
