//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep on a virtual clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No storage, audio or platform dependencies

pub mod ai;
pub mod collision;
pub mod game;
pub mod layout;
pub mod pathing;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use ai::Perception;
pub use collision::is_move_valid;
pub use game::{GameEvent, GamePhase, GameState, LevelRules};
pub use layout::{Layout, LayoutParams, LayoutPolicy, generate_layout};
pub use snapshot::Snapshot;
pub use state::{
    Board, Cell, Direction, Enemy, EnemyKind, EnemyState, ExitRegion, FoodItem, FoodKind, Level,
    Player,
};
pub use tick::{apply_move, tick};
pub use timers::Deadline;
