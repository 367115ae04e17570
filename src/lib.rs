//! Warehouse Cat - a grid arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, enemy AI, tick loop, level state)
//! - `session`: Session facade wiring the simulation to storage and audio ports
//! - `leaderboard`: Top-10 run records
//! - `persistence`: Key-value storage port (LocalStorage on web)
//! - `audio`: Sound-cue port
//! - `settings`: Data-driven game balance

pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Board dimensions in cells
    pub const BOARD_WIDTH: i32 = 25;
    pub const BOARD_HEIGHT: i32 = 18;

    /// Fixed simulation timestep (ms per tick)
    pub const TICK_MS: u64 = 50;

    pub const INITIAL_LIVES: u8 = 3;

    /// Ticks needed to move one cell
    pub const PATROLLER_SPEED: u32 = 4;
    pub const HAULER_SPEED: u32 = 2;
    pub const BOSS_SPEED: u32 = 1;

    /// Patroller sight radius (cells, Euclidean)
    pub const VISION_RANGE: f32 = 7.0;
    /// Chance per tick that a patroller sits still
    pub const PATROLLER_SKIP_CHANCE: f64 = 0.05;

    /// Side of the square hauler/boss footprint
    pub const HAULER_FOOTPRINT: i32 = 3;
    /// Vacated cells remembered for stuck detection
    pub const HISTORY_LEN: usize = 4;

    pub const FOOD_PER_LEVEL: usize = 5;
    pub const ENEMY_BASE_COUNT: usize = 2;
    /// Level that ends the run; it is also the boss level
    pub const FINAL_LEVEL: u32 = 5;

    pub const HIDE_DURATION_MS: u64 = 2_000;
    pub const INVULNERABILITY_MS: u64 = 5_000;
    pub const CAPTURE_DURATION_MS: u64 = 2_000;

    /// Minimum Manhattan distance between the player spawn and any enemy spawn
    pub const MIN_SPAWN_DISTANCE: i32 = 6;
}
