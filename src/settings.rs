//! Game settings and balance
//!
//! Persisted separately from the leaderboard in the key-value store.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::KeyValueStore;

/// Tunable gameplay constants and player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub board_width: i32,
    pub board_height: i32,
    /// Milliseconds per simulation tick
    pub tick_ms: u64,

    // === Run ===
    pub initial_lives: u8,
    pub food_per_level: usize,
    pub enemy_base_count: usize,
    /// Completing this level wins the run
    pub final_level: u32,
    /// Play the final level with the boss ruleset
    pub boss_level: bool,

    // === Enemies ===
    pub patroller_speed: u32,
    pub hauler_speed: u32,
    pub boss_speed: u32,
    pub vision_range: f32,
    pub patroller_skip_chance: f64,
    pub hauler_footprint: i32,
    pub history_len: usize,

    // === Timed windows ===
    pub hide_duration_ms: u64,
    pub invulnerability_ms: u64,
    pub capture_duration_ms: u64,

    // === Audio ===
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            tick_ms: TICK_MS,

            initial_lives: INITIAL_LIVES,
            food_per_level: FOOD_PER_LEVEL,
            enemy_base_count: ENEMY_BASE_COUNT,
            final_level: FINAL_LEVEL,
            boss_level: true,

            patroller_speed: PATROLLER_SPEED,
            hauler_speed: HAULER_SPEED,
            boss_speed: BOSS_SPEED,
            vision_range: VISION_RANGE,
            patroller_skip_chance: PATROLLER_SKIP_CHANCE,
            hauler_footprint: HAULER_FOOTPRINT,
            history_len: HISTORY_LEN,

            hide_duration_ms: HIDE_DURATION_MS,
            invulnerability_ms: INVULNERABILITY_MS,
            capture_duration_ms: CAPTURE_DURATION_MS,

            muted: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "warehouse_cat_settings";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    /// Clamp values into ranges the simulation can run with
    pub fn sanitized(mut self) -> Self {
        self.board_width = self.board_width.max(8);
        self.board_height = self.board_height.max(8);
        self.tick_ms = self.tick_ms.max(1);
        self.initial_lives = self.initial_lives.max(1);
        self.final_level = self.final_level.max(1);
        self.patroller_speed = self.patroller_speed.max(1);
        self.hauler_speed = self.hauler_speed.max(1);
        self.boss_speed = self.boss_speed.max(1);
        if !self.vision_range.is_finite() || self.vision_range < 0.0 {
            self.vision_range = VISION_RANGE;
        }
        if !self.patroller_skip_chance.is_finite() {
            self.patroller_skip_chance = 0.0;
        }
        self.patroller_skip_chance = self.patroller_skip_chance.clamp(0.0, 1.0);
        self.hauler_footprint = self.hauler_footprint.clamp(1, self.board_height.min(self.board_width) / 4);
        self.history_len = self.history_len.max(2);
        self
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings: {e}"),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings unavailable: {e}"),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Failed to save settings: {e}"),
            },
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }
}
