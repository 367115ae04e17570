//! Run state and level transitions
//!
//! `GameState` owns everything the tick needs: settings, the seeded RNG,
//! the current level, the player and the virtual clock.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{LayoutParams, LayoutPolicy, generate_layout};
use super::spawn::{IdAllocator, place_enemies, player_spawn, scatter_food};
use super::state::{Board, Cell, Level, Player};
use super::timers::Timers;
use crate::audio::SoundCue;
use crate::settings::Settings;

pub const BOSS_INTRO_MESSAGE: &str = "The boss is on shift!";
pub const ALL_FOOD_MESSAGE: &str = "Food collected! Run to the exit!";

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// Title screen, no run yet
    NotStarted,
    /// Active gameplay (including a capture sequence)
    Playing,
    /// Level cleared, waiting for the player to continue
    LevelComplete,
    /// Shown before the boss level starts
    BossIntro,
    /// Out of lives
    GameOver,
    /// Final level cleared
    Victory,
}

/// Discrete outcomes of a tick, move or transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    /// Play resumed on a freshly built level after the first
    LevelStarted { level: u32 },
    FoodCollected { id: u32, cell: Cell },
    AllFoodCollected,
    Hidden,
    Captured { cell: Cell },
    Respawned,
    LevelComplete { level: u32 },
    BossIntro,
    GameOver { level: u32, food: u32 },
    Victory { level: u32, food: u32 },
}

impl GameEvent {
    /// Cue the presentation layer should play, if any
    pub fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Started => Some(SoundCue::Start),
            GameEvent::FoodCollected { .. } => Some(SoundCue::Collect),
            GameEvent::Hidden => Some(SoundCue::Hide),
            GameEvent::Captured { .. } => Some(SoundCue::Capture),
            GameEvent::Respawned => Some(SoundCue::Respawn),
            GameEvent::LevelComplete { .. } | GameEvent::Victory { .. } => {
                Some(SoundCue::LevelComplete)
            }
            GameEvent::GameOver { .. } => Some(SoundCue::GameOver),
            GameEvent::AllFoodCollected | GameEvent::BossIntro | GameEvent::LevelStarted { .. } => {
                None
            }
        }
    }

    /// Background music switch, if the event starts or ends play
    pub fn music_cue(&self) -> Option<SoundCue> {
        match self {
            GameEvent::Started | GameEvent::LevelStarted { .. } => Some(SoundCue::MusicStart),
            GameEvent::LevelComplete { .. }
            | GameEvent::GameOver { .. }
            | GameEvent::Victory { .. } => Some(SoundCue::MusicStop),
            _ => None,
        }
    }
}

/// Per-level ruleset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelRules {
    pub policy: LayoutPolicy,
    pub is_boss: bool,
    pub allow_overhang: bool,
}

impl LevelRules {
    pub fn for_level(number: u32, settings: &Settings) -> Self {
        let is_boss = settings.boss_level && number == settings.final_level;
        Self {
            policy: if is_boss {
                LayoutPolicy::Fixed
            } else {
                LayoutPolicy::Procedural
            },
            is_boss,
            allow_overhang: is_boss,
        }
    }
}

/// Complete run state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub lives: u8,
    pub level_number: u32,
    /// Food eaten over the whole run
    pub total_food: u32,
    /// Food eaten on the current level
    pub level_food: u32,
    pub level: Level,
    pub player: Player,
    pub timers: Timers,
    /// Cell of the capture in progress
    pub captured_at: Option<Cell>,
    pub last_known: Option<Cell>,
    pub message: Option<String>,
    /// Virtual clock in milliseconds
    pub elapsed_ms: u64,
    ids: IdAllocator,
}

impl GameState {
    /// Fresh state showing level 1, not yet started
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAllocator::default();
        let level = build_level(1, &settings, &mut ids, &mut rng);
        let player = Player {
            position: level.board.spawn,
            ..Player::default()
        };

        Self {
            lives: settings.initial_lives,
            settings,
            seed,
            rng,
            phase: GamePhase::NotStarted,
            level_number: 1,
            total_food: 0,
            level_food: 0,
            level,
            player,
            timers: Timers::default(),
            captured_at: None,
            last_known: None,
            message: None,
            elapsed_ms: 0,
            ids,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.captured_at.is_some()
    }

    pub fn is_final_level(&self) -> bool {
        self.level_number >= self.settings.final_level
    }

    /// Begin a new run from the title, game over or victory screens
    pub fn start_run(&mut self) -> Vec<GameEvent> {
        if !matches!(
            self.phase,
            GamePhase::NotStarted | GamePhase::GameOver | GamePhase::Victory
        ) {
            log::debug!("start_run ignored in {:?}", self.phase);
            return Vec::new();
        }

        self.lives = self.settings.initial_lives;
        self.total_food = 0;
        self.enter_level(1);
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
        vec![GameEvent::Started]
    }

    /// Move on from a cleared level
    pub fn advance_level(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::LevelComplete {
            log::debug!("advance_level ignored in {:?}", self.phase);
            return Vec::new();
        }

        let next = self.level_number + 1;
        self.enter_level(next);
        if self.level.is_boss {
            self.phase = GamePhase::BossIntro;
            self.message = Some(BOSS_INTRO_MESSAGE.to_string());
            log::info!("Level {next}: boss intro");
            vec![GameEvent::BossIntro]
        } else {
            self.phase = GamePhase::Playing;
            log::info!("Level {next} started");
            vec![GameEvent::LevelStarted { level: next }]
        }
    }

    /// Leave the boss intro and start playing
    pub fn begin_boss(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::BossIntro {
            log::debug!("begin_boss ignored in {:?}", self.phase);
            return Vec::new();
        }
        self.message = None;
        self.phase = GamePhase::Playing;
        log::info!("Boss level started");
        vec![GameEvent::LevelStarted {
            level: self.level_number,
        }]
    }

    fn enter_level(&mut self, number: u32) {
        self.level_number = number;
        self.level = build_level(number, &self.settings, &mut self.ids, &mut self.rng);
        self.level_food = 0;
        self.player = Player {
            position: self.level.board.spawn,
            ..Player::default()
        };
        self.timers.cancel_all();
        self.captured_at = None;
        self.last_known = None;
        self.message = None;
    }
}

/// Generate and populate a level
fn build_level(number: u32, settings: &Settings, ids: &mut IdAllocator, rng: &mut Pcg32) -> Level {
    let rules = LevelRules::for_level(number, settings);
    let params = LayoutParams {
        width: settings.board_width,
        height: settings.board_height,
        policy: rules.policy,
    };
    let layout = generate_layout(&params, rng);
    let spawn = player_spawn(params.width, |cell| layout.racks.contains(&cell));

    let board = Board {
        width: params.width,
        height: params.height,
        racks: layout.racks,
        exit: layout.exit,
        spawn,
        allow_overhang: rules.allow_overhang,
    };
    let enemies = place_enemies(number, rules.is_boss, &board, settings, ids, rng);
    let food = scatter_food(&board, &enemies, settings.food_per_level, ids, rng);

    log::debug!(
        "Built level {number}: {} enemies, {} food",
        enemies.len(),
        food.len()
    );
    Level {
        all_food_collected: food.is_empty(),
        board,
        food,
        enemies,
        is_boss: rules.is_boss,
    }
}
