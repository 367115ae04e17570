//! Session facade
//!
//! Owns the simulation plus the injected storage and audio ports. Every
//! event coming out of the simulation passes through [`Session::dispatch`],
//! which plays its cue and records finished runs on the leaderboard.

use crate::audio::{AudioPort, AudioSink};
use crate::leaderboard::{DEFAULT_NAME, Leaderboard, normalize_name};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{Direction, GameEvent, GameState, Snapshot, apply_move, tick};

pub struct Session {
    game: GameState,
    leaderboard: Leaderboard,
    store: Box<dyn KeyValueStore>,
    audio: AudioSink,
    player_name: String,
}

impl Session {
    /// Build a session; the leaderboard is read from `store` once, here
    pub fn new(
        settings: Settings,
        seed: u64,
        store: Box<dyn KeyValueStore>,
        audio: Box<dyn AudioPort>,
    ) -> Self {
        let leaderboard = Leaderboard::load(store.as_ref());
        let mut audio = AudioSink::new(audio);
        audio.set_muted(settings.muted);

        Self {
            game: GameState::new(settings, seed),
            leaderboard,
            store,
            audio,
            player_name: DEFAULT_NAME.to_string(),
        }
    }

    /// Build a session using the settings persisted in `store`
    pub fn from_store(seed: u64, store: Box<dyn KeyValueStore>, audio: Box<dyn AudioPort>) -> Self {
        let settings = Settings::load(store.as_ref());
        Self::new(settings, seed, store, audio)
    }

    pub fn start(&mut self) -> Vec<GameEvent> {
        let events = self.game.start_run();
        self.dispatch(events)
    }

    /// Apply one directional intent
    pub fn press(&mut self, direction: Direction) -> Vec<GameEvent> {
        let events = apply_move(&mut self.game, direction);
        self.dispatch(events)
    }

    /// Advance one tick of the configured length
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let dt = self.game.settings.tick_ms;
        self.tick_by(dt)
    }

    /// Advance one tick of an explicit length
    pub fn tick_by(&mut self, dt_ms: u64) -> Vec<GameEvent> {
        let events = tick(&mut self.game, dt_ms);
        self.dispatch(events)
    }

    pub fn next_level(&mut self) -> Vec<GameEvent> {
        let events = self.game.advance_level();
        self.dispatch(events)
    }

    pub fn begin_boss(&mut self) -> Vec<GameEvent> {
        let events = self.game.begin_boss();
        self.dispatch(events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.game)
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = normalize_name(name);
    }

    /// Flip mute and persist the preference
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        self.game.settings.muted = muted;
        self.game.settings.save(self.store.as_mut());
        muted
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for event in &events {
            if let Some(cue) = event.sound_cue() {
                self.audio.play(cue);
            }
            if let Some(music) = event.music_cue() {
                self.audio.play(music);
            }
            match *event {
                GameEvent::GameOver { level, food } | GameEvent::Victory { level, food } => {
                    self.record_run(level, food);
                }
                _ => {}
            }
        }
        events
    }

    fn record_run(&mut self, level: u32, food: u32) {
        let rank = self.leaderboard.record(&self.player_name, level, food);
        match rank {
            Some(rank) => log::info!("{} placed #{rank} (level {level}, food {food})", self.player_name),
            None => log::info!("{} did not make the leaderboard", self.player_name),
        }
        if let Err(e) = self.leaderboard.save(self.store.as_mut()) {
            log::warn!("Failed to persist leaderboard: {e}");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.game.phase)
            .field("level", &self.game.level_number)
            .field("player_name", &self.player_name)
            .field("audio", &self.audio)
            .finish()
    }
}
