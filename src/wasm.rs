//! Browser binding
//!
//! Exposes a [`WebGame`] handle to JavaScript. The page owns the timer,
//! keyboard listener and rendering; it calls `tick` every `tickMs`,
//! forwards key names to `press`, and draws from `snapshot`.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioError, AudioPort, LogAudio, SoundCue};
use crate::persistence::LocalStorage;
use crate::session::Session;
use crate::sim::Direction;

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already set: {e}").into());
    }
    log::info!("Warehouse Cat starting...");
}

/// Audio port forwarding cue names to a JS callback
struct JsAudio {
    callback: js_sys::Function,
}

impl AudioPort for JsAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.callback
            .call1(&JsValue::NULL, &JsValue::from_str(cue.as_str()))
            .map(|_| ())
            .map_err(|e| AudioError::Blocked(format!("{e:?}")))
    }
}

fn to_js(e: serde_json::Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    /// `seed` replays a run; omit it for a random one. `on_sound` receives cue names.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<f64>, on_sound: Option<js_sys::Function>) -> WebGame {
        let seed = seed.map(|s| s as u64).unwrap_or_else(rand::random);
        let audio: Box<dyn AudioPort> = match on_sound {
            Some(callback) => Box::new(JsAudio { callback }),
            None => Box::new(LogAudio),
        };
        log::info!("New session (seed {seed})");
        WebGame {
            session: Session::from_store(seed, Box::new(LocalStorage), audio),
        }
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    /// Forward a key or intent name; returns false for unmapped keys
    pub fn press(&mut self, key: &str) -> bool {
        match Direction::parse(key) {
            Some(direction) => {
                self.session.press(direction);
                true
            }
            None => false,
        }
    }

    pub fn tick(&mut self) {
        self.session.tick();
    }

    #[wasm_bindgen(js_name = nextLevel)]
    pub fn next_level(&mut self) {
        self.session.next_level();
    }

    #[wasm_bindgen(js_name = beginBoss)]
    pub fn begin_boss(&mut self) {
        self.session.begin_boss();
    }

    #[wasm_bindgen(js_name = setPlayerName)]
    pub fn set_player_name(&mut self, name: &str) {
        self.session.set_player_name(name);
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&mut self) -> bool {
        self.session.toggle_mute()
    }

    #[wasm_bindgen(getter, js_name = tickMs)]
    pub fn tick_ms(&self) -> u32 {
        self.session.game().settings.tick_ms.min(u32::MAX as u64) as u32
    }

    /// Current frame as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.session.snapshot().to_json().map_err(to_js)
    }

    /// Leaderboard entries as JSON
    pub fn leaderboard(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.session.leaderboard().entries()).map_err(to_js)
    }
}
