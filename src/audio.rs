//! Audio cue routing
//!
//! The simulation only names sound cues; playback lives behind an
//! [`AudioPort`]. Playback failures (no audio context, autoplay blocked)
//! are logged and swallowed so the game never stalls on audio.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sound cue names understood by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SoundCue {
    /// Run started
    Start,
    /// Food picked up
    Collect,
    /// Player ducked onto a rack
    Hide,
    /// Player caught
    Capture,
    /// Level cleared (also played on victory)
    LevelComplete,
    /// Last life lost
    GameOver,
    /// Player back on the board after a capture
    Respawn,
    /// Background loop on
    MusicStart,
    /// Background loop off
    MusicStop,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Start => "start",
            SoundCue::Collect => "collect",
            SoundCue::Hide => "hide",
            SoundCue::Capture => "capture",
            SoundCue::LevelComplete => "levelComplete",
            SoundCue::GameOver => "gameOver",
            SoundCue::Respawn => "respawn",
            SoundCue::MusicStart => "musicStart",
            SoundCue::MusicStop => "musicStop",
        }
    }
}

/// Errors an audio backend may report
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio context unavailable")]
    Unavailable,
    #[error("playback blocked: {0}")]
    Blocked(String),
}

/// Something that can play a cue
pub trait AudioPort {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError>;
}

/// Port that only logs cues (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioPort for LogAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        log::debug!("sound: {}", cue.as_str());
        Ok(())
    }
}

/// Mute-aware front for a port
pub struct AudioSink {
    port: Box<dyn AudioPort>,
    muted: bool,
}

impl AudioSink {
    pub fn new(port: Box<dyn AudioPort>) -> Self {
        Self { port, muted: false }
    }

    /// Fire-and-forget playback
    pub fn play(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        if let Err(e) = self.port.play(cue) {
            log::warn!("Audio cue '{}' dropped: {e}", cue.as_str());
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip mute, returning the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl std::fmt::Debug for AudioSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSink").field("muted", &self.muted).finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Port recording every cue it is asked to play
    #[derive(Clone, Default)]
    pub(crate) struct RecordingAudio {
        pub(crate) played: Rc<RefCell<Vec<SoundCue>>>,
    }

    impl AudioPort for RecordingAudio {
        fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            self.played.borrow_mut().push(cue);
            Ok(())
        }
    }

    struct BrokenAudio;

    impl AudioPort for BrokenAudio {
        fn play(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
            Err(AudioError::Blocked("autoplay".to_string()))
        }
    }

    #[test]
    fn test_failures_are_swallowed() {
        let mut sink = AudioSink::new(Box::new(BrokenAudio));
        sink.play(SoundCue::Start);
        sink.play(SoundCue::Capture);
    }

    #[test]
    fn test_mute_suppresses_playback() {
        let port = RecordingAudio::default();
        let played = port.played.clone();
        let mut sink = AudioSink::new(Box::new(port));

        sink.play(SoundCue::Collect);
        assert!(sink.toggle_mute());
        sink.play(SoundCue::Hide);
        assert!(!sink.toggle_mute());
        sink.play(SoundCue::Respawn);

        assert_eq!(*played.borrow(), vec![SoundCue::Collect, SoundCue::Respawn]);
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(SoundCue::LevelComplete.as_str(), "levelComplete");
        assert_eq!(SoundCue::MusicStop.as_str(), "musicStop");
        assert_eq!(
            serde_json::to_string(&SoundCue::GameOver).unwrap(),
            "\"gameOver\""
        );
    }
}
