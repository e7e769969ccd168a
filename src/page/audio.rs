/// Derived playback state shown by the toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioState {
    Paused,
    Playing,
    Muted,
}

/// The host refused to start playback (typically an autoplay restriction).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("playback rejected: {0}")]
pub struct PlaybackRejected(pub String);

/// Output device for the background track.
pub trait AudioSink {
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn set_looping(&mut self, looping: bool);
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub volume: f64,
    pub looping: bool,
    /// How long the "click to play" hint stays up after a rejected play.
    pub hint_s: f64,
    /// Whether the headless sink accepts `play` without a user gesture.
    pub autoplay_allowed: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.3,
            looping: true,
            hint_s: 3.0,
            autoplay_allowed: true,
        }
    }
}

impl AudioConfig {
    pub fn validate(&self) -> crate::foundation::error::HeartlineResult<()> {
        use crate::foundation::error::HeartlineError;

        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(HeartlineError::validation("audio.volume must be within [0, 1]"));
        }
        if !self.hint_s.is_finite() || self.hint_s < 0.0 {
            return Err(HeartlineError::validation("audio.hint_s must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Sink that records calls instead of producing sound.
#[derive(Clone, Debug, Default)]
pub struct HeadlessSink {
    pub autoplay_allowed: bool,
    pub playing: bool,
    pub volume: f64,
    pub looping: bool,
    pub play_calls: usize,
    pub pause_calls: usize,
}

impl HeadlessSink {
    pub fn new(autoplay_allowed: bool) -> Self {
        Self {
            autoplay_allowed,
            ..Self::default()
        }
    }
}

impl AudioSink for HeadlessSink {
    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.play_calls += 1;
        if !self.autoplay_allowed {
            return Err(PlaybackRejected("autoplay blocked".to_owned()));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.pause_calls += 1;
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }
}

/// What the caller should do after a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub state: AudioState,
    /// Playback was refused; show the hint.
    pub rejected: bool,
}

/// Play and mute flags driving an [`AudioSink`].
pub struct AudioToggle {
    sink: Box<dyn AudioSink>,
    playing: bool,
    muted: bool,
    hint_visible: bool,
}

impl std::fmt::Debug for AudioToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioToggle")
            .field("playing", &self.playing)
            .field("muted", &self.muted)
            .field("hint_visible", &self.hint_visible)
            .finish_non_exhaustive()
    }
}

impl AudioToggle {
    pub fn new(mut sink: Box<dyn AudioSink>, config: &AudioConfig) -> Self {
        sink.set_volume(config.volume);
        sink.set_looping(config.looping);
        Self {
            sink,
            playing: false,
            muted: false,
            hint_visible: false,
        }
    }

    pub fn state(&self) -> AudioState {
        match (self.playing, self.muted) {
            (false, _) => AudioState::Paused,
            (true, true) => AudioState::Muted,
            (true, false) => AudioState::Playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_play(&mut self) -> ToggleOutcome {
        self.playing = !self.playing;
        self.sync()
    }

    pub fn toggle_mute(&mut self) -> ToggleOutcome {
        self.muted = !self.muted;
        self.sync()
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn show_hint(&mut self) {
        self.hint_visible = true;
    }

    pub fn hide_hint(&mut self) {
        self.hint_visible = false;
    }

    /// Silence the sink; flags are kept so a snapshot still shows the last choice.
    pub fn teardown(&mut self) {
        self.sink.pause();
    }

    // A refused play leaves the flags as the user set them; only the hint reacts.
    fn sync(&mut self) -> ToggleOutcome {
        let state = self.state();
        let mut rejected = false;
        if state == AudioState::Playing {
            if let Err(err) = self.sink.play() {
                tracing::warn!(%err, "background audio did not start");
                rejected = true;
            }
        } else {
            self.sink.pause();
        }
        ToggleOutcome { state, rejected }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/audio.rs"]
mod tests;
