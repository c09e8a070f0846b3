//! Sound playback
//!
//! Game events are mapped to sound effects and handed to an `AudioSink`. The
//! sink owns the actual output device; `SilentAudio` stands in when there is
//! none.

use std::collections::HashMap;

use crate::assets::{AssetSource, Sound, SoundBank};
use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player laser shot
    Laser,
    /// Anything blowing up
    Explosion,
    /// Background music loop
    Music,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 3] = [SoundEffect::Laser, SoundEffect::Explosion, SoundEffect::Music];

    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Laser => "laser.wav",
            SoundEffect::Explosion => "explosion.wav",
            SoundEffect::Music => "game_music.wav",
        }
    }

    /// Sound for a game event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::LaserFired => Some(SoundEffect::Laser),
            GameEvent::Explosion { .. } => Some(SoundEffect::Explosion),
            _ => None,
        }
    }
}

/// Audio output device
pub trait AudioSink {
    /// Play a clip once
    fn play(&mut self, effect: SoundEffect, sound: &Sound, volume: f32);
    /// Start (or restart) a looping clip
    fn play_looped(&mut self, effect: SoundEffect, sound: &Sound, volume: f32);
}

/// Sink that drops everything, counting what it was asked to play
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    played: HashMap<SoundEffect, usize>,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self, effect: SoundEffect) -> usize {
        self.played.get(&effect).copied().unwrap_or(0)
    }
}

impl AudioSink for SilentAudio {
    fn play(&mut self, effect: SoundEffect, _sound: &Sound, _volume: f32) {
        *self.played.entry(effect).or_default() += 1;
    }

    fn play_looped(&mut self, effect: SoundEffect, sound: &Sound, volume: f32) {
        self.play(effect, sound, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    bank: SoundBank,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, source: &dyn AssetSource, settings: &Settings) -> Self {
        Self {
            sink,
            bank: SoundBank::load(source),
            sfx_volume: settings.effective_sfx_volume().clamp(0.0, 1.0),
            music_volume: settings.effective_music_volume().clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn volume_for(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            return 0.0;
        }
        match effect {
            SoundEffect::Music => self.music_volume,
            _ => self.sfx_volume,
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume_for(effect);
        if vol <= 0.0 {
            return;
        }
        if let Some(sound) = self.bank.get(effect) {
            self.sink.play(effect, sound, vol);
        }
    }

    /// Start the background loop
    pub fn start_music(&mut self) {
        let vol = self.volume_for(SoundEffect::Music);
        if let Some(sound) = self.bank.get(SoundEffect::Music) {
            self.sink.play_looped(SoundEffect::Music, sound, vol);
        }
    }

    /// Play whatever this frame's events call for
    pub fn react(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
