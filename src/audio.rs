//! Audio playback boundary
//!
//! The simulation only emits `GameEvent::Sound`. The host routes those
//! through an `AudioManager`, which applies the volume mix and hands the
//! effect to whatever backend is plugged in.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Leader's running cadence
    Footstep,
    /// Paladin Q
    Shield,
    /// Paladin W
    Dash,
    /// Ranger Q
    Arrow,
    /// Ranger W
    Leap,
    /// Magi Q
    Fireball,
    /// Magi W
    IceBridge,
}

impl SoundEffect {
    /// Asset backing this effect
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Footstep | SoundEffect::Leap => "run.wav",
            SoundEffect::Shield => "shield.wav",
            SoundEffect::Dash | SoundEffect::Arrow => "arrow.wav",
            SoundEffect::Fireball => "fireball.wav",
            SoundEffect::IceBridge => "iceBridge.wav",
        }
    }
}

/// Fire-and-forget playback backend
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Backend that only logs; used headless
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("play {} at {:.2}", effect.file_name(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<LogSink> {
    fn default() -> Self {
        Self::new(LogSink)
    }
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play an effect at the volume the simulation asked for, scaled by the mix
    pub fn play(&mut self, effect: SoundEffect, volume: f32) {
        let vol = volume.clamp(0.0, 1.0) * self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
