//! Audio system
//!
//! Procedurally generated 8-bit effects and music - no external files needed.
//! The game talks to an [`Audio`] collaborator with fire-and-forget calls;
//! [`Chiptune`] implements it on top of any [`Synth`] backend.

mod sequencer;
#[cfg(target_arch = "wasm32")]
mod web;

pub use sequencer::{Chiptune, LOOKAHEAD_SECS, ScheduledNote, Sequencer};
#[cfg(target_arch = "wasm32")]
pub use web::WebSynth;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Platform landing, stomp or run start
    Jump,
    /// Headbutt landed on the boss
    BossHit,
    /// Golden mode gained (or a golden fall bounce)
    PowerUp,
    /// Health pickup
    LifeUp,
    /// Lost a life
    Hurt,
    /// Golden mode expired
    PowerDown,
    /// Run over; the funeral track follows
    Death,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Automation curve for a parameter change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    /// Never targets zero
    Exponential,
}

/// One oscillator sweep describing a sound effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    /// Starting frequency in Hz
    pub pitch: f32,
    /// Frequency targets as (hz, seconds after start)
    pub sweep: &'static [(f32, f64)],
    pub sweep_ramp: Ramp,
    /// Starting gain
    pub gain: f32,
    /// Gain reached at `duration`
    pub fade_to: f32,
    pub fade: Ramp,
    /// Seconds until the oscillator stops
    pub duration: f64,
}

impl SoundEffect {
    /// Synthesis parameters
    pub fn voice(self) -> Voice {
        match self {
            SoundEffect::Jump => Voice {
                waveform: Waveform::Square,
                pitch: 150.0,
                sweep: &[(600.0, 0.1)],
                sweep_ramp: Ramp::Linear,
                gain: 0.08,
                fade_to: 0.01,
                fade: Ramp::Exponential,
                duration: 0.15,
            },
            SoundEffect::BossHit => Voice {
                waveform: Waveform::Sawtooth,
                pitch: 400.0,
                sweep: &[(100.0, 0.2)],
                sweep_ramp: Ramp::Exponential,
                gain: 0.2,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.2,
            },
            SoundEffect::PowerUp => Voice {
                waveform: Waveform::Triangle,
                pitch: 400.0,
                sweep: &[(800.0, 0.1), (1200.0, 0.3)],
                sweep_ramp: Ramp::Linear,
                gain: 0.2,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.3,
            },
            SoundEffect::LifeUp => Voice {
                waveform: Waveform::Sine,
                pitch: 500.0,
                sweep: &[(1000.0, 0.2)],
                sweep_ramp: Ramp::Linear,
                gain: 0.2,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.2,
            },
            SoundEffect::Hurt => Voice {
                waveform: Waveform::Sawtooth,
                pitch: 150.0,
                sweep: &[(100.0, 0.1)],
                sweep_ramp: Ramp::Linear,
                gain: 0.2,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.1,
            },
            SoundEffect::PowerDown => Voice {
                waveform: Waveform::Sawtooth,
                pitch: 1000.0,
                sweep: &[(200.0, 0.4)],
                sweep_ramp: Ramp::Linear,
                gain: 0.1,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.4,
            },
            SoundEffect::Death => Voice {
                waveform: Waveform::Sawtooth,
                pitch: 200.0,
                sweep: &[(50.0, 0.4)],
                sweep_ramp: Ramp::Linear,
                gain: 0.15,
                fade_to: 0.0,
                fade: Ramp::Linear,
                duration: 0.4,
            },
        }
    }
}

/// A melody step; a frequency of 0 is a rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub freq: f32,
    /// Seconds
    pub len: f64,
}

const fn n(freq: f32, len: f64) -> Note {
    Note { freq, len }
}

#[rustfmt::skip]
const MAIN_THEME: &[Note] = &[
    n(329.63, 0.2), n(329.63, 0.2), n(0.0, 0.1), n(329.63, 0.2), n(0.0, 0.1), n(261.63, 0.2),
    n(329.63, 0.2), n(0.0, 0.1),
    n(392.00, 0.4), n(0.0, 0.4), n(196.00, 0.4), n(0.0, 0.4),
    n(261.63, 0.3), n(196.00, 0.3), n(164.81, 0.3), n(220.00, 0.3), n(246.94, 0.3),
    n(233.08, 0.3), n(220.00, 0.3),
    n(196.00, 0.2), n(329.63, 0.2), n(392.00, 0.2), n(440.00, 0.3), n(349.23, 0.2),
    n(392.00, 0.2),
    n(329.63, 0.3), n(261.63, 0.2), n(293.66, 0.2), n(246.94, 0.3),
    n(261.63, 0.3), n(196.00, 0.3), n(164.81, 0.3), n(220.00, 0.3), n(246.94, 0.3),
    n(233.08, 0.3), n(220.00, 0.3),
];

#[rustfmt::skip]
const BOSS_THEME: &[Note] = &[
    n(110.00, 0.1), n(220.00, 0.1), n(110.00, 0.1), n(207.65, 0.1),
    n(110.00, 0.1), n(196.00, 0.1), n(110.00, 0.1), n(185.00, 0.1),
    n(110.00, 0.1), n(220.00, 0.1), n(110.00, 0.1), n(207.65, 0.1),
    n(110.00, 0.1), n(196.00, 0.1), n(110.00, 0.1), n(185.00, 0.1),
    n(146.83, 0.1), n(293.66, 0.1), n(146.83, 0.1), n(277.18, 0.1),
];

#[rustfmt::skip]
const FUNERAL_MARCH: &[Note] = &[
    n(523.25, 0.6), n(523.25, 0.6), n(587.33, 0.6), n(587.33, 0.6),
    n(659.25, 0.6), n(659.25, 0.6), n(587.33, 1.2), n(523.25, 0.6),
    n(523.25, 0.6), n(523.25, 1.2), n(0.0, 1.0),
];

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Main,
    Boss,
    Funeral,
}

impl MusicTrack {
    pub fn melody(self) -> &'static [Note] {
        match self {
            MusicTrack::Main => MAIN_THEME,
            MusicTrack::Boss => BOSS_THEME,
            MusicTrack::Funeral => FUNERAL_MARCH,
        }
    }

    pub fn waveform(self) -> Waveform {
        match self {
            MusicTrack::Main => Waveform::Triangle,
            MusicTrack::Boss => Waveform::Sawtooth,
            MusicTrack::Funeral => Waveform::Sine,
        }
    }
}

/// Audio collaborator driven by the game session
pub trait Audio {
    fn play(&mut self, effect: SoundEffect);
    fn start_track(&mut self, track: MusicTrack);
    fn stop_all_tracks(&mut self);
    /// Flip music on/off; returns the new state
    fn toggle_music(&mut self) -> bool;
    /// Called once per display frame to keep music scheduled
    fn pump(&mut self) {}
}

/// Output device for [`Chiptune`]
pub trait Synth {
    /// Device clock in seconds
    fn now(&self) -> f64;
    fn voice(&mut self, voice: &Voice);
    fn note(&mut self, note: &ScheduledNote);
}

/// Audio collaborator that does nothing (headless runs)
#[derive(Debug, Clone, Copy)]
pub struct SilentAudio {
    music: bool,
}

impl SilentAudio {
    pub fn new(music_enabled: bool) -> Self {
        Self {
            music: music_enabled,
        }
    }
}

impl Audio for SilentAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn start_track(&mut self, _track: MusicTrack) {}

    fn stop_all_tracks(&mut self) {}

    fn toggle_music(&mut self) -> bool {
        self.music = !self.music;
        self.music
    }
}
