//! Chiptune music sequencer
//!
//! Decides which track plays and which notes are due. Notes are handed to the
//! synth slightly ahead of time so scheduling jitter never causes gaps.

use super::{Audio, MusicTrack, Note, SoundEffect, Synth, Waveform};

/// How far ahead of the device clock notes are scheduled
pub const LOOKAHEAD_SECS: f64 = 0.1;
/// Gap between the death sound and the funeral track
const FUNERAL_DELAY_SECS: f64 = 0.5;

/// A note placed on the device timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledNote {
    pub freq: f32,
    pub len: f64,
    /// Device time the note starts at
    pub at: f64,
    pub waveform: Waveform,
}

#[derive(Debug, Clone, Copy)]
struct Playback {
    track: MusicTrack,
    index: usize,
    next_at: f64,
}

impl Playback {
    fn new(track: MusicTrack, now: f64) -> Self {
        Self {
            track,
            index: 0,
            next_at: now,
        }
    }
}

/// Track selection and note scheduling
#[derive(Debug, Clone)]
pub struct Sequencer {
    enabled: bool,
    /// Most recently requested track; survives muting
    requested: Option<MusicTrack>,
    playing: Option<Playback>,
    /// Delayed track start (device time)
    pending: Option<(MusicTrack, f64)>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Sequencer {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            requested: None,
            playing: None,
            pending: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn requested(&self) -> Option<MusicTrack> {
        self.requested
    }

    /// Track currently producing notes
    pub fn playing(&self) -> Option<MusicTrack> {
        self.playing.map(|p| p.track)
    }

    /// Switch to `track`. Requesting the track that is already playing keeps
    /// it going from where it is.
    pub fn start(&mut self, track: MusicTrack, now: f64) {
        self.pending = None;
        self.requested = Some(track);
        if !self.enabled || self.playing() == Some(track) {
            return;
        }
        self.playing = Some(Playback::new(track, now));
    }

    /// Start `track` once the device clock reaches `at`
    pub fn start_at(&mut self, track: MusicTrack, at: f64) {
        self.pending = Some((track, at));
    }

    /// Silence everything and forget any delayed start
    pub fn stop_all(&mut self) {
        self.playing = None;
        self.pending = None;
        self.requested = None;
    }

    /// Mute or unmute; unmuting resumes the requested track from its start
    pub fn toggle(&mut self, now: f64) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            self.playing = self.requested.map(|track| Playback::new(track, now));
        } else {
            self.playing = None;
        }
        self.enabled
    }

    /// Notes that start before `now + LOOKAHEAD_SECS`
    pub fn pump(&mut self, now: f64) -> Vec<ScheduledNote> {
        if let Some((track, at)) = self.pending.filter(|&(_, at)| at <= now) {
            self.pending = None;
            self.requested = Some(track);
            if self.enabled {
                self.playing = Some(Playback::new(track, at));
            }
        }

        let mut notes = Vec::new();
        let Some(playback) = self.playing.as_mut() else {
            return notes;
        };

        // A stalled clock (hidden tab) resumes from now instead of replaying
        if playback.next_at < now - LOOKAHEAD_SECS {
            playback.next_at = now;
        }

        let melody = playback.track.melody();
        while playback.next_at < now + LOOKAHEAD_SECS {
            let Note { freq, len } = melody[playback.index];
            if freq > 0.0 {
                notes.push(ScheduledNote {
                    freq,
                    len,
                    at: playback.next_at,
                    waveform: playback.track.waveform(),
                });
            }
            playback.next_at += len;
            playback.index = (playback.index + 1) % melody.len();
        }
        notes
    }
}

/// [`Audio`] collaborator rendering effects and music through a [`Synth`]
#[derive(Debug)]
pub struct Chiptune<S: Synth> {
    synth: S,
    sequencer: Sequencer,
    sfx_enabled: bool,
}

impl<S: Synth> Chiptune<S> {
    pub fn new(synth: S, music_enabled: bool, sfx_enabled: bool) -> Self {
        Self {
            synth,
            sequencer: Sequencer::new(music_enabled),
            sfx_enabled,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }
}

impl<S: Synth> Audio for Chiptune<S> {
    fn play(&mut self, effect: SoundEffect) {
        let now = self.synth.now();
        if self.sfx_enabled {
            self.synth.voice(&effect.voice());
        }
        if effect == SoundEffect::Death {
            self.sequencer
                .start_at(MusicTrack::Funeral, now + FUNERAL_DELAY_SECS);
        }
    }

    fn start_track(&mut self, track: MusicTrack) {
        let now = self.synth.now();
        self.sequencer.start(track, now);
        self.pump();
    }

    fn stop_all_tracks(&mut self) {
        self.sequencer.stop_all();
    }

    fn toggle_music(&mut self) -> bool {
        let now = self.synth.now();
        let enabled = self.sequencer.toggle(now);
        log::debug!("Music {}", if enabled { "on" } else { "off" });
        enabled
    }

    fn pump(&mut self) {
        let now = self.synth.now();
        for note in self.sequencer.pump(now) {
            self.synth.note(&note);
        }
    }
}
