//! Web Audio backend
//!
//! Every effect and note is a fresh oscillator routed through a shared master
//! gain; oscillators are stopped on a timer so nothing has to be cleaned up.

use web_sys::{AudioContext, AudioParam, GainNode, OscillatorNode, OscillatorType};

use super::{Ramp, ScheduledNote, Synth, Voice, Waveform};

/// Gain of every music note
const NOTE_GAIN: f32 = 0.06;
/// Notes fade out this long before they end
const NOTE_RELEASE: f64 = 0.05;

/// [`Synth`] on top of a browser `AudioContext`
pub struct WebSynth {
    ctx: Option<AudioContext>,
    master: Option<GainNode>,
}

impl WebSynth {
    /// Create the context; audio is silently disabled if the browser refuses
    pub fn new(master_volume: f32) -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let master = ctx.as_ref().and_then(|ctx| {
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(master_volume.clamp(0.0, 1.0));
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            Some(gain)
        });
        Self { ctx, master }
    }

    /// Resume audio context (required after a user gesture)
    pub fn resume(&self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
    }

    /// Create an oscillator feeding its own gain stage
    fn create_osc(&self, freq: f32, waveform: Waveform) -> Option<(OscillatorNode, GainNode)> {
        let ctx = self.ctx.as_ref()?;
        let master = self.master.as_ref()?;
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(oscillator_type(waveform));
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(master).ok()?;

        Some((osc, gain))
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

fn ramp_to(param: &AudioParam, ramp: Ramp, value: f32, at: f64) {
    let _ = match ramp {
        Ramp::Linear => param.linear_ramp_to_value_at_time(value, at),
        Ramp::Exponential => param.exponential_ramp_to_value_at_time(value, at),
    };
}

impl Synth for WebSynth {
    fn now(&self) -> f64 {
        self.ctx.as_ref().map_or(0.0, |ctx| ctx.current_time())
    }

    fn voice(&mut self, voice: &Voice) {
        self.resume();
        let Some((osc, gain)) = self.create_osc(voice.pitch, voice.waveform) else {
            return;
        };
        let t = self.now();

        osc.frequency().set_value_at_time(voice.pitch, t).ok();
        for &(hz, after) in voice.sweep {
            ramp_to(&osc.frequency(), voice.sweep_ramp, hz, t + after);
        }
        gain.gain().set_value_at_time(voice.gain, t).ok();
        ramp_to(&gain.gain(), voice.fade, voice.fade_to, t + voice.duration);

        osc.start().ok();
        osc.stop_with_when(t + voice.duration).ok();
    }

    fn note(&mut self, note: &ScheduledNote) {
        let Some((osc, gain)) = self.create_osc(note.freq, note.waveform) else {
            return;
        };
        let release = (note.at + note.len - NOTE_RELEASE).max(note.at);
        gain.gain().set_value_at_time(NOTE_GAIN, note.at).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, release).ok();

        osc.start_with_when(note.at).ok();
        osc.stop_with_when(note.at + note.len).ok();
    }
}
