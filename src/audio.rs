//! Cue player using the Web Audio API
//!
//! Procedurally generated cues - no sample files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::cues::{Cue, CuePlayer};
use crate::settings::Settings;

/// Web Audio synthesizer for mixing cues
pub struct WebAudioCues {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Oscillators that may still be ringing (stirring and kneading loops)
    ringing: Vec<OscillatorNode>,
}

impl WebAudioCues {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - cues disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
            ringing: Vec::new(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Single enveloped tone
    fn tone(ctx: &AudioContext, freq: f32, osc_type: OscillatorType, duration: f64, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + duration + 0.02).ok();
    }

    /// Seed hitting the bowl - short crackle
    fn bounce(ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, 2000.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.05)
            .ok();
        osc.frequency().set_value_at_time(2000.0, t).ok();
        osc.frequency().set_value_at_time(3500.0, t + 0.01).ok();
        osc.frequency().set_value_at_time(1200.0, t + 0.02).ok();
        osc.frequency().set_value_at_time(2800.0, t + 0.03).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.06).ok();
    }

    /// Loose seeds rattling around the bowl
    fn stir(&mut self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [900.0, 1300.0, 1100.0, 1500.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.12).ok();
                self.ringing.push(osc);
            }
        }
    }

    /// Dough being pressed - soft low squish
    fn knead(&mut self, ctx: &AudioContext, vol: f32) {
        for i in 0..3 {
            let delay = i as f64 * 0.4;
            if let Some((osc, gain)) = Self::create_osc(ctx, 120.0, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(0.01, t).ok();
                gain.gain()
                    .linear_ramp_to_value_at_time(vol * 0.4, t + 0.08)
                    .ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(70.0, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
                self.ringing.push(osc);
            }
        }
    }
}

impl CuePlayer for WebAudioCues {
    fn play(&mut self, cue: Cue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::PourStart => Self::tone(&ctx, 800.0, OscillatorType::Square, 0.1, vol),
            Cue::Bounce => Self::bounce(&ctx, vol),
            Cue::TutorialDismissed => Self::tone(&ctx, 600.0, OscillatorType::Sine, 0.1, vol),
            Cue::TimeUp => Self::tone(&ctx, 600.0, OscillatorType::Sawtooth, 0.5, vol),
            Cue::Mix => self.stir(&ctx, vol),
            Cue::Knead => self.knead(&ctx, vol),
            Cue::DialTick { digit } => {
                let freq = 400.0 + (2 - digit.min(2)) as f32 * 100.0;
                Self::tone(&ctx, freq, OscillatorType::Sine, 0.05, vol)
            }
            Cue::Rejected => Self::tone(&ctx, 200.0, OscillatorType::Sawtooth, 0.2, vol),
        }
    }

    fn stop_all(&mut self) {
        for osc in self.ringing.drain(..) {
            // Already-finished oscillators reject a second stop; that is fine
            osc.stop().ok();
        }
    }
}
