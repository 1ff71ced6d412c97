//! Bow and pluck excitation.
//!
//! The bow signal is a sawtooth (optionally enriched with 2nd/3rd harmonics
//! at fast bow speeds) blended with friction noise; the blend follows bow
//! force and speed. A pluck is a single impulse. Both are gated by a linear
//! attack/release envelope so engaging or releasing the bow never clicks.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::{crossfade, random};

const TAU: f32 = 2.0 * core::f32::consts::PI;

/// Envelope step per sample (full swing in 200 samples, about 4 ms at
/// 48 kHz; release behaves symmetrically).
pub const ENVELOPE_RAMP_RATE: f32 = 0.005;

/// Below this the excitation is considered silent and not synthesized.
pub const ENVELOPE_GATE: f32 = 0.001;

/// Pitch excursion at full vibrato depth (about a semitone).
const VIBRATO_PITCH_DEPTH: f32 = 0.06;
/// Amplitude excursion at full vibrato depth. Together with the pitch depth
/// this fixes the 70/30 pitch/amplitude vibrato character.
const VIBRATO_AMP_DEPTH: f32 = 0.2;

/// Speed-harmonics value above which upper partials are added to the saw.
const HARMONIC_SPEED_THRESHOLD: f32 = 0.2;
const HARMONIC_2_GAIN: f32 = 0.25;
const HARMONIC_3_GAIN: f32 = 0.1;

/// Stick-slip friction noise level and its blend against the tone.
const FRICTION_LEVEL: f32 = 0.3;
const TONE_FRICTION_MIX: f32 = 0.85;

const TONE_NOISE_MIX_MIN: f32 = 0.3;
const TONE_NOISE_MIX_MAX: f32 = 0.95;

/// Linear attack/release envelope gating the excitation.
#[derive(Debug, Default, Clone)]
pub struct BowEnvelope {
    value: f32,
    target: f32,
}

impl BowEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, engaged: bool) {
        self.target = if engaged { 1.0 } else { 0.0 };
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// True while the bow is held down (target is 1.0).
    #[inline]
    pub fn is_engaged(&self) -> bool {
        self.target > 0.0
    }

    /// True while the envelope can produce audible excitation this block.
    #[inline]
    pub fn is_audible(&self) -> bool {
        self.value > ENVELOPE_GATE || self.target > 0.0
    }

    /// Advance one sample. Monotonic toward the target, landing exactly on
    /// it (the final partial step snaps, so accumulation error cannot leave
    /// a residue).
    #[inline]
    pub fn next(&mut self) -> f32 {
        let error = self.target - self.value;
        if error.abs() <= ENVELOPE_RAMP_RATE {
            self.value = self.target;
        } else if error > 0.0 {
            self.value += ENVELOPE_RAMP_RATE;
        } else {
            self.value -= ENVELOPE_RAMP_RATE;
        }

        self.value
    }
}

/// Per-block bow dynamics derived from force and speed.
#[derive(Debug, Clone, Copy)]
pub struct BowDynamics {
    /// Blend between tone (1.0) and raw noise (0.0).
    pub tone_noise_mix: f32,
    /// Drives the 2nd/3rd harmonic enrichment.
    pub speed_harmonics: f32,
    /// Feeds the tone filter's transient brightness shift.
    pub force_brightness: f32,
}

impl BowDynamics {
    pub fn new(bow_force: f32, bow_speed: f32) -> Self {
        // More force presses the bow harder into the string: brighter and
        // noisier. More speed smooths the stick-slip cycle.
        let force_brightness = 0.2 + bow_force * 0.6;
        let force_noise = bow_force.powf(1.5) * 0.4;
        let speed_harmonics = bow_speed.powf(0.7);
        let speed_smoothness = bow_speed * 0.5;

        Self {
            tone_noise_mix: (0.8 - force_noise + speed_smoothness)
                .clamp(TONE_NOISE_MIX_MIN, TONE_NOISE_MIX_MAX),
            speed_harmonics,
            force_brightness,
        }
    }
}

/// One excitation sample plus the amplitude-vibrato factor that also shapes
/// the final mix.
#[derive(Debug, Clone, Copy)]
pub struct ExcitationSample {
    pub signal: f32,
    pub amp_modulation: f32,
}

/// Excitation generator state: oscillator phases and the pending pluck latch.
#[derive(Debug, Default, Clone)]
pub struct Excitation {
    saw_phase: f32,
    vibrato_phase: f32,
    pluck_pending: bool,
}

impl Excitation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latch a pluck: the next rendered sample becomes a single impulse of
    /// the current bow force.
    pub fn trigger_pluck(&mut self) {
        self.pluck_pending = true;
    }

    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub fn render(
        &mut self,
        fundamental: f32,
        envelope: f32,
        bow_force: f32,
        vibrato_rate: f32,
        vibrato_depth: f32,
        dynamics: &BowDynamics,
        inv_sample_rate: f32,
    ) -> ExcitationSample {
        self.vibrato_phase += vibrato_rate * inv_sample_rate;
        if self.vibrato_phase >= 1.0 {
            self.vibrato_phase -= 1.0;
        }
        let vibrato = (TAU * self.vibrato_phase).sin();
        let pitch_modulation = 1.0 + vibrato * vibrato_depth * VIBRATO_PITCH_DEPTH;
        let amp_modulation = 1.0 + vibrato * vibrato_depth * VIBRATO_AMP_DEPTH;

        if self.pluck_pending {
            self.pluck_pending = false;
            return ExcitationSample {
                signal: bow_force,
                amp_modulation,
            };
        }

        if envelope <= ENVELOPE_GATE {
            return ExcitationSample {
                signal: 0.0,
                amp_modulation,
            };
        }

        self.saw_phase += fundamental * pitch_modulation * inv_sample_rate;
        if self.saw_phase >= 1.0 {
            self.saw_phase -= 1.0;
        }
        let mut tone = 2.0 * self.saw_phase - 1.0;

        if dynamics.speed_harmonics > HARMONIC_SPEED_THRESHOLD {
            let harm_2 = 2.0 * (self.saw_phase * 2.0).fract() - 1.0;
            let harm_3 = 2.0 * (self.saw_phase * 3.0).fract() - 1.0;
            tone += harm_2 * HARMONIC_2_GAIN * dynamics.speed_harmonics;
            tone += harm_3 * HARMONIC_3_GAIN * dynamics.speed_harmonics;
        }

        let friction = (random::get_float() - 0.5) * FRICTION_LEVEL;
        let tone_signal = crossfade(friction, tone, TONE_FRICTION_MIX);
        let noise = 2.0 * random::get_float() - 1.0;
        let mixed = crossfade(noise, tone_signal, dynamics.tone_noise_mix);

        ExcitationSample {
            signal: mixed * bow_force * envelope * amp_modulation,
            amp_modulation,
        }
    }
}
