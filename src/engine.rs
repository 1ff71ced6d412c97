//! Bowed string engine: parameter consumption, selective coefficient
//! recomputation and block rendering.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::body::BodyBank;
use crate::control::Events;
use crate::excitation::{BowDynamics, BowEnvelope, Excitation};
use crate::mode_bank::ModeBank;
use crate::params::{EngineParameters, ParameterCache};
use crate::tone_filter::ToneFilter;
use crate::utils::{crossfade, one_pole, slew};
use crate::{EngineError, SampleRate};

/// Ramp time for control-rate parameters consumed at block boundaries.
const CONTROL_SLEW_SECONDS: f32 = 0.02;

/// Share of the amplitude vibrato re-applied to the final dry/wet mix.
const OUTPUT_AMP_VIBRATO: f32 = 0.3;

/// Bow engagement, derived from the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BowState {
    Silent,
    Sustaining,
    Releasing,
}

/// The complete mutable state of one string voice. Owns every filter
/// memory, phase and cache; rendering a block allocates nothing and takes
/// no locks.
#[derive(Debug)]
pub struct BowedStringEngine {
    sample_rate: SampleRate,
    cache: ParameterCache,
    /// Consumption-time ramped parameter values, trailing the raw input.
    smoothed: EngineParameters,
    envelope: BowEnvelope,
    excitation: Excitation,
    modes: ModeBank,
    tone_filter: ToneFilter,
    body: BodyBank,
}

impl BowedStringEngine {
    /// Build an engine for the given sample rate, with all coefficients
    /// designed for the default parameters. Fails fast on a non-physical
    /// sample rate; nothing after construction can fail.
    pub fn new(sample_rate_hz: f32) -> Result<Self, EngineError> {
        let sample_rate = SampleRate::new(sample_rate_hz)?;
        let parameters = EngineParameters::default();

        let mut engine = Self {
            sample_rate,
            cache: ParameterCache::new(parameters.clone()),
            smoothed: parameters,
            envelope: BowEnvelope::new(),
            excitation: Excitation::new(),
            modes: ModeBank::new(sample_rate_hz),
            tone_filter: ToneFilter::new(sample_rate_hz),
            body: BodyBank::new(sample_rate_hz),
        };
        engine.recompute_all();

        Ok(engine)
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate.sample_rate_hz
    }

    pub fn bow_state(&self) -> BowState {
        if self.envelope.is_engaged() {
            BowState::Sustaining
        } else if self.envelope.is_audible() {
            BowState::Releasing
        } else {
            BowState::Silent
        }
    }

    /// Engage the bow. Resonator memories are cleared for a click-free
    /// attack; the envelope then ramps the excitation in.
    pub fn bow_on(&mut self) {
        self.reset_resonators();
        self.envelope.set_target(true);
    }

    /// Release the bow. No reset: the envelope decay alone silences the
    /// excitation while the string rings out.
    pub fn bow_off(&mut self) {
        self.envelope.set_target(false);
    }

    /// Pluck the string: reset resonator memories, then inject a single
    /// impulse of the current bow force on the next rendered sample.
    pub fn pluck(&mut self) {
        self.reset_resonators();
        self.excitation.trigger_pluck();
    }

    /// Apply events drained from a [`crate::control::ControlPort`] at a
    /// block boundary.
    pub fn apply_events(&mut self, events: Events) {
        if events.pluck {
            self.pluck();
        }
        if events.bow_on {
            self.bow_on();
        }
        if events.bow_off {
            self.bow_off();
        }
    }

    fn reset_resonators(&mut self) {
        self.modes.reset();
        self.tone_filter.reset();
        self.body.reset();
    }

    fn recompute_all(&mut self) {
        let p = self.cache.values().clone();
        self.modes
            .compute_coefficients(p.fundamental_frequency, p.string_damping, p.string_material);
        self.modes.compute_harmonic_gains(p.bow_position);
        self.tone_filter.set_brightness(p.brightness);
        self.body.set_body_type(p.body_type);
    }

    /// Move the consumed parameter values toward the target: ~20 ms linear
    /// ramps for control-rate scalars, an exponential glide for the
    /// audio-rate fundamental, discrete switching for the enums.
    fn smooth_toward(&mut self, target: &EngineParameters, block_len: usize) {
        let block_seconds = block_len as f32 * self.sample_rate.inv_sr;
        let step = block_seconds / CONTROL_SLEW_SECONDS;
        let glide = step.min(1.0);

        let s = &mut self.smoothed;
        one_pole(&mut s.fundamental_frequency, target.fundamental_frequency, glide);
        slew(&mut s.string_damping, target.string_damping, step);
        slew(&mut s.bow_force, target.bow_force, step);
        slew(&mut s.bow_position, target.bow_position, step * 0.48);
        slew(&mut s.bow_speed, target.bow_speed, step);
        slew(&mut s.brightness, target.brightness, step);
        slew(&mut s.vibrato_rate, target.vibrato_rate, step * 10.0);
        slew(&mut s.vibrato_depth, target.vibrato_depth, step);
        slew(&mut s.body_resonance_mix, target.body_resonance_mix, step);
        s.string_material = target.string_material;
        s.body_type = target.body_type;
    }

    /// Render one block of mono samples.
    ///
    /// Parameters are sampled once per call; only the coefficient groups
    /// whose inputs actually changed (beyond tolerance) are redesigned.
    pub fn render(&mut self, parameters: &EngineParameters, out: &mut [f32]) {
        let target = parameters.sanitized(self.cache.values());
        self.smooth_toward(&target, out.len());

        let dirty = self.cache.diff(&self.smoothed);
        let p = self.cache.values().clone();

        if dirty.string_modes {
            self.modes.compute_coefficients(
                p.fundamental_frequency,
                p.string_damping,
                p.string_material,
            );
            self.modes.compute_harmonic_gains(p.bow_position);
        }
        if dirty.tone_filter {
            self.tone_filter.set_brightness(p.brightness);
        }
        if dirty.body_bank {
            self.body.set_body_type(p.body_type);
        }

        let dynamics = BowDynamics::new(p.bow_force, p.bow_speed);
        if self.envelope.is_audible() {
            self.tone_filter
                .apply_dynamics(p.brightness, dynamics.force_brightness);
        }

        for sample in out.iter_mut() {
            let envelope = self.envelope.next();
            let excitation = self.excitation.render(
                p.fundamental_frequency,
                envelope,
                p.bow_force,
                p.vibrato_rate,
                p.vibrato_depth,
                &dynamics,
                self.sample_rate.inv_sr,
            );

            let string = self.modes.process(excitation.signal);
            let dry = self.tone_filter.process(string);
            let wet = self.body.process(dry);
            let mixed = crossfade(dry, wet, p.body_resonance_mix);

            *sample = mixed * (1.0 + (excitation.amp_modulation - 1.0) * OUTPUT_AMP_VIBRATO);
        }
    }

    /// Current bow envelope value, mainly for inspection in tests.
    pub fn envelope_value(&self) -> f32 {
        self.envelope.value()
    }
}
