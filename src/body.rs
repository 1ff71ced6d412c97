//! Instrument body resonance: a small fixed bank of formant band-pass
//! filters selected from a preset table.

use crate::biquad::{Biquad, Coefficients};
use crate::params::BodyType;

/// Formants per body preset.
pub const NUM_BODY_MODES: usize = 5;

/// One formant of an instrument body.
#[derive(Debug, Clone, Copy)]
pub struct BodyMode {
    pub frequency: f32,
    pub q: f32,
    pub gain: f32,
}

const fn mode(frequency: f32, q: f32, gain: f32) -> BodyMode {
    BodyMode { frequency, q, gain }
}

// Measured nowhere: coarse perceptual sketches of each instrument's main
// air and wood resonances.
const VIOLIN: [BodyMode; NUM_BODY_MODES] = [
    mode(280.0, 12.0, 1.0),
    mode(460.0, 15.0, 0.8),
    mode(580.0, 10.0, 0.7),
    mode(700.0, 8.0, 0.5),
    mode(840.0, 8.0, 0.3),
];

const VIOLA: [BodyMode; NUM_BODY_MODES] = [
    mode(220.0, 10.0, 1.0),
    mode(380.0, 12.0, 0.85),
    mode(500.0, 9.0, 0.7),
    mode(650.0, 7.0, 0.5),
    mode(780.0, 7.0, 0.3),
];

const CELLO: [BodyMode; NUM_BODY_MODES] = [
    mode(100.0, 8.0, 1.0),
    mode(200.0, 10.0, 0.9),
    mode(300.0, 8.0, 0.8),
    mode(400.0, 6.0, 0.6),
    mode(500.0, 6.0, 0.4),
];

const GUITAR: [BodyMode; NUM_BODY_MODES] = [
    mode(100.0, 15.0, 1.0),
    mode(200.0, 12.0, 0.7),
    mode(400.0, 10.0, 0.8),
    mode(500.0, 8.0, 0.5),
    mode(600.0, 8.0, 0.4),
];

const NONE: [BodyMode; NUM_BODY_MODES] = [
    mode(100.0, 1.0, 0.0),
    mode(200.0, 1.0, 0.0),
    mode(300.0, 1.0, 0.0),
    mode(400.0, 1.0, 0.0),
    mode(500.0, 1.0, 0.0),
];

impl BodyType {
    pub fn preset(self) -> &'static [BodyMode; NUM_BODY_MODES] {
        match self {
            Self::Violin => &VIOLIN,
            Self::Viola => &VIOLA,
            Self::Cello => &CELLO,
            Self::Guitar => &GUITAR,
            Self::None => &NONE,
        }
    }
}

/// Fixed bank of body formant filters, fed from the tone filter output.
///
/// A mode with non-positive gain or a non-physical frequency is disabled.
/// When a preset enables no modes at all (the "None" preset) the bank is an
/// identity: the dry signal passes through, so the output mixer degenerates
/// to the dry path regardless of the wet amount.
#[derive(Debug, Clone)]
pub struct BodyBank {
    sample_rate: f32,
    filters: [Biquad; NUM_BODY_MODES],
    active_modes: usize,
}

impl BodyBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            filters: [Biquad::new(); NUM_BODY_MODES],
            active_modes: 0,
        }
    }

    /// Clear all filter memories. Called on bow-on/pluck only.
    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    /// Load a preset. This is the only operation that recomputes body
    /// coefficients; nothing else affects them.
    pub fn set_body_type(&mut self, body_type: BodyType) {
        let preset = body_type.preset();
        let nyquist = 0.5 * self.sample_rate;
        self.active_modes = 0;

        for (filter, mode) in self.filters.iter_mut().zip(preset.iter()) {
            let enabled =
                mode.frequency > 0.0 && mode.frequency < nyquist && mode.q > 0.0 && mode.gain > 0.0;

            if enabled {
                filter.set(Coefficients::band_pass(
                    mode.frequency,
                    mode.q,
                    mode.gain,
                    self.sample_rate,
                ));
                self.active_modes += 1;
            } else {
                filter.set(Coefficients::SILENCE);
            }
        }
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        if self.active_modes == 0 {
            return in_;
        }

        let mut sum = 0.0;
        for filter in self.filters.iter_mut() {
            sum += filter.process(in_);
        }

        sum
    }

    pub fn mode_coefficients(&self, index: usize) -> Coefficients {
        self.filters[index].coefficients()
    }
}
