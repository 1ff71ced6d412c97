//! Dynamic tone filter: a single low-pass shaping overall brightness.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::biquad::{Biquad, Coefficients};

const MIN_CUTOFF_HZ: f32 = 200.0;
const MAX_CUTOFF_HZ: f32 = 12000.0;
/// The cutoff ceiling also stays below Nyquist at low sample rates.
const MAX_CUTOFF_RATIO: f32 = 0.45;

const TONE_Q: f32 = 0.8;

/// Transient brightness shift applied per block while bowing.
const DYNAMIC_BRIGHTNESS_GAIN: f32 = 0.3;
/// The coefficients are only re-designed when the effective brightness has
/// moved by more than this since the last dynamic update, keeping the trig
/// out of the steady-state path.
const DYNAMIC_RECOMPUTE_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct ToneFilter {
    sample_rate: f32,
    filter: Biquad,
    last_dynamic_brightness: f32,
}

impl ToneFilter {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            filter: Biquad::new(),
            last_dynamic_brightness: 0.5,
        }
    }

    /// Clear the filter memory. Called on bow-on/pluck only.
    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// Recompute from the base brightness parameter.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.last_dynamic_brightness = brightness;
        self.design(brightness);
    }

    /// Shift the cutoff with the bow's transient brightness. Called at most
    /// once per block, and only while the bow is audible.
    pub fn apply_dynamics(&mut self, brightness: f32, force_brightness: f32) {
        let dynamic = (brightness * (1.0 + force_brightness * DYNAMIC_BRIGHTNESS_GAIN)).min(1.0);

        if (dynamic - self.last_dynamic_brightness).abs() > DYNAMIC_RECOMPUTE_THRESHOLD {
            self.last_dynamic_brightness = dynamic;
            self.design(dynamic);
        }
    }

    fn design(&mut self, brightness: f32) {
        let max_cutoff = MAX_CUTOFF_HZ.min(self.sample_rate * MAX_CUTOFF_RATIO);
        let cutoff = MIN_CUTOFF_HZ * (max_cutoff / MIN_CUTOFF_HZ).powf(brightness.clamp(0.0, 1.0));

        self.filter
            .set(Coefficients::low_pass(cutoff, TONE_Q, self.sample_rate));
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        self.filter.process(in_)
    }

    pub fn coefficients(&self) -> Coefficients {
        self.filter.coefficients()
    }
}
