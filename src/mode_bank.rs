//! String resonator bank: one band-pass biquad per harmonic mode.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::biquad::{Biquad, Coefficients};
use crate::params::StringMaterial;

/// Number of modeled string partials.
pub const NUM_STRING_MODES: usize = 32;

/// Normalization applied to the summed mode output, bounding the total
/// energy when modes add constructively at the fundamental.
pub const OUTPUT_SCALING: f32 = 0.3;

/// Reference Q before material and mode-number falloff.
const BASE_Q: f32 = 200.0;

/// Q is never allowed below this, keeping the poles inside the unit circle.
const MIN_MODE_Q: f32 = 0.1;

/// How strongly the damping parameter shortens the decay.
const DAMPING_Q_LOSS: f32 = 0.8;

/// Per-mode amplitude falloff base; perceptual tuning, not string physics.
const AMPLITUDE_FALLOFF: f32 = 0.95;

/// Bank of independent second-order resonators approximating a vibrating
/// string. All modes are driven by the same excitation sample in parallel;
/// their weighted sum is the string output.
#[derive(Debug, Clone)]
pub struct ModeBank {
    sample_rate: f32,
    filters: [Biquad; NUM_STRING_MODES],
    harmonic_gain: [f32; NUM_STRING_MODES],
}

impl ModeBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            filters: [Biquad::new(); NUM_STRING_MODES],
            harmonic_gain: [0.0; NUM_STRING_MODES],
        }
    }

    /// Clear all filter memories. Called on bow-on/pluck only.
    pub fn reset(&mut self) {
        for filter in self.filters.iter_mut() {
            filter.reset();
        }
    }

    /// Redesign every mode filter. Does not touch filter memories.
    ///
    /// A mode whose target frequency falls outside (0, Nyquist) is disabled
    /// outright: its response is forced to zero instead of feeding aliased
    /// or non-finite coefficients into the loop.
    pub fn compute_coefficients(
        &mut self,
        fundamental: f32,
        damping: f32,
        material: StringMaterial,
    ) {
        let props = material.properties();
        let nyquist = 0.5 * self.sample_rate;

        for (i, filter) in self.filters.iter_mut().enumerate() {
            let n = (i + 1) as f32;
            let frequency = fundamental * n * (1.0 + props.inharmonicity * n * n).sqrt();

            if frequency > 0.0 && frequency < nyquist {
                let base_q = BASE_Q / props.damping_factor;
                let q = (base_q / n.sqrt() * (1.0 - damping * DAMPING_Q_LOSS)).max(MIN_MODE_Q);
                let amplitude = props.brightness_scale * AMPLITUDE_FALLOFF.powf(n - 1.0) / n;

                filter.set(Coefficients::band_pass(
                    frequency,
                    q,
                    amplitude,
                    self.sample_rate,
                ));
            } else {
                filter.set(Coefficients::SILENCE);
            }
        }
    }

    /// Nodal suppression from the bowing point: partials with a node at the
    /// bow position are attenuated. Depends on the bow position only.
    pub fn compute_harmonic_gains(&mut self, bow_position: f32) {
        for (i, gain) in self.harmonic_gain.iter_mut().enumerate() {
            let n = (i + 1) as f32;
            *gain = (core::f32::consts::PI * n * bow_position).sin().abs();
        }
    }

    /// Drive every mode with one excitation sample and return the weighted,
    /// normalized sum.
    #[inline]
    pub fn process(&mut self, excitation: f32) -> f32 {
        let mut sum = 0.0;

        for (filter, gain) in self.filters.iter_mut().zip(self.harmonic_gain.iter()) {
            sum += filter.process(excitation) * gain;
        }

        sum * OUTPUT_SCALING
    }

    /// Active coefficients of one mode, mainly for inspection in tests.
    pub fn mode_coefficients(&self, index: usize) -> Coefficients {
        self.filters[index].coefficients()
    }

    pub fn harmonic_gain(&self, index: usize) -> f32 {
        self.harmonic_gain[index]
    }
}
