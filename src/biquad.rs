//! Second-order IIR section (biquad) shared by the mode bank, the tone
//! filter and the body resonators.
//!
//! Coefficients come from the RBJ cookbook designs and are always normalized
//! by a0, so the difference equation never divides.

#[allow(unused_imports)]
use num_traits::float::Float;

const TAU: f32 = 2.0 * core::f32::consts::PI;

/// Normalized biquad coefficients.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Coefficients {
    /// All-zero response. A filter carrying these coefficients never lets
    /// any input through; its memories drain to zero within two samples.
    pub const SILENCE: Self = Self {
        b0: 0.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Constant-skirt band-pass, peak gain scaled by `gain`.
    ///
    /// `q` must have been clamped to a positive value by the caller and
    /// `f` must lie strictly between 0 and Nyquist.
    pub fn band_pass(f: f32, q: f32, gain: f32, sample_rate: f32) -> Self {
        let omega = TAU * f / sample_rate;
        let alpha = omega.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: alpha * gain / a0,
            b1: 0.0,
            b2: -alpha * gain / a0,
            a1: -2.0 * omega.cos() / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Standard low-pass with resonance `q`.
    pub fn low_pass(f: f32, q: f32, sample_rate: f32) -> Self {
        let omega = TAU * f / sample_rate;
        let (s, c) = (omega.sin(), omega.cos());
        let alpha = s / (2.0 * q);
        let a0 = 1.0 + alpha;

        Self {
            b0: (1.0 - c) * 0.5 / a0,
            b1: (1.0 - c) / a0,
            b2: (1.0 - c) * 0.5 / a0,
            a1: -2.0 * c / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    /// Both poles strictly inside the unit circle (stability triangle).
    pub fn is_stable(&self) -> bool {
        self.a2 < 1.0 && self.a1.abs() < 1.0 + self.a2
    }
}

/// Biquad with transposed direct form II memories.
#[derive(Debug, Default, Clone, Copy)]
pub struct Biquad {
    coefficients: Coefficients,
    z1: f32,
    z2: f32,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in new coefficients. Filter memories are deliberately kept:
    /// they are cleared only on bow-on/pluck, not on parameter changes.
    #[inline]
    pub fn set(&mut self, coefficients: Coefficients) {
        self.coefficients = coefficients;
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }

    #[inline]
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    #[inline]
    pub fn process(&mut self, in_: f32) -> f32 {
        let c = &self.coefficients;
        let out = c.b0 * in_ + self.z1;
        self.z1 = c.b1 * in_ - c.a1 * out + self.z2;
        self.z2 = c.b2 * in_ - c.a2 * out;

        out
    }
}
