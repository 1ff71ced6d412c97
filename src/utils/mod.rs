//! Small DSP helpers shared across the crate.

pub mod random;

#[allow(unused_imports)]
use num_traits::float::Float;

/// One-pole smoothing toward `in_` (exponential approach).
#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

/// Linear ramp toward `in_`, moving at most `delta` per call.
#[inline]
pub fn slew(out: &mut f32, in_: f32, delta: f32) {
    let error = (in_ - *out).clamp(-delta, delta);
    *out += error;
}

/// Linear blend: `a` at `fade == 0`, `b` at `fade == 1`.
#[inline]
pub fn crossfade(a: f32, b: f32, fade: f32) -> f32 {
    a + (b - a) * fade
}
