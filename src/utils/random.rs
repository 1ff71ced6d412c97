//! Fast pseudo random generator for the bow friction noise.
//!
//! A 32-bit linear congruential generator behind an atomic, so it is usable
//! from the audio context without locks. Quality is irrelevant here; only
//! speed and allocation-freedom matter.

use core::sync::atomic::{AtomicU32, Ordering};

static RNG_STATE: AtomicU32 = AtomicU32::new(0x21);

/// Reseed the generator. Handy for reproducible renders in tests.
#[inline]
pub fn seed(seed: u32) {
    RNG_STATE.store(seed, Ordering::Relaxed);
}

#[inline]
pub fn get_word() -> u32 {
    let next = RNG_STATE
        .load(Ordering::Relaxed)
        .wrapping_mul(1664525)
        .wrapping_add(1013904223);
    RNG_STATE.store(next, Ordering::Relaxed);

    next
}

/// Uniform sample in [0, 1).
#[inline]
pub fn get_float() -> f32 {
    get_word() as f32 / 4294967296.0
}
