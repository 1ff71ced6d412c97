#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod biquad;
pub mod body;
pub mod control;
pub mod engine;
pub mod excitation;
pub mod mode_bank;
pub mod params;
pub mod tone_filter;
pub mod utils;

use core::fmt;

/// Errors reported before the engine accepts its first block.
///
/// The real-time path itself is infallible: out-of-range or non-finite
/// parameter values are clamped or ignored, never propagated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// The sample rate passed at construction was zero, negative or not finite.
    InvalidSampleRate(f32),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSampleRate(rate) => write!(f, "invalid sample rate: {rate} Hz"),
        }
    }
}

impl core::error::Error for EngineError {}

/// Sample rate context for DSP calculations.
#[derive(Debug, Clone, Copy)]
pub struct SampleRate {
    /// Sample rate in Hz
    pub sample_rate_hz: f32,
    /// Reciprocal of sample rate (1.0 / sample_rate_hz) for fast multiplication
    pub inv_sr: f32,
    /// Nyquist frequency (sample_rate_hz / 2) in Hz
    pub nyquist: f32,
}

impl SampleRate {
    /// Create a new sample rate context, failing fast on a non-physical rate.
    pub fn new(sample_rate_hz: f32) -> Result<Self, EngineError> {
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(EngineError::InvalidSampleRate(sample_rate_hz));
        }
        Ok(Self {
            sample_rate_hz,
            inv_sr: 1.0 / sample_rate_hz,
            nyquist: 0.5 * sample_rate_hz,
        })
    }
}
