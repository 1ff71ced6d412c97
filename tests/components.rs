//! Tests for the individual DSP components.

use modal_string_dsp::biquad::{Biquad, Coefficients};
use modal_string_dsp::body::BodyBank;
use modal_string_dsp::excitation::BowEnvelope;
use modal_string_dsp::mode_bank::{ModeBank, NUM_STRING_MODES};
use modal_string_dsp::params::{
    BodyType, DirtyFlags, EngineParameters, ParameterCache, StringMaterial,
};
use modal_string_dsp::tone_filter::ToneFilter;
use modal_string_dsp::utils::random;

const SAMPLE_RATE: f32 = 48000.0;

const MATERIALS: [StringMaterial; 4] = [
    StringMaterial::Steel,
    StringMaterial::Gut,
    StringMaterial::Nylon,
    StringMaterial::Wound,
];

const BODIES: [BodyType; 5] = [
    BodyType::Violin,
    BodyType::Viola,
    BodyType::Cello,
    BodyType::Guitar,
    BodyType::None,
];

#[test]
fn string_mode_poles_are_stable() {
    let mut bank = ModeBank::new(SAMPLE_RATE);

    for material in MATERIALS {
        for damping in [0.01, 0.25, 0.5, 0.75, 0.99] {
            for fundamental in [20.0, 55.0, 220.0, 880.0, 2000.0] {
                bank.compute_coefficients(fundamental, damping, material);

                for i in 0..NUM_STRING_MODES {
                    let c = bank.mode_coefficients(i);
                    if c == Coefficients::SILENCE {
                        continue;
                    }
                    assert!(
                        c.is_stable(),
                        "unstable mode {i}: {material:?} damping={damping} f0={fundamental}"
                    );
                }
            }
        }
    }
}

#[test]
fn body_mode_poles_are_stable() {
    let mut bank = BodyBank::new(SAMPLE_RATE);

    for body in BODIES {
        bank.set_body_type(body);

        for i in 0..modal_string_dsp::body::NUM_BODY_MODES {
            let c = bank.mode_coefficients(i);
            if c == Coefficients::SILENCE {
                continue;
            }
            assert!(c.is_stable(), "unstable body mode {i} of {body:?}");
        }
    }
}

#[test]
fn out_of_range_modes_are_disabled() {
    let mut bank = ModeBank::new(SAMPLE_RATE);
    bank.compute_coefficients(2000.0, 0.5, StringMaterial::Steel);
    bank.compute_harmonic_gains(0.12);

    // With a 2 kHz fundamental, partial 12 and above land past Nyquist.
    for i in 11..NUM_STRING_MODES {
        assert_eq!(bank.mode_coefficients(i), Coefficients::SILENCE);
    }
    for i in 0..11 {
        assert_ne!(bank.mode_coefficients(i), Coefficients::SILENCE);
    }

    // A silenced section lets nothing through, whatever the input.
    let mut filter = Biquad::new();
    filter.set(Coefficients::SILENCE);
    random::seed(7);
    for _ in 0..1000 {
        assert_eq!(filter.process(2.0 * random::get_float() - 1.0), 0.0);
    }
}

#[test]
fn bow_position_suppresses_nodal_harmonics() {
    let mut bank = ModeBank::new(SAMPLE_RATE);
    bank.compute_coefficients(220.0, 0.5, StringMaterial::Steel);
    bank.compute_harmonic_gains(0.5);

    // Bowing at the middle of the string kills every even partial.
    for i in (1..NUM_STRING_MODES).step_by(2) {
        assert!(bank.harmonic_gain(i).abs() < 1e-5, "partial {} not suppressed", i + 1);
    }
    assert!(bank.harmonic_gain(0) > 0.9);
}

#[test]
fn parameter_cache_diff_is_idempotent() {
    let mut cache = ParameterCache::new(EngineParameters::default());

    let mut p = EngineParameters::default();
    p.fundamental_frequency = 440.0;
    p.brightness = 0.8;
    p.body_type = BodyType::Cello;

    let first = cache.diff(&p);
    assert!(first.string_modes && first.tone_filter && first.body_bank);

    let second = cache.diff(&p);
    assert_eq!(second, DirtyFlags::default());

    // Sub-tolerance wiggle is not a change.
    p.fundamental_frequency += 1e-8;
    assert_eq!(cache.diff(&p), DirtyFlags::default());
}

#[test]
fn mode_recompute_is_bit_identical_and_preserves_memory() {
    let mut bank = ModeBank::new(SAMPLE_RATE);
    bank.compute_coefficients(220.0, 0.5, StringMaterial::Gut);
    bank.compute_harmonic_gains(0.12);

    // Put some energy into the filter memories.
    bank.process(1.0);
    for _ in 0..100 {
        bank.process(0.0);
    }

    let reference = bank.clone();
    bank.compute_coefficients(220.0, 0.5, StringMaterial::Gut);
    bank.compute_harmonic_gains(0.12);

    for i in 0..NUM_STRING_MODES {
        assert_eq!(bank.mode_coefficients(i), reference.mode_coefficients(i));
    }

    // Identical ring-out proves the memories were untouched.
    let mut reference = reference;
    for _ in 0..50 {
        assert_eq!(bank.process(0.0), reference.process(0.0));
    }
}

#[test]
fn envelope_is_monotonic_and_reaches_target() {
    let mut envelope = BowEnvelope::new();
    envelope.set_target(true);

    let mut previous = 0.0;
    for _ in 0..200 {
        let value = envelope.next();
        assert!(value >= previous && value <= 1.0);
        previous = value;
    }
    assert_eq!(envelope.value(), 1.0);

    envelope.set_target(false);
    for _ in 0..200 {
        let value = envelope.next();
        assert!(value <= previous && value >= 0.0);
        previous = value;
    }
    assert_eq!(envelope.value(), 0.0);
}

#[test]
fn body_none_preset_is_identity() {
    let mut bank = BodyBank::new(SAMPLE_RATE);
    bank.set_body_type(BodyType::None);

    random::seed(11);
    for _ in 0..1000 {
        let x = 2.0 * random::get_float() - 1.0;
        assert_eq!(bank.process(x), x);
    }
}

#[test]
fn tone_filter_cutoff_follows_brightness() {
    let mut dark = ToneFilter::new(SAMPLE_RATE);
    let mut bright = ToneFilter::new(SAMPLE_RATE);
    dark.set_brightness(0.1);
    bright.set_brightness(0.9);

    assert!(dark.coefficients().is_stable());
    assert!(bright.coefficients().is_stable());
    // A higher cutoff means more feedforward gain in the low-pass design.
    assert!(bright.coefficients().b0 > dark.coefficients().b0);
}

#[test]
fn non_finite_parameters_fall_back_to_cached_values() {
    let cached = EngineParameters::default();

    let mut p = EngineParameters::default();
    p.fundamental_frequency = f32::NAN;
    p.brightness = f32::INFINITY;
    p.bow_force = 7.0;

    let sane = p.sanitized(&cached);
    assert_eq!(sane.fundamental_frequency, cached.fundamental_frequency);
    assert_eq!(sane.brightness, cached.brightness);
    assert_eq!(sane.bow_force, 1.0);
}
