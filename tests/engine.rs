//! End-to-end tests for the bowed string engine.

use modal_string_dsp::control::controls;
use modal_string_dsp::engine::{BowState, BowedStringEngine};
use modal_string_dsp::params::{BodyType, EngineParameters, StringMaterial};
use modal_string_dsp::utils::random;


const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZE: usize = 128;

fn rms(samples: &[f32]) -> f32 {
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn render_blocks(
    engine: &mut BowedStringEngine,
    parameters: &EngineParameters,
    blocks: usize,
    out: &mut Vec<f32>,
) {
    let mut block = [0.0; BLOCK_SIZE];
    for _ in 0..blocks {
        engine.render(parameters, &mut block);
        out.extend_from_slice(&block);
    }
}

#[test]
fn invalid_sample_rate_fails_fast() {
    assert!(BowedStringEngine::new(0.0).is_err());
    assert!(BowedStringEngine::new(-48000.0).is_err());
    assert!(BowedStringEngine::new(f32::NAN).is_err());
    assert!(BowedStringEngine::new(SAMPLE_RATE).is_ok());
}

#[test]
fn silent_engine_outputs_exact_zeros() {
    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();
    let parameters = EngineParameters::default();

    let mut out = Vec::new();
    render_blocks(&mut engine, &parameters, 100, &mut out);

    assert!(out.iter().all(|&s| s == 0.0));
    assert_eq!(engine.bow_state(), BowState::Silent);
}

#[test]
fn bowed_sustain_produces_audible_bounded_output() {
    random::seed(0xbeef);
    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();
    let parameters = EngineParameters::default();

    engine.bow_on();
    let mut out = Vec::new();
    render_blocks(&mut engine, &parameters, 375, &mut out);

    // Skip the attack, judge the steady state.
    let steady = &out[out.len() / 2..];
    assert!(rms(steady) > 0.01, "steady rms = {}", rms(steady));
    assert!(steady.iter().all(|s| s.abs() <= 1.0));
    assert_eq!(engine.bow_state(), BowState::Sustaining);
}

#[test]
fn bow_release_ramps_out_and_settles_silent() {
    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();

    // Zero bow force keeps the excitation exactly silent, so only the
    // envelope timing is under test here.
    let mut parameters = EngineParameters::default();
    parameters.bow_force = 0.0;

    let mut out = Vec::new();
    render_blocks(&mut engine, &parameters, 50, &mut out);

    engine.bow_on();
    out.clear();
    render_blocks(&mut engine, &parameters, 10, &mut out);
    assert_eq!(engine.envelope_value(), 1.0);
    assert_eq!(engine.bow_state(), BowState::Sustaining);

    engine.bow_off();
    assert_eq!(engine.bow_state(), BowState::Releasing);

    // The ramp covers 1/0.005 = 200 samples, i.e. under two blocks.
    out.clear();
    render_blocks(&mut engine, &parameters, 2, &mut out);
    assert_eq!(engine.envelope_value(), 0.0);
    assert_eq!(engine.bow_state(), BowState::Silent);
    assert!(out.iter().all(|&s| s == 0.0));
}

#[test]
fn body_none_collapses_to_dry_signal() {
    let mut wet_params = EngineParameters::default();
    wet_params.body_type = BodyType::None;
    wet_params.body_resonance_mix = 1.0;

    let mut dry_params = EngineParameters::default();
    dry_params.body_resonance_mix = 0.0;

    let mut render_run = |parameters: &EngineParameters| -> Vec<f32> {
        let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();
        let mut out = Vec::new();
        // Let the mix ramp settle before any sound happens.
        render_blocks(&mut engine, parameters, 50, &mut out);
        out.clear();

        random::seed(0x5eed);
        engine.bow_on();
        render_blocks(&mut engine, parameters, 100, &mut out);
        out
    };

    let wet = render_run(&wet_params);
    let dry = render_run(&dry_params);

    let worst = wet
        .iter()
        .zip(&dry)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(worst < 1e-6, "worst deviation = {worst}");
    assert!(rms(&dry) > 0.0);
}

#[test]
fn pluck_rings_and_decays() {
    random::seed(0x9142);
    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();
    let mut parameters = EngineParameters::default();
    parameters.string_material = StringMaterial::Gut;

    engine.pluck();
    let mut out = Vec::new();
    render_blocks(&mut engine, &parameters, 375, &mut out);

    let attack = rms(&out[..4096]);
    let tail = rms(&out[out.len() - 4096..]);
    assert!(attack > 0.0);
    assert!(tail < attack, "attack = {attack}, tail = {tail}");
    assert_eq!(engine.bow_state(), BowState::Silent);
}

#[test]
fn control_port_round_trip() {
    let (handle, port) = controls();

    handle.set_fundamental_frequency(440.0);
    handle.set_string_damping(0.3);
    handle.set_bow_force(0.7);
    handle.set_string_material(StringMaterial::Nylon);
    handle.set_body_type(BodyType::Guitar);
    handle.bow_on();
    handle.pluck();

    let snapshot = port.snapshot();
    assert_eq!(snapshot.fundamental_frequency, 440.0);
    assert_eq!(snapshot.string_damping, 0.3);
    assert_eq!(snapshot.bow_force, 0.7);
    assert_eq!(snapshot.string_material, StringMaterial::Nylon);
    assert_eq!(snapshot.body_type, BodyType::Guitar);

    let events = port.take_events();
    assert!(events.bow_on && events.pluck && !events.bow_off);

    // Draining is destructive.
    let events = port.take_events();
    assert!(!events.bow_on && !events.pluck && !events.bow_off);

    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();
    engine.apply_events(port.take_events());
    assert_eq!(engine.bow_state(), BowState::Silent);
}

#[test]
fn render_bowed_phrase() {
    random::seed(0xf0cacc1a);
    let mut engine = BowedStringEngine::new(SAMPLE_RATE).unwrap();

    let mut parameters = EngineParameters::default();
    parameters.fundamental_frequency = 196.0;
    parameters.vibrato_depth = 0.4;
    parameters.body_type = BodyType::Cello;
    parameters.body_resonance_mix = 0.5;

    let mut out = Vec::new();
    engine.bow_on();
    render_blocks(&mut engine, &parameters, 375, &mut out);
    engine.bow_off();
    render_blocks(&mut engine, &parameters, 190, &mut out);

    assert!(rms(&out) > 0.0);
    wav_writer::write("bowed_phrase.wav", SAMPLE_RATE as u32, &out).ok();
}
