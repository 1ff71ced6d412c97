//! Renders a short bowed-then-plucked phrase offline into `out/phrase.wav`.

use std::error::Error;

use simple_logger::SimpleLogger;

use modal_string_dsp::engine::BowedStringEngine;
use modal_string_dsp::params::{BodyType, EngineParameters};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 128;

fn render_seconds(
    engine: &mut BowedStringEngine,
    parameters: &EngineParameters,
    seconds: f32,
    out: &mut Vec<f32>,
) {
    let blocks = (seconds * SAMPLE_RATE as f32 / BLOCK_SIZE as f32) as usize;
    let mut block = [0.0; BLOCK_SIZE];
    for _ in 0..blocks {
        engine.render(parameters, &mut block);
        out.extend_from_slice(&block);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let mut engine = BowedStringEngine::new(SAMPLE_RATE as f32)?;
    let mut parameters = EngineParameters::default();
    parameters.fundamental_frequency = 196.0;
    parameters.body_type = BodyType::Cello;
    parameters.body_resonance_mix = 0.5;

    let mut samples = Vec::new();

    log::info!("bowing");
    engine.bow_on();
    render_seconds(&mut engine, &parameters, 1.5, &mut samples);

    log::info!("vibrato");
    parameters.vibrato_rate = 5.0;
    parameters.vibrato_depth = 0.5;
    render_seconds(&mut engine, &parameters, 1.5, &mut samples);

    log::info!("release");
    parameters.vibrato_depth = 0.0;
    engine.bow_off();
    render_seconds(&mut engine, &parameters, 0.5, &mut samples);

    log::info!("pluck");
    engine.pluck();
    render_seconds(&mut engine, &parameters, 1.5, &mut samples);

    std::fs::create_dir_all("out")?;
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create("out/phrase.wav", spec)?;
    for sample in &samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    log::info!("wrote out/phrase.wav ({} samples)", samples.len());

    Ok(())
}
