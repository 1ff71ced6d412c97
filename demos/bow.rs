//! Plays a short bowed phrase through the default audio output.
//!
//! The engine runs inside the cpal callback; this thread drives it through
//! the lock-free control handle, the way a UI thread would.

use std::error::Error;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use simple_logger::SimpleLogger;

use modal_string_dsp::control::{controls, ControlPort};
use modal_string_dsp::engine::BowedStringEngine;
use modal_string_dsp::params::{BodyType, StringMaterial};

const BLOCK_SIZE: usize = 128;

struct AudioState {
    engine: BowedStringEngine,
    port: ControlPort,
    block: [f32; BLOCK_SIZE],
}

impl AudioState {
    fn fill(&mut self, data: &mut [f32], channels: usize) {
        for frame_chunk in data.chunks_mut(BLOCK_SIZE * channels) {
            let frames = frame_chunk.len() / channels;

            self.engine.apply_events(self.port.take_events());
            let parameters = self.port.snapshot();
            self.engine.render(&parameters, &mut self.block[..frames]);

            for (frame, out) in frame_chunk.chunks_mut(channels).enumerate() {
                out.fill(self.block[frame]);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .init()?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("no output device available")?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    log::info!("output: {} Hz, {} channels", sample_rate, channels);

    let (handle, port) = controls();
    let mut state = AudioState {
        engine: BowedStringEngine::new(sample_rate)?,
        port,
        block: [0.0; BLOCK_SIZE],
    };

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| state.fill(data, channels),
        |err| log::error!("stream error: {err}"),
        None,
    )?;
    stream.play()?;

    handle.set_string_material(StringMaterial::Steel);
    handle.set_body_type(BodyType::Violin);
    handle.set_body_resonance_mix(0.4);

    log::info!("bowing open A");
    handle.set_fundamental_frequency(220.0);
    handle.bow_on();
    thread::sleep(Duration::from_millis(1200));

    log::info!("adding vibrato");
    handle.set_vibrato_rate(5.5);
    handle.set_vibrato_depth(0.5);
    thread::sleep(Duration::from_millis(1500));

    log::info!("sliding up a fifth");
    handle.set_fundamental_frequency(330.0);
    thread::sleep(Duration::from_millis(1500));

    log::info!("releasing the bow");
    handle.bow_off();
    thread::sleep(Duration::from_millis(800));

    log::info!("pluck");
    handle.set_vibrato_depth(0.0);
    handle.pluck();
    thread::sleep(Duration::from_millis(1500));

    Ok(())
}
