//! Lock-free handoff of parameters and bow events between a control thread
//! and the audio context.
//!
//! Single writer (the control side), single reader (the audio side). Every
//! parameter is a "latest value wins" atomic cell; bow/pluck events
//! accumulate in a bit set that the audio side swaps out once per block.
//! Neither side ever blocks.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::params::{BodyType, EngineParameters, StringMaterial};

const EVENT_BOW_ON: u32 = 1 << 0;
const EVENT_BOW_OFF: u32 = 1 << 1;
const EVENT_PLUCK: u32 = 1 << 2;

/// Bow events collected since the previous block boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct Events {
    pub bow_on: bool,
    pub bow_off: bool,
    pub pluck: bool,
}

#[derive(Debug)]
struct Shared {
    fundamental_frequency: AtomicU32,
    string_damping: AtomicU32,
    bow_force: AtomicU32,
    bow_position: AtomicU32,
    bow_speed: AtomicU32,
    brightness: AtomicU32,
    string_material: AtomicU32,
    vibrato_rate: AtomicU32,
    vibrato_depth: AtomicU32,
    body_type: AtomicU32,
    body_resonance_mix: AtomicU32,
    events: AtomicU32,
}

impl Shared {
    fn new(initial: &EngineParameters) -> Self {
        Self {
            fundamental_frequency: cell(initial.fundamental_frequency),
            string_damping: cell(initial.string_damping),
            bow_force: cell(initial.bow_force),
            bow_position: cell(initial.bow_position),
            bow_speed: cell(initial.bow_speed),
            brightness: cell(initial.brightness),
            string_material: AtomicU32::new(initial.string_material as u32),
            vibrato_rate: cell(initial.vibrato_rate),
            vibrato_depth: cell(initial.vibrato_depth),
            body_type: AtomicU32::new(initial.body_type as u32),
            body_resonance_mix: cell(initial.body_resonance_mix),
            events: AtomicU32::new(0),
        }
    }
}

fn cell(value: f32) -> AtomicU32 {
    AtomicU32::new(value.to_bits())
}

#[inline]
fn store(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

#[inline]
fn load(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

/// Create a connected control/audio pair carrying the default parameters.
pub fn controls() -> (ControlHandle, ControlPort) {
    controls_with(EngineParameters::default())
}

/// Create a connected control/audio pair carrying `initial`.
pub fn controls_with(initial: EngineParameters) -> (ControlHandle, ControlPort) {
    let shared = Arc::new(Shared::new(&initial));

    (
        ControlHandle {
            shared: Arc::clone(&shared),
        },
        ControlPort { shared },
    )
}

/// Control-thread side: publishes parameter values and bow events.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    shared: Arc<Shared>,
}

impl ControlHandle {
    pub fn set_fundamental_frequency(&self, hz: f32) {
        store(&self.shared.fundamental_frequency, hz);
    }

    pub fn set_string_damping(&self, value: f32) {
        store(&self.shared.string_damping, value);
    }

    pub fn set_bow_force(&self, value: f32) {
        store(&self.shared.bow_force, value);
    }

    pub fn set_bow_position(&self, value: f32) {
        store(&self.shared.bow_position, value);
    }

    pub fn set_bow_speed(&self, value: f32) {
        store(&self.shared.bow_speed, value);
    }

    pub fn set_brightness(&self, value: f32) {
        store(&self.shared.brightness, value);
    }

    pub fn set_string_material(&self, material: StringMaterial) {
        self.shared
            .string_material
            .store(material as u32, Ordering::Relaxed);
    }

    pub fn set_vibrato_rate(&self, hz: f32) {
        store(&self.shared.vibrato_rate, hz);
    }

    pub fn set_vibrato_depth(&self, value: f32) {
        store(&self.shared.vibrato_depth, value);
    }

    pub fn set_body_type(&self, body_type: BodyType) {
        self.shared
            .body_type
            .store(body_type as u32, Ordering::Relaxed);
    }

    pub fn set_body_resonance_mix(&self, value: f32) {
        store(&self.shared.body_resonance_mix, value);
    }

    pub fn bow_on(&self) {
        self.shared.events.fetch_or(EVENT_BOW_ON, Ordering::AcqRel);
    }

    pub fn bow_off(&self) {
        self.shared.events.fetch_or(EVENT_BOW_OFF, Ordering::AcqRel);
    }

    pub fn pluck(&self) {
        self.shared.events.fetch_or(EVENT_PLUCK, Ordering::AcqRel);
    }
}

/// Audio-thread side: consumed once per block boundary.
#[derive(Debug)]
pub struct ControlPort {
    shared: Arc<Shared>,
}

impl ControlPort {
    /// Latest published parameter values. Clamping and NaN rejection happen
    /// later, inside the engine.
    pub fn snapshot(&self) -> EngineParameters {
        EngineParameters {
            fundamental_frequency: load(&self.shared.fundamental_frequency),
            string_damping: load(&self.shared.string_damping),
            bow_force: load(&self.shared.bow_force),
            bow_position: load(&self.shared.bow_position),
            bow_speed: load(&self.shared.bow_speed),
            brightness: load(&self.shared.brightness),
            string_material: StringMaterial::from_index(
                self.shared.string_material.load(Ordering::Relaxed) as usize,
            ),
            vibrato_rate: load(&self.shared.vibrato_rate),
            vibrato_depth: load(&self.shared.vibrato_depth),
            body_type: BodyType::from_index(self.shared.body_type.load(Ordering::Relaxed) as usize),
            body_resonance_mix: load(&self.shared.body_resonance_mix),
        }
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&self) -> Events {
        let bits = self.shared.events.swap(0, Ordering::AcqRel);

        Events {
            bow_on: bits & EVENT_BOW_ON != 0,
            bow_off: bits & EVENT_BOW_OFF != 0,
            pluck: bits & EVENT_PLUCK != 0,
        }
    }
}
