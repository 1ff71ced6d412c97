//! Control-rate parameters, material lookup table and change detection.

#[allow(unused_imports)]
use num_traits::float::Float;

/// Tolerance used when comparing a new scalar against its cached value.
pub const PARAMETER_TOLERANCE: f32 = 1e-6;

/// String construction, selecting inharmonicity, damping and brightness.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StringMaterial {
    #[default]
    Steel,
    Gut,
    Nylon,
    Wound,
}

/// Per-material tuning constants. Perceptually chosen, not derived.
#[derive(Debug, Clone, Copy)]
pub struct MaterialProperties {
    /// Stretches the partials away from exact integer multiples.
    pub inharmonicity: f32,
    /// Divides the base Q: higher values decay faster.
    pub damping_factor: f32,
    /// Scales every mode amplitude.
    pub brightness_scale: f32,
}

const MATERIAL_TABLE: [MaterialProperties; 4] = [
    // Steel: bright, low damping, moderate inharmonicity
    MaterialProperties {
        inharmonicity: 0.0003,
        damping_factor: 0.8,
        brightness_scale: 1.0,
    },
    // Gut: warm, higher damping, very low inharmonicity
    MaterialProperties {
        inharmonicity: 0.00005,
        damping_factor: 1.5,
        brightness_scale: 0.7,
    },
    // Nylon: mellow, high damping, low inharmonicity
    MaterialProperties {
        inharmonicity: 0.0001,
        damping_factor: 2.0,
        brightness_scale: 0.5,
    },
    // Wound: complex, moderate damping, higher inharmonicity
    MaterialProperties {
        inharmonicity: 0.0005,
        damping_factor: 1.2,
        brightness_scale: 0.85,
    },
];

impl StringMaterial {
    #[inline]
    pub fn properties(self) -> &'static MaterialProperties {
        &MATERIAL_TABLE[self as usize]
    }

    /// Lookup from a raw control value; out-of-range falls back to steel.
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Gut,
            2 => Self::Nylon,
            3 => Self::Wound,
            _ => Self::Steel,
        }
    }
}

/// Instrument body preset selector. The preset tables live in [`crate::body`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    #[default]
    Violin,
    Viola,
    Cello,
    Guitar,
    None,
}

impl BodyType {
    /// Lookup from a raw control value; out-of-range falls back to violin.
    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Viola,
            2 => Self::Cello,
            3 => Self::Guitar,
            4 => Self::None,
            _ => Self::Violin,
        }
    }
}

/// Playing parameters, sampled once per block.
///
/// All scalars are control-rate except `fundamental_frequency`, which the
/// engine glides toward with an exponential ramp and therefore tolerates
/// per-block updates of arbitrary size.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParameters {
    /// Fundamental frequency in Hz.
    /// Range: 20.0 - 2000.0
    pub fundamental_frequency: f32,

    /// String damping; higher values decay faster.
    /// Range: 0.01 - 0.99
    pub string_damping: f32,

    /// Bow force, also the pluck impulse level.
    /// Range: 0.0 - 1.0
    pub bow_force: f32,

    /// Fractional bow distance from the bridge.
    /// Range: 0.02 - 0.5
    pub bow_position: f32,

    /// Bow speed; faster bowing is brighter and smoother.
    /// Range: 0.0 - 1.0
    pub bow_speed: f32,

    /// Overall brightness, mapped exponentially to the tone filter cutoff.
    /// Range: 0.0 - 1.0
    pub brightness: f32,

    /// String construction.
    pub string_material: StringMaterial,

    /// Vibrato rate in Hz.
    /// Range: 0.0 - 10.0
    pub vibrato_rate: f32,

    /// Vibrato depth.
    /// Range: 0.0 - 1.0
    pub vibrato_depth: f32,

    /// Instrument body preset.
    pub body_type: BodyType,

    /// Dry/wet blend between the tone filter output and the body bank.
    /// Range: 0.0 - 1.0
    pub body_resonance_mix: f32,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            fundamental_frequency: 220.0,
            string_damping: 0.5,
            bow_force: 0.5,
            bow_position: 0.12,
            bow_speed: 0.5,
            brightness: 0.5,
            string_material: StringMaterial::Steel,
            vibrato_rate: 5.0,
            vibrato_depth: 0.0,
            body_type: BodyType::Violin,
            body_resonance_mix: 0.3,
        }
    }
}

impl EngineParameters {
    /// Clamp every scalar to its declared range. A non-finite value is
    /// ignored in favor of the last known good one, so NaN never reaches
    /// the filter math.
    pub fn sanitized(&self, fallback: &Self) -> Self {
        Self {
            fundamental_frequency: sanitize(
                self.fundamental_frequency,
                20.0,
                2000.0,
                fallback.fundamental_frequency,
            ),
            string_damping: sanitize(self.string_damping, 0.01, 0.99, fallback.string_damping),
            bow_force: sanitize(self.bow_force, 0.0, 1.0, fallback.bow_force),
            bow_position: sanitize(self.bow_position, 0.02, 0.5, fallback.bow_position),
            bow_speed: sanitize(self.bow_speed, 0.0, 1.0, fallback.bow_speed),
            brightness: sanitize(self.brightness, 0.0, 1.0, fallback.brightness),
            string_material: self.string_material,
            vibrato_rate: sanitize(self.vibrato_rate, 0.0, 10.0, fallback.vibrato_rate),
            vibrato_depth: sanitize(self.vibrato_depth, 0.0, 1.0, fallback.vibrato_depth),
            body_type: self.body_type,
            body_resonance_mix: sanitize(
                self.body_resonance_mix,
                0.0,
                1.0,
                fallback.body_resonance_mix,
            ),
        }
    }
}

#[inline]
fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Coefficient groups that must be recomputed after a parameter change.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DirtyFlags {
    pub string_modes: bool,
    pub tone_filter: bool,
    pub body_bank: bool,
}

/// Last-applied parameter values with tolerance-based change detection.
#[derive(Debug)]
pub struct ParameterCache {
    values: EngineParameters,
}

impl ParameterCache {
    pub fn new(initial: EngineParameters) -> Self {
        Self { values: initial }
    }

    /// The values behind the currently active coefficients.
    #[inline]
    pub fn values(&self) -> &EngineParameters {
        &self.values
    }

    /// Compare `new` against the cache, adopt it, and report which
    /// coefficient groups are affected. Idempotent: a second call with the
    /// same input returns all-clear flags.
    pub fn diff(&mut self, new: &EngineParameters) -> DirtyFlags {
        let flags = DirtyFlags {
            string_modes: changed(new.fundamental_frequency, self.values.fundamental_frequency)
                || changed(new.string_damping, self.values.string_damping)
                || changed(new.bow_position, self.values.bow_position)
                || new.string_material != self.values.string_material,
            tone_filter: changed(new.brightness, self.values.brightness),
            body_bank: new.body_type != self.values.body_type,
        };
        self.values = new.clone();

        flags
    }
}

#[inline]
fn changed(new: f32, cached: f32) -> bool {
    (new - cached).abs() > PARAMETER_TOLERANCE
}
