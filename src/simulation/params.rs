//! Operating parameters read by both renderers every frame
//!
//! `SpindleParams` is the ParameterModel: supply pressure, rotation speed,
//! radial load, rotor material and the maintenance flag. It is plain data and
//! is replaced wholesale whenever the user edits a value.
//! `DisplayToggles` carries the overlay switches and the run/pause flag.

use crate::configuration::config::{DisplayConfig, MaterialConfig, ParametersConfig};

/// Supply pressure range, MPa
pub const PRESSURE_MIN: f64 = 0.2;
pub const PRESSURE_MAX: f64 = 0.8;

/// Rotation speed range, RPM
pub const SPEED_MAX: u32 = 80_000;

/// Radial load range, N
pub const LOAD_MAX: u32 = 600;

pub type Material = MaterialConfig;

impl Material {
    /// Next material in the cycle steel -> titanium -> ceramic -> steel
    pub fn next(self) -> Self {
        match self {
            Material::Steel => Material::Titanium,
            Material::Titanium => Material::Ceramic,
            Material::Ceramic => Material::Steel,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Material::Steel => "steel",
            Material::Titanium => "titanium",
            Material::Ceramic => "ceramic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpindleParams {
    pub pressure: f64, // supply pressure, MPa
    pub speed: u32, // rotation rate, RPM
    pub load: u32, // radial load, N
    pub material: Material, // display only
    pub maintenance_mode: bool, // diagnostic highlight
}

impl Default for SpindleParams {
    fn default() -> Self {
        Self::from_config(&ParametersConfig::default())
    }
}

impl SpindleParams {
    /// Build parameters from configuration, clamping every value into its domain
    pub fn from_config(cfg: &ParametersConfig) -> Self {
        Self {
            pressure: clamp_pressure(cfg.pressure),
            speed: clamp_count(cfg.speed, SPEED_MAX),
            load: clamp_count(cfg.load, LOAD_MAX),
            material: cfg.material,
            maintenance_mode: cfg.maintenance_mode,
        }
    }

    /// True if any field of `cfg` lies outside its domain
    pub fn needs_clamping(cfg: &ParametersConfig) -> bool {
        !(PRESSURE_MIN..=PRESSURE_MAX).contains(&cfg.pressure)
            || !(0.0..=SPEED_MAX as f64).contains(&cfg.speed)
            || !(0.0..=LOAD_MAX as f64).contains(&cfg.load)
    }

    /// Copy with a new pressure, clamped
    pub fn with_pressure(self, pressure: f64) -> Self {
        Self { pressure: clamp_pressure(pressure), ..self }
    }

    /// Copy with a new speed, clamped
    pub fn with_speed(self, speed: i64) -> Self {
        Self { speed: speed.clamp(0, SPEED_MAX as i64) as u32, ..self }
    }

    /// Copy with a new load, clamped
    pub fn with_load(self, load: i64) -> Self {
        Self { load: load.clamp(0, LOAD_MAX as i64) as u32, ..self }
    }

    pub fn with_material(self, material: Material) -> Self {
        Self { material, ..self }
    }

    pub fn with_maintenance(self, maintenance_mode: bool) -> Self {
        Self { maintenance_mode, ..self }
    }
}

fn clamp_pressure(p: f64) -> f64 {
    if p.is_nan() {
        return PRESSURE_MIN;
    }
    p.clamp(PRESSURE_MIN, PRESSURE_MAX)
}

fn clamp_count(v: f64, max: u32) -> u32 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, max as f64) as u32
}

/// Overlay switches and run flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayToggles {
    pub show_pressure_map: bool,
    pub show_air_particles: bool,
    pub running: bool,
}

impl Default for DisplayToggles {
    fn default() -> Self {
        Self::from_config(&DisplayConfig::default())
    }
}

impl DisplayToggles {
    pub fn from_config(cfg: &DisplayConfig) -> Self {
        Self {
            show_pressure_map: cfg.show_pressure_map,
            show_air_particles: cfg.show_air_particles,
            running: cfg.running,
        }
    }
}
