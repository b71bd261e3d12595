//! Configuration types for loading spindle sessions from YAML.
//!
//! A session file describes the starting state of the viewer:
//!
//! - [`ParametersConfig`] – operating point of the spindle (pressure, speed, load, ...)
//! - [`DisplayConfig`]    – overlay toggles and the run/pause flag
//! - [`EngineConfig`]     – view selection, integration timing, particle seeding, logging
//! - [`SessionConfig`]    – top-level wrapper used to load a session from YAML
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   pressure: 0.45          # supply pressure, MPa, [0.2, 0.8]
//!   speed: 15000            # RPM, [0, 80000]
//!   load: 50                # radial load, N, [0, 600]
//!   material: "steel"       # or "titanium", "ceramic"
//!   maintenance_mode: false
//!
//! display:
//!   show_pressure_map: true
//!   show_air_particles: true
//!   running: true
//!
//! engine:
//!   view: "3d"              # or "2d"
//!   timing: "elapsed"       # or "frame"
//!   particle_count: 5000
//!   seed: 42
//! ```
//!
//! Every section and field is optional; missing values fall back to
//! the control panel defaults.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{SpResult, SpindleError};

/// Rotor material. Only changes how the rotor is tinted, never the physics
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaterialConfig {
    #[default]
    #[serde(rename = "steel")]
    Steel,

    #[serde(rename = "titanium")]
    Titanium,

    #[serde(rename = "ceramic")]
    Ceramic,
}

/// Which renderer is mounted at startup
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewConfig {
    #[serde(rename = "2d")] // cross-section A-A
    CrossSection,

    #[default]
    #[serde(rename = "3d")] // studio scene
    Scene,
}

/// How rotation increments are scaled between frames
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingConfig {
    #[serde(rename = "frame")] // one fixed increment per redraw, tied to display refresh rate
    Frame,

    #[default]
    #[serde(rename = "elapsed")] // increment scaled by the measured frame delta
    Elapsed,
}

/// Operating point of the spindle
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub pressure: f64, // supply pressure, MPa
    pub speed: f64, // rotation rate, RPM
    pub load: f64, // radial load, N
    pub material: MaterialConfig, // rotor material
    pub maintenance_mode: bool, // diagnostic pulse on the orifices
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            pressure: 0.45,
            speed: 15000.0,
            load: 50.0,
            material: MaterialConfig::Steel,
            maintenance_mode: false,
        }
    }
}

/// Overlay toggles and the run/pause flag
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_pressure_map: bool, // 2D pressure-deviation ring
    pub show_air_particles: bool, // 2D orifice particles
    pub running: bool, // 3D animation runs while true
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_pressure_map: true,
            show_air_particles: true,
            running: true,
        }
    }
}

/// Viewer-level configuration
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub view: ViewConfig, // initial view
    pub timing: TimingConfig, // rotation integration mode
    pub particle_count: usize, // size of the 3D particle cloud
    pub seed: u64, // deterministic seed for particle placement
    pub log_filter: Option<String>, // forwarded to Bevy's LogPlugin
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::Scene,
            timing: TimingConfig::Elapsed,
            particle_count: 5000,
            seed: 42,
            log_filter: None,
            window_width: 1280.0,
            window_height: 800.0,
        }
    }
}

/// Top-level session configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub parameters: ParametersConfig, // operating point
    pub display: DisplayConfig, // overlays and run flag
    pub engine: EngineConfig, // viewer options
}

impl SessionConfig {
    /// Parse a session from YAML text and check it for non-finite values
    pub fn from_yaml_str(text: &str) -> SpResult<Self> {
        let cfg: SessionConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a session from a YAML file
    pub fn load(path: &Path) -> SpResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let cfg: SessionConfig = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> SpResult<()> {
        let p = &self.parameters;
        for (what, value) in [("pressure", p.pressure), ("speed", p.speed), ("load", p.load)] {
            if !value.is_finite() {
                return Err(SpindleError::NonFinite { what, value });
            }
        }
        if self.engine.particle_count == 0 {
            return Err(SpindleError::InvalidArg { what: "particle_count must be at least 1" });
        }
        if !(self.engine.window_width > 0.0 && self.engine.window_height > 0.0) {
            return Err(SpindleError::InvalidArg { what: "window size must be positive" });
        }
        Ok(())
    }
}
