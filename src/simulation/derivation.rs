//! Closed-form physics used by both views
//!
//! Everything here is a pure function of a [`SpindleParams`] snapshot and,
//! for the animated effects, an injected [`TimeSource`]. None of it is an
//! engineering model of an air bearing: the maps are chosen so the picture
//! reacts plausibly to the controls.
//!
//! - eccentricity grows linearly with load and saturates at 0.6
//! - the film gap narrows as `1 - cos(theta) * e` on the loaded side
//! - local pressure rises as the gap closes, `p * (1 + (1/gap - 1) * 2)`
//! - gauge, stiffness and flow read-outs are linear in supply pressure

use std::f64::consts::PI;

use super::clock::TimeSource;
use super::params::{SpindleParams, PRESSURE_MAX};

/// Load that produces an eccentricity of 1.0 before clamping, N
pub const ECCENTRICITY_LOAD_SCALE: f64 = 200.0;

/// Largest eccentricity the views ever show
pub const MAX_ECCENTRICITY: f64 = 0.6;

/// Rotor displacement at eccentricity 1.0, in cross-section pixels
pub const OFFSET_SCALE: f64 = 20.0;

/// Smallest gap factor fed into the pressure divisor
pub const MIN_GAP_FACTOR: f64 = 1.0e-3;

/// Default angular resolution of the pressure ring, degrees
pub const DEFAULT_ANGLE_STEP_DEG: f64 = 2.0;

/// Speed that maps to a normalized speed of 1.0, RPM
pub const SPEED_NORMALIZATION: f64 = 60_000.0;

/// Normalized shaft offset for a radial load, clamped to [0, 0.6]
pub fn compute_eccentricity(load: f64) -> f64 {
    if !(load > 0.0) {
        return 0.0; // covers NaN and negative loads
    }
    (load / ECCENTRICITY_LOAD_SCALE).min(MAX_ECCENTRICITY)
}

/// Rotor displacement from the stator center for a given eccentricity
pub fn radial_offset(eccentricity: f64) -> f64 {
    clamp_eccentricity(eccentricity) * OFFSET_SCALE
}

fn clamp_eccentricity(e: f64) -> f64 {
    if e.is_nan() {
        return 0.0;
    }
    e.clamp(0.0, MAX_ECCENTRICITY)
}

/// Relative film thickness at `angle` (radians) around the bearing
///
/// Never returns less than [`MIN_GAP_FACTOR`], whatever eccentricity is passed.
pub fn gap_factor(angle: f64, eccentricity: f64) -> f64 {
    let e = clamp_eccentricity(eccentricity);
    (1.0 - angle.cos() * e).max(MIN_GAP_FACTOR)
}

/// Film pressure at `angle` (radians) for a supply pressure and eccentricity
pub fn local_pressure(supply: f64, angle: f64, eccentricity: f64) -> f64 {
    let gap = gap_factor(angle, eccentricity);
    supply * (1.0 + (1.0 / gap - 1.0) * 2.0)
}

/// Needle angle of the supply gauge: -pi/2 at zero pressure, +pi/2 at full scale
pub fn gauge_needle_angle(pressure: f64) -> f64 {
    -PI / 2.0 + normalized_pressure(pressure) * PI
}

/// Static stiffness read-out, N/um
pub fn stiffness(pressure: f64) -> f64 {
    pressure * 180.0
}

/// Air consumption read-out, SCFM
pub fn flow(pressure: f64) -> f64 {
    pressure * 45.0
}

/// Supply pressure as a fraction of the gauge full scale
pub fn normalized_pressure(pressure: f64) -> f64 {
    pressure / PRESSURE_MAX
}

/// Rotation speed as a fraction of 60 000 RPM
pub fn normalized_speed(speed: u32) -> f64 {
    speed as f64 / SPEED_NORMALIZATION
}

/// Position of the orifice particles along their 20 px travel, in [0, 1)
pub fn particle_phase(elapsed_ms: f64) -> f64 {
    (elapsed_ms / 500.0).rem_euclid(1.0)
}

/// Hue (0..1) of the orifice highlight while in maintenance mode
pub fn maintenance_hue(elapsed_ms: f64) -> f64 {
    0.5 + (elapsed_ms * 0.005).sin() * 0.1
}

/// Shaft-center orbit trace shown on the 3D read-out, in trace pixels
pub fn orbit_trace(elapsed_ms: f64, load: u32) -> (f64, f64) {
    let r = load as f64 / 100.0;
    let phase = elapsed_ms * 0.01;
    (phase.sin() * r, phase.cos() * r)
}

/// One point of the pressure ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureSample {
    pub angle_deg: f64,
    pub angle: f64, // radians
    pub gap_factor: f64,
    pub pressure: f64, // local film pressure, MPa
    pub hot: bool, // above supply pressure
}

/// Pressure around the full circumference at a fixed angular step
///
/// The field is a description, not an iterator: every call to [`iter`](Self::iter)
/// starts again at 0 degrees, so a renderer can walk it once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureField {
    supply: f64,
    eccentricity: f64,
    step_deg: f64,
    len: usize,
}

impl PressureField {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step_deg(&self) -> f64 {
        self.step_deg
    }

    pub fn sample(&self, index: usize) -> Option<PressureSample> {
        if index >= self.len {
            return None;
        }
        let angle_deg = index as f64 * self.step_deg;
        let angle = angle_deg.to_radians();
        let gap = gap_factor(angle, self.eccentricity);
        let pressure = self.supply * (1.0 + (1.0 / gap - 1.0) * 2.0);
        Some(PressureSample {
            angle_deg,
            angle,
            gap_factor: gap,
            pressure,
            hot: pressure > self.supply,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = PressureSample> + '_ {
        (0..self.len).filter_map(move |i| self.sample(i))
    }
}

impl<'a> IntoIterator for &'a PressureField {
    type Item = PressureSample;
    type IntoIter = Box<dyn Iterator<Item = PressureSample> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// Sample the film pressure over [0, 360) degrees every `angle_step_deg`
///
/// A step that is not a positive finite number falls back to 2 degrees.
pub fn sample_pressure_field(pressure: f64, eccentricity: f64, angle_step_deg: f64) -> PressureField {
    let step_deg = if angle_step_deg.is_finite() && angle_step_deg > 0.0 {
        angle_step_deg.min(360.0)
    } else {
        DEFAULT_ANGLE_STEP_DEG
    };
    // 360 / 2 must give exactly 180 samples, not 181
    let len = ((360.0 / step_deg) - 1.0e-9).ceil().max(1.0) as usize;

    PressureField {
        supply: pressure,
        eccentricity: clamp_eccentricity(eccentricity),
        step_deg,
        len,
    }
}

/// Everything a renderer reads in one frame
///
/// Built in one go from a parameter snapshot so the draw pass never sees a
/// mix of values from two different snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedState {
    pub supply_pressure: f64,
    pub eccentricity: f64,
    pub radial_offset: f64,
    pub gauge_needle_angle: f64,
    pub stiffness: f64,
    pub flow: f64,
    pub normalized_pressure: f64,
    pub normalized_speed: f64,
    pub particle_phase: f64,
    pub maintenance_hue: f64,
    pub orbit_trace: (f64, f64),
}

impl DerivedState {
    pub fn derive<T: TimeSource + ?Sized>(params: &SpindleParams, clock: &T) -> Self {
        let ms = clock.elapsed_ms();
        let eccentricity = compute_eccentricity(params.load as f64);

        Self {
            supply_pressure: params.pressure,
            eccentricity,
            radial_offset: radial_offset(eccentricity),
            gauge_needle_angle: gauge_needle_angle(params.pressure),
            stiffness: stiffness(params.pressure),
            flow: flow(params.pressure),
            normalized_pressure: normalized_pressure(params.pressure),
            normalized_speed: normalized_speed(params.speed),
            particle_phase: particle_phase(ms),
            maintenance_hue: maintenance_hue(ms),
            orbit_trace: orbit_trace(ms, params.load),
        }
    }

    /// Pressure ring for this frame at the given angular step
    pub fn pressure_field(&self, angle_step_deg: f64) -> PressureField {
        sample_pressure_field(self.supply_pressure, self.eccentricity, angle_step_deg)
    }
}
