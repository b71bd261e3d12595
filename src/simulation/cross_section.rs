//! Layout of the 2D cross-section A-A
//!
//! Pure geometry in canvas units (a 600 x 600 surface centered on the
//! stator, y pointing down, angles increasing clockwise on screen). The renderer turns these points into meshes and gizmo lines;
//! keeping them here lets the layout be checked without a window.

use std::f64::consts::TAU;

use nalgebra::Vector2;

use super::derivation::{DerivedState, PressureField, PressureSample};

pub type NVec2 = Vector2<f64>;

/// Side of the square drawing surface
pub const CANVAS_SIZE: f64 = 600.0;

pub const STATOR_RADIUS: f64 = 160.0;
pub const STATOR_STROKE: f64 = 20.0;
pub const ROTOR_RADIUS: f64 = 140.0;
pub const CENTER_CAP_RADIUS: f64 = 15.0;

pub const ORIFICE_COUNT: usize = 8;
pub const ORIFICE_LENGTH: f64 = 10.0;

/// Distance an orifice particle travels inward per phase cycle
pub const PARTICLE_TRAVEL: f64 = 20.0;
pub const PARTICLE_RADIUS: f64 = 2.0;

pub const SPOKE_COUNT: usize = 4;

/// Ring segment length per MPa of local pressure
pub const RING_SCALE: f64 = 10.0;

/// A straight stroke between two canvas points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: NVec2,
    pub end: NVec2,
}

fn polar(radius: f64, angle: f64) -> NVec2 {
    NVec2::new(angle.cos() * radius, angle.sin() * radius)
}

fn orifice_angle(i: usize) -> f64 {
    i as f64 / ORIFICE_COUNT as f64 * TAU
}

/// Supply channels through the stator wall, outside to inside
pub fn orifice_channels() -> impl Iterator<Item = Segment> {
    (0..ORIFICE_COUNT).map(|i| {
        let angle = orifice_angle(i);
        Segment {
            start: polar(STATOR_RADIUS + ORIFICE_LENGTH, angle),
            end: polar(STATOR_RADIUS, angle),
        }
    })
}

/// Positions of the traveling dots, one per orifice
pub fn orifice_particles(phase: f64) -> impl Iterator<Item = NVec2> {
    let r = STATOR_RADIUS - phase.rem_euclid(1.0) * PARTICLE_TRAVEL;
    (0..ORIFICE_COUNT).map(move |i| polar(r, orifice_angle(i)))
}

/// One radial stroke of the pressure ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingSegment {
    pub segment: Segment,
    pub hot: bool,
}

impl RingSegment {
    fn from_sample(s: &PressureSample) -> Self {
        Self {
            segment: Segment {
                start: polar(ROTOR_RADIUS, s.angle),
                end: polar(ROTOR_RADIUS + s.pressure * RING_SCALE, s.angle),
            },
            hot: s.hot,
        }
    }
}

/// Radial strokes of the pressure-deviation ring, centered on the stator
pub fn pressure_ring(field: &PressureField) -> impl Iterator<Item = RingSegment> + '_ {
    field.iter().map(|s| RingSegment::from_sample(&s))
}

/// Rotor center, shifted along +X toward the loaded side
pub fn rotor_center(derived: &DerivedState) -> NVec2 {
    NVec2::new(derived.radial_offset, 0.0)
}

/// Spokes drawn on the rotor, in canvas coordinates
pub fn rotor_spokes(center: NVec2, rotation: f64) -> impl Iterator<Item = Segment> {
    (0..SPOKE_COUNT).map(move |i| {
        let angle = rotation + i as f64 / SPOKE_COUNT as f64 * TAU;
        Segment {
            start: center,
            end: center + polar(ROTOR_RADIUS, angle),
        }
    })
}

/// Projection scale that fits the canvas inside a window, never enlarging it
pub fn fit_scale(width: f64, height: f64) -> f64 {
    let side = width.min(height);
    if !(side > 0.0) {
        return 1.0;
    }
    (CANVAS_SIZE / side).max(1.0)
}
