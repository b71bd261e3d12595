//! Air particles of the 3D scene
//!
//! The cloud is a flat `[x, y, z]` buffer, the same layout the point mesh
//! stores, so a frame update walks the mesh attribute in place with no
//! allocation. X is the shaft axis. Each frame every particle:
//!
//! 1. drifts downstream by `0.15 * normalized_pressure` along -X
//! 2. swirls about the axis by `0.15 * normalized_speed` radians
//! 3. re-enters at X = +6 once it has passed X = -8
//!
//! The recirculation never ends and does not conserve anything.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type ParticlePos = [f32; 3];

/// Axial drift per frame at full-scale pressure
pub const AXIAL_DRIFT: f32 = 0.15;

/// Swirl per frame at 60 000 RPM, radians
pub const SWIRL_RATE: f32 = 0.15;

/// Axial coordinate past which a particle is recycled
pub const RECYCLE_BELOW: f32 = -8.0;

/// Axial coordinate a recycled particle re-enters at
pub const REENTRY_AT: f32 = 6.0;

/// Seeded axial extent, centered on the origin
pub const SEED_LENGTH: f32 = 12.0;

/// Radius of the film the particles travel in
pub const FILM_RADIUS: f32 = 1.6;

/// Radial spread around the film radius
pub const FILM_THICKNESS: f32 = 0.1;

/// Seed `count` particles inside the annular film around the shaft
pub fn seed_particles(count: usize, seed: u64) -> Vec<ParticlePos> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half_thickness = FILM_THICKNESS * 0.5;

    (0..count)
        .map(|_| {
            let x = (rng.gen::<f32>() - 0.5) * SEED_LENGTH;
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let r = FILM_RADIUS + rng.gen_range(-half_thickness..=half_thickness);
            [x, theta.cos() * r, theta.sin() * r]
        })
        .collect()
}

/// Per-frame motion derived from the current parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowStep {
    pub drift: f32,
    pub swirl_cos: f32,
    pub swirl_sin: f32,
}

impl FlowStep {
    pub fn new(normalized_pressure: f64, normalized_speed: f64) -> Self {
        let swirl = normalized_speed as f32 * SWIRL_RATE;
        Self {
            drift: AXIAL_DRIFT * normalized_pressure as f32,
            swirl_cos: swirl.cos(),
            swirl_sin: swirl.sin(),
        }
    }

    /// Move one particle by one frame
    pub fn apply(&self, p: &mut ParticlePos) {
        p[0] -= self.drift;

        let (y, z) = (p[1], p[2]);
        p[1] = y * self.swirl_cos - z * self.swirl_sin;
        p[2] = y * self.swirl_sin + z * self.swirl_cos;

        if p[0] < RECYCLE_BELOW {
            p[0] = REENTRY_AT;
        }
    }
}

/// Advance the whole buffer by one frame, in place
pub fn advance_particles(positions: &mut [ParticlePos], step: &FlowStep) {
    for p in positions.iter_mut() {
        step.apply(p);
    }
}
