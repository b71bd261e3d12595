//! Orbit camera for the 3D scene
//!
//! Left-drag turns the camera around its focus, the wheel zooms. Input moves
//! a target pose and the visible pose eases toward it, which gives the same
//! damped feel of a typical orbit control.

use std::f32::consts::PI;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

const DRAG_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 0.1;
const MIN_RADIUS: f32 = 5.0;
const MAX_RADIUS: f32 = 60.0;
const ELEVATION_LIMIT: f32 = PI / 2.0 - 0.1;

/// Higher is snappier
const DAMPING: f32 = 10.0;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub radius: f32,
    pub azimuth: f32,
    pub elevation: f32,
    target_radius: f32,
    target_azimuth: f32,
    target_elevation: f32,
}

impl OrbitCamera {
    /// Orbit that starts with the camera at `eye`
    pub fn looking_from(eye: Vec3, focus: Vec3) -> Self {
        let offset = eye - focus;
        let radius = offset.length().max(MIN_RADIUS);
        let azimuth = offset.x.atan2(offset.z);
        let elevation = (offset.y / radius).clamp(-1.0, 1.0).asin();
        Self {
            focus,
            radius,
            azimuth,
            elevation,
            target_radius: radius,
            target_azimuth: azimuth,
            target_elevation: elevation,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.focus
            + Vec3::new(
                self.radius * self.elevation.cos() * self.azimuth.sin(),
                self.radius * self.elevation.sin(),
                self.radius * self.elevation.cos() * self.azimuth.cos(),
            )
    }

    pub fn drag(&mut self, delta: Vec2) {
        self.target_azimuth -= delta.x * DRAG_SENSITIVITY;
        self.target_elevation =
            (self.target_elevation + delta.y * DRAG_SENSITIVITY).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.target_radius = (self.target_radius * (1.0 - scroll * ZOOM_SENSITIVITY)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    /// Ease the visible pose toward the target over `dt` seconds
    pub fn settle(&mut self, dt: f32) {
        let k = 1.0 - (-DAMPING * dt.max(0.0)).exp();
        self.azimuth += (self.target_azimuth - self.azimuth) * k;
        self.elevation += (self.target_elevation - self.elevation) * k;
        self.radius += (self.target_radius - self.radius) * k;
    }
}

pub fn orbit_camera(
    mut query: Query<(&mut Transform, &mut OrbitCamera)>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok((mut transform, mut orbit)) = query.get_single_mut() else {
        mouse_motion.clear();
        scroll.clear();
        return;
    };

    if mouse_button.pressed(MouseButton::Left) {
        for ev in mouse_motion.read() {
            orbit.drag(ev.delta);
        }
    } else {
        mouse_motion.clear();
    }

    for ev in scroll.read() {
        orbit.zoom(ev.y);
    }

    orbit.settle(time.delta_seconds());
    *transform = Transform::from_translation(orbit.eye()).looking_at(orbit.focus, Vec3::Y);
}
