//! Rotor angle integration
//!
//! The cross-section and the scene were tuned with different speed constants.
//! Both are kept so each view keeps its apparent rotor speed:
//!
//! - cross-section: `speed / 1000` radians per reference frame
//! - scene:         `speed / 60000 * 15` radians per second
//!
//! [`FrameTiming::Elapsed`] scales the cross-section constant by a 60 Hz
//! reference frame so neither view depends on the display refresh rate.
//! [`FrameTiming::PerCall`] steps the cross-section once per redraw; the scene
//! integrates the real frame delta under either timing.

use std::f64::consts::TAU;

use crate::configuration::config::TimingConfig;

/// Frame rate the per-frame constants were tuned at
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    CrossSection,
    Scene,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameTiming {
    /// One fixed cross-section step per redraw, carrying the real frame delta
    PerCall(f64),
    /// Step scaled by the seconds since the previous redraw
    Elapsed(f64),
}

impl FrameTiming {
    pub fn from_config(cfg: TimingConfig, delta_secs: f64) -> Self {
        match cfg {
            TimingConfig::Frame => FrameTiming::PerCall(delta_secs),
            TimingConfig::Elapsed => FrameTiming::Elapsed(delta_secs),
        }
    }

    /// Seconds this step covers, never negative
    fn seconds(self) -> f64 {
        match self {
            FrameTiming::PerCall(dt) | FrameTiming::Elapsed(dt) if dt.is_finite() => dt.max(0.0),
            _ => 0.0,
        }
    }
}

/// Radians per second for `speed` RPM in the given view
pub fn angular_rate(speed: u32, mode: RotationMode) -> f64 {
    let speed = speed as f64;
    match mode {
        RotationMode::CrossSection => speed / 1000.0 * REFERENCE_FRAME_RATE,
        RotationMode::Scene => speed / 60_000.0 * 15.0,
    }
}

/// Rotor angle after one frame
pub fn advance_rotation(current: f64, speed: u32, mode: RotationMode, timing: FrameTiming) -> f64 {
    let increment = match (mode, timing) {
        // exact per-call constant, no round trip through the reference rate
        (RotationMode::CrossSection, FrameTiming::PerCall(_)) => speed as f64 / 1000.0,
        _ => angular_rate(speed, mode) * timing.seconds(),
    };
    current + increment
}

/// Accumulated rotor angle owned by one mounted renderer
///
/// Starts at zero when the renderer mounts and only moves through [`advance`](Self::advance).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotorClock {
    angle: f64,
    mode: RotationMode,
}

impl RotorClock {
    pub fn new(mode: RotationMode) -> Self {
        Self { angle: 0.0, mode }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Angle wrapped into [0, 2π) for handing to `f32` transforms
    pub fn display_angle(&self) -> f64 {
        self.angle.rem_euclid(TAU)
    }

    pub fn advance(&mut self, speed: u32, timing: FrameTiming) -> f64 {
        self.angle = advance_rotation(self.angle, speed, self.mode, timing);
        self.angle
    }
}
