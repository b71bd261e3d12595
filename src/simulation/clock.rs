//! Time providers for the derivation
//!
//! Phase-driven effects (orifice particles, maintenance pulse, orbit trace)
//! read time through [`TimeSource`] instead of a global wall clock, so that a
//! test can pin the clock and get identical output every call.

use bevy::time::Time;

pub trait TimeSource {
    /// Seconds since the viewer started
    fn elapsed_secs(&self) -> f64;

    /// Seconds since the previous frame
    fn delta_secs(&self) -> f64;

    /// Elapsed time in milliseconds, the unit the phase formulas are tuned for
    fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs() * 1000.0
    }
}

impl TimeSource for Time {
    fn elapsed_secs(&self) -> f64 {
        self.elapsed_seconds_f64()
    }

    fn delta_secs(&self) -> f64 {
        self.delta_seconds_f64()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    elapsed: f64,
    delta: f64,
}

impl ManualClock {
    pub fn at(elapsed: f64) -> Self {
        Self { elapsed, delta: 0.0 }
    }

    /// Advance by `dt` seconds, negative steps are ignored
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.delta = dt;
    }
}

impl TimeSource for ManualClock {
    fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    fn delta_secs(&self) -> f64 {
        self.delta
    }
}
