pub mod error;
pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{SpResult, SpindleError};

pub use simulation::params::{SpindleParams, Material, DisplayToggles};
pub use simulation::clock::{TimeSource, ManualClock};
pub use simulation::derivation::{
    compute_eccentricity, sample_pressure_field, gauge_needle_angle, stiffness, flow, DerivedState, PressureField,
    PressureSample,
};
pub use simulation::rotation::{advance_rotation, FrameTiming, RotationMode, RotorClock};
pub use simulation::particles::{seed_particles, advance_particles, FlowStep};
pub use simulation::session::Session;

pub use configuration::config::{SessionConfig, ParametersConfig, DisplayConfig, EngineConfig, ViewConfig, TimingConfig};

pub use visualization::view::{run_viewer, ViewMode};

pub use benchmark::benchmark::{bench_particles, bench_pressure_field};
