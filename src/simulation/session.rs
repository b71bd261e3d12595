//! Build the live session from configuration
//!
//! Takes a `SessionConfig` (YAML-facing) and produces the `Session` resource
//! both renderers read every frame:
//! - current parameters (`SpindleParams`)
//! - overlay toggles and run flag (`DisplayToggles`)
//! - viewer settings that stay fixed for the whole run
//!
//! Renderers only ever read it. Edits replace `params` as a whole.

use bevy::prelude::{warn, Resource};

use crate::configuration::config::{SessionConfig, TimingConfig, ViewConfig};
use crate::simulation::params::{DisplayToggles, SpindleParams};

#[derive(Resource, Debug, Clone)]
pub struct Session {
    pub params: SpindleParams,
    pub display: DisplayToggles,
    pub timing: TimingConfig,
    pub initial_view: ViewConfig,
    pub particle_count: usize,
    pub seed: u64,
    defaults: SpindleParams,
}

impl Session {
    pub fn build_session(cfg: &SessionConfig) -> Self {
        if SpindleParams::needs_clamping(&cfg.parameters) {
            warn!(
                "session parameters out of range (pressure={}, speed={}, load={}), clamping",
                cfg.parameters.pressure, cfg.parameters.speed, cfg.parameters.load
            );
        }
        let params = SpindleParams::from_config(&cfg.parameters);

        Self {
            params,
            display: DisplayToggles::from_config(&cfg.display),
            timing: cfg.engine.timing,
            initial_view: cfg.engine.view,
            particle_count: cfg.engine.particle_count,
            seed: cfg.engine.seed,
            defaults: params,
        }
    }

    /// Swap in a new parameter snapshot
    pub fn replace_params(&mut self, params: SpindleParams) {
        self.params = params;
    }

    /// Back to the parameters the session was loaded with
    pub fn reset(&mut self) {
        self.params = self.defaults;
    }
}
