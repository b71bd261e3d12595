//! Viewer entry point and the 2D/3D view switch
//!
//! The two renderers are mutually exclusive states of one Bevy app. Entering
//! a state mounts that renderer (spawns its entities, inserts its animation
//! resource); leaving it despawns every state-scoped entity and drops the
//! resource, so the next mount starts from a zero rotor angle.

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::render::renderer::RenderDevice;
use bevy::window::PrimaryWindow;

use crate::configuration::config::{SessionConfig, ViewConfig};
use crate::error::{SpResult, SpindleError};
use crate::simulation::session::Session;
use crate::visualization::controls::ControlsPlugin;
use crate::visualization::hud::HudPlugin;
use crate::visualization::spindle_vis2d::CrossSectionPlugin;
use crate::visualization::spindle_vis3d::ScenePlugin;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    CrossSection,
    #[default]
    Scene,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::CrossSection => "2d",
            ViewMode::Scene => "3d",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ViewMode::CrossSection => ViewMode::Scene,
            ViewMode::Scene => ViewMode::CrossSection,
        }
    }
}

impl From<ViewConfig> for ViewMode {
    fn from(cfg: ViewConfig) -> Self {
        match cfg {
            ViewConfig::CrossSection => ViewMode::CrossSection,
            ViewConfig::Scene => ViewMode::Scene,
        }
    }
}

const DEFAULT_LOG_FILTER: &str = "wgpu=error,naga=warn,spindlesim=info";

/// Open the viewer window and block until it is closed
pub fn run_viewer(cfg: &SessionConfig) -> AppExit {
    let filter = cfg
        .engine
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Aerostatic spindle".into(),
                    resolution: (cfg.engine.window_width, cfg.engine.window_height).into(),
                    ..default()
                }),
                ..default()
            })
            .set(LogPlugin {
                filter,
                level: Level::INFO,
                ..default()
            }),
    );

    // built after LogPlugin so clamping warnings are visible
    let session = Session::build_session(cfg);
    info!(
        "run_viewer: starting {} view (pressure={} MPa, speed={} RPM, load={} N)",
        ViewMode::from(session.initial_view).label(),
        session.params.pressure,
        session.params.speed,
        session.params.load
    );

    app.insert_resource(session)
        .insert_state(ViewMode::from(cfg.engine.view))
        .enable_state_scoped_entities::<ViewMode>()
        .add_plugins((CrossSectionPlugin, ScenePlugin, ControlsPlugin, HudPlugin))
        .add_systems(OnEnter(ViewMode::CrossSection), check_render_surface.pipe(report_fatal))
        .add_systems(OnEnter(ViewMode::Scene), check_render_surface.pipe(report_fatal));

    app.run()
}

/// Fail the mount if there is nothing to draw on
fn check_render_surface(
    windows: Query<(), With<PrimaryWindow>>,
    device: Option<Res<RenderDevice>>,
    view: Res<State<ViewMode>>,
) -> SpResult<()> {
    let view = view.get().label();
    if windows.is_empty() {
        return Err(SpindleError::RenderSurface { view, reason: "no primary window" });
    }
    if device.is_none() {
        return Err(SpindleError::RenderSurface { view, reason: "no GPU device" });
    }
    Ok(())
}

fn report_fatal(In(result): In<SpResult<()>>, mut exit: EventWriter<AppExit>) {
    if let Err(err) = result {
        error!("{err}");
        exit.send(AppExit::from_code(2));
    }
}
