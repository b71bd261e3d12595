//! Cross-section view A-A
//!
//! Filled shapes (stator, rotor disk, center cap) are meshes spawned once at
//! mount; the per-frame strokes (orifice channels, particles, pressure ring,
//! rotor outline and spokes) are gizmos redrawn every frame, which plays the
//! role of clearing and repainting a canvas.

use bevy::math::primitives::{Annulus, Circle};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResized};

use crate::simulation::clock::TimeSource;
use crate::simulation::cross_section::{
    fit_scale, orifice_channels, orifice_particles, pressure_ring, rotor_center, rotor_spokes, NVec2,
    CENTER_CAP_RADIUS, PARTICLE_RADIUS, ROTOR_RADIUS, STATOR_RADIUS, STATOR_STROKE,
};
use crate::simulation::derivation::{DerivedState, DEFAULT_ANGLE_STEP_DEG};
use crate::simulation::rotation::{FrameTiming, RotationMode, RotorClock};
use crate::simulation::session::Session;
use crate::visualization::hud::spawn_cross_section_hud;
use crate::visualization::view::ViewMode;

const BACKGROUND: Color = Color::srgb(0.059, 0.090, 0.165); // #0f172a
const STATOR_FILL: Color = Color::srgb(0.118, 0.161, 0.231); // #1e293b
const STATOR_EDGE: Color = Color::srgb(0.278, 0.333, 0.412); // #475569
const ROTOR_FILL: Color = Color::srgb(0.796, 0.835, 0.882); // #cbd5e1
const ROTOR_EDGE: Color = Color::srgb(0.580, 0.639, 0.722); // #94a3b8
const SPOKE: Color = Color::srgb(0.392, 0.455, 0.545); // #64748b
const AIR_FILM_HIGH: Color = Color::srgb(0.055, 0.647, 0.914); // #0ea5e9
const AIR_PARTICLE: Color = Color::srgb(0.490, 0.827, 0.988); // #7dd3fc
const PRESSURE_HOT: Color = Color::srgba(0.937, 0.267, 0.267, 0.4); // #ef4444
const PRESSURE_COLD: Color = Color::srgba(0.063, 0.725, 0.506, 0.4); // #10b981

/// Animation state owned by the mounted cross-section
#[derive(Resource, Debug, Clone)]
pub struct CrossSectionState {
    pub rotor: RotorClock,
    pub derived: DerivedState,
}

#[derive(Component)]
struct CrossSectionCamera;

#[derive(Component)]
struct RotorDisk;

/// Thick strokes: supply channels, particles and the pressure ring
#[derive(Default, Reflect, GizmoConfigGroup)]
struct FlowGizmos;

/// Canvas y points down, world y points up
pub fn canvas_to_world(v: NVec2) -> Vec2 {
    Vec2::new(v.x as f32, -v.y as f32)
}

fn configure_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line_width = 2.0;
    let (config, _) = config_store.config_mut::<FlowGizmos>();
    config.line_width = 4.0;
}

fn setup_cross_section(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    info!("cross-section view mounted");

    let mut camera = Camera2dBundle::default();
    camera.camera.clear_color = ClearColorConfig::Custom(BACKGROUND);
    if let Ok(window) = windows.get_single() {
        camera.projection.scale = fit_scale(window.width() as f64, window.height() as f64) as f32;
    }
    commands.spawn((camera, CrossSectionCamera, StateScoped(ViewMode::CrossSection)));

    // stator body, then its thick edge stroke centered on the stator radius
    let half_stroke = (STATOR_STROKE / 2.0) as f32;
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Circle::new(STATOR_RADIUS as f32))),
            material: materials.add(ColorMaterial::from(STATOR_FILL)),
            transform: Transform::from_xyz(0.0, 0.0, 0.0),
            ..Default::default()
        },
        StateScoped(ViewMode::CrossSection),
    ));
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Annulus::new(
                STATOR_RADIUS as f32 - half_stroke,
                STATOR_RADIUS as f32 + half_stroke,
            ))),
            material: materials.add(ColorMaterial::from(STATOR_EDGE)),
            transform: Transform::from_xyz(0.0, 0.0, 0.1),
            ..Default::default()
        },
        StateScoped(ViewMode::CrossSection),
    ));

    // rotor disk with its center cap riding along
    commands
        .spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(ROTOR_RADIUS as f32))),
                material: materials.add(ColorMaterial::from(ROTOR_FILL)),
                transform: Transform::from_xyz(0.0, 0.0, 1.0),
                ..Default::default()
            },
            RotorDisk,
            StateScoped(ViewMode::CrossSection),
        ))
        .with_children(|parent| {
            parent.spawn(MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(CENTER_CAP_RADIUS as f32))),
                material: materials.add(ColorMaterial::from(STATOR_EDGE)),
                transform: Transform::from_xyz(0.0, 0.0, 0.1),
                ..Default::default()
            });
        });

    spawn_cross_section_hud(&mut commands);
}

/// Fresh animation state for a newly mounted cross-section
pub fn mount_cross_section(mut commands: Commands, session: Res<Session>, time: Res<Time>) {
    commands.insert_resource(CrossSectionState {
        rotor: RotorClock::new(RotationMode::CrossSection),
        derived: DerivedState::derive(&session.params, &*time),
    });
}

pub fn teardown_cross_section(mut commands: Commands) {
    // entities are state-scoped, only the animation state needs dropping
    commands.remove_resource::<CrossSectionState>();
    info!("cross-section view unmounted");
}

/// Derive this frame's state, then advance the rotor
pub fn derive_cross_section(session: Res<Session>, time: Res<Time>, mut state: ResMut<CrossSectionState>) {
    state.derived = DerivedState::derive(&session.params, &*time);
    let timing = FrameTiming::from_config(session.timing, time.delta_secs());
    state.rotor.advance(session.params.speed, timing);
}

fn sync_rotor_2d(state: Res<CrossSectionState>, mut query: Query<&mut Transform, With<RotorDisk>>) {
    let center = canvas_to_world(rotor_center(&state.derived));
    for mut transform in &mut query {
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        // clockwise on screen, matching the spokes
        transform.rotation = Quat::from_rotation_z(-state.rotor.display_angle() as f32);
    }
}

fn draw_flow_overlays(session: Res<Session>, state: Res<CrossSectionState>, mut flow: Gizmos<FlowGizmos>) {
    for channel in orifice_channels() {
        flow.line_2d(canvas_to_world(channel.start), canvas_to_world(channel.end), AIR_FILM_HIGH);
    }

    if session.display.show_air_particles {
        for p in orifice_particles(state.derived.particle_phase) {
            flow.circle_2d(canvas_to_world(p), PARTICLE_RADIUS as f32, AIR_PARTICLE);
        }
    }

    if session.display.show_pressure_map {
        let field = state.derived.pressure_field(DEFAULT_ANGLE_STEP_DEG);
        for ring in pressure_ring(&field) {
            let color = if ring.hot { PRESSURE_HOT } else { PRESSURE_COLD };
            flow.line_2d(canvas_to_world(ring.segment.start), canvas_to_world(ring.segment.end), color);
        }
    }
}

fn draw_rotor_details(state: Res<CrossSectionState>, mut gizmos: Gizmos) {
    let center = rotor_center(&state.derived);
    gizmos.circle_2d(canvas_to_world(center), ROTOR_RADIUS as f32, ROTOR_EDGE);
    for spoke in rotor_spokes(center, state.rotor.display_angle()) {
        gizmos.line_2d(canvas_to_world(spoke.start), canvas_to_world(spoke.end), SPOKE);
    }
}

/// Keep the whole 600 x 600 section visible when the window shrinks
fn fit_cross_section(
    mut resized: EventReader<WindowResized>,
    mut cameras: Query<&mut OrthographicProjection, With<CrossSectionCamera>>,
) {
    let Some(ev) = resized.read().last() else {
        return;
    };
    // nothing mounted, nothing to fit
    let Ok(mut projection) = cameras.get_single_mut() else {
        return;
    };
    projection.scale = fit_scale(ev.width as f64, ev.height as f64) as f32;
    debug!("cross-section resized to {}x{}, scale {}", ev.width, ev.height, projection.scale);
}

pub struct CrossSectionPlugin;

impl Plugin for CrossSectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_gizmo_group::<FlowGizmos>()
            .add_systems(Startup, configure_gizmos)
            .add_systems(OnEnter(ViewMode::CrossSection), (setup_cross_section, mount_cross_section))
            .add_systems(OnExit(ViewMode::CrossSection), teardown_cross_section)
            .add_systems(
                Update,
                (derive_cross_section, sync_rotor_2d, draw_flow_overlays, draw_rotor_details)
                    .chain()
                    .run_if(in_state(ViewMode::CrossSection)),
            )
            .add_systems(Update, fit_cross_section);
    }
}
