//! Studio scene of the spindle
//!
//! Built once when the view mounts: supply tank with gauge, glass supply pipe,
//! cut-away housing with its distribution gallery and orifices, the rotor
//! (shaft + thrust disk) and the air particle cloud. Afterwards each frame only
//! moves what already exists; the one exception is a change of material or
//! maintenance mode, which rebuilds the scene geometry.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::math::primitives::{Cuboid, Cylinder, Torus};
use bevy::pbr::{FogFalloff, FogSettings, NotShadowCaster};
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::render::view::NoFrustumCulling;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::simulation::clock::TimeSource;
use crate::simulation::derivation::DerivedState;
use crate::simulation::params::{Material, SpindleParams};
use crate::simulation::particles::{advance_particles, seed_particles, FlowStep};
use crate::simulation::rotation::{FrameTiming, RotationMode, RotorClock};
use crate::simulation::session::Session;
use crate::visualization::camera::{orbit_camera, OrbitCamera};
use crate::visualization::hud::spawn_scene_hud;
use crate::visualization::meshes::{catmull_rom, open_cylinder_arc, point_cloud, tube_mesh};
use crate::visualization::view::ViewMode;

const CAMERA_EYE: Vec3 = Vec3::new(15.0, 10.0, 20.0);
const CAMERA_FOV_DEG: f32 = 35.0;

const ORIFICE_COUNT: usize = 8;
const ORIFICE_RING_RADIUS: f32 = 1.6;
const GALLERY_X: f32 = -1.0;

const SUPPLY_ORIGIN: Vec3 = Vec3::new(8.0, -4.0, 5.0);
const PIPE_POINTS: [Vec3; 4] = [
    Vec3::new(8.0, -2.2, 5.5),
    Vec3::new(5.0, -1.0, 4.0),
    Vec3::new(2.0, 1.0, 2.0),
    Vec3::new(0.0, 2.0, 0.0),
];

const SKY_BLUE: Color = Color::srgb(0.220, 0.741, 0.973); // #38bdf8
const ORIFICE_BLUE: Color = Color::srgb(0.055, 0.647, 0.914); // #0ea5e9

/// Fields a rebuild depends on. Any other parameter change is applied in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneKey {
    pub material: Material,
    pub maintenance_mode: bool,
}

impl SceneKey {
    pub fn from_params(params: &SpindleParams) -> Self {
        Self {
            material: params.material,
            maintenance_mode: params.maintenance_mode,
        }
    }
}

/// Animation state owned by the mounted scene
#[derive(Resource, Debug, Clone)]
pub struct SceneState {
    pub rotor: RotorClock,
    pub derived: DerivedState,
    pub key: SceneKey,
    particles: Handle<Mesh>,
    orifice_material: Handle<StandardMaterial>,
}

#[derive(Component)]
struct SceneCamera;

/// Top-level entity of the rebuildable geometry
#[derive(Component)]
struct SceneGeometry;

#[derive(Component)]
struct RotorAssembly;

#[derive(Component)]
struct GaugeNeedle;

#[derive(Component)]
struct AirParticles;

/// Rotor color per material
pub fn rotor_tint(material: Material) -> Color {
    match material {
        Material::Steel => Color::srgb(0.580, 0.639, 0.722), // #94a3b8
        Material::Titanium => Color::srgb(0.545, 0.557, 0.604),
        Material::Ceramic => Color::srgb(0.945, 0.961, 0.976),
    }
}

struct SceneMaterials {
    glass: Handle<StandardMaterial>,
    metal: Handle<StandardMaterial>,
    rotor: Handle<StandardMaterial>,
    plastic: Handle<StandardMaterial>,
    brass: Handle<StandardMaterial>,
    needle: Handle<StandardMaterial>,
    orifice: Handle<StandardMaterial>,
    particles: Handle<StandardMaterial>,
}

fn metal(base_color: Color) -> StandardMaterial {
    StandardMaterial {
        base_color,
        metallic: 0.9,
        perceptual_roughness: 0.1,
        clearcoat: 1.0,
        ..Default::default()
    }
}

fn build_materials(materials: &mut Assets<StandardMaterial>, params: &SpindleParams) -> SceneMaterials {
    SceneMaterials {
        glass: materials.add(StandardMaterial {
            base_color: Color::srgba(0.220, 0.741, 0.973, 0.3),
            specular_transmission: 0.9,
            thickness: 0.5,
            perceptual_roughness: 0.1,
            alpha_mode: AlphaMode::Blend,
            double_sided: true,
            cull_mode: None,
            ..Default::default()
        }),
        metal: materials.add(metal(rotor_tint(Material::Steel))),
        rotor: materials.add(metal(rotor_tint(params.material))),
        plastic: materials.add(StandardMaterial {
            base_color: Color::srgb(0.118, 0.161, 0.231), // #1e293b
            perceptual_roughness: 0.8,
            ..Default::default()
        }),
        brass: materials.add(StandardMaterial {
            base_color: Color::srgb(0.831, 0.686, 0.216), // #d4af37
            metallic: 0.8,
            perceptual_roughness: 0.3,
            ..Default::default()
        }),
        needle: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            unlit: true,
            ..Default::default()
        }),
        orifice: materials.add(StandardMaterial {
            base_color: ORIFICE_BLUE,
            unlit: true,
            ..Default::default()
        }),
        particles: materials.add(StandardMaterial {
            base_color: Color::srgba(0.220, 0.741, 0.973, 0.6),
            unlit: true,
            alpha_mode: AlphaMode::Add,
            ..Default::default()
        }),
    }
}

/// Cylinder lying along X instead of Y
fn along_x(translation: Vec3) -> Transform {
    Transform::from_translation(translation).with_rotation(Quat::from_rotation_z(FRAC_PI_2))
}

/// Spawn everything that depends on material or maintenance mode
fn spawn_scene_geometry(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    session: &Session,
    derived: DerivedState,
) -> SceneState {
    let mats = build_materials(materials, &session.params);
    let scoped = || (SceneGeometry, StateScoped(ViewMode::Scene));

    // supply tank, gauge and needle
    commands
        .spawn((SpatialBundle::from_transform(Transform::from_translation(SUPPLY_ORIGIN)), scoped()))
        .with_children(|supply| {
            supply.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.5, 3.0).mesh().resolution(32)),
                material: mats.metal.clone(),
                ..Default::default()
            });
            supply.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(0.6, 0.2).mesh().resolution(32)),
                material: mats.plastic.clone(),
                transform: Transform::from_xyz(0.0, 1.8, 0.5).with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
                ..Default::default()
            });
            // pivot at the needle's base so rotation sweeps it like a dial
            supply
                .spawn((
                    SpatialBundle::from_transform(
                        Transform::from_xyz(0.0, 1.8, 0.65)
                            .with_rotation(Quat::from_rotation_z(derived.gauge_needle_angle as f32)),
                    ),
                    GaugeNeedle,
                ))
                .with_children(|pivot| {
                    pivot.spawn(PbrBundle {
                        mesh: meshes.add(Cuboid::new(0.05, 0.5, 0.05).mesh()),
                        material: mats.needle.clone(),
                        transform: Transform::from_xyz(0.0, 0.25, 0.0),
                        ..Default::default()
                    });
                });
        });

    // glass supply pipe
    let path = catmull_rom(&PIPE_POINTS, 32);
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(tube_mesh(&path, 0.15, 12)),
            material: mats.glass.clone(),
            ..Default::default()
        },
        scoped(),
    ));

    // housing, gallery and orifices
    commands
        .spawn((SpatialBundle::default(), scoped()))
        .with_children(|spindle| {
            spindle.spawn(PbrBundle {
                mesh: meshes.add(open_cylinder_arc(3.5, 10.0, 64, 0.0, PI * 1.5)),
                material: mats.glass.clone(),
                transform: along_x(Vec3::ZERO),
                ..Default::default()
            });
            spindle.spawn(PbrBundle {
                mesh: meshes.add(
                    Torus {
                        minor_radius: 0.1,
                        major_radius: 3.1,
                    }
                    .mesh(),
                ),
                material: mats.brass.clone(),
                transform: along_x(Vec3::new(GALLERY_X, 0.0, 0.0)),
                ..Default::default()
            });

            let orifice_mesh = meshes.add(Cylinder::new(0.05, 1.0).mesh().resolution(8));
            for i in 0..ORIFICE_COUNT {
                let angle = i as f32 / ORIFICE_COUNT as f32 * TAU;
                spindle.spawn(PbrBundle {
                    mesh: orifice_mesh.clone(),
                    material: mats.orifice.clone(),
                    transform: along_x(Vec3::new(
                        GALLERY_X,
                        angle.cos() * ORIFICE_RING_RADIUS,
                        angle.sin() * ORIFICE_RING_RADIUS,
                    )),
                    ..Default::default()
                });
            }
        });

    // rotor: shaft + thrust disk, spun as one
    commands
        .spawn((SpatialBundle::default(), RotorAssembly, scoped()))
        .with_children(|rotor| {
            rotor.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(1.5, 14.0).mesh().resolution(64)),
                material: mats.rotor.clone(),
                transform: along_x(Vec3::ZERO),
                ..Default::default()
            });
            rotor.spawn(PbrBundle {
                mesh: meshes.add(Cylinder::new(3.2, 0.5).mesh().resolution(64)),
                material: mats.rotor.clone(),
                transform: along_x(Vec3::new(-1.5, 0.0, 0.0)),
                ..Default::default()
            });
        });

    // air particles; bounds change every frame so culling is off
    let particles = meshes.add(point_cloud(seed_particles(session.particle_count, session.seed)));
    commands.spawn((
        PbrBundle {
            mesh: particles.clone(),
            material: mats.particles.clone(),
            ..Default::default()
        },
        NoFrustumCulling,
        NotShadowCaster,
        AirParticles,
        scoped(),
    ));

    SceneState {
        rotor: RotorClock::new(RotationMode::Scene),
        derived,
        key: SceneKey::from_params(&session.params),
        particles,
        orifice_material: mats.orifice,
    }
}

fn setup_scene(
    mut commands: Commands,
    session: Res<Session>,
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("scene view mounted with {} particles", session.particle_count);

    let aspect_ratio = windows
        .get_single()
        .ok()
        .filter(|w| w.height() > 0.0)
        .map(|w| w.width() / w.height())
        .unwrap_or(1.0);

    commands.spawn((
        Camera3dBundle {
            camera: Camera {
                clear_color: ClearColorConfig::Custom(Color::WHITE),
                ..Default::default()
            },
            projection: Projection::Perspective(PerspectiveProjection {
                fov: CAMERA_FOV_DEG.to_radians(),
                near: 0.1,
                far: 1000.0,
                aspect_ratio,
            }),
            transform: Transform::from_translation(CAMERA_EYE).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        FogSettings {
            color: Color::WHITE,
            falloff: FogFalloff::Linear { start: 15.0, end: 60.0 },
            ..Default::default()
        },
        OrbitCamera::looking_from(CAMERA_EYE, Vec3::ZERO),
        SceneCamera,
        StateScoped(ViewMode::Scene),
    ));

    // studio lighting: soft fill, a shadow-casting key light, a blue rim light
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
    });
    commands.spawn((
        DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance: 8000.0,
                shadows_enabled: true,
                ..Default::default()
            },
            transform: Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        StateScoped(ViewMode::Scene),
    ));
    commands.spawn((
        PointLightBundle {
            point_light: PointLight {
                color: SKY_BLUE,
                intensity: 400_000.0,
                range: 50.0,
                ..Default::default()
            },
            transform: Transform::from_xyz(-10.0, 5.0, 5.0),
            ..Default::default()
        },
        StateScoped(ViewMode::Scene),
    ));

    spawn_scene_hud(&mut commands);

    let derived = DerivedState::derive(&session.params, &*time);
    let state = spawn_scene_geometry(&mut commands, &mut meshes, &mut materials, &session, derived);
    commands.insert_resource(state);
}

fn teardown_scene(mut commands: Commands) {
    commands.remove_resource::<SceneState>();
    commands.insert_resource(AmbientLight::default());
    info!("scene view unmounted");
}

/// Rebuild the geometry when material or maintenance mode changed
fn rebuild_on_material_change(
    mut commands: Commands,
    session: Res<Session>,
    state: Res<SceneState>,
    geometry: Query<Entity, With<SceneGeometry>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let key = SceneKey::from_params(&session.params);
    if key == state.key {
        return;
    }
    info!(
        "rebuilding scene: material {} -> {}, maintenance {} -> {}",
        state.key.material.label(),
        key.material.label(),
        state.key.maintenance_mode,
        key.maintenance_mode
    );

    for entity in &geometry {
        commands.entity(entity).despawn_recursive();
    }
    let fresh = spawn_scene_geometry(&mut commands, &mut meshes, &mut materials, &session, state.derived);
    commands.insert_resource(fresh);
}

fn derive_scene(session: Res<Session>, time: Res<Time>, mut state: ResMut<SceneState>) {
    state.derived = DerivedState::derive(&session.params, &*time);
}

fn scene_running(session: Res<Session>) -> bool {
    session.display.running
}

fn spin_rotor(
    session: Res<Session>,
    time: Res<Time>,
    mut state: ResMut<SceneState>,
    mut rotors: Query<&mut Transform, With<RotorAssembly>>,
) {
    let timing = FrameTiming::from_config(session.timing, time.delta_secs());
    state.rotor.advance(session.params.speed, timing);
    let angle = state.rotor.display_angle() as f32;
    for mut transform in &mut rotors {
        transform.rotation = Quat::from_rotation_x(angle);
    }
}

fn swing_gauge_needle(state: Res<SceneState>, mut needles: Query<&mut Transform, With<GaugeNeedle>>) {
    for mut transform in &mut needles {
        transform.rotation = Quat::from_rotation_z(state.derived.gauge_needle_angle as f32);
    }
}

fn advance_air_particles(state: Res<SceneState>, mut meshes: ResMut<Assets<Mesh>>) {
    let Some(mesh) = meshes.get_mut(&state.particles) else {
        return;
    };
    let step = FlowStep::new(state.derived.normalized_pressure, state.derived.normalized_speed);
    if let Some(VertexAttributeValues::Float32x3(positions)) = mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION) {
        advance_particles(positions, &step);
    }
}

fn pulse_orifices(session: Res<Session>, state: Res<SceneState>, mut materials: ResMut<Assets<StandardMaterial>>) {
    if !session.params.maintenance_mode {
        return;
    }
    if let Some(material) = materials.get_mut(&state.orifice_material) {
        material.base_color = Color::hsl(state.derived.maintenance_hue as f32 * 360.0, 1.0, 0.5);
    }
}

/// Keep the perspective aspect in step with the window
fn sync_scene_aspect(mut resized: EventReader<WindowResized>, mut cameras: Query<&mut Projection, With<SceneCamera>>) {
    let Some(ev) = resized.read().last() else {
        return;
    };
    let Ok(mut projection) = cameras.get_single_mut() else {
        return;
    };
    if let Projection::Perspective(perspective) = projection.as_mut() {
        if ev.height > 0.0 {
            perspective.aspect_ratio = ev.width / ev.height;
            debug!("scene resized to {}x{}", ev.width, ev.height);
        }
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(ViewMode::Scene), setup_scene)
            .add_systems(OnExit(ViewMode::Scene), teardown_scene)
            .add_systems(
                Update,
                (
                    rebuild_on_material_change,
                    derive_scene,
                    (spin_rotor, swing_gauge_needle, advance_air_particles, pulse_orifices)
                        .chain()
                        .run_if(scene_running),
                )
                    .chain()
                    .run_if(in_state(ViewMode::Scene)),
            )
            .add_systems(Update, (orbit_camera, sync_scene_aspect));
    }
}
