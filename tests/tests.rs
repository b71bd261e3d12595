use std::f64::consts::PI;
use std::time::Duration;

use bevy::app::{App, Update};
use bevy::ecs::schedule::IntoSystemConfigs;
use bevy::math::Vec3;
use bevy::state::app::{AppExtStates, StatesPlugin};
use bevy::state::condition::in_state;
use bevy::state::state::{NextState, OnEnter, OnExit};
use bevy::time::TimeUpdateStrategy;
use bevy::MinimalPlugins;

use spindlesim::simulation::clock::{ManualClock, TimeSource};
use spindlesim::simulation::cross_section::{
    fit_scale, orifice_channels, orifice_particles, pressure_ring, rotor_center, rotor_spokes, NVec2, ROTOR_RADIUS,
    STATOR_RADIUS,
};
use spindlesim::simulation::derivation::{
    compute_eccentricity, flow, gap_factor, gauge_needle_angle, local_pressure, radial_offset, sample_pressure_field,
    stiffness, DerivedState, MAX_ECCENTRICITY, MIN_GAP_FACTOR,
};
use spindlesim::simulation::params::{Material, SpindleParams};
use spindlesim::simulation::particles::{
    advance_particles, seed_particles, FlowStep, FILM_RADIUS, FILM_THICKNESS, REENTRY_AT,
};
use spindlesim::simulation::rotation::{advance_rotation, FrameTiming, RotationMode, RotorClock};
use spindlesim::simulation::session::Session;
use spindlesim::visualization::camera::OrbitCamera;
use spindlesim::visualization::controls::{apply_action, ControlAction};
use spindlesim::visualization::hud::{group_thousands, readout_text, Readout};
use spindlesim::visualization::meshes::{catmull_rom, open_cylinder_arc, point_cloud, tube_mesh};
use spindlesim::visualization::spindle_vis2d::{
    canvas_to_world, derive_cross_section, mount_cross_section, teardown_cross_section, CrossSectionState,
};
use spindlesim::visualization::spindle_vis3d::SceneKey;
use spindlesim::visualization::view::ViewMode;
use spindlesim::{SessionConfig, SpindleError, TimingConfig, ViewConfig};

/// Parameters at a given pressure and load, everything else default
pub fn params(pressure: f64, speed: u32, load: u32) -> SpindleParams {
    SpindleParams::default()
        .with_pressure(pressure)
        .with_speed(speed as i64)
        .with_load(load as i64)
}

/// Session built from the default configuration
pub fn default_session() -> Session {
    Session::build_session(&SessionConfig::default())
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

// ==================================================================================
// Derivation tests
// ==================================================================================

#[test]
fn eccentricity_grows_with_load_then_saturates() {
    assert_eq!(compute_eccentricity(0.0), 0.0);
    assert!(close(compute_eccentricity(50.0), 0.25, 1e-12));
    assert!(close(compute_eccentricity(120.0), 0.6, 1e-12));
    assert_eq!(compute_eccentricity(200.0), MAX_ECCENTRICITY);
    assert_eq!(compute_eccentricity(600.0), MAX_ECCENTRICITY);
}

#[test]
fn eccentricity_rejects_bad_loads() {
    assert_eq!(compute_eccentricity(-50.0), 0.0);
    assert_eq!(compute_eccentricity(f64::NAN), 0.0);
    assert_eq!(compute_eccentricity(f64::INFINITY), MAX_ECCENTRICITY);
}

#[test]
fn unloaded_rotor_sits_centered_with_uniform_ring() {
    let derived = DerivedState::derive(&params(0.45, 15000, 0), &ManualClock::at(3.0));
    assert_eq!(derived.eccentricity, 0.0);
    assert_eq!(derived.radial_offset, 0.0);

    let field = derived.pressure_field(2.0);
    assert_eq!(field.len(), 180);
    for s in &field {
        assert!(close(s.pressure, 0.45, 1e-12), "ring not uniform at {} deg: {}", s.angle_deg, s.pressure);
        assert!(!s.hot, "uniform ring must render cold");
    }
}

#[test]
fn saturated_load_peaks_pressure_on_loaded_side() {
    let e = compute_eccentricity(200.0);
    assert!(close(e, 0.6, 1e-12));
    assert!(close(gap_factor(0.0, e), 0.4, 1e-12));
    assert!(close(local_pressure(0.45, 0.0, e), 1.8, 1e-9));

    let field = sample_pressure_field(0.45, e, 2.0);
    let first = field.sample(0).expect("ring has samples");
    assert_eq!(first.angle_deg, 0.0);
    assert!(close(first.pressure, 1.8, 1e-9));
    assert!(first.hot);

    // opposite side opens up and drops below supply
    let opposite = field.sample(90).expect("180 deg sample");
    assert!(close(opposite.angle_deg, 180.0, 1e-9));
    assert!(opposite.pressure < 0.45);
    assert!(!opposite.hot);
}

#[test]
fn pressure_field_is_restartable() {
    let field = sample_pressure_field(0.6, 0.3, 2.0);
    let first: Vec<_> = field.iter().collect();
    let second: Vec<_> = (&field).into_iter().collect();
    assert_eq!(first.len(), 180);
    assert_eq!(first, second);
    assert!(first.iter().all(|s| s.angle_deg < 360.0));
}

#[test]
fn pressure_field_step_handling() {
    assert_eq!(sample_pressure_field(0.5, 0.2, 1.0).len(), 360);
    assert_eq!(sample_pressure_field(0.5, 0.2, 7.0).len(), 52); // 0, 7, ..., 357
    assert_eq!(sample_pressure_field(0.5, 0.2, 0.0).len(), 180);
    assert_eq!(sample_pressure_field(0.5, 0.2, -3.0).len(), 180);
    assert_eq!(sample_pressure_field(0.5, 0.2, f64::NAN).len(), 180);
    assert_eq!(sample_pressure_field(0.5, 0.2, 720.0).len(), 1);

    assert_eq!(sample_pressure_field(0.5, 0.2, -3.0).step_deg(), 2.0);
    assert_eq!(sample_pressure_field(0.5, 0.2, 720.0).step_deg(), 360.0);
    assert_eq!(sample_pressure_field(0.5, 0.2, 7.0).step_deg(), 7.0);
}

#[test]
fn gap_factor_is_guarded_against_wild_eccentricity() {
    // clamped to 0.6 internally, so the divisor stays at 0.4 or more
    assert!(close(gap_factor(0.0, 5.0), 0.4, 1e-12));
    assert!(gap_factor(0.0, f64::NAN) >= MIN_GAP_FACTOR);
    assert!(local_pressure(0.8, 0.0, 100.0).is_finite());
    let field = sample_pressure_field(0.8, 42.0, 2.0);
    assert!(field.iter().all(|s| s.gap_factor > 0.0 && s.pressure.is_finite()));
}

#[test]
fn full_scale_pressure_readouts() {
    assert!(close(gauge_needle_angle(0.8), PI / 2.0, 1e-12));
    assert!(close(gauge_needle_angle(0.0), -PI / 2.0, 1e-12));
    assert!(close(stiffness(0.8), 144.0, 1e-9));
    assert!(close(flow(0.8), 36.0, 1e-9));
}

#[test]
fn radial_offset_scales_eccentricity() {
    assert!(close(radial_offset(0.6), 12.0, 1e-12));
    assert!(close(radial_offset(2.0), 12.0, 1e-12));
    assert_eq!(radial_offset(-1.0), 0.0);
}

#[test]
fn derivation_is_idempotent() {
    let p = params(0.55, 42000, 330);
    let clock = ManualClock::at(12.345);
    let a = DerivedState::derive(&p, &clock);
    let b = DerivedState::derive(&p, &clock);
    assert_eq!(a, b);
}

#[test]
fn phase_effects_follow_the_clock() {
    let p = params(0.45, 15000, 100);
    let derived = DerivedState::derive(&p, &ManualClock::at(1.25));
    assert!(close(derived.particle_phase, 0.5, 1e-9));

    let mut clock = ManualClock::at(0.0);
    clock.tick(-1.0);
    assert_eq!(clock.elapsed_secs(), 0.0);
    let at_zero = DerivedState::derive(&p, &clock);
    assert!(close(at_zero.maintenance_hue, 0.5, 1e-12));
    assert!(close(at_zero.orbit_trace.0, 0.0, 1e-12));
    assert!(close(at_zero.orbit_trace.1, 1.0, 1e-12));
}

// ==================================================================================
// Rotation tests
// ==================================================================================

#[test]
fn stopped_rotor_never_turns() {
    for mode in [RotationMode::CrossSection, RotationMode::Scene] {
        let mut rotor = RotorClock::new(mode);
        for _ in 0..1000 {
            rotor.advance(0, FrameTiming::Elapsed(1.0 / 60.0));
            rotor.advance(0, FrameTiming::PerCall(1.0 / 60.0));
        }
        assert_eq!(rotor.angle(), 0.0);
    }
}

#[test]
fn cross_section_per_call_steps_speed_over_1000() {
    let mut rotor = RotorClock::new(RotationMode::CrossSection);
    for _ in 0..3 {
        // the per-call step ignores how long the frame took
        rotor.advance(15000, FrameTiming::PerCall(0.5));
    }
    assert_eq!(rotor.angle(), 45.0);
}

#[test]
fn elapsed_timing_is_refresh_rate_independent() {
    // one second at 30 Hz and at 120 Hz should land on the same angle
    let mut slow = 0.0;
    for _ in 0..30 {
        slow = advance_rotation(slow, 1000, RotationMode::CrossSection, FrameTiming::Elapsed(1.0 / 30.0));
    }
    let mut fast = 0.0;
    for _ in 0..120 {
        fast = advance_rotation(fast, 1000, RotationMode::CrossSection, FrameTiming::Elapsed(1.0 / 120.0));
    }
    assert!(close(slow, 60.0, 1e-9));
    assert!(close(fast, 60.0, 1e-9));
}

#[test]
fn scene_rotation_rate() {
    assert!(close(advance_rotation(0.0, 60000, RotationMode::Scene, FrameTiming::Elapsed(1.0)), 15.0, 1e-12));
    assert!(close(advance_rotation(0.0, 60000, RotationMode::Scene, FrameTiming::PerCall(0.25)), 3.75, 1e-12));
}

#[test]
fn scene_speed_ignores_refresh_rate_under_frame_timing() {
    // one second of redraws at 30 Hz and at 144 Hz, both configured as per-frame
    for hz in [30.0, 144.0] {
        let mut rotor = RotorClock::new(RotationMode::Scene);
        for _ in 0..hz as usize {
            rotor.advance(60000, FrameTiming::from_config(TimingConfig::Frame, 1.0 / hz));
        }
        assert!(close(rotor.angle(), 15.0, 1e-9));
    }
}

#[test]
fn display_angle_wraps_but_accumulator_does_not() {
    let mut rotor = RotorClock::new(RotationMode::CrossSection);
    for _ in 0..10_000 {
        rotor.advance(80000, FrameTiming::PerCall(1.0 / 60.0));
    }
    assert_eq!(rotor.angle(), 800_000.0);
    let shown = rotor.display_angle();
    assert!((0.0..2.0 * PI).contains(&shown));
    assert!(close(shown, 800_000.0_f64.rem_euclid(2.0 * PI), 1e-9));
}

#[test]
fn bad_deltas_do_not_rewind() {
    let start = 3.0;
    for dt in [-0.5, f64::NAN, f64::NEG_INFINITY] {
        let next = advance_rotation(start, 80000, RotationMode::Scene, FrameTiming::Elapsed(dt));
        assert_eq!(next, start);
    }
}

#[test]
fn timing_follows_configuration() {
    assert_eq!(FrameTiming::from_config(TimingConfig::Frame, 0.5), FrameTiming::PerCall(0.5));
    assert_eq!(FrameTiming::from_config(TimingConfig::Elapsed, 0.5), FrameTiming::Elapsed(0.5));
}

// ==================================================================================
// Particle tests
// ==================================================================================

#[test]
fn seeding_is_deterministic_and_bounded() {
    let a = seed_particles(5000, 7);
    let b = seed_particles(5000, 7);
    assert_eq!(a.len(), 5000);
    assert_eq!(a, b);
    assert_ne!(a, seed_particles(5000, 8));

    for p in &a {
        assert!((-6.0..=6.0).contains(&p[0]), "axial out of range: {}", p[0]);
        let r = (p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((r - FILM_RADIUS).abs() <= FILM_THICKNESS / 2.0 + 1e-4, "radius out of film: {r}");
    }
}

#[test]
fn particle_past_lower_bound_reenters_upstream() {
    let mut positions = vec![[-7.95_f32, 1.6, 0.0], [-7.0, 0.0, 1.6]];
    advance_particles(&mut positions, &FlowStep::new(1.0, 0.0));

    assert_eq!(positions[0][0], REENTRY_AT);
    assert!((positions[1][0] - (-7.15)).abs() < 1e-5);
}

#[test]
fn swirl_keeps_particles_on_their_radius() {
    let mut positions = seed_particles(200, 3);
    let radii: Vec<f32> = positions.iter().map(|p| (p[1] * p[1] + p[2] * p[2]).sqrt()).collect();

    let step = FlowStep::new(0.5, 80000.0 / 60000.0);
    for _ in 0..100 {
        advance_particles(&mut positions, &step);
    }
    for (p, r0) in positions.iter().zip(radii) {
        let r = (p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((r - r0).abs() < 1e-3);
    }
}

#[test]
fn stopped_spindle_does_not_swirl() {
    let mut positions = vec![[0.0_f32, 1.6, 0.0]];
    advance_particles(&mut positions, &FlowStep::new(0.5, 0.0));
    assert_eq!(positions[0][1], 1.6);
    assert_eq!(positions[0][2], 0.0);
}

// ==================================================================================
// Cross-section layout tests
// ==================================================================================

#[test]
fn eight_orifices_through_the_stator_wall() {
    let channels: Vec<_> = orifice_channels().collect();
    assert_eq!(channels.len(), 8);
    for c in &channels {
        assert!(close(c.start.norm(), STATOR_RADIUS + 10.0, 1e-9));
        assert!(close(c.end.norm(), STATOR_RADIUS, 1e-9));
    }
}

#[test]
fn orifice_particles_travel_inward() {
    let dots: Vec<_> = orifice_particles(0.5).collect();
    assert_eq!(dots.len(), 8);
    assert!(dots.iter().all(|d| close(d.norm(), STATOR_RADIUS - 10.0, 1e-9)));
}

#[test]
fn ring_segments_start_at_rotor_radius() {
    let derived = DerivedState::derive(&params(0.45, 0, 0), &ManualClock::at(0.0));
    let field = derived.pressure_field(2.0);
    let ring: Vec<_> = pressure_ring(&field).collect();
    assert_eq!(ring.len(), 180);
    for seg in &ring {
        assert!(close(seg.segment.start.norm(), ROTOR_RADIUS, 1e-9));
        assert!(close(seg.segment.end.norm(), ROTOR_RADIUS + 4.5, 1e-9));
    }
}

#[test]
fn rotor_shifts_toward_load_and_spokes_follow() {
    let derived = DerivedState::derive(&params(0.45, 0, 600), &ManualClock::at(0.0));
    let center = rotor_center(&derived);
    assert!(close(center.x, 12.0, 1e-12));
    assert_eq!(center.y, 0.0);

    let spokes: Vec<_> = rotor_spokes(center, 0.0).collect();
    assert_eq!(spokes.len(), 4);
    assert!(close(spokes[0].end.x, 12.0 + ROTOR_RADIUS, 1e-9));
    assert!(spokes.iter().all(|s| close((s.end - s.start).norm(), ROTOR_RADIUS, 1e-9)));
}

#[test]
fn canvas_fits_small_windows_only() {
    assert_eq!(fit_scale(1280.0, 800.0), 1.0);
    assert!(close(fit_scale(300.0, 900.0), 2.0, 1e-12));
    assert_eq!(fit_scale(0.0, 0.0), 1.0);
}

#[test]
fn rotor_turns_clockwise_on_screen() {
    // a growing angle moves the first spoke tip from +x toward screen-down
    let tip = |angle| canvas_to_world(rotor_spokes(NVec2::zeros(), angle).next().expect("four spokes").end);
    assert!(tip(0.0).y.abs() < 1e-4);
    assert!(tip(0.1).y < 0.0);

    // the disk transform turns the same way as the spokes
    let disk = bevy::math::Quat::from_rotation_z(-0.1_f32) * Vec3::X;
    assert!(disk.y < 0.0);
}

// ==================================================================================
// Configuration and session tests
// ==================================================================================

#[test]
fn empty_yaml_gives_panel_defaults() {
    let cfg = SessionConfig::from_yaml_str("{}").expect("empty session parses");
    let session = Session::build_session(&cfg);
    assert_eq!(session.params.pressure, 0.45);
    assert_eq!(session.params.speed, 15000);
    assert_eq!(session.params.load, 50);
    assert_eq!(session.params.material, Material::Steel);
    assert!(session.display.running);
    assert_eq!(session.initial_view, ViewConfig::Scene);
    assert_eq!(session.particle_count, 5000);
}

#[test]
fn partial_yaml_overrides_fields() {
    let yaml = r#"
parameters:
  load: 200
  material: "ceramic"
display:
  show_pressure_map: false
engine:
  view: "2d"
  timing: "frame"
"#;
    let cfg = SessionConfig::from_yaml_str(yaml).expect("partial session parses");
    assert_eq!(cfg.parameters.load, 200.0);
    assert_eq!(cfg.parameters.pressure, 0.45);
    assert_eq!(cfg.parameters.material, Material::Ceramic);
    assert!(!cfg.display.show_pressure_map);
    assert!(cfg.display.show_air_particles);
    assert_eq!(cfg.engine.view, ViewConfig::CrossSection);
    assert_eq!(cfg.engine.timing, TimingConfig::Frame);
}

#[test]
fn out_of_range_values_are_clamped() {
    let yaml = "parameters:\n  pressure: 1.5\n  speed: 90000\n  load: -5\n";
    let cfg = SessionConfig::from_yaml_str(yaml).expect("parses");
    assert!(SpindleParams::needs_clamping(&cfg.parameters));

    let session = Session::build_session(&cfg);
    assert_eq!(session.params.pressure, 0.8);
    assert_eq!(session.params.speed, 80000);
    assert_eq!(session.params.load, 0);
}

#[test]
fn non_finite_values_fail_to_load() {
    let err = SessionConfig::from_yaml_str("parameters:\n  pressure: .nan\n").unwrap_err();
    assert!(matches!(err, SpindleError::NonFinite { what: "pressure", .. }), "got {err:?}");
}

#[test]
fn malformed_yaml_is_a_config_error() {
    let err = SessionConfig::from_yaml_str("parameters:\n  material: \"wood\"\n").unwrap_err();
    assert!(matches!(err, SpindleError::Config(_)), "got {err:?}");

    let err = SessionConfig::from_yaml_str("engine:\n  particle_count: 0\n").unwrap_err();
    assert!(matches!(err, SpindleError::InvalidArg { .. }), "got {err:?}");
}

#[test]
fn bundled_scenarios_load() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["default.yaml", "heavy_load.yaml", "maintenance.yaml"] {
        SessionConfig::load(&dir.join(name)).unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

// ==================================================================================
// Controls tests
// ==================================================================================

#[test]
fn pressure_steps_stay_on_grid_and_in_range() {
    let mut session = default_session();
    apply_action(&mut session, ControlAction::PressureUp);
    assert!(close(session.params.pressure, 0.46, 1e-12));

    for _ in 0..100 {
        apply_action(&mut session, ControlAction::PressureUp);
    }
    assert_eq!(session.params.pressure, 0.8);

    for _ in 0..100 {
        apply_action(&mut session, ControlAction::PressureDown);
    }
    assert_eq!(session.params.pressure, 0.2);
}

#[test]
fn speed_and_load_clamp_at_their_limits() {
    let mut session = default_session();
    for _ in 0..100 {
        apply_action(&mut session, ControlAction::SpeedUp);
        apply_action(&mut session, ControlAction::LoadUp);
    }
    assert_eq!(session.params.speed, 80000);
    assert_eq!(session.params.load, 600);

    for _ in 0..100 {
        apply_action(&mut session, ControlAction::SpeedDown);
        apply_action(&mut session, ControlAction::LoadDown);
    }
    assert_eq!(session.params.speed, 0);
    assert_eq!(session.params.load, 0);
}

#[test]
fn toggles_material_cycle_and_reset() {
    let mut session = default_session();
    apply_action(&mut session, ControlAction::CycleMaterial);
    assert_eq!(session.params.material, Material::Titanium);
    apply_action(&mut session, ControlAction::ToggleMaintenance);
    assert!(session.params.maintenance_mode);
    apply_action(&mut session, ControlAction::ToggleRunning);
    assert!(!session.display.running);
    apply_action(&mut session, ControlAction::TogglePressureMap);
    assert!(!session.display.show_pressure_map);

    apply_action(&mut session, ControlAction::Reset);
    assert_eq!(session.params, SpindleParams::default());
    // reset restores parameters, not overlays
    assert!(!session.display.running);
}

#[test]
fn only_material_and_maintenance_force_a_rebuild() {
    let base = SpindleParams::default();
    let key = SceneKey::from_params(&base);
    assert_eq!(key, SceneKey::from_params(&base.with_pressure(0.7).with_speed(70000).with_load(300)));
    assert_ne!(key, SceneKey::from_params(&base.with_material(Material::Ceramic)));
    assert_ne!(key, SceneKey::from_params(&base.with_maintenance(true)));
}

// ==================================================================================
// Mesh, camera and read-out tests
// ==================================================================================

#[test]
fn pipe_curve_passes_through_control_points() {
    let points = [
        Vec3::new(8.0, -2.2, 5.5),
        Vec3::new(5.0, -1.0, 4.0),
        Vec3::new(2.0, 1.0, 2.0),
        Vec3::new(0.0, 2.0, 0.0),
    ];
    let path = catmull_rom(&points, 30);
    assert_eq!(path.len(), 31);
    for (sample, control) in [(0, 0), (10, 1), (20, 2), (30, 3)] {
        assert!(path[sample].distance(points[control]) < 1e-4, "sample {sample} misses point {control}");
    }
}

#[test]
fn generated_meshes_have_expected_sizes() {
    let arc = open_cylinder_arc(3.5, 10.0, 64, 0.0, std::f32::consts::PI * 1.5);
    assert_eq!(arc.count_vertices(), 130);
    assert_eq!(arc.indices().map(|i| i.len()), Some(64 * 6));

    let path = catmull_rom(&[Vec3::ZERO, Vec3::X, Vec3::new(2.0, 1.0, 0.0)], 32);
    let tube = tube_mesh(&path, 0.15, 12);
    assert_eq!(tube.count_vertices(), 33 * 13);

    let cloud = point_cloud(seed_particles(5000, 1));
    assert_eq!(cloud.count_vertices(), 5000);
}

#[test]
fn orbit_camera_starts_where_placed() {
    let eye = Vec3::new(15.0, 10.0, 20.0);
    let mut orbit = OrbitCamera::looking_from(eye, Vec3::ZERO);
    assert!(orbit.eye().distance(eye) < 1e-3);

    // settling with no input keeps the pose
    orbit.settle(0.5);
    assert!(orbit.eye().distance(eye) < 1e-3);

    orbit.zoom(1.0);
    orbit.settle(10.0);
    assert!(orbit.radius < eye.length());
}

#[test]
fn readouts_format_like_the_panel() {
    assert_eq!(group_thousands(0), "0");
    assert_eq!(group_thousands(999), "999");
    assert_eq!(group_thousands(15000), "15,000");
    assert_eq!(group_thousands(1234567), "1,234,567");

    let session = default_session();
    let derived = DerivedState::derive(&session.params, &ManualClock::at(0.0));
    assert_eq!(readout_text(Readout::Speed, &session, &derived), "15,000 RPM");
    assert_eq!(readout_text(Readout::AirSupply, &session, &derived), "AIR SUPPLY: 0.45 MPa");
    assert_eq!(readout_text(Readout::Load, &session, &derived), "LOAD: 50 N");
    assert_eq!(readout_text(Readout::Stiffness, &session, &derived), "STATIC STIFFNESS: 81 N/um");
    assert_eq!(readout_text(Readout::Status, &session, &derived), "RUNNING | STEEL");
}

// ==================================================================================
// View lifecycle tests
// ==================================================================================

const FRAME: f64 = 0.016;

/// Headless app running the cross-section lifecycle, no window or GPU
fn cross_section_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(FRAME)))
        .insert_resource(default_session())
        .insert_state(ViewMode::CrossSection)
        .add_systems(OnEnter(ViewMode::CrossSection), mount_cross_section)
        .add_systems(OnExit(ViewMode::CrossSection), teardown_cross_section)
        .add_systems(Update, derive_cross_section.run_if(in_state(ViewMode::CrossSection)));
    app
}

fn switch_view(app: &mut App, view: ViewMode) {
    app.world_mut().resource_mut::<NextState<ViewMode>>().set(view);
    app.update();
}

fn rotor_angle(app: &App) -> Option<f64> {
    app.world().get_resource::<CrossSectionState>().map(|s| s.rotor.angle())
}

#[test]
fn rotor_resets_only_on_remount() {
    let mut app = cross_section_app();
    for _ in 0..5 {
        app.update();
    }
    let before = rotor_angle(&app).expect("cross-section is mounted");
    assert!(before > 0.0);

    // more frames keep accumulating
    app.update();
    let later = rotor_angle(&app).expect("cross-section is mounted");
    assert!(later > before);

    // unmount drops the state and nothing advances while the scene is shown
    switch_view(&mut app, ViewMode::Scene);
    assert!(rotor_angle(&app).is_none());
    for _ in 0..3 {
        app.update();
    }
    assert!(rotor_angle(&app).is_none());

    // remount starts from zero, then takes exactly one frame step
    switch_view(&mut app, ViewMode::CrossSection);
    let one_step = advance_rotation(0.0, 15000, RotationMode::CrossSection, FrameTiming::Elapsed(FRAME));
    let remounted = rotor_angle(&app).expect("cross-section is remounted");
    assert!(close(remounted, one_step, 1e-6));
    assert!(remounted < before);
}
