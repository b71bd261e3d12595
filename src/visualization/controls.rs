//! Keyboard parameter source
//!
//! Stands in for the control panel: every key press builds a new parameter
//! snapshot and swaps it into the session in one assignment.
//!
//! | key | action |
//! |---|---|
//! | Up / Down | pressure +/- 0.01 MPa |
//! | Right / Left | speed +/- 1000 RPM |
//! | PageUp / PageDown | load +/- 10 N |
//! | M | cycle rotor material |
//! | N | toggle maintenance mode |
//! | P | toggle pressure map |
//! | O | toggle air particles |
//! | Space | run / pause |
//! | R | reset parameters |
//! | Tab | switch 2D / 3D |

use bevy::prelude::*;

use crate::simulation::session::Session;
use crate::visualization::view::ViewMode;

pub const PRESSURE_STEP: f64 = 0.01;
pub const SPEED_STEP: i64 = 1000;
pub const LOAD_STEP: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    PressureUp,
    PressureDown,
    SpeedUp,
    SpeedDown,
    LoadUp,
    LoadDown,
    CycleMaterial,
    ToggleMaintenance,
    TogglePressureMap,
    ToggleParticles,
    ToggleRunning,
    Reset,
}

const KEY_BINDINGS: [(KeyCode, ControlAction); 12] = [
    (KeyCode::ArrowUp, ControlAction::PressureUp),
    (KeyCode::ArrowDown, ControlAction::PressureDown),
    (KeyCode::ArrowRight, ControlAction::SpeedUp),
    (KeyCode::ArrowLeft, ControlAction::SpeedDown),
    (KeyCode::PageUp, ControlAction::LoadUp),
    (KeyCode::PageDown, ControlAction::LoadDown),
    (KeyCode::KeyM, ControlAction::CycleMaterial),
    (KeyCode::KeyN, ControlAction::ToggleMaintenance),
    (KeyCode::KeyP, ControlAction::TogglePressureMap),
    (KeyCode::KeyO, ControlAction::ToggleParticles),
    (KeyCode::Space, ControlAction::ToggleRunning),
    (KeyCode::KeyR, ControlAction::Reset),
];

/// Apply one action to the session
pub fn apply_action(session: &mut Session, action: ControlAction) {
    let p = session.params;
    match action {
        // round to the slider grid so repeated steps do not accumulate float error
        ControlAction::PressureUp => session.replace_params(p.with_pressure(snap(p.pressure + PRESSURE_STEP))),
        ControlAction::PressureDown => session.replace_params(p.with_pressure(snap(p.pressure - PRESSURE_STEP))),
        ControlAction::SpeedUp => session.replace_params(p.with_speed(p.speed as i64 + SPEED_STEP)),
        ControlAction::SpeedDown => session.replace_params(p.with_speed(p.speed as i64 - SPEED_STEP)),
        ControlAction::LoadUp => session.replace_params(p.with_load(p.load as i64 + LOAD_STEP)),
        ControlAction::LoadDown => session.replace_params(p.with_load(p.load as i64 - LOAD_STEP)),
        ControlAction::CycleMaterial => session.replace_params(p.with_material(p.material.next())),
        ControlAction::ToggleMaintenance => session.replace_params(p.with_maintenance(!p.maintenance_mode)),
        ControlAction::TogglePressureMap => session.display.show_pressure_map ^= true,
        ControlAction::ToggleParticles => session.display.show_air_particles ^= true,
        ControlAction::ToggleRunning => session.display.running ^= true,
        ControlAction::Reset => session.reset(),
    }
}

fn snap(pressure: f64) -> f64 {
    (pressure / PRESSURE_STEP).round() * PRESSURE_STEP
}

fn keyboard_controls(keys: Res<ButtonInput<KeyCode>>, mut session: ResMut<Session>) {
    // only touch the resource on a real press so change detection stays quiet
    let pressed: Vec<ControlAction> = KEY_BINDINGS
        .iter()
        .filter(|(key, _)| keys.just_pressed(*key))
        .map(|(_, action)| *action)
        .collect();
    if pressed.is_empty() {
        return;
    }

    for action in pressed {
        apply_action(&mut session, action);
        debug!("control {:?} -> {:?}", action, session.params);
    }
}

fn switch_view(keys: Res<ButtonInput<KeyCode>>, view: Res<State<ViewMode>>, mut next: ResMut<NextState<ViewMode>>) {
    if keys.just_pressed(KeyCode::Tab) {
        let target = view.get().toggled();
        info!("switching view {} -> {}", view.get().label(), target.label());
        next.set(target);
    }
}

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (keyboard_controls, switch_view));
    }
}
