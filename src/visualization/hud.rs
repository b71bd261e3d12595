//! Text read-outs drawn over both views
//!
//! Each view spawns its own panel when it mounts; the panels are scoped to
//! the view state and vanish with it. One update system refreshes whatever
//! read-outs currently exist.

use bevy::prelude::*;

use crate::simulation::derivation::DerivedState;
use crate::simulation::session::Session;
use crate::visualization::view::ViewMode;

const LABEL_SIZE: f32 = 16.0;
const VALUE_SIZE: f32 = 28.0;

/// Half-size of the orbit trace box, px
const ORBIT_BOX: f32 = 48.0;
const ORBIT_DOT: f32 = 6.0;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readout {
    AirSupply,
    Load,
    Speed,
    Flow,
    Stiffness,
    Status,
}

#[derive(Component)]
struct OrbitDot;

/// Group digits in threes: 15000 -> "15,000"
pub fn group_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Text shown by a read-out for the current session
pub fn readout_text(kind: Readout, session: &Session, derived: &DerivedState) -> String {
    let p = &session.params;
    match kind {
        Readout::AirSupply => format!("AIR SUPPLY: {:.2} MPa", p.pressure),
        Readout::Load => format!("LOAD: {} N", p.load),
        Readout::Speed => format!("{} RPM", group_thousands(p.speed)),
        Readout::Flow => format!("FLOW: {:.1} SCFM", derived.flow),
        Readout::Stiffness => format!("STATIC STIFFNESS: {:.0} N/um", derived.stiffness),
        Readout::Status => {
            let run = if session.display.running { "RUNNING" } else { "PAUSED" };
            let maint = if p.maintenance_mode { " | MAINTENANCE" } else { "" };
            format!("{run} | {}{maint}", p.material.label().to_uppercase())
        }
    }
}

fn text_node(commands: &mut Commands, view: ViewMode, kind: Readout, size: f32, color: Color, style: Style) {
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: size,
                color,
                ..default()
            },
        )
        .with_style(style),
        kind,
        StateScoped(view),
    ));
}

fn absolute(top: Option<f32>, left: Option<f32>, bottom: Option<f32>, right: Option<f32>) -> Style {
    let px = |v: Option<f32>| v.map(Val::Px).unwrap_or(Val::Auto);
    Style {
        position_type: PositionType::Absolute,
        top: px(top),
        left: px(left),
        bottom: px(bottom),
        right: px(right),
        ..default()
    }
}

/// Pressure, load and speed labels of the cross-section
pub fn spawn_cross_section_hud(commands: &mut Commands) {
    let view = ViewMode::CrossSection;
    let light = Color::srgb(0.80, 0.84, 0.88);
    text_node(commands, view, Readout::AirSupply, LABEL_SIZE, light, absolute(Some(16.0), Some(16.0), None, None));
    text_node(commands, view, Readout::Load, LABEL_SIZE, light, absolute(Some(40.0), Some(16.0), None, None));
    text_node(
        commands,
        view,
        Readout::Speed,
        VALUE_SIZE,
        Color::srgb(0.22, 0.74, 0.97),
        absolute(None, None, Some(16.0), Some(16.0)),
    );
    commands.spawn((
        TextBundle::from_section(
            "CROSS-SECTION VIEW / A-A",
            TextStyle {
                font_size: 12.0,
                color: Color::srgb(0.28, 0.33, 0.41),
                ..default()
            },
        )
        .with_style(absolute(None, Some(16.0), Some(16.0), None)),
        StateScoped(view),
    ));
}

/// Gauge, flow, stiffness and the shaft-orbit trace of the scene
pub fn spawn_scene_hud(commands: &mut Commands) {
    let view = ViewMode::Scene;
    let dark = Color::srgb(0.12, 0.16, 0.23);
    text_node(commands, view, Readout::AirSupply, VALUE_SIZE, dark, absolute(Some(24.0), Some(24.0), None, None));
    text_node(
        commands,
        view,
        Readout::Flow,
        LABEL_SIZE,
        Color::srgb(0.06, 0.73, 0.51),
        absolute(Some(60.0), Some(24.0), None, None),
    );
    text_node(commands, view, Readout::Status, LABEL_SIZE, dark, absolute(Some(84.0), Some(24.0), None, None));
    text_node(
        commands,
        view,
        Readout::Stiffness,
        LABEL_SIZE,
        Color::srgb(0.06, 0.73, 0.51),
        absolute(None, None, Some(24.0), Some(24.0)),
    );

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    width: Val::Px(ORBIT_BOX * 2.0),
                    height: Val::Px(ORBIT_BOX * 2.0),
                    ..absolute(Some(120.0), Some(24.0), None, None)
                },
                background_color: Color::srgb(0.97, 0.98, 0.99).into(),
                border_color: Color::srgb(0.89, 0.91, 0.94).into(),
                ..default()
            },
            StateScoped(view),
        ))
        .with_children(|parent| {
            parent.spawn((
                NodeBundle {
                    style: Style {
                        width: Val::Px(ORBIT_DOT),
                        height: Val::Px(ORBIT_DOT),
                        ..absolute(Some(ORBIT_BOX - ORBIT_DOT / 2.0), Some(ORBIT_BOX - ORBIT_DOT / 2.0), None, None)
                    },
                    background_color: Color::srgb(0.01, 0.52, 0.78).into(),
                    ..default()
                },
                OrbitDot,
            ));
        });
}

fn refresh_readouts(
    session: Res<Session>,
    time: Res<Time>,
    mut texts: Query<(&Readout, &mut Text)>,
    mut dots: Query<&mut Style, With<OrbitDot>>,
) {
    if texts.is_empty() && dots.is_empty() {
        return;
    }
    let derived = DerivedState::derive(&session.params, &*time);

    for (kind, mut text) in &mut texts {
        let value = readout_text(*kind, &session, &derived);
        if let Some(section) = text.sections.first_mut() {
            if section.value != value {
                section.value = value;
            }
        }
    }

    let (dx, dy) = derived.orbit_trace;
    for mut style in &mut dots {
        style.left = Val::Px(ORBIT_BOX - ORBIT_DOT / 2.0 + dx as f32);
        style.top = Val::Px(ORBIT_BOX - ORBIT_DOT / 2.0 + dy as f32);
    }
}

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, refresh_readouts);
    }
}
