//! Windowed presentation: camera bootstrap, input sampling, HUD text.
//!
//! Everything here is feature-gated; the gameplay pipeline is fully
//! functional headless and none of these systems are required by it. Input
//! sampling runs before the gameplay input system so each step consumes the
//! freshest device snapshot.
use bevy::prelude::*;
use log::info;

use crate::input::InputState;
use crate::systems::input_system;

/// Camera placement for the bootstrap camera.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Camera centre in world units.
    pub position: Vec2,
    /// World-to-screen scale in pixels per world unit.
    pub scale: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: Vec2::new(10.0, 10.0),
            scale: 32.0,
        }
    }
}

/// Spawns a 2D camera at startup when the host app has not provided one.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn bootstrap_camera_if_missing(
    mut commands: Commands,
    settings: Res<CameraSettings>,
    existing: Query<(), With<Camera2d>>,
) {
    if !existing.is_empty() {
        return;
    }
    info!(
        "Bootstrapping 2D camera at {} ({} px/unit)",
        settings.position, settings.scale
    );
    commands.spawn((
        Camera2d,
        Transform::from_xyz(settings.position.x, settings.position.y, 1000.0)
            .with_scale(Vec3::splat(1.0 / settings.scale)),
    ));
}

/// Samples keyboard and mouse state into the [`InputState`] resource.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn sample_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<bevy::window::PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut input: ResMut<InputState>,
) {
    let mut axis = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA) {
        axis -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD) {
        axis += 1.0;
    }
    input.move_axis = axis;
    input.jump_pressed = keys.just_pressed(KeyCode::Space)
        || keys.just_pressed(KeyCode::ArrowUp)
        || keys.just_pressed(KeyCode::KeyW);
    input.primary_pressed = buttons.just_pressed(MouseButton::Left);
    input.pointer_world = pointer_world_position(&windows, &cameras);
}

fn pointer_world_position(
    windows: &Query<&Window, With<bevy::window::PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform), With<Camera2d>>,
) -> Option<Vec2> {
    let cursor = windows.iter().next()?.cursor_position()?;
    let (camera, camera_transform) = cameras.iter().next()?;
    camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

#[cfg(feature = "text")]
mod hud_text {
    use bevy::prelude::{Commands, Component, Query, Res, Text2d, Transform, Vec3};

    use crate::hud::HudModel;

    /// Which HUD line a text entity displays.
    #[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
    pub enum HudSlot {
        /// The health readout.
        Health,
        /// The death readout.
        Deaths,
    }

    pub fn spawn_hud_text(mut commands: Commands) {
        commands.spawn((
            HudSlot::Health,
            Text2d::new(""),
            Transform::from_xyz(1.0, 19.0, 10.0).with_scale(Vec3::splat(1.0 / 32.0)),
        ));
        commands.spawn((
            HudSlot::Deaths,
            Text2d::new(""),
            Transform::from_xyz(1.0, 18.0, 10.0).with_scale(Vec3::splat(1.0 / 32.0)),
        ));
    }

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Bevy system parameters use `Res<T>` by value."
    )]
    pub fn sync_hud_text(hud: Res<HudModel>, mut slots: Query<(&HudSlot, &mut Text2d)>) {
        if !hud.is_changed() {
            return;
        }
        for (slot, mut text) in &mut slots {
            let line = match slot {
                HudSlot::Health => &hud.health_line,
                HudSlot::Deaths => &hud.deaths_line,
            };
            if text.0 != *line {
                text.0.clone_from(line);
            }
        }
    }
}

#[cfg(feature = "text")]
pub use hud_text::HudSlot;

/// Bevy plugin for the windowed presentation layer.
///
/// Spawns the bootstrap camera, samples input ahead of the gameplay
/// pipeline, and (with the `text` feature) mirrors the HUD model into
/// on-screen text.
#[derive(Debug, Default)]
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraSettings>();
        app.add_systems(Startup, bootstrap_camera_if_missing);
        app.add_systems(Update, sample_input_system.before(input_system));
        #[cfg(feature = "text")]
        {
            app.add_systems(Startup, hud_text::spawn_hud_text);
            app.add_systems(Update, hud_text::sync_hud_text);
        }
    }
}
