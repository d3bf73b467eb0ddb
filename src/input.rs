//! Seam between the host's input devices and the gameplay pipeline.
//!
//! The pipeline never talks to input hardware directly. The host (or a
//! test) writes an [`InputState`] resource once per step; the input system
//! copies it into per-entity [`MoveIntent`](crate::components::MoveIntent)
//! components. With the `render` feature enabled, the presentation layer
//! samples the keyboard into this resource each frame.
use bevy::math::Vec2;
use bevy::prelude::Resource;

/// Snapshot of the host input devices for the current step.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Horizontal movement axis in `[-1, 1]`.
    pub move_axis: f32,
    /// Whether the jump control was pressed this step.
    pub jump_pressed: bool,
    /// Whether the primary button was pressed this step.
    pub primary_pressed: bool,
    /// Pointer position in world coordinates, if the host reports one.
    pub pointer_world: Option<Vec2>,
}
