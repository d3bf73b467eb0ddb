//! ECS component types used by the gameplay pipeline.
//!
//! One component exists per attribute the systems read or write: velocity,
//! health, jump state, the transient damage flag, the per-step movement
//! intent, and the contact flags produced by collision resolution. Position
//! lives in Bevy's own [`Transform`](bevy::prelude::Transform); only its x
//! and y axes are meaningful in this 2D world.
use bevy::prelude::*;

use crate::grid::CollisionKind;

/// Marker indicating that this entity represents the player character.
///
/// Applied by the level loader to the entity spawned at the player marker
/// cell, distinguishing it from future NPC archetypes in queries.
#[derive(Component, Reflect, Default, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component, Default)]
pub struct Player;

/// Linear velocity in world units per step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    /// Horizontal velocity, positive towards increasing x.
    pub x: f32,
    /// Vertical velocity, positive upwards.
    pub y: f32,
}

/// Hit points of a damageable entity.
///
/// `current` never exceeds `max`; the unsigned representation makes the
/// zero floor a structural property rather than a runtime clamp.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Remaining hit points.
    pub current: u16,
    /// Upper bound passive regeneration heals towards.
    pub max: u16,
}

impl Health {
    /// Creates a health pool starting at its maximum.
    #[must_use]
    pub const fn full(max: u16) -> Self {
        Self { current: max, max }
    }
}

/// Grounded-versus-airborne state derived from collision contacts.
///
/// Only the jump system writes this component; the move system reads it to
/// decide whether a jump intent may initiate an impulse.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JumpState {
    /// True while the entity rests on a supporting tile.
    pub grounded: bool,
}

/// Transient flag raised by collision detection and consumed by the damage
/// system within the same step.
///
/// Re-running the damage system without a new flag is a no-op, so damage
/// application is idempotent per step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageFlag {
    /// Whether a hit is waiting to be applied.
    pub pending: bool,
}

impl DamageFlag {
    /// Marks a hit for the damage system to consume this step.
    pub const fn raise(&mut self) {
        self.pending = true;
    }
}

/// Desired movement produced by the input system each step.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveIntent {
    /// Horizontal input axis in `[-1, 1]`.
    pub axis: f32,
    /// Whether a jump was requested this step.
    pub jump: bool,
}

/// Collision contacts recorded by the move system during resolution.
///
/// The flags describe the step that just resolved; the jump system reads
/// them immediately afterwards, which is why pipeline order is load-bearing.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactState {
    /// Tile kind supporting the entity from below, if any.
    pub below: CollisionKind,
    /// Tile kind blocking upward movement, if any.
    pub above: CollisionKind,
    /// Tile kind blocking horizontal movement, if any.
    pub side: CollisionKind,
}

/// Number of times the player has died.
///
/// The HUD renders this counter but nothing increments it yet: death
/// handling is not part of the current gameplay scope, and no increment
/// semantics are assumed on its behalf.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeathCount(pub u32);
