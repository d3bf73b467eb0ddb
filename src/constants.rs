//! Gameplay tuning constants used across systems.
//!
//! All motion constants are expressed per simulation step rather than per
//! second: the pipeline runs once per step and integrates with
//! [`DELTA_TIME`].
use bevy::math::Vec2;

/// Simulation time advanced by one pipeline step.
pub const DELTA_TIME: f32 = 1.0;
/// Downward acceleration applied to airborne entities each step.
pub const GRAVITY_PULL: f32 = -0.05;
/// Largest downward speed an entity may reach while falling.
pub const TERMINAL_VELOCITY: f32 = 2.0;
/// Horizontal speed while a full movement intent is held.
pub const MOVE_SPEED: f32 = 0.15;
/// Upward impulse applied when a grounded entity initiates a jump.
pub const JUMP_SPEED: f32 = 0.45;
/// Distance below the feet probed when checking for ground support.
///
/// Small enough that a single jump step lifts the probe clear of the
/// supporting tile, so the grounded flag drops on the same step the jump
/// starts moving the entity.
pub const SUPPORT_EPSILON: f32 = 0.05;
/// Half extents of the player's collision box in world units.
pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.3, 0.475);
/// Vertical offset applied to the player spawn relative to its marker cell.
pub const PLAYER_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, 1.0);
/// Hit points the player starts with.
pub const PLAYER_MAX_HEALTH: u16 = 100;
/// Passive health regained per step while alive and below the maximum.
pub const HEALTH_REGEN_PER_STEP: u16 = 1;
/// Hit points removed when a pending damage flag is consumed.
pub const DAMAGE_PER_HIT: u16 = 10;
