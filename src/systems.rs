//! The fixed-order per-step gameplay pipeline.
//!
//! Five systems run strictly in sequence every simulation step: input,
//! movement, jump state, health, damage. The order is load-bearing:
//!
//! - input must precede movement, which consumes the intent produced this
//!   step;
//! - movement must precede the jump system, which reads the contact flags
//!   movement resolution just wrote;
//! - damage runs after health so passive regeneration cannot mask damage
//!   applied in the same step.
//!
//! [`GamePlugin`] registers the pipeline with `.chain()`, which both fixes
//! the order and rules out interleaved execution; the component store is
//! only ever mutated by one system at a time.
use bevy::math::Vec2;
use bevy::prelude::*;
use log::debug;

use crate::components::{
    ContactState, DamageFlag, Health, JumpState, MoveIntent, Player, Velocity,
};
use crate::constants::{
    DAMAGE_PER_HIT, DELTA_TIME, GRAVITY_PULL, HEALTH_REGEN_PER_STEP, JUMP_SPEED, MOVE_SPEED,
    PLAYER_HALF_EXTENTS, SUPPORT_EPSILON, TERMINAL_VELOCITY,
};
use crate::grid::{CollisionKind, TileGrid};
use crate::hud::{update_hud_system, HudModel};
use crate::input::InputState;
use crate::level::LevelPhase;

/// Copies the host input snapshot into per-entity movement intents.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn input_system(input: Res<InputState>, mut intents: Query<&mut MoveIntent, With<Player>>) {
    for mut intent in &mut intents {
        intent.axis = input.move_axis.clamp(-1.0, 1.0);
        intent.jump = input.jump_pressed;
    }
}

/// Integrates intents into velocity and position with tile collision.
///
/// Applies the jump impulse (only from a grounded state), gravity with a
/// terminal-velocity clamp, axis-separated collision resolution against the
/// collision grid, and a world-bounds clamp. Contact flags for this step
/// are recorded for the jump system to consume.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
#[expect(
    clippy::type_complexity,
    reason = "Query tuples grow wide; splitting the row loses nothing but locality."
)]
pub fn player_move_system(
    grid: Res<TileGrid>,
    mut movers: Query<(
        &MoveIntent,
        &JumpState,
        &mut Velocity,
        &mut Transform,
        &mut ContactState,
    )>,
) {
    for (intent, jump, velocity, transform, contact) in &mut movers {
        step_mover(
            &grid,
            intent,
            jump,
            velocity.into_inner(),
            transform.into_inner(),
            contact.into_inner(),
        );
    }
}

fn step_mover(
    grid: &TileGrid,
    intent: &MoveIntent,
    jump: &JumpState,
    velocity: &mut Velocity,
    transform: &mut Transform,
    contact: &mut ContactState,
) {
    let mut position = transform.translation.truncate();

    velocity.x = intent.axis * MOVE_SPEED;
    if intent.jump && jump.grounded {
        velocity.y = JUMP_SPEED;
    }
    velocity.y = (velocity.y + GRAVITY_PULL * DELTA_TIME).max(-TERMINAL_VELOCITY);

    *contact = ContactState::default();

    // Horizontal pass.
    if velocity.x != 0.0 {
        let target_x = position.x + velocity.x * DELTA_TIME;
        let lead_x = target_x + velocity.x.signum() * PLAYER_HALF_EXTENTS.x;
        let blocking = probe_column(grid, lead_x, position.y);
        if blocking.blocks() {
            velocity.x = 0.0;
            contact.side = blocking;
        } else {
            position.x = target_x;
        }
    }

    // Vertical pass.
    if velocity.y > 0.0 {
        let target_y = position.y + velocity.y * DELTA_TIME;
        let head_y = target_y + PLAYER_HALF_EXTENTS.y;
        let blocking = probe_row(grid, position.x, head_y, CollisionKind::blocks);
        if blocking.blocks() {
            velocity.y = 0.0;
            contact.above = blocking;
        } else {
            position.y = target_y;
        }
    } else if velocity.y < 0.0 {
        let target_y = position.y + velocity.y * DELTA_TIME;
        let feet_y = target_y - PLAYER_HALF_EXTENTS.y;
        let landing = probe_row(grid, position.x, feet_y, CollisionKind::supports);
        if landing.supports() {
            // Snap the feet to the top of the landing cell.
            position.y = feet_y.floor() + 1.0 + PLAYER_HALF_EXTENTS.y;
            velocity.y = 0.0;
            contact.below = landing;
        } else {
            position.y = target_y;
        }
    }

    // Resting support: an entity standing still must still know what holds
    // it up, otherwise the grounded flag would decay while idle.
    if contact.below == CollisionKind::None && velocity.y <= 0.0 {
        let probe = probe_row(
            grid,
            position.x,
            position.y - PLAYER_HALF_EXTENTS.y - SUPPORT_EPSILON,
            CollisionKind::supports,
        );
        if probe.supports() {
            contact.below = probe;
        }
    }

    clamp_to_world(grid, &mut position);
    transform.translation.x = position.x;
    transform.translation.y = position.y;
}

/// Samples a vertical column at `x` near the top and bottom of the
/// collision box centred on `center_y`.
fn probe_column(grid: &TileGrid, x: f32, center_y: f32) -> CollisionKind {
    let inset = PLAYER_HALF_EXTENTS.y * 0.9;
    let top = grid.collision_at_world(Vec2::new(x, center_y + inset));
    if top.blocks() {
        return top;
    }
    let bottom = grid.collision_at_world(Vec2::new(x, center_y - inset));
    if bottom.blocks() {
        bottom
    } else {
        CollisionKind::None
    }
}

/// Samples a horizontal row at `y` near the left and right of the collision
/// box centred on `center_x`, keeping the first sample `relevant` accepts.
fn probe_row(
    grid: &TileGrid,
    center_x: f32,
    y: f32,
    relevant: fn(CollisionKind) -> bool,
) -> CollisionKind {
    let inset = PLAYER_HALF_EXTENTS.x * 0.9;
    let left = grid.collision_at_world(Vec2::new(center_x - inset, y));
    if relevant(left) {
        return left;
    }
    let right = grid.collision_at_world(Vec2::new(center_x + inset, y));
    if relevant(right) {
        right
    } else {
        CollisionKind::None
    }
}

fn clamp_to_world(grid: &TileGrid, position: &mut Vec2) {
    if grid.is_unpopulated() {
        return;
    }
    #[expect(
        clippy::cast_precision_loss,
        reason = "Level extents are far below f32 precision limits."
    )]
    let extent = Vec2::new(grid.width() as f32, grid.height() as f32);
    position.x = position.x.clamp(
        PLAYER_HALF_EXTENTS.x,
        (extent.x - PLAYER_HALF_EXTENTS.x).max(PLAYER_HALF_EXTENTS.x),
    );
    position.y = position.y.clamp(
        PLAYER_HALF_EXTENTS.y,
        (extent.y - PLAYER_HALF_EXTENTS.y).max(PLAYER_HALF_EXTENTS.y),
    );
}

/// Derives the grounded flag from the contacts movement just resolved.
///
/// An entity is grounded while something supportive sits below it and it is
/// not moving upwards. Because the flags come from this step's movement
/// resolution, running this system before movement would act on stale data;
/// the pipeline order forbids that.
pub fn jump_system(mut jumpers: Query<(&mut JumpState, &ContactState, &Velocity)>) {
    for (mut jump, contact, velocity) in &mut jumpers {
        let grounded = velocity.y <= 0.0 && contact.below.supports();
        if grounded != jump.grounded {
            debug!(
                "jump state -> {}",
                if grounded { "grounded" } else { "airborne" }
            );
        }
        jump.grounded = grounded;
    }
}

/// Applies passive regeneration and keeps health on its non-negative floor.
///
/// Dead entities (zero health) do not regenerate.
pub fn health_system(mut pools: Query<&mut Health>) {
    for mut health in &mut pools {
        if health.current > 0 && health.current < health.max {
            health.current = health
                .current
                .saturating_add(HEALTH_REGEN_PER_STEP)
                .min(health.max);
        }
    }
}

/// Consumes pending damage flags, decrementing health with a zero floor.
///
/// The flag is cleared as it is consumed, so re-running the system without
/// a new collision event is a no-op.
pub fn damage_system(mut victims: Query<(&mut Health, &mut DamageFlag)>) {
    for (mut health, mut flag) in &mut victims {
        if !flag.pending {
            continue;
        }
        health.current = health.current.saturating_sub(DAMAGE_PER_HIT);
        flag.pending = false;
        debug!("applied {DAMAGE_PER_HIT} damage, {} hp left", health.current);
    }
}

/// Bevy plugin registering the gameplay pipeline and its resources.
///
/// The five systems plus the HUD formatter run chained in `Update`, after
/// which the step's component state is fully settled.
#[derive(Debug, Default)]
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InputState>()
            .init_resource::<HudModel>()
            .init_resource::<LevelPhase>()
            .init_resource::<TileGrid>();
        app.register_type::<Player>();
        app.add_systems(
            Update,
            (
                input_system,
                player_move_system,
                jump_system,
                health_system,
                damage_system,
                update_hud_system,
            )
                .chain(),
        );
    }
}
