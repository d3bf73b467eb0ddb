//! Headless HUD model derived from player state.
//!
//! The HUD is modelled as plain formatted strings in a resource so its
//! contents can be asserted without a renderer. The presentation layer (when
//! the `text` feature is enabled) mirrors the strings into on-screen text.
use bevy::prelude::*;
use log::debug;
use thiserror::Error;

use crate::components::{DeathCount, Health, Player};
use crate::level::LevelPhase;

/// Formatted HUD lines for the current step.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct HudModel {
    /// The health readout, `Health: <current>`.
    pub health_line: String,
    /// The death readout, `Deaths: <count>`.
    pub deaths_line: String,
}

/// A ready level has no player entity to drive the HUD.
///
/// Once the level phase is `Ready` a player must exist; its absence means
/// the spawn pipeline or a despawn elsewhere violated that invariant.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no player entity exists while the level is ready")]
pub struct NoPlayerEntityError;

/// Refreshes the HUD strings from the player's health and death count.
///
/// Inert until the level phase is `Ready`; after that a missing player is
/// reported as an error rather than rendering stale or empty lines.
///
/// # Errors
///
/// Returns [`NoPlayerEntityError`] when the level is ready but no player
/// entity exists.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn update_hud_system(
    phase: Res<LevelPhase>,
    players: Query<(&Health, &DeathCount), With<Player>>,
    mut hud: ResMut<HudModel>,
) -> Result {
    if *phase != LevelPhase::Ready {
        return Ok(());
    }
    let (health, deaths) = players.iter().next().ok_or(NoPlayerEntityError)?;
    let next = HudModel {
        health_line: format!("Health: {}", health.current),
        deaths_line: format!("Deaths: {}", deaths.0),
    };
    if *hud != next {
        debug!("HUD -> {} | {}", next.health_line, next.deaths_line);
        *hud = next;
    }
    Ok(())
}

/// Reads the player's current health directly from the world.
///
/// Convenience accessor for tests and tools that hold a `&mut World`.
///
/// # Errors
///
/// Returns [`NoPlayerEntityError`] when no player entity exists.
pub fn player_health(world: &mut World) -> Result<u16, NoPlayerEntityError> {
    let mut players = world.query_filtered::<&Health, With<Player>>();
    players
        .iter(world)
        .next()
        .map(|health| health.current)
        .ok_or(NoPlayerEntityError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::PlayerBundle;
    use bevy::math::IVec2;

    fn hud_world(phase: LevelPhase) -> World {
        let mut world = World::new();
        world.init_resource::<HudModel>();
        world.insert_resource(phase);
        world
    }

    fn run_hud(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(update_hud_system);
        schedule.run(world);
    }

    #[test]
    fn hud_stays_empty_before_the_level_is_ready() {
        let mut world = hud_world(LevelPhase::Pending);
        run_hud(&mut world);
        assert_eq!(*world.resource::<HudModel>(), HudModel::default());
    }

    #[test]
    fn hud_formats_player_health_and_deaths() {
        let mut world = hud_world(LevelPhase::Ready);
        world.spawn(PlayerBundle::new(IVec2::ZERO));
        run_hud(&mut world);
        let hud = world.resource::<HudModel>();
        assert_eq!(hud.health_line, "Health: 100");
        assert_eq!(hud.deaths_line, "Deaths: 0");
    }

    #[test]
    fn missing_player_while_ready_is_an_error() {
        let mut world = hud_world(LevelPhase::Ready);
        let system = world.register_system(update_hud_system);
        let outcome: Result = world
            .run_system(system)
            .unwrap_or_else(|err| panic!("system should run: {err}"));
        assert!(outcome.is_err());
        // The HUD keeps its prior contents rather than rendering stale data.
        assert_eq!(*world.resource::<HudModel>(), HudModel::default());
    }

    #[test]
    fn player_health_reports_missing_player() {
        let mut world = World::new();
        assert_eq!(player_health(&mut world), Err(NoPlayerEntityError));
    }

    #[test]
    fn player_health_reads_the_current_pool() {
        let mut world = World::new();
        world.spawn(PlayerBundle::new(IVec2::ZERO));
        assert_eq!(player_health(&mut world), Ok(100));
    }
}
