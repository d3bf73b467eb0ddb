//! Applies a validated level document to the tile grid and ECS.
//!
//! Foreground layers drive everything: decorative tile codes are recorded
//! per cell, physics codes additionally populate the reduced collision
//! grid, and the player spawn marker creates the player entity instead of a
//! tile. Background and enemy layers are parsed and validated but produce no
//! grid writes or spawns; they are placeholders for later phases.
//!
//! The commit is all-or-nothing: a fresh grid is built off to the side and
//! only replaces the resource once every layer has been processed.
use bevy::math::IVec2;
use bevy::prelude::*;
use log::{debug, warn};

use super::{LayerKind, LevelData, LevelLayer};
use crate::components::{
    ContactState, DamageFlag, DeathCount, Health, JumpState, MoveIntent, Player, Velocity,
};
use crate::constants::{PLAYER_MAX_HEALTH, PLAYER_SPAWN_OFFSET};
use crate::grid::{CollisionKind, TileGrid, EMPTY_TILE, PHYSICS_CODE_MAX, PHYSICS_CODE_MIN};

/// Tile codes at or above this value mark entity spawns rather than tiles.
pub const SPAWN_MARKER_MIN: i32 = 10;

/// Entity archetypes encoded as spawn-marker tile codes.
///
/// Only [`SpawnMarker::Player`] currently instantiates anything; the enemy
/// archetypes are recognised so their codes stay reserved, but foreground
/// cells carrying them fall through to decorative handling exactly like any
/// other positive code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMarker {
    /// The player character.
    Player,
    /// Blob enemy.
    Blob,
    /// Tri enemy.
    Tri,
    /// Spike hazard.
    Spike,
    /// Fireball hazard.
    Fireball,
    /// Demon enemy.
    Demon,
}

impl SpawnMarker {
    /// Maps a tile code to its spawn-marker archetype, if it is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledge::level::SpawnMarker;
    ///
    /// assert_eq!(SpawnMarker::from_code(10), Some(SpawnMarker::Player));
    /// assert_eq!(SpawnMarker::from_code(15), Some(SpawnMarker::Demon));
    /// assert_eq!(SpawnMarker::from_code(3), None);
    /// ```
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            10 => Some(Self::Player),
            11 => Some(Self::Blob),
            12 => Some(Self::Tri),
            13 => Some(Self::Spike),
            14 => Some(Self::Fireball),
            15 => Some(Self::Demon),
            _ => None,
        }
    }

    /// The tile code reserved for this archetype.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Player => 10,
            Self::Blob => 11,
            Self::Tri => 12,
            Self::Spike => 13,
            Self::Fireball => 14,
            Self::Demon => 15,
        }
    }
}

/// Bundle of components for the player entity.
///
/// Provides the full set the pipeline systems query for: movement intent,
/// velocity, jump and contact state, health, the transient damage flag, and
/// the death counter the HUD renders.
#[derive(Bundle)]
pub struct PlayerBundle {
    /// Player marker for player-specific queries.
    pub player: Player,
    /// Human-readable name for debugging.
    pub name: Name,
    /// World-space transform derived from the marker cell.
    pub transform: Transform,
    /// Per-step movement intent written by the input system.
    pub intent: MoveIntent,
    /// Linear velocity (initialised to zero).
    pub velocity: Velocity,
    /// Grounded state (initialised airborne until contact says otherwise).
    pub jump: JumpState,
    /// Collision contacts from movement resolution.
    pub contact: ContactState,
    /// Hit points.
    pub health: Health,
    /// Transient damage flag.
    pub damage: DamageFlag,
    /// Death counter rendered by the HUD.
    pub deaths: DeathCount,
}

impl PlayerBundle {
    /// Creates the player bundle for a marker at the given world cell.
    ///
    /// The spawn position is the marker cell offset one unit up, matching
    /// the authored convention that the marker sits in the ground row.
    #[must_use]
    pub fn new(cell: IVec2) -> Self {
        let position = cell.as_vec2() + PLAYER_SPAWN_OFFSET;
        Self {
            player: Player,
            name: Name::new("Player"),
            transform: Transform::from_xyz(position.x, position.y, 0.0),
            intent: MoveIntent::default(),
            velocity: Velocity::default(),
            jump: JumpState::default(),
            contact: ContactState::default(),
            health: Health::full(PLAYER_MAX_HEALTH),
            damage: DamageFlag::default(),
            deaths: DeathCount::default(),
        }
    }
}

/// Summary of what applying a level changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedLevel {
    /// Whether a player entity was spawned.
    pub player_spawned: bool,
    /// Player markers beyond the first, which were ignored.
    pub extra_player_markers: usize,
    /// Indices of layers whose decorative tiles were populated.
    pub redrawn_layers: Vec<usize>,
    /// Number of cells given a physics classification.
    pub collision_cells: usize,
}

/// Builds a fresh grid from the document and commits it, spawning entities
/// for marker cells along the way.
///
/// Grid storage is top-down while world coordinates are bottom-up, so a
/// cell at storage row `y` lands at world row `height - 1 - y`.
pub fn apply_level(data: &LevelData, grid: &mut TileGrid, commands: &mut Commands) -> AppliedLevel {
    let mut next = TileGrid::new(data.width, data.height, data.layers.len());
    let mut summary = AppliedLevel::default();

    for (layer_index, layer) in data.layers.iter().enumerate() {
        match layer.name {
            LayerKind::Foreground => {
                populate_foreground(layer, layer_index, data, &mut next, commands, &mut summary);
                summary.redrawn_layers.push(layer_index);
            }
            LayerKind::Background | LayerKind::Enemy => {
                debug!(
                    "Layer {layer_index} ({:?}) parsed; no side effects in current scope",
                    layer.name
                );
            }
        }
    }

    *grid = next;
    summary
}

fn populate_foreground(
    layer: &LevelLayer,
    layer_index: usize,
    data: &LevelData,
    next: &mut TileGrid,
    commands: &mut Commands,
    summary: &mut AppliedLevel,
) {
    for (cell_index, &code) in layer.data.iter().enumerate() {
        let storage_x = cell_index % data.width;
        let storage_y = cell_index / data.width;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "Validated level extents fit comfortably in i32."
        )]
        let world = IVec2::new(storage_x as i32, (data.height - 1 - storage_y) as i32);

        if SpawnMarker::from_code(code) == Some(SpawnMarker::Player) {
            if summary.player_spawned {
                summary.extra_player_markers += 1;
                warn!("Ignoring extra player spawn marker at {world}");
            } else {
                commands.spawn(PlayerBundle::new(world));
                summary.player_spawned = true;
                debug!("Spawned player from marker at {world}");
            }
            // Marker cells record no decorative tile.
            continue;
        }

        if code < PHYSICS_CODE_MIN {
            next.set_tile_code(world, layer_index, EMPTY_TILE);
            continue;
        }

        next.set_tile_code(world, layer_index, code);
        if (PHYSICS_CODE_MIN..=PHYSICS_CODE_MAX).contains(&code) {
            next.set_collision(world, CollisionKind::from_code(code));
            summary.collision_cells += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_bundle_starts_at_full_health_above_its_cell() {
        let bundle = PlayerBundle::new(IVec2::new(3, 2));
        assert_eq!(bundle.health, Health::full(PLAYER_MAX_HEALTH));
        assert_eq!(bundle.deaths, DeathCount(0));
        assert!(!bundle.jump.grounded);
        assert!((bundle.transform.translation.x - 3.0).abs() < f32::EPSILON);
        assert!((bundle.transform.translation.y - 3.0).abs() < f32::EPSILON);
    }

    use bevy::ecs::world::CommandQueue;
    use bevy::prelude::World;

    use crate::level::{LayerKind, LevelData, LevelLayer};

    fn apply_to_world(data: &LevelData) -> (World, TileGrid, AppliedLevel) {
        let mut world = World::new();
        let mut grid = TileGrid::default();
        let mut queue = CommandQueue::default();
        let summary = {
            let mut commands = Commands::new(&mut queue, &world);
            apply_level(data, &mut grid, &mut commands)
        };
        queue.apply(&mut world);
        (world, grid, summary)
    }

    #[test]
    fn foreground_cells_flip_vertically_and_classify_physics() {
        // Storage is top row first; world rows count up from the bottom.
        let data = LevelData {
            width: 3,
            height: 2,
            layers: vec![LevelLayer {
                name: LayerKind::Foreground,
                data: vec![5, 0, 3, 10, 4, 0],
            }],
        };
        let (mut world, grid, summary) = apply_to_world(&data);

        assert_eq!(grid.tile_code(IVec2::new(0, 1), 0), 5);
        assert_eq!(grid.tile_code(IVec2::new(1, 1), 0), 0);
        assert_eq!(grid.tile_code(IVec2::new(2, 1), 0), 3);
        assert_eq!(grid.collision(IVec2::new(2, 1)), CollisionKind::Solid);
        assert_eq!(grid.collision(IVec2::new(1, 0)), CollisionKind::Ladder);
        // The marker cell records neither tile nor physics.
        assert_eq!(grid.tile_code(IVec2::new(0, 0), 0), 0);
        assert_eq!(grid.collision(IVec2::new(0, 0)), CollisionKind::None);

        assert!(summary.player_spawned);
        assert_eq!(summary.extra_player_markers, 0);
        assert_eq!(summary.collision_cells, 2);
        assert_eq!(summary.redrawn_layers, vec![0]);

        let mut players = world.query_filtered::<&Transform, With<Player>>();
        let transform = players
            .iter(&world)
            .next()
            .unwrap_or_else(|| panic!("player should have spawned"));
        assert!((transform.translation.x - 0.0).abs() < f32::EPSILON);
        assert!((transform.translation.y - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn only_the_first_player_marker_spawns() {
        let data = LevelData {
            width: 2,
            height: 1,
            layers: vec![LevelLayer {
                name: LayerKind::Foreground,
                data: vec![10, 10],
            }],
        };
        let (mut world, _grid, summary) = apply_to_world(&data);

        assert!(summary.player_spawned);
        assert_eq!(summary.extra_player_markers, 1);
        let mut players = world.query_filtered::<(), With<Player>>();
        assert_eq!(players.iter(&world).count(), 1);
    }

    #[test]
    fn background_layers_are_parsed_but_inert() {
        // Even tile codes with physics or marker meanings stay out of the
        // grid when they sit in a background layer.
        let data = LevelData {
            width: 2,
            height: 1,
            layers: vec![LevelLayer {
                name: LayerKind::Background,
                data: vec![7, 3],
            }],
        };
        let (mut world, grid, summary) = apply_to_world(&data);

        assert_eq!(grid.tile_code(IVec2::new(0, 0), 0), 0);
        assert_eq!(grid.tile_code(IVec2::new(1, 0), 0), 0);
        assert_eq!(grid.collision(IVec2::new(1, 0)), CollisionKind::None);
        assert!(!summary.player_spawned);
        assert_eq!(summary.collision_cells, 0);
        assert!(summary.redrawn_layers.is_empty());

        let mut entities = world.query::<Entity>();
        assert_eq!(entities.iter(&world).count(), 0);
    }

    #[test]
    fn spawn_marker_codes_round_trip() {
        for marker in [
            SpawnMarker::Player,
            SpawnMarker::Blob,
            SpawnMarker::Tri,
            SpawnMarker::Spike,
            SpawnMarker::Fireball,
            SpawnMarker::Demon,
        ] {
            assert_eq!(SpawnMarker::from_code(marker.code()), Some(marker));
            assert!(marker.code() >= SPAWN_MARKER_MIN);
        }
    }
}
