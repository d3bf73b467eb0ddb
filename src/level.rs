//! Level integration plugin wiring level documents into the ECS.
//!
//! `LevelPlugin` owns the "load the authored level into ECS" entry point:
//!
//! - Loads start with a [`LevelLoadRequest`] trigger; the plugin fires one
//!   at startup when autoload is enabled, and hosts may fire their own.
//!   Each request begins a background load of the configured document (see
//!   [`load`] for the two-phase protocol); duplicates are rejected.
//! - Each frame (in `PreUpdate`, so the commit is flushed before gameplay
//!   systems run) it polls the outstanding load without blocking the frame
//!   loop; tile-grid reads resolve to sentinels until the load commits.
//! - On success it populates the [`TileGrid`] resource and spawns the player
//!   at its marker cell (see [`apply`]).
//! - Failures are surfaced as [`LevelError`] events observed and logged;
//!   the grid keeps its prior state.
pub mod apply;
pub mod load;

pub use apply::{apply_level, AppliedLevel, PlayerBundle, SpawnMarker, SPAWN_MARKER_MIN};
pub use load::{request_level_load, LevelLoadError, LevelLoadHandle, LevelSource, LoadPoll};

use bevy::prelude::*;
use bevy_ecs::system::SystemParam;
use log::{error, info, warn};
use serde::Deserialize;

use crate::grid::TileGrid;

/// Default level document path, relative to the working directory.
pub const DEFAULT_LEVEL_PATH: &str = "assets/levels/level1.json";

/// The closed set of layer names a level document may use.
///
/// Unknown names are rejected during schema validation, so adding a layer
/// kind is a compile-time-checked change here rather than a stringly match.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Tiles, physics codes, and spawn markers.
    Foreground,
    /// Decorative backdrop; parsed but currently inert.
    Background,
    /// Enemy placement; parsed but currently inert.
    Enemy,
}

/// One named layer of a level document.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelLayer {
    /// Which of the fixed layer kinds this is.
    pub name: LayerKind,
    /// Row-major tile codes, top row first, `width * height` cells.
    pub data: Vec<i32>,
}

/// Parsed level description document.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LevelData {
    /// Level width in cells.
    pub width: usize,
    /// Level height in cells.
    pub height: usize,
    /// Authored layers; absent in the document means no layers.
    #[serde(default)]
    pub layers: Vec<LevelLayer>,
}

impl LevelData {
    /// Checks the structural invariants the loader relies on.
    ///
    /// # Errors
    ///
    /// Returns [`LevelLoadError::Schema`] when the extent is zero or a
    /// layer's cell count does not match `width * height`.
    pub fn validate(&self) -> Result<(), LevelLoadError> {
        if self.width == 0 || self.height == 0 {
            return Err(LevelLoadError::Schema {
                detail: format!("level extent {}x{} must be positive", self.width, self.height),
            });
        }
        let cells = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| LevelLoadError::Schema {
                detail: format!("level extent {}x{} overflows", self.width, self.height),
            })?;
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.data.len() != cells {
                return Err(LevelLoadError::Schema {
                    detail: format!(
                        "layer {index} ({:?}) has {} cells, expected {cells}",
                        layer.name,
                        layer.data.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Lifecycle of the level load as seen by the rest of the game.
///
/// Systems that depend on level state stay inert until `Ready`; the HUD in
/// particular treats a missing player while `Ready` as an invariant
/// violation.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelPhase {
    /// No level committed yet; a load may be outstanding.
    #[default]
    Pending,
    /// A level has been applied to the grid and ECS.
    Ready,
    /// The most recent load attempt failed; the grid keeps its prior state.
    Failed,
}

/// Errors surfaced by the level plugin as observable events.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Fetching, parsing, or validating the level document failed.
    LoadFailed {
        /// Human-readable description of the configured source.
        source: String,
        /// Human-readable detail describing why the load failed.
        detail: String,
    },
    /// The level defines no player spawn marker.
    MissingSpawnMarker,
    /// A load was requested while one is already active or applied.
    DuplicateLoadRequested {
        /// Description of the source that was requested.
        requested: String,
    },
}

/// Event requesting a load of the configured level document.
///
/// Triggered by the plugin at startup when autoload is enabled; hosts may
/// trigger it themselves to start a load on their own schedule. Requests
/// made while a load is in flight or a level is already applied are
/// rejected with [`LevelError::DuplicateLoadRequested`].
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct LevelLoadRequest;

/// Event emitted once a level has been committed to the grid and ECS.
///
/// `redrawn_layers` is the redraw signal for the rendering collaborator:
/// the decorative contents of those layer indices changed.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LevelApplied {
    /// Indices of layers whose decorative tiles were (re)populated.
    pub redrawn_layers: Vec<usize>,
    /// Whether a player entity was spawned from a marker cell.
    pub player_spawned: bool,
}

/// Runtime configuration for level loading.
#[derive(Resource, Clone, Debug)]
pub struct LevelSettings {
    /// Where to fetch the level document from.
    pub source: LevelSource,
    /// When true, the plugin requests the load during `Startup`.
    pub autoload: bool,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            source: LevelSource::File(DEFAULT_LEVEL_PATH.into()),
            autoload: true,
        }
    }
}

/// Resource tracking the load currently in flight, if any.
#[derive(Resource, Default)]
pub struct ActiveLevelLoad {
    handle: Option<LevelLoadHandle>,
    source: Option<String>,
}

impl ActiveLevelLoad {
    /// True while a requested load has not yet reported a result.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.handle.is_some()
    }
}

#[derive(SystemParam)]
struct LevelLoadContext<'w> {
    settings: Res<'w, LevelSettings>,
    phase: ResMut<'w, LevelPhase>,
    active: ResMut<'w, ActiveLevelLoad>,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn begin_level_load(mut commands: Commands, settings: Res<LevelSettings>) {
    if settings.autoload {
        commands.trigger(LevelLoadRequest);
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn on_level_load_request(
    _request: bevy::ecs::prelude::On<LevelLoadRequest>,
    mut commands: Commands,
    mut context: LevelLoadContext,
) {
    // Single-level semantics: a request while one is in flight or already
    // applied is rejected rather than silently restarted.
    if context.active.in_flight() || *context.phase == LevelPhase::Ready {
        let requested = context.settings.source.describe();
        warn!("Ignoring level load request for {requested}: a level is already active");
        commands.trigger(LevelError::DuplicateLoadRequested { requested });
        return;
    }

    let source = context.settings.source.clone();
    info!("Requesting level load from {}", source.describe());
    context.active.source = Some(source.describe());
    context.active.handle = Some(request_level_load(&source));
    *context.phase = LevelPhase::Pending;
}

fn poll_level_load(
    mut commands: Commands,
    mut grid: ResMut<TileGrid>,
    mut context: LevelLoadContext,
) {
    let Some(handle) = context.active.handle.as_ref() else {
        return;
    };

    match handle.poll() {
        LoadPoll::Pending => {}
        LoadPoll::Ready(data) => {
            let applied = apply_level(&data, &mut grid, &mut commands);
            if !applied.player_spawned {
                warn!("Level defines no player spawn marker");
                commands.trigger(LevelError::MissingSpawnMarker);
            }
            *context.phase = LevelPhase::Ready;
            commands.trigger(LevelApplied {
                redrawn_layers: applied.redrawn_layers.clone(),
                player_spawned: applied.player_spawned,
            });
            context.active.handle = None;
        }
        LoadPoll::Failed(load_error) => {
            *context.phase = LevelPhase::Failed;
            commands.trigger(LevelError::LoadFailed {
                source: context.active.source.clone().unwrap_or_default(),
                detail: load_error.to_string(),
            });
            context.active.handle = None;
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_level_error(event: bevy::ecs::prelude::On<LevelError>) {
    error!("level error: {:?}", event.event());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value."
)]
fn log_level_applied(event: bevy::ecs::prelude::On<LevelApplied>) {
    let applied = event.event();
    info!(
        "Level applied; redraw layers {:?}, player spawned: {}",
        applied.redrawn_layers, applied.player_spawned
    );
}

/// Bevy plugin exposing level loading.
///
/// Inserts the [`TileGrid`], [`LevelPhase`], and [`ActiveLevelLoad`]
/// resources, requests the configured level at startup, and polls the
/// outstanding load each update.
#[derive(Debug, Default)]
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelSettings>()
            .init_resource::<ActiveLevelLoad>()
            .init_resource::<LevelPhase>()
            .init_resource::<TileGrid>();
        app.add_observer(on_level_load_request);
        app.add_observer(log_level_error);
        app.add_observer(log_level_applied);
        app.add_systems(Startup, begin_level_load);
        // Polling in `PreUpdate` means the commit (including the deferred
        // player spawn) is flushed before the gameplay pipeline observes
        // `LevelPhase::Ready`.
        app.add_systems(PreUpdate, poll_level_load);
    }
}
