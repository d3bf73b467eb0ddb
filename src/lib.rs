//! Gameplay core for a 2D tile platformer.
//!
//! The crate is split into a headless gameplay layer and an optional
//! presentation layer:
//!
//! - [`grid`] stores the authored tile codes and the reduced collision
//!   classification per cell, with sentinel semantics for out-of-bounds
//!   access.
//! - [`level`] loads JSON level documents off the frame loop in two phases,
//!   commits them to the grid, and spawns the player from its marker cell.
//! - [`systems`] runs the fixed-order per-step pipeline: input, movement
//!   with tile collision, jump state, health regeneration, damage.
//! - [`hud`] derives formatted HUD strings from player state so the HUD is
//!   assertable without a renderer.
//! - [`presentation`] (behind the `render` feature) adds a window, camera,
//!   device input sampling, and on-screen HUD text.
//!
//! # Examples
//!
//! A headless app stepping the pipeline:
//!
//! ```
//! use bevy::app::App;
//! use bevy::MinimalPlugins;
//! use ledge::prelude::*;
//!
//! let mut app = App::new();
//! app.add_plugins(MinimalPlugins);
//! app.add_plugins(GamePlugin);
//! app.update();
//! ```

pub mod components;
pub mod constants;
pub mod grid;
pub mod hud;
pub mod input;
pub mod level;
pub mod logging;
#[cfg(feature = "render")]
pub mod presentation;
pub mod systems;

pub use grid::{CollisionKind, TileGrid};
pub use hud::HudModel;
pub use input::InputState;
pub use level::{LevelData, LevelPhase, LevelPlugin, LevelSettings};
pub use systems::GamePlugin;

/// Commonly used types, re-exported for convenient glob import.
pub mod prelude {
    pub use crate::components::{
        ContactState, DamageFlag, DeathCount, Health, JumpState, MoveIntent, Player, Velocity,
    };
    pub use crate::grid::{CollisionKind, TileGrid};
    pub use crate::hud::HudModel;
    pub use crate::input::InputState;
    pub use crate::level::{LevelPhase, LevelPlugin, LevelSettings, LevelSource};
    pub use crate::systems::GamePlugin;
}
