//! Tile and collision grids backing the level geometry.
//!
//! [`TileGrid`] stores one row-major layer of decorative tile codes per
//! authored layer plus a single reduced collision grid. Both share the
//! forgiving-edge contract: out-of-range reads resolve to the no-tile
//! sentinel and out-of-range writes are silently ignored, so world-edge
//! queries never fail. Tests assert that contract explicitly.
use bevy::math::{IVec2, Vec2};
use bevy::prelude::Resource;

/// Sentinel tile code meaning "no tile here".
pub const EMPTY_TILE: i32 = 0;

/// First tile code reserved for physics tiles.
pub const PHYSICS_CODE_MIN: i32 = 1;
/// Last tile code reserved for physics tiles.
pub const PHYSICS_CODE_MAX: i32 = 4;

/// Reduced per-cell physics classification, distinct from the decorative
/// tile id stored alongside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionKind {
    /// No physics behaviour.
    #[default]
    None,
    /// Breakable block; collides like a solid until broken.
    Break,
    /// Impassable block.
    Solid,
    /// Climbable tile; supports entities standing on it without blocking
    /// horizontal movement.
    Ladder,
}

impl CollisionKind {
    /// Maps a raw tile code to its reduced physics classification.
    ///
    /// Codes 2 to 4 carry the break/solid/ladder meanings; code 1 is a
    /// reserved physics code without a named archetype and collides as a
    /// plain solid. Everything else is non-physical.
    ///
    /// # Examples
    ///
    /// ```
    /// use ledge::grid::CollisionKind;
    ///
    /// assert_eq!(CollisionKind::from_code(3), CollisionKind::Solid);
    /// assert_eq!(CollisionKind::from_code(4), CollisionKind::Ladder);
    /// assert_eq!(CollisionKind::from_code(7), CollisionKind::None);
    /// ```
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            1 | 3 => Self::Solid,
            2 => Self::Break,
            4 => Self::Ladder,
            _ => Self::None,
        }
    }

    /// Whether this tile stops movement into it.
    #[must_use]
    pub const fn blocks(self) -> bool {
        matches!(self, Self::Break | Self::Solid)
    }

    /// Whether an entity can stand on this tile.
    #[must_use]
    pub const fn supports(self) -> bool {
        matches!(self, Self::Break | Self::Solid | Self::Ladder)
    }
}

/// Returns the renderer lookup index for a decorative tile code.
///
/// Tile codes are 1-based in storage and 0-based for sprite-sheet lookup.
/// Non-positive codes have no visual and yield `None`.
#[must_use]
pub const fn decorative_index(code: i32) -> Option<i32> {
    if code >= 1 {
        Some(code - 1)
    } else {
        None
    }
}

/// Per-layer decorative tile codes plus the reduced collision grid.
///
/// The grid defaults to an empty 0-by-0 extent until a level load commits a
/// populated replacement, so every accessor returns sentinels while a load
/// is still outstanding.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    layers: Vec<Vec<i32>>,
    collision: Vec<CollisionKind>,
}

impl TileGrid {
    /// Creates a grid of the given extent with `layer_count` empty layers.
    #[must_use]
    pub fn new(width: usize, height: usize, layer_count: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            layers: vec![vec![EMPTY_TILE; cells]; layer_count],
            collision: vec![CollisionKind::None; cells],
        }
    }

    /// Grid width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Number of decorative layers.
    #[must_use]
    pub const fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// True while no level has been committed.
    #[must_use]
    pub const fn is_unpopulated(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn index(&self, pos: IVec2) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Reads the decorative tile code at `pos` in `layer`.
    ///
    /// Out-of-range coordinates and unknown layers yield [`EMPTY_TILE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bevy::math::IVec2;
    /// use ledge::grid::{TileGrid, EMPTY_TILE};
    ///
    /// let grid = TileGrid::new(4, 3, 1);
    /// assert_eq!(grid.tile_code(IVec2::new(99, 0), 0), EMPTY_TILE);
    /// assert_eq!(grid.tile_code(IVec2::new(-1, 0), 0), EMPTY_TILE);
    /// ```
    #[must_use]
    pub fn tile_code(&self, pos: IVec2, layer: usize) -> i32 {
        let Some(index) = self.index(pos) else {
            return EMPTY_TILE;
        };
        self.layers
            .get(layer)
            .and_then(|tiles| tiles.get(index))
            .copied()
            .unwrap_or(EMPTY_TILE)
    }

    /// Writes a decorative tile code at `pos` in `layer`.
    ///
    /// Out-of-range coordinates and unknown layers are silently ignored.
    pub fn set_tile_code(&mut self, pos: IVec2, layer: usize, code: i32) {
        let Some(index) = self.index(pos) else {
            return;
        };
        if let Some(cell) = self
            .layers
            .get_mut(layer)
            .and_then(|tiles| tiles.get_mut(index))
        {
            *cell = code;
        }
    }

    /// Reads the reduced physics classification at `pos`.
    ///
    /// Out-of-range coordinates yield [`CollisionKind::None`].
    #[must_use]
    pub fn collision(&self, pos: IVec2) -> CollisionKind {
        self.index(pos)
            .and_then(|index| self.collision.get(index))
            .copied()
            .unwrap_or_default()
    }

    /// Writes the reduced physics classification at `pos`.
    ///
    /// Out-of-range coordinates are silently ignored.
    pub fn set_collision(&mut self, pos: IVec2, kind: CollisionKind) {
        if let Some(cell) = self
            .index(pos)
            .and_then(|index| self.collision.get_mut(index))
        {
            *cell = kind;
        }
    }

    /// Reads the physics classification of the cell containing a world-space
    /// point.
    #[must_use]
    pub fn collision_at_world(&self, point: Vec2) -> CollisionKind {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "World coordinates of practical levels fit comfortably in i32."
        )]
        let cell = IVec2::new(point.x.floor() as i32, point.y.floor() as i32);
        self.collision(cell)
    }

    /// Iterates over all cells carrying a physics classification.
    #[must_use]
    pub fn collision_cells(&self) -> impl Iterator<Item = (IVec2, CollisionKind)> + '_ {
        self.collision
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind != CollisionKind::None)
            .map(|(index, kind)| {
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_possible_wrap,
                    reason = "Cell indices of practical levels fit comfortably in i32."
                )]
                let pos = IVec2::new(
                    (index % self.width.max(1)) as i32,
                    (index / self.width.max(1)) as i32,
                );
                (pos, *kind)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(IVec2::new(0, 0), 5)]
    #[case(IVec2::new(3, 0), 9)]
    #[case(IVec2::new(0, 2), 1)]
    #[case(IVec2::new(3, 2), 42)]
    fn in_bounds_tiles_round_trip(#[case] pos: IVec2, #[case] code: i32) {
        let mut grid = TileGrid::new(4, 3, 2);
        grid.set_tile_code(pos, 1, code);
        assert_eq!(grid.tile_code(pos, 1), code);
        // The other layer stays untouched.
        assert_eq!(grid.tile_code(pos, 0), EMPTY_TILE);
    }

    #[rstest]
    #[case(IVec2::new(-1, 0))]
    #[case(IVec2::new(0, -1))]
    #[case(IVec2::new(4, 0))]
    #[case(IVec2::new(0, 3))]
    fn out_of_bounds_reads_return_sentinel(#[case] pos: IVec2) {
        let grid = TileGrid::new(4, 3, 1);
        assert_eq!(grid.tile_code(pos, 0), EMPTY_TILE);
        assert_eq!(grid.collision(pos), CollisionKind::None);
    }

    #[rstest]
    #[case(IVec2::new(-1, 0))]
    #[case(IVec2::new(4, 2))]
    #[case(IVec2::new(0, 3))]
    fn out_of_bounds_writes_leave_grid_unchanged(#[case] pos: IVec2) {
        let mut grid = TileGrid::new(4, 3, 1);
        let before = grid.clone();
        grid.set_tile_code(pos, 0, 7);
        grid.set_collision(pos, CollisionKind::Solid);
        assert_eq!(grid, before);
    }

    #[test]
    fn unknown_layer_reads_and_writes_are_ignored() {
        let mut grid = TileGrid::new(2, 2, 1);
        let pos = IVec2::new(1, 1);
        grid.set_tile_code(pos, 5, 7);
        assert_eq!(grid.tile_code(pos, 5), EMPTY_TILE);
    }

    #[test]
    fn unpopulated_grid_always_yields_sentinels() {
        let grid = TileGrid::default();
        assert!(grid.is_unpopulated());
        assert_eq!(grid.tile_code(IVec2::ZERO, 0), EMPTY_TILE);
        assert_eq!(grid.collision(IVec2::ZERO), CollisionKind::None);
    }

    #[rstest]
    #[case(1, CollisionKind::Solid)]
    #[case(2, CollisionKind::Break)]
    #[case(3, CollisionKind::Solid)]
    #[case(4, CollisionKind::Ladder)]
    #[case(0, CollisionKind::None)]
    #[case(5, CollisionKind::None)]
    #[case(10, CollisionKind::None)]
    fn tile_codes_reduce_to_collision_kinds(#[case] code: i32, #[case] kind: CollisionKind) {
        assert_eq!(CollisionKind::from_code(code), kind);
    }

    #[test]
    fn collision_at_world_uses_the_containing_cell() {
        let mut grid = TileGrid::new(3, 3, 1);
        grid.set_collision(IVec2::new(1, 0), CollisionKind::Solid);
        assert_eq!(
            grid.collision_at_world(Vec2::new(1.5, 0.99)),
            CollisionKind::Solid
        );
        assert_eq!(
            grid.collision_at_world(Vec2::new(1.5, 1.01)),
            CollisionKind::None
        );
        assert_eq!(
            grid.collision_at_world(Vec2::new(-0.5, 0.5)),
            CollisionKind::None
        );
    }

    #[test]
    fn decorative_index_is_zero_based() {
        assert_eq!(decorative_index(3), Some(2));
        assert_eq!(decorative_index(1), Some(0));
        assert_eq!(decorative_index(0), None);
        assert_eq!(decorative_index(-2), None);
    }

    #[test]
    fn collision_cells_lists_only_physics_cells() {
        let mut grid = TileGrid::new(2, 2, 1);
        grid.set_collision(IVec2::new(0, 1), CollisionKind::Ladder);
        grid.set_collision(IVec2::new(1, 0), CollisionKind::Break);
        let mut cells: Vec<_> = grid.collision_cells().collect();
        cells.sort_by_key(|(pos, _)| (pos.y, pos.x));
        assert_eq!(
            cells,
            vec![
                (IVec2::new(1, 0), CollisionKind::Break),
                (IVec2::new(0, 1), CollisionKind::Ladder),
            ]
        );
    }
}
