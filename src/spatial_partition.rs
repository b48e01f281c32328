//! Spatial grid partitioning for the collision broad phase.
//!
//! Asteroids are bucketed by cell each collision pass; projectile, ship and
//! objective queries then only look at the 3×3 block of cells around them
//! instead of every asteroid.
//!
//! ## Cell Size Choice
//!
//! Cell size (`GRID_CELL_SIZE` in `constants.rs`) is twice the largest asteroid
//! radius, so the widest query (largest asteroid plus the ship) stays inside a
//! one-cell reach.
//!
//! ## Torus
//!
//! In wrap mode the world is divided into a whole number of columns and rows
//! (each at least `cell_size` wide) and cell coordinates wrap, so the last
//! column neighbours the first.  Walled worlds use an unbounded grid.

use crate::wrap::WorldBounds;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    /// Effective cell extent per axis.
    cell: Vec2,
    /// Column/row count when wrapping; `None` for an unbounded grid.
    dims: Option<IVec2>,
    /// Map from cell coordinates to item indices
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32, world: WorldBounds) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        if world.wrap {
            let cols = ((world.width / cell_size).floor() as i32).max(1);
            let rows = ((world.height / cell_size).floor() as i32).max(1);
            Self {
                cell: Vec2::new(world.width / cols as f32, world.height / rows as f32),
                dims: Some(IVec2::new(cols, rows)),
                cells: HashMap::new(),
            }
        } else {
            Self {
                cell: Vec2::splat(cell_size),
                dims: None,
                cells: HashMap::new(),
            }
        }
    }

    /// Compute grid cell coordinates for a world position
    fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell.x).floor() as i32;
        let y = (pos.y / self.cell.y).floor() as i32;
        self.wrap_cell((x, y))
    }

    fn wrap_cell(&self, (x, y): (i32, i32)) -> (i32, i32) {
        match self.dims {
            Some(d) => (x.rem_euclid(d.x), y.rem_euclid(d.y)),
            None => (x, y),
        }
    }

    /// Insert an item at a position. Call after clear() for bulk rebuild.
    pub fn insert(&mut self, index: usize, pos: Vec2) {
        let cell = self.world_to_cell(pos);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Clear all grid data (call before each pass rebuild)
    pub fn clear(&mut self) {
        // Retain allocations but clear contents to avoid re-allocating Vec capacity
        for v in self.cells.values_mut() {
            v.clear();
        }
        self.cells.retain(|_, v| !v.is_empty());
    }

    /// Clear and re-index `positions` by their order.
    pub fn rebuild(&mut self, positions: impl IntoIterator<Item = Vec2>) {
        self.clear();
        for (index, pos) in positions.into_iter().enumerate() {
            self.insert(index, pos);
        }
    }

    /// Indices of every item in cells overlapping the circle at `pos`.
    ///
    /// Results are a conservative over-approximation: callers must still run
    /// the exact (wrapped) circle test.  Each index appears at most once.
    pub fn query(&self, pos: Vec2, max_distance: f32) -> Vec<usize> {
        let (cx, cy) = self.world_to_cell(pos);
        let reach = self.radius_in_cells(max_distance);

        let mut visited: Vec<(i32, i32)> =
            Vec::with_capacity(((2 * reach.x + 1) * (2 * reach.y + 1)) as usize);
        for dx in -reach.x..=reach.x {
            for dy in -reach.y..=reach.y {
                visited.push(self.wrap_cell((cx + dx, cy + dy)));
            }
        }
        // A reach wider than a small torus revisits the same cells.
        visited.sort_unstable();
        visited.dedup();

        visited
            .iter()
            .filter_map(|cell| self.cells.get(cell))
            .flatten()
            .copied()
            .collect()
    }

    /// Compute how many cells in each direction we need to check for a given max distance
    fn radius_in_cells(&self, max_distance: f32) -> IVec2 {
        let reach = (max_distance / self.cell)
            .ceil()
            .as_ivec2()
            .max(IVec2::ONE);
        match self.dims {
            // Half the torus in each direction already covers every cell.
            Some(d) => reach.min(d / 2 + IVec2::ONE),
            None => reach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_neighbour_in_adjacent_cell() {
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(1000.0, 1000.0, true));
        grid.rebuild([Vec2::new(150.0, 150.0), Vec2::new(750.0, 750.0)]);
        let hits = grid.query(Vec2::new(210.0, 150.0), 60.0);
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn finds_neighbour_across_the_seam() {
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(1000.0, 1000.0, true));
        grid.rebuild([Vec2::new(995.0, 500.0)]);
        assert_eq!(grid.query(Vec2::new(3.0, 500.0), 20.0), vec![0]);
        assert_eq!(grid.query(Vec2::new(500.0, 3.0), 20.0), Vec::<usize>::new());
    }

    #[test]
    fn uneven_world_still_tiles_the_torus() {
        // 1050 / 100 floors to 10 columns of 105.
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(1050.0, 1050.0, true));
        grid.rebuild([Vec2::new(1049.0, 10.0)]);
        assert_eq!(grid.query(Vec2::new(95.0, 10.0), 100.0), vec![0]);
    }

    #[test]
    fn small_torus_reports_each_item_once() {
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(200.0, 200.0, true));
        grid.rebuild([Vec2::new(10.0, 10.0), Vec2::new(150.0, 150.0)]);
        let mut hits = grid.query(Vec2::new(50.0, 50.0), 500.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn walled_grid_does_not_wrap() {
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(1000.0, 1000.0, false));
        grid.rebuild([Vec2::new(995.0, 500.0)]);
        assert!(grid.query(Vec2::new(3.0, 500.0), 20.0).is_empty());
        assert_eq!(grid.query(Vec2::new(1010.0, 500.0), 20.0), vec![0]);
    }

    #[test]
    fn clear_empties_every_cell() {
        let mut grid = SpatialGrid::new(100.0, WorldBounds::new(1000.0, 1000.0, true));
        grid.rebuild([Vec2::new(10.0, 10.0)]);
        grid.clear();
        assert!(grid.query(Vec2::new(10.0, 10.0), 50.0).is_empty());
    }
}
