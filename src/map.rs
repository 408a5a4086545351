use crate::cone::Cone;
use crate::edges::EdgeSet;
use crate::grid::{Grid, Tile};
use crate::visibility::{calculate_visibility, VisibilityFan};
use std::sync::Arc;
use tracing::info;

/// Owns the tile grid and the line-of-sight edges extracted from it.
///
/// Edges are published as an immutable `Arc<EdgeSet>`. Any change builds a
/// complete new set before swapping it in, so a holder of an older snapshot
/// never sees a half-rebuilt set.
pub struct SightMap {
    grid: Grid,
    cell_size: f32,
    edges: Arc<EdgeSet>,
}

impl SightMap {
    pub fn new(grid: Grid, cell_size: f32) -> Self {
        let edges = Arc::new(EdgeSet::build(&grid, cell_size));
        info!(
            rows = grid.rows,
            cols = grid.cols,
            edges = edges.len(),
            "built sight map"
        );
        SightMap {
            grid,
            cell_size,
            edges,
        }
    }

    /// Swap in a freshly loaded grid
    pub fn replace_grid(&mut self, grid: Grid) {
        *self = SightMap::new(grid, self.cell_size);
    }

    /// Change one tile. Edges are rebuilt only if the grid actually changed.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        if !self.grid.set_cell(x, y, tile) {
            return false;
        }
        self.rebuild();
        true
    }

    fn rebuild(&mut self) {
        let edges = EdgeSet::build(&self.grid, self.cell_size);
        info!(revision = edges.revision, edges = edges.len(), "rebuilt sight edges");
        self.edges = Arc::new(edges);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Current edge snapshot
    pub fn edges(&self) -> Arc<EdgeSet> {
        Arc::clone(&self.edges)
    }

    pub fn visibility(&self, cone: &Cone, ray_length: f32) -> VisibilityFan {
        calculate_visibility(cone, &self.edges.segments, ray_length)
    }
}
