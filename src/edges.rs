use crate::geometry::{Point, Segment};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Side of the open cell an edge was generated from.
/// Edges only merge with edges of the same side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// A merged boundary run between open and blocking cells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub segment: Segment,
    pub side: EdgeSide,
}

/// Merge map key: a grid corner (in cell units) plus the edge side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey {
    x: i32,
    y: i32,
    side: EdgeSide,
}

/// Pending chain of unit edges, corners in cell units
#[derive(Debug, Clone, Copy)]
struct Chain {
    start: (i32, i32),
    end: (i32, i32),
}

/// Accumulates unit edges into maximal straight runs per side
struct EdgeMerger {
    chains: HashMap<EdgeKey, Chain>,
}

impl EdgeMerger {
    fn new() -> Self {
        EdgeMerger {
            chains: HashMap::new(),
        }
    }

    /// Add a unit edge from `start` to `end`. If a chain of the same side
    /// ends where this edge starts, extend it and re-key by the new end.
    fn add(&mut self, start: (i32, i32), end: (i32, i32), side: EdgeSide) {
        let start_key = EdgeKey { x: start.0, y: start.1, side };
        let end_key = EdgeKey { x: end.0, y: end.1, side };

        let chain = match self.chains.remove(&start_key) {
            Some(existing) => Chain {
                start: existing.start,
                end,
            },
            None => Chain { start, end },
        };
        self.chains.insert(end_key, chain);
    }

    fn finish(self, cell_size: f32) -> Vec<Edge> {
        let mut merged: Vec<(EdgeKey, Chain)> = self.chains.into_iter().collect();
        // HashMap order is random; sort so output is stable run to run
        merged.sort_by_key(|(key, chain)| (key.side, chain.start.1, chain.start.0));

        merged
            .into_iter()
            .map(|(key, chain)| Edge {
                segment: Segment::new(
                    corner_to_point(chain.start, cell_size),
                    corner_to_point(chain.end, cell_size),
                ),
                side: key.side,
            })
            .collect()
    }
}

fn corner_to_point(corner: (i32, i32), cell_size: f32) -> Point {
    Point::new(corner.0 as f32 * cell_size, corner.1 as f32 * cell_size)
}

/// Derive line-of-sight boundary edges from the grid.
///
/// Every open cell emits a unit edge on each side that faces a blocking or
/// out-of-bounds neighbor. Unit edges are merged into maximal straight runs
/// per side. Cells are visited row-major, so vertical edges grow downward and
/// horizontal edges grow rightward.
pub fn polygonize(grid: &Grid, cell_size: f32) -> Vec<Edge> {
    let mut merger = EdgeMerger::new();
    let mut unit_edges = 0usize;

    for y in 0..grid.rows {
        for x in 0..grid.cols {
            if !grid.is_open(x, y) {
                continue;
            }

            if grid.is_blocked(x - 1, y) {
                merger.add((x, y), (x, y + 1), EdgeSide::Left);
                unit_edges += 1;
            }
            if grid.is_blocked(x + 1, y) {
                merger.add((x + 1, y), (x + 1, y + 1), EdgeSide::Right);
                unit_edges += 1;
            }
            if grid.is_blocked(x, y - 1) {
                merger.add((x, y), (x + 1, y), EdgeSide::Top);
                unit_edges += 1;
            }
            if grid.is_blocked(x, y + 1) {
                merger.add((x, y + 1), (x + 1, y + 1), EdgeSide::Bottom);
                unit_edges += 1;
            }
        }
    }

    let edges = merger.finish(cell_size);
    debug!(
        rows = grid.rows,
        cols = grid.cols,
        unit_edges,
        merged = edges.len(),
        "polygonized grid"
    );
    edges
}

/// Snapshot of extracted edges for one grid revision
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    pub edges: Vec<Edge>,
    /// Plain segments, same order as `edges`
    pub segments: Vec<Segment>,
    pub cell_size: f32,
    pub revision: u64,
}

impl EdgeSet {
    pub fn build(grid: &Grid, cell_size: f32) -> Self {
        let edges = polygonize(grid, cell_size);
        let segments = edges.iter().map(|e| e.segment).collect();
        EdgeSet {
            edges,
            segments,
            cell_size,
            revision: grid.get_revision(),
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn find(edges: &[Edge], side: EdgeSide) -> Vec<Segment> {
        edges.iter().filter(|e| e.side == side).map(|e| e.segment).collect()
    }

    #[test]
    fn test_single_open_cell() {
        let mut grid = Grid::new(3, 3, Tile::Wall);
        grid.set_cell(1, 1, Tile::Floor);
        let edges = polygonize(&grid, 32.0);
        assert_eq!(edges.len(), 4);

        assert_eq!(find(&edges, EdgeSide::Left), vec![Segment::from_coords(32.0, 32.0, 32.0, 64.0)]);
        assert_eq!(find(&edges, EdgeSide::Right), vec![Segment::from_coords(64.0, 32.0, 64.0, 64.0)]);
        assert_eq!(find(&edges, EdgeSide::Top), vec![Segment::from_coords(32.0, 32.0, 64.0, 32.0)]);
        assert_eq!(find(&edges, EdgeSide::Bottom), vec![Segment::from_coords(32.0, 64.0, 64.0, 64.0)]);
    }

    #[test]
    fn test_row_merges_horizontally() {
        // ■■■■■
        // ■□□□■
        // ■■■■■
        let grid = Grid::walled_room(1, 3);
        let edges = polygonize(&grid, 10.0);
        assert_eq!(edges.len(), 4);
        assert_eq!(find(&edges, EdgeSide::Top), vec![Segment::from_coords(10.0, 10.0, 40.0, 10.0)]);
        assert_eq!(find(&edges, EdgeSide::Bottom), vec![Segment::from_coords(10.0, 20.0, 40.0, 20.0)]);
    }

    #[test]
    fn test_open_grid_without_border() {
        // Grid edges count as blocking
        let grid = Grid::new(2, 3, Tile::Floor);
        let edges = polygonize(&grid, 1.0);
        assert_eq!(edges.len(), 4);
        assert_eq!(find(&edges, EdgeSide::Left), vec![Segment::from_coords(0.0, 0.0, 0.0, 2.0)]);
        assert_eq!(find(&edges, EdgeSide::Right), vec![Segment::from_coords(3.0, 0.0, 3.0, 2.0)]);
    }

    #[test]
    fn test_pillar_sides_stay_separate() {
        // A single wall in the middle of a 3x3 floor: the four pillar faces
        // meet at corners but never merge with each other
        let grid = Grid::with_walls(3, 3, &[4]);
        let edges = polygonize(&grid, 1.0);
        // Outer boundary (4) + pillar faces (4)
        assert_eq!(edges.len(), 8);
        for edge in &edges {
            assert!(edge.segment.is_axis_aligned());
        }
        let pillar_right_face = Edge {
            segment: Segment::from_coords(1.0, 1.0, 1.0, 2.0),
            side: EdgeSide::Right,
        };
        assert!(edges.contains(&pillar_right_face));
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::new(0, 0, Tile::Floor);
        assert!(polygonize(&grid, 32.0).is_empty());
    }

    #[test]
    fn test_edge_set_tracks_revision() {
        let mut grid = Grid::walled_room(2, 2);
        grid.set_cell(1, 1, Tile::Wall);
        let set = EdgeSet::build(&grid, 32.0);
        assert_eq!(set.revision, 1);
        assert_eq!(set.segments.len(), set.edges.len());
    }
}
