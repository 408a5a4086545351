#![allow(dead_code)]

use sightcone::level::{parse_text_level, Level};
use sightcone::{Edge, EdgeSide, Grid, Tile};
use std::fs;
use std::path::{Path, PathBuf};

pub const CELL: f32 = 32.0;

pub fn levels_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data").join("levels")
}

/// Load every level fixture (.txt glyph maps and .json level files), sorted by name
pub fn load_fixtures() -> Vec<Level> {
    let mut entries: Vec<_> = fs::read_dir(levels_dir())
        .expect("test_data/levels exists")
        .filter_map(Result::ok)
        .map(|e| e.path())
        .collect();
    entries.sort();

    entries
        .iter()
        .filter_map(|path| match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Some(Level::load_from_file(path).expect("valid level json")),
            Some("txt") => {
                let text = fs::read_to_string(path).expect("readable level");
                let name = path.file_stem().and_then(|n| n.to_str()).unwrap_or("unknown");
                Some(parse_text_level(name, &text, CELL).expect("valid level text"))
            }
            _ => None,
        })
        .collect()
}

/// Build a grid from glyph text ('#' wall, '.' floor, ' ' void)
pub fn grid_from_text(text: &str) -> Grid {
    parse_text_level("inline", text, CELL)
        .and_then(|level| level.to_grid())
        .expect("valid grid text")
}

/// Order-independent, exactly comparable view of an edge set
pub fn edge_keys(edges: &[Edge]) -> Vec<(EdgeSide, [i64; 4])> {
    let mut keys: Vec<_> = edges
        .iter()
        .map(|e| {
            let s = e.segment;
            (
                e.side,
                [
                    s.p1.x.round() as i64,
                    s.p1.y.round() as i64,
                    s.p2.x.round() as i64,
                    s.p2.y.round() as i64,
                ],
            )
        })
        .collect();
    keys.sort();
    keys
}

/// Mirror a grid left-right
pub fn flip_grid_horizontal(grid: &Grid) -> Grid {
    let mut flipped = Grid::new(grid.rows, grid.cols, Tile::Void);
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            flipped.set_cell(grid.cols - 1 - x, y, grid.get_cell(x, y));
        }
    }
    flipped
}

/// Mirror a grid top-bottom
pub fn flip_grid_vertical(grid: &Grid) -> Grid {
    let mut flipped = Grid::new(grid.rows, grid.cols, Tile::Void);
    for y in 0..grid.rows {
        for x in 0..grid.cols {
            flipped.set_cell(x, grid.rows - 1 - y, grid.get_cell(x, y));
        }
    }
    flipped
}

/// Mirror edges left-right within a grid `cols` wide. Left and right faces
/// swap, and endpoints are reordered so runs still go top-down/left-right.
pub fn flip_edges_horizontal(edges: &[Edge], cols: i32) -> Vec<(EdgeSide, [i64; 4])> {
    let width = (cols as f32 * CELL).round() as i64;
    let mut keys: Vec<_> = edge_keys(edges)
        .into_iter()
        .map(|(side, [x1, y1, x2, y2])| match side {
            EdgeSide::Left => (EdgeSide::Right, [width - x1, y1, width - x2, y2]),
            EdgeSide::Right => (EdgeSide::Left, [width - x1, y1, width - x2, y2]),
            EdgeSide::Top | EdgeSide::Bottom => (side, [width - x2, y2, width - x1, y1]),
        })
        .collect();
    keys.sort();
    keys
}

/// Mirror edges top-bottom within a grid `rows` tall
pub fn flip_edges_vertical(edges: &[Edge], rows: i32) -> Vec<(EdgeSide, [i64; 4])> {
    let height = (rows as f32 * CELL).round() as i64;
    let mut keys: Vec<_> = edge_keys(edges)
        .into_iter()
        .map(|(side, [x1, y1, x2, y2])| match side {
            EdgeSide::Top => (EdgeSide::Bottom, [x1, height - y1, x2, height - y2]),
            EdgeSide::Bottom => (EdgeSide::Top, [x1, height - y1, x2, height - y2]),
            EdgeSide::Left | EdgeSide::Right => (side, [x2, height - y2, x1, height - y1]),
        })
        .collect();
    keys.sort();
    keys
}
