use serde::{Deserialize, Serialize};

/// Tile classification. Only floor tiles let sight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    /// Nothing there (outside the level). Blocks sight.
    #[default]
    Void,
    Wall,
    Floor,
}

impl Tile {
    /// Level file tile code: 0=void, 1=wall, 2=floor
    pub fn from_code(code: u8) -> Option<Tile> {
        match code {
            0 => Some(Tile::Void),
            1 => Some(Tile::Wall),
            2 => Some(Tile::Floor),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Tile::Void => 0,
            Tile::Wall => 1,
            Tile::Floor => 2,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Tile::Floor)
    }
}

/// Grid structure for storing tiles, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub rows: i32,
    pub cols: i32,
    pub cells: Vec<Tile>,
    /// Revision number - incremented whenever grid cells change
    pub revision: u64,
}

impl Grid {
    /// Create a new grid with all cells set to `fill`
    pub fn new(rows: i32, cols: i32, fill: Tile) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        Grid {
            rows,
            cols,
            cells: vec![fill; rows as usize * cols as usize],
            revision: 0,
        }
    }

    /// Create an all-floor grid with specific wall cells (given as cell IDs)
    pub fn with_walls(rows: i32, cols: i32, walls: &[i32]) -> Self {
        let mut grid = Self::new(rows, cols, Tile::Floor);
        for &cell_id in walls {
            if cell_id >= 0 && (cell_id as usize) < grid.cells.len() {
                grid.cells[cell_id as usize] = Tile::Wall;
            }
        }
        grid
    }

    /// Create a floor area of `inner_rows` x `inner_cols` surrounded by a
    /// one-cell wall border
    pub fn walled_room(inner_rows: i32, inner_cols: i32) -> Self {
        let rows = inner_rows + 2;
        let cols = inner_cols + 2;
        let mut grid = Self::new(rows, cols, Tile::Wall);
        for y in 1..rows - 1 {
            for x in 1..cols - 1 {
                let id = grid.index(x, y);
                grid.cells[id] = Tile::Floor;
            }
        }
        grid
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.cols && y >= 0 && y < self.rows
    }

    /// Check if a cell at (x, y) lets sight through.
    /// Out of bounds is never open: a cell in the first column has no left
    /// neighbor, it does not wrap to the end of the previous row.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        self.get_cell(x, y).is_open()
    }

    /// Check if a cell at (x, y) blocks sight
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        !self.is_open(x, y)
    }

    /// Flat index of an in-bounds cell
    fn index(&self, x: i32, y: i32) -> usize {
        x as usize + y as usize * self.cols as usize
    }

    /// Get tile at (x, y)
    pub fn get_cell(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Void; // Out of bounds is treated as blocking
        }
        self.cells[self.index(x, y)]
    }

    /// Set tile at (x, y). Returns true if the grid changed.
    pub fn set_cell(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let id = self.index(x, y);
        if self.cells[id] == tile {
            return false;
        }
        self.cells[id] = tile;
        self.revision += 1;
        true
    }

    /// Get current grid revision number
    pub fn get_revision(&self) -> u64 {
        self.revision
    }

    pub fn open_count(&self) -> usize {
        self.cells.iter().filter(|t| t.is_open()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_blocked() {
        let grid = Grid::new(3, 3, Tile::Floor);
        assert!(grid.is_blocked(-1, 0));
        assert!(grid.is_blocked(3, 0));
        assert!(grid.is_blocked(0, -1));
        assert!(grid.is_blocked(0, 3));
        assert!(grid.is_open(2, 2));
    }

    #[test]
    fn test_no_row_wraparound() {
        // Cell (2, 0) is floor; (-1, 1) would land on it with flat indexing
        let mut grid = Grid::new(2, 3, Tile::Wall);
        grid.set_cell(2, 0, Tile::Floor);
        assert!(grid.is_blocked(-1, 1));
    }

    #[test]
    fn test_revision_bumps_only_on_change() {
        let mut grid = Grid::new(4, 4, Tile::Floor);
        assert!(!grid.set_cell(1, 1, Tile::Floor));
        assert_eq!(grid.get_revision(), 0);
        assert!(grid.set_cell(1, 1, Tile::Wall));
        assert_eq!(grid.get_revision(), 1);
        assert!(!grid.set_cell(10, 10, Tile::Wall));
        assert_eq!(grid.get_revision(), 1);
    }

    #[test]
    fn test_walled_room() {
        let grid = Grid::walled_room(3, 4);
        assert_eq!((grid.rows, grid.cols), (5, 6));
        assert_eq!(grid.open_count(), 12);
        assert_eq!(grid.get_cell(0, 0), Tile::Wall);
        assert_eq!(grid.get_cell(1, 1), Tile::Floor);
    }

    #[test]
    fn test_degenerate_sizes() {
        let grid = Grid::new(-2, 5, Tile::Floor);
        assert!(grid.cells.is_empty());
        assert_eq!(grid.get_cell(0, 0), Tile::Void);

        // Row-major, last cell of a tall grid
        let mut tall = Grid::new(100_000, 3, Tile::Wall);
        assert_eq!(tall.cells.len(), 300_000);
        assert!(tall.set_cell(2, 99_999, Tile::Floor));
        assert_eq!(tall.cells[299_999], Tile::Floor);
        assert_eq!(tall.get_cell(2, 99_999), Tile::Floor);
    }

    #[test]
    fn test_tile_codes() {
        for code in 0..3 {
            let tile = Tile::from_code(code).expect("known code");
            assert_eq!(tile.code(), code);
        }
        assert_eq!(Tile::from_code(7), None);
    }
}
