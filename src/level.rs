use crate::error::LevelError;
use crate::geometry::Point;
use crate::grid::{Grid, Tile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Player start position in map units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerStart {
    pub x: f32,
    pub y: f32,
}

/// Level file: tile codes row-major, 0=void, 1=wall, 2=floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default)]
    pub name: String,
    pub width: i32,
    pub height: i32,
    pub data: Vec<u8>,
    #[serde(default)]
    pub player: PlayerStart,
}

impl Level {
    /// Build a level file from a grid
    pub fn from_grid(name: &str, grid: &Grid, player: Point) -> Self {
        Level {
            name: name.to_string(),
            width: grid.cols,
            height: grid.rows,
            data: grid.cells.iter().map(|t| t.code()).collect(),
            player: PlayerStart {
                x: player.x,
                y: player.y,
            },
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from a JSON file and validate it
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let level = Self::from_json(&json)?;
        info!(path = %path.display(), name = %level.name, "loaded level");
        Ok(level)
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    fn validate(&self) -> Result<(), LevelError> {
        let expected = (self.width.max(0) as usize) * (self.height.max(0) as usize);
        if self.width < 0 || self.height < 0 || self.data.len() != expected {
            return Err(LevelError::SizeMismatch {
                width: self.width,
                height: self.height,
                expected,
                actual: self.data.len(),
            });
        }
        if let Some((index, &code)) = self
            .data
            .iter()
            .enumerate()
            .find(|(_, code)| Tile::from_code(**code).is_none())
        {
            return Err(LevelError::UnknownTile { code, index });
        }
        Ok(())
    }

    /// Convert tile codes into a grid
    pub fn to_grid(&self) -> Result<Grid, LevelError> {
        self.validate()?;
        let mut grid = Grid::new(self.height, self.width, Tile::Void);
        for (index, &code) in self.data.iter().enumerate() {
            // validate() already rejected unknown codes
            grid.cells[index] = Tile::from_code(code).unwrap_or_default();
        }
        Ok(grid)
    }

    pub fn player_position(&self) -> Point {
        Point::new(self.player.x, self.player.y)
    }
}

/// Parse a text map.
///
/// Format:
/// - `■` or `#`: wall
/// - `□` or `.`: floor
/// - `s` or `@`: floor with the player start (centered in the cell)
/// - space: void
///
/// Rows may be shorter than the widest row; missing cells are void.
pub fn parse_text_level(name: &str, text: &str, cell_size: f32) -> Result<Level, LevelError> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(LevelError::Text("no rows found".to_string()));
    }

    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let height = lines.len() as i32;
    let mut data = vec![Tile::Void.code(); (width * height) as usize];
    let mut player = None;

    for (y, line) in lines.iter().enumerate() {
        for (x, ch) in line.chars().enumerate() {
            let tile = match ch {
                '■' | '#' => Tile::Wall,
                '□' | '.' => Tile::Floor,
                's' | '@' => {
                    if player.is_some() {
                        return Err(LevelError::Text(format!(
                            "second player start at column {}, row {}",
                            x, y
                        )));
                    }
                    player = Some(PlayerStart {
                        x: (x as f32 + 0.5) * cell_size,
                        y: (y as f32 + 0.5) * cell_size,
                    });
                    Tile::Floor
                }
                ' ' => Tile::Void,
                other => {
                    return Err(LevelError::Text(format!(
                        "unexpected character {:?} at column {}, row {}",
                        other, x, y
                    )))
                }
            };
            data[y * width as usize + x] = tile.code();
        }
    }

    Ok(Level {
        name: name.to_string(),
        width,
        height,
        data,
        player: player.unwrap_or_default(),
    })
}

/// Render a grid as text glyphs, marking the player's cell with `s`
pub fn grid_to_text(grid: &Grid, player_cell: Option<(i32, i32)>) -> String {
    let mut result = String::new();

    for y in 0..grid.rows {
        for x in 0..grid.cols {
            let symbol = if player_cell == Some((x, y)) {
                's'
            } else {
                match grid.get_cell(x, y) {
                    Tile::Wall => '■',
                    Tile::Floor => '□',
                    Tile::Void => ' ',
                }
            };
            result.push(symbol);
        }
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text_level() {
        let level = parse_text_level("tiny", "###\n#s.\n###\n", 32.0).unwrap();
        assert_eq!((level.width, level.height), (3, 3));
        assert_eq!(level.player, PlayerStart { x: 48.0, y: 48.0 });
        let grid = level.to_grid().unwrap();
        assert_eq!(grid.get_cell(1, 1), Tile::Floor);
        assert_eq!(grid.get_cell(2, 1), Tile::Floor);
        assert_eq!(grid.get_cell(0, 0), Tile::Wall);
    }

    #[test]
    fn test_short_rows_pad_with_void() {
        let level = parse_text_level("ragged", "####\n#.\n", 1.0).unwrap();
        let grid = level.to_grid().unwrap();
        assert_eq!(grid.get_cell(3, 1), Tile::Void);
    }

    #[test]
    fn test_rejects_bad_text() {
        assert!(matches!(parse_text_level("x", "#?#", 1.0), Err(LevelError::Text(_))));
        assert!(matches!(parse_text_level("x", "s@", 1.0), Err(LevelError::Text(_))));
        assert!(matches!(parse_text_level("x", "\n\n", 1.0), Err(LevelError::Text(_))));
    }

    #[test]
    fn test_json_size_mismatch() {
        let json = r#"{ "width": 2, "height": 2, "data": [1, 2, 1] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::SizeMismatch { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_json_unknown_tile() {
        let json = r#"{ "width": 2, "height": 1, "data": [1, 9] }"#;
        assert!(matches!(
            Level::from_json(json),
            Err(LevelError::UnknownTile { code: 9, index: 1 })
        ));
    }

    #[test]
    fn test_grid_round_trip_through_level() {
        let grid = Grid::walled_room(2, 3);
        let level = Level::from_grid("room", &grid, Point::new(40.0, 40.0));
        let restored = level.to_grid().unwrap();
        assert_eq!(restored.cells, grid.cells);
        assert_eq!(level.player_position(), Point::new(40.0, 40.0));
    }

    #[test]
    fn test_grid_to_text() {
        let grid = Grid::walled_room(1, 2);
        let text = grid_to_text(&grid, Some((1, 1)));
        assert_eq!(text, "■■■■\n■s□■\n■■■■\n");
    }
}
