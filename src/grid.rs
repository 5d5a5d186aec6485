use std::fmt;

use crate::constants::{GRID_COLS, GRID_ROWS, TILE_HEIGHT, TILE_WIDTH};
use crate::types::{Pickup, Vec2};

pub const EMPTY: u8 = 0;
pub const PELLET: u8 = 1;
pub const POWER_PELLET: u8 = 2;
pub const GATE: u8 = 9;

/// Fixed maze. Codes 3..=8 are wall segments that differ only in how they are drawn.
#[rustfmt::skip]
const BOARD: [[u8; GRID_COLS]; GRID_ROWS] = [
    [6, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 5],
    [3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 3, 1, 6, 4, 4, 5, 1, 6, 4, 4, 4, 5, 1, 3, 3, 1, 6, 4, 4, 4, 5, 1, 6, 4, 4, 5, 1, 3, 3],
    [3, 3, 2, 3, 4, 4, 3, 1, 3, 4, 4, 4, 3, 1, 3, 3, 1, 3, 4, 4, 4, 3, 1, 3, 4, 4, 3, 2, 3, 3],
    [3, 3, 1, 7, 4, 4, 8, 1, 7, 4, 4, 4, 8, 1, 7, 8, 1, 7, 4, 4, 4, 8, 1, 7, 4, 4, 8, 1, 3, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 3, 1, 6, 4, 4, 5, 1, 6, 5, 1, 6, 4, 4, 4, 4, 4, 4, 5, 1, 6, 5, 1, 6, 4, 4, 5, 1, 3, 3],
    [3, 3, 1, 7, 4, 4, 8, 1, 3, 3, 1, 7, 4, 4, 4, 4, 4, 4, 8, 1, 3, 3, 1, 7, 4, 4, 8, 1, 3, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 4, 4, 4, 4, 4, 5, 1, 3, 4, 4, 4, 5, 0, 3, 3, 0, 6, 4, 4, 4, 3, 1, 6, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 4, 4, 4, 8, 0, 7, 8, 0, 7, 4, 4, 4, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 3, 0, 6, 4, 4, 9, 9, 4, 4, 5, 0, 3, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [7, 4, 4, 4, 4, 4, 8, 1, 7, 8, 0, 3, 0, 0, 0, 0, 0, 0, 3, 0, 7, 8, 1, 7, 4, 4, 4, 4, 4, 8],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0],
    [6, 4, 4, 4, 4, 4, 5, 1, 6, 5, 0, 3, 0, 0, 0, 0, 0, 0, 3, 0, 6, 5, 1, 6, 4, 4, 4, 4, 4, 5],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 3, 0, 7, 4, 4, 4, 4, 4, 4, 8, 0, 3, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 3, 1, 3, 3, 0, 6, 4, 4, 4, 4, 4, 4, 5, 0, 3, 3, 1, 3, 4, 4, 4, 4, 4, 3],
    [3, 4, 4, 4, 4, 4, 8, 1, 7, 8, 0, 7, 4, 4, 4, 4, 4, 4, 8, 0, 7, 8, 1, 7, 4, 4, 4, 4, 4, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 3, 1, 6, 4, 4, 5, 1, 6, 4, 4, 4, 5, 1, 3, 3, 1, 6, 4, 4, 4, 5, 1, 6, 4, 4, 5, 1, 3, 3],
    [3, 3, 1, 7, 4, 4, 3, 1, 7, 4, 4, 4, 8, 1, 7, 8, 1, 7, 4, 4, 4, 8, 1, 3, 4, 4, 8, 1, 3, 3],
    [3, 3, 2, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 1, 0, 0, 1, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 2, 3, 3],
    [3, 4, 4, 5, 1, 3, 3, 1, 6, 5, 1, 6, 4, 4, 4, 4, 4, 4, 5, 1, 6, 5, 1, 3, 3, 1, 6, 4, 4, 3],
    [3, 4, 4, 8, 1, 7, 8, 1, 3, 3, 1, 7, 4, 4, 4, 4, 4, 4, 8, 1, 3, 3, 1, 7, 8, 1, 7, 4, 4, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 3, 3, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 3, 1, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 1, 7, 8, 1, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 1, 3, 3],
    [3, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 3],
    [3, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 3],
    [7, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 8],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Pellet,
    PowerPellet,
    Wall(u8),
    Gate,
}

impl Tile {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            EMPTY => Some(Self::Empty),
            PELLET => Some(Self::Pellet),
            POWER_PELLET => Some(Self::PowerPellet),
            3..=8 => Some(Self::Wall(code)),
            GATE => Some(Self::Gate),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Empty => EMPTY,
            Self::Pellet => PELLET,
            Self::PowerPellet => POWER_PELLET,
            Self::Wall(code) => code,
            Self::Gate => GATE,
        }
    }

    pub fn is_passable(self, gate_access: bool) -> bool {
        match self {
            Self::Empty | Self::Pellet | Self::PowerPellet => true,
            Self::Gate => gate_access,
            Self::Wall(_) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    RowCount { rows: usize },
    RowWidth { row: usize, width: usize },
    UnknownCode { row: usize, col: usize, code: u8 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowCount { rows } => {
                write!(f, "layout has {rows} rows, expected {GRID_ROWS}")
            }
            Self::RowWidth { row, width } => {
                write!(f, "layout row {row} has {width} columns, expected {GRID_COLS}")
            }
            Self::UnknownCode { row, col, code } => {
                write!(f, "unknown tile code {code} at ({col},{row})")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Vec<Tile>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        let cells = BOARD
            .iter()
            .map(|row| {
                row.iter()
                    .map(|code| Tile::from_code(*code).unwrap_or(Tile::Wall(3)))
                    .collect()
            })
            .collect();
        Self { cells }
    }

    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, LayoutError> {
        if rows.len() != GRID_ROWS {
            return Err(LayoutError::RowCount { rows: rows.len() });
        }
        let mut cells = Vec::with_capacity(GRID_ROWS);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != GRID_COLS {
                return Err(LayoutError::RowWidth {
                    row: row_idx,
                    width: row.len(),
                });
            }
            let mut tiles = Vec::with_capacity(GRID_COLS);
            for (col_idx, code) in row.iter().enumerate() {
                let Some(tile) = Tile::from_code(*code) else {
                    return Err(LayoutError::UnknownCode {
                        row: row_idx,
                        col: col_idx,
                        code: *code,
                    });
                };
                tiles.push(tile);
            }
            cells.push(tiles);
        }
        Ok(Self { cells })
    }

    pub fn tile_at(&self, col: i32, row: i32) -> Option<Tile> {
        if col < 0 || row < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|tiles| tiles.get(col as usize))
            .copied()
    }

    /// Passability of the tile under a pixel. Off-grid pixels are walls.
    pub fn probe(&self, px: i32, py: i32, gate_access: bool) -> bool {
        let (col, row) = pixel_to_tile(px, py);
        self.tile_at(col, row)
            .map(|tile| tile.is_passable(gate_access))
            .unwrap_or(false)
    }

    pub fn consume(&mut self, col: i32, row: i32) -> Option<Pickup> {
        if col < 0 || row < 0 {
            return None;
        }
        let cell = self
            .cells
            .get_mut(row as usize)
            .and_then(|tiles| tiles.get_mut(col as usize))?;
        let pickup = match *cell {
            Tile::Pellet => Pickup::Pellet,
            Tile::PowerPellet => Pickup::PowerPellet,
            _ => return None,
        };
        *cell = Tile::Empty;
        Some(pickup)
    }

    pub fn remaining_items(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|tile| matches!(tile, Tile::Pellet | Tile::PowerPellet))
            .count()
    }

    pub fn is_cleared(&self) -> bool {
        self.remaining_items() == 0
    }

    pub fn codes(&self) -> Vec<Vec<u8>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(|tile| tile.code()).collect())
            .collect()
    }

    pub fn cols(&self) -> i32 {
        GRID_COLS as i32
    }

    pub fn rows(&self) -> i32 {
        GRID_ROWS as i32
    }
}

/// Floor division so that tunnel coordinates left of x=0 land in column -1.
pub fn pixel_to_tile(px: i32, py: i32) -> (i32, i32) {
    (px.div_euclid(TILE_WIDTH), py.div_euclid(TILE_HEIGHT))
}

pub fn tile_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(
        col * TILE_WIDTH + TILE_WIDTH / 2,
        row * TILE_HEIGHT + TILE_HEIGHT / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleared_codes() -> Vec<Vec<u8>> {
        Grid::new()
            .codes()
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|code| if code == PELLET || code == POWER_PELLET { EMPTY } else { code })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn board_has_expected_items_and_pen_gate() {
        let grid = Grid::new();
        assert!(grid.remaining_items() > 200);
        assert_eq!(grid.tile_at(14, 13), Some(Tile::Gate));
        assert_eq!(grid.tile_at(15, 13), Some(Tile::Gate));
        assert_eq!(grid.tile_at(2, 4), Some(Tile::PowerPellet));
        assert_eq!(grid.tile_at(27, 24), Some(Tile::PowerPellet));
    }

    #[test]
    fn tunnel_row_is_open_at_both_edges() {
        let grid = Grid::new();
        assert_eq!(grid.tile_at(0, 15), Some(Tile::Empty));
        assert_eq!(grid.tile_at(29, 15), Some(Tile::Empty));
    }

    #[test]
    fn out_of_range_lookups_are_impassable() {
        let grid = Grid::new();
        assert_eq!(grid.tile_at(-1, 15), None);
        assert_eq!(grid.tile_at(30, 15), None);
        assert_eq!(grid.tile_at(5, 32), None);
        assert!(!grid.probe(-8, 15 * TILE_HEIGHT + 10, true));
        assert!(!grid.probe(922, 15 * TILE_HEIGHT + 10, true));
        assert!(!grid.probe(450, 10_000, true));
    }

    #[test]
    fn gate_needs_access() {
        assert!(!Tile::Gate.is_passable(false));
        assert!(Tile::Gate.is_passable(true));
        for code in 3..=8 {
            let tile = Tile::from_code(code).expect("wall code");
            assert!(!tile.is_passable(true));
        }
    }

    #[test]
    fn consume_clears_cell_and_reports_item() {
        let mut grid = Grid::new();
        let before = grid.remaining_items();
        assert_eq!(grid.consume(2, 2), Some(Pickup::Pellet));
        assert_eq!(grid.tile_at(2, 2), Some(Tile::Empty));
        assert_eq!(grid.consume(2, 2), None);
        assert_eq!(grid.consume(2, 4), Some(Pickup::PowerPellet));
        assert_eq!(grid.consume(0, 0), None);
        assert_eq!(grid.consume(-3, 99), None);
        assert_eq!(grid.remaining_items(), before - 2);
    }

    #[test]
    fn cleared_layout_is_won_and_one_pellet_is_not() {
        let codes = cleared_codes();
        let grid = Grid::from_codes(&codes).expect("valid layout");
        assert!(grid.is_cleared());

        let mut one_left = codes;
        one_left[29][20] = PELLET;
        let grid = Grid::from_codes(&one_left).expect("valid layout");
        assert!(!grid.is_cleared());
        assert_eq!(grid.remaining_items(), 1);
    }

    #[test]
    fn from_codes_rejects_bad_layouts() {
        let mut codes = Grid::new().codes();
        codes[3][4] = 12;
        assert_eq!(
            Grid::from_codes(&codes),
            Err(LayoutError::UnknownCode { row: 3, col: 4, code: 12 })
        );
        codes[3][4] = 3;
        codes[5].pop();
        assert_eq!(
            Grid::from_codes(&codes),
            Err(LayoutError::RowWidth { row: 5, width: 29 })
        );
        codes.pop();
        assert!(matches!(
            Grid::from_codes(&codes),
            Err(LayoutError::RowCount { rows: 31 })
        ));
    }

    #[test]
    fn pixel_mapping_floors_negative_coordinates() {
        assert_eq!(pixel_to_tile(-8, 430), (-1, 15));
        assert_eq!(pixel_to_tile(0, 0), (0, 0));
        assert_eq!(pixel_to_tile(473, 687), (15, 24));
        assert_eq!(tile_center(1, 1), Vec2::new(45, 42));
        assert_eq!(tile_center(28, 31), Vec2::new(855, 882));
    }
}
