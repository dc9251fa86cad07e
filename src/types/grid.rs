//! Tile Grid Value Objects
//!
//! The closed tile vocabulary and the immutable rectangular grid built from
//! it. A `Grid` can only be constructed through paths that uphold the
//! rectangularity invariant, so downstream code never re-checks dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// TileType
// =============================================================================

/// Closed enumeration of cell types, with the numeric codes the model emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileType {
    Wall = 0,
    Floor = 1,
    Door = 2,
    SecretDoor = 3,
    Start = 4,
    End = 5,
}

impl TileType {
    /// All tile types in numeric-code order
    pub const ALL: [TileType; 6] = [
        TileType::Wall,
        TileType::Floor,
        TileType::Door,
        TileType::SecretDoor,
        TileType::Start,
        TileType::End,
    ];

    /// Numeric code used in the wire payload
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Vocabulary name presented to the model and in metadata
    pub const fn name(self) -> &'static str {
        match self {
            TileType::Wall => "wall",
            TileType::Floor => "floor",
            TileType::Door => "door",
            TileType::SecretDoor => "secret door",
            TileType::Start => "start",
            TileType::End => "end",
        }
    }

    /// One-line meaning used when teaching the model the vocabulary
    pub const fn meaning(self) -> &'static str {
        match self {
            TileType::Wall => "impassable solid cell",
            TileType::Floor => "open walkable cell",
            TileType::Door => "passable opening between areas",
            TileType::SecretDoor => "concealed opening, drawn as wall until found",
            TileType::Start => "entry point marker, exactly one when a path is expected",
            TileType::End => "goal marker, exactly one when a path is expected",
        }
    }

    /// Whether this tile may sit on an enclosed boundary edge
    pub const fn is_boundary(self) -> bool {
        matches!(self, TileType::Wall | TileType::Door | TileType::SecretDoor)
    }
}

impl TryFrom<i64> for TileType {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, i64> {
        match value {
            0 => Ok(TileType::Wall),
            1 => Ok(TileType::Floor),
            2 => Ok(TileType::Door),
            3 => Ok(TileType::SecretDoor),
            4 => Ok(TileType::Start),
            5 => Ok(TileType::End),
            other => Err(other),
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Grid
// =============================================================================

/// Immutable rectangular grid of tiles
///
/// Invariant: `rows.len() == height` and every row has exactly `width` cells.
/// Enforced at construction; all accessors may rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    rows: Vec<Vec<TileType>>,
}

impl Grid {
    /// Build a grid from typed rows, checking the rectangularity invariant
    ///
    /// Returns `None` when the rows do not form a `width` x `height`
    /// rectangle. Callers that already validated dimensions (the validator)
    /// treat `None` as a logic error.
    pub fn from_rows(rows: Vec<Vec<TileType>>, width: usize, height: usize) -> Option<Self> {
        if rows.len() != height || rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            rows,
        })
    }

    /// Deterministic degraded grid: WALL border, FLOOR interior
    ///
    /// Returned by the pipeline when every attempt is exhausted.
    pub fn fallback(width: usize, height: usize) -> Self {
        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if y == 0 || y == height - 1 || x == 0 || x == width - 1 {
                            TileType::Wall
                        } else {
                            TileType::Floor
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[Vec<TileType>] {
        &self.rows
    }

    /// Tile at (x, y); panics outside the grid, which the invariant forbids
    /// for coordinates derived from `width()`/`height()`
    pub fn tile(&self, x: usize, y: usize) -> TileType {
        self.rows[y][x]
    }

    /// Count cells of a given type
    pub fn count(&self, tile: TileType) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    /// Iterate boundary cells with their coordinates
    pub fn edge_cells(&self) -> impl Iterator<Item = (usize, usize, TileType)> + '_ {
        let (w, h) = (self.width, self.height);
        self.rows.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().filter_map(move |(x, &t)| {
                if y == 0 || y == h - 1 || x == 0 || x == w - 1 {
                    Some((x, y, t))
                } else {
                    None
                }
            })
        })
    }

    /// Numeric-code rows, the shape the wire payload carries
    pub fn to_codes(&self) -> Vec<Vec<u8>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|t| t.code()).collect())
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tile_codes_round_trip() {
        for tile in TileType::ALL {
            assert_eq!(TileType::try_from(tile.code() as i64), Ok(tile));
        }
    }

    #[test]
    fn test_tile_out_of_range() {
        assert_eq!(TileType::try_from(6), Err(6));
        assert_eq!(TileType::try_from(-1), Err(-1));
    }

    #[test]
    fn test_from_rows_enforces_rectangle() {
        let ragged = vec![vec![TileType::Wall; 3], vec![TileType::Wall; 2]];
        assert!(Grid::from_rows(ragged, 3, 2).is_none());

        let square = vec![vec![TileType::Floor; 3]; 3];
        let grid = Grid::from_rows(square, 3, 3).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
    }

    #[test]
    fn test_from_rows_rejects_wrong_height() {
        let rows = vec![vec![TileType::Floor; 3]; 2];
        assert!(Grid::from_rows(rows, 3, 3).is_none());
    }

    #[test]
    fn test_fallback_shape() {
        let grid = Grid::fallback(5, 4);
        assert_eq!(grid.height(), 4);
        assert!(grid.rows().iter().all(|row| row.len() == 5));

        // Border is wall, interior is floor
        for (x, y, t) in grid.edge_cells() {
            assert_eq!(t, TileType::Wall, "edge cell ({}, {}) not wall", x, y);
        }
        assert_eq!(grid.tile(2, 2), TileType::Floor);
        assert_eq!(grid.count(TileType::Floor), 3 * 2);
    }

    #[test]
    fn test_edge_cells_cover_perimeter() {
        let grid = Grid::fallback(4, 3);
        let edges: Vec<_> = grid.edge_cells().collect();
        // 4x3 perimeter: 2*4 + 2*3 - 4 corners counted once
        assert_eq!(edges.len(), 2 * 4 + 2 * 3 - 4);
    }

    proptest! {
        #[test]
        fn prop_fallback_cells_in_vocabulary(w in 2usize..32, h in 2usize..32) {
            let grid = Grid::fallback(w, h);
            for row in grid.rows() {
                for tile in row {
                    prop_assert!(tile.code() <= 5);
                }
            }
        }

        #[test]
        fn prop_fallback_dimensions(w in 2usize..32, h in 2usize..32) {
            let grid = Grid::fallback(w, h);
            prop_assert_eq!(grid.height(), h);
            prop_assert!(grid.rows().iter().all(|row| row.len() == w));
        }
    }
}
