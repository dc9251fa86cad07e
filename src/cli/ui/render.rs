//! Grid Text Rendering
//!
//! One ASCII character per tile for terminal inspection. A debug aid, not a
//! renderer; consumers wanting pixels should read the numeric codes.

use crate::types::{Grid, TileType};

/// Terminal glyph for a tile
pub fn glyph(tile: TileType) -> char {
    match tile {
        TileType::Wall => '#',
        TileType::Floor => '.',
        TileType::Door => '+',
        TileType::SecretDoor => '?',
        TileType::Start => 'S',
        TileType::End => 'E',
    }
}

/// Render the whole grid, one row per line
pub fn render_grid(grid: &Grid) -> String {
    grid.rows()
        .iter()
        .map(|row| row.iter().map(|&tile| glyph(tile)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line legend matching [`glyph`]
pub fn legend() -> String {
    TileType::ALL
        .iter()
        .map(|&tile| format!("{} {}", glyph(tile), tile.name()))
        .collect::<Vec<_>>()
        .join("   ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyphs_are_distinct() {
        let mut glyphs: Vec<char> = TileType::ALL.iter().map(|&t| glyph(t)).collect();
        glyphs.sort_unstable();
        glyphs.dedup();
        assert_eq!(glyphs.len(), TileType::ALL.len());
    }

    #[test]
    fn test_render_fallback_grid() {
        let rendered = render_grid(&Grid::fallback(4, 3));
        assert_eq!(rendered, "####\n#..#\n####");
    }

    #[test]
    fn test_legend_names_every_tile() {
        let legend = legend();
        for tile in TileType::ALL {
            assert!(legend.contains(tile.name()));
        }
    }
}
