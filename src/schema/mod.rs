//! Grid Schema Registry
//!
//! **Single source of truth** for the tile vocabulary, spatial vocabulary,
//! feature primitives, and the archetype catalog, plus the pure validation
//! rules built on them. Everything here is a pure function over explicit
//! inputs; prompts and the validator both consume this module so the model is
//! taught exactly the rules its output is checked against.

use crate::constants;
use crate::types::{Archetype, Grid, TileType, Violation};

// =============================================================================
// Vocabulary
// =============================================================================

/// One spatial or feature term with its meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub word: &'static str,
    pub meaning: &'static str,
}

/// Immutable description of everything the model may talk about
///
/// Built once by [`SchemaRegistry::vocabulary`]; embedded into prompts and
/// presented in CLI metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Tile vocabulary in numeric-code order
    pub tiles: Vec<TileType>,
    /// Position terms the model may use when interpreting descriptions
    pub positions: &'static [Term],
    /// Size terms, smallest to largest
    pub sizes: &'static [Term],
    /// Shape terms for rooms and areas
    pub shapes: &'static [Term],
    /// Feature primitives the model may compose
    pub features: &'static [Term],
    /// Archetype catalog in catalog order
    pub archetypes: Vec<Archetype>,
}

const POSITIONS: &[Term] = &[
    Term {
        word: "north",
        meaning: "toward the top rows of the grid",
    },
    Term {
        word: "south",
        meaning: "toward the bottom rows of the grid",
    },
    Term {
        word: "east",
        meaning: "toward the rightmost columns",
    },
    Term {
        word: "west",
        meaning: "toward the leftmost columns",
    },
    Term {
        word: "center",
        meaning: "around the middle of the grid",
    },
    Term {
        word: "corner",
        meaning: "adjacent to two boundary edges",
    },
];

const SIZES: &[Term] = &[
    Term {
        word: "tiny",
        meaning: "a few cells across",
    },
    Term {
        word: "small",
        meaning: "roughly a tenth of the grid",
    },
    Term {
        word: "medium",
        meaning: "roughly a quarter of the grid",
    },
    Term {
        word: "large",
        meaning: "roughly half of the grid",
    },
    Term {
        word: "huge",
        meaning: "dominating most of the grid",
    },
];

const SHAPES: &[Term] = &[
    Term {
        word: "rectangular",
        meaning: "straight walls at right angles",
    },
    Term {
        word: "round",
        meaning: "approximated circle or oval of floor",
    },
    Term {
        word: "irregular",
        meaning: "organic outline, no straight walls",
    },
    Term {
        word: "cross",
        meaning: "two rectangular areas intersecting",
    },
];

const FEATURES: &[Term] = &[
    Term {
        word: "room",
        meaning: "enclosed floor area bounded by walls",
    },
    Term {
        word: "corridor",
        meaning: "narrow floor passage connecting areas",
    },
    Term {
        word: "pillar",
        meaning: "isolated wall cell inside a floor area",
    },
    Term {
        word: "door",
        meaning: "single passable cell in a wall run",
    },
    Term {
        word: "secret door",
        meaning: "concealed passable cell in a wall run",
    },
    Term {
        word: "special area",
        meaning: "distinct zone such as a shrine, cell block, or stage",
    },
];

// =============================================================================
// SchemaRegistry
// =============================================================================

/// Vocabulary access and the structural/semantic validation rules
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// The full vocabulary: tiles, spatial terms, features, archetypes
    pub fn vocabulary() -> Vocabulary {
        Vocabulary {
            tiles: TileType::ALL.to_vec(),
            positions: POSITIONS,
            sizes: SIZES,
            shapes: SHAPES,
            features: FEATURES,
            archetypes: Archetype::ALL.to_vec(),
        }
    }

    /// Dimension and value-range checks over raw decoded cell values
    ///
    /// Empty result means structurally valid. Short-circuits only when the
    /// payload has no rows at all; otherwise every applicable violation is
    /// collected so one repair prompt can address all of them.
    pub fn validate_structure(rows: &[Vec<i64>], width: usize, height: usize) -> Vec<Violation> {
        let mut violations = Vec::new();

        if rows.is_empty() {
            violations.push(Violation::dimensions(format!(
                "grid has 0 rows, expected {}",
                height
            )));
            return violations;
        }

        if rows.len() != height {
            violations.push(Violation::dimensions(format!(
                "grid has {} rows, expected {}",
                rows.len(),
                height
            )));
        }

        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                violations.push(Violation::dimensions(format!(
                    "row {} has {} columns, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
        }

        let max_code = (TileType::ALL.len() - 1) as i64;
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if TileType::try_from(value).is_err() {
                    violations.push(Violation::cell_value(format!(
                        "cell ({}, {}) has value {}, valid tile codes are 0..={}",
                        x, y, value, max_code
                    )));
                }
            }
        }

        violations
    }

    /// Archetype-specific expectations over a structurally valid grid
    ///
    /// Advisory heuristics, not playability proofs. With no archetype in
    /// play, structure alone decides validity and this returns nothing.
    pub fn validate_semantics(grid: &Grid, archetype: Option<Archetype>) -> Vec<Violation> {
        let Some(archetype) = archetype else {
            return Vec::new();
        };

        let mut violations = Vec::new();

        if archetype.requires_path() {
            let starts = grid.count(TileType::Start);
            let ends = grid.count(TileType::End);
            if starts != 1 {
                violations.push(Violation::semantics(format!(
                    "a {} needs exactly 1 start tile, found {}",
                    archetype, starts
                )));
            }
            if ends != 1 {
                violations.push(Violation::semantics(format!(
                    "a {} needs exactly 1 end tile, found {}",
                    archetype, ends
                )));
            }
        }

        if archetype.expects_enclosure() {
            let open_edges: Vec<(usize, usize)> = grid
                .edge_cells()
                .filter(|(_, _, tile)| !tile.is_boundary())
                .map(|(x, y, _)| (x, y))
                .collect();
            if !open_edges.is_empty() {
                let (x, y) = open_edges[0];
                violations.push(Violation::semantics(format!(
                    "a {} should be enclosed: {} edge cells are not wall or door, first at ({}, {})",
                    archetype,
                    open_edges.len(),
                    x,
                    y
                )));
            }
        }

        violations
    }

    /// Whether requested dimensions are inside the supported range
    pub fn dimensions_in_range(width: usize, height: usize) -> bool {
        let range = constants::grid::MIN_DIMENSION..=constants::grid::MAX_DIMENSION;
        range.contains(&width) && range.contains(&height)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViolationKind;
    use proptest::prelude::*;

    fn codes_grid(width: usize, height: usize, fill: i64) -> Vec<Vec<i64>> {
        vec![vec![fill; width]; height]
    }

    fn typed(rows: Vec<Vec<i64>>, width: usize, height: usize) -> Grid {
        let tiles = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|v| TileType::try_from(v).unwrap())
                    .collect()
            })
            .collect();
        Grid::from_rows(tiles, width, height).unwrap()
    }

    #[test]
    fn test_vocabulary_is_complete() {
        let vocab = SchemaRegistry::vocabulary();
        assert_eq!(vocab.tiles.len(), 6);
        assert_eq!(vocab.archetypes.len(), 10);
        assert!(!vocab.positions.is_empty());
        assert!(!vocab.sizes.is_empty());
        assert!(!vocab.shapes.is_empty());
        assert!(!vocab.features.is_empty());
    }

    #[test]
    fn test_structure_accepts_clean_grid() {
        let rows = codes_grid(8, 6, 1);
        assert!(SchemaRegistry::validate_structure(&rows, 8, 6).is_empty());
    }

    #[test]
    fn test_structure_zero_rows_short_circuits() {
        let violations = SchemaRegistry::validate_structure(&[], 8, 6);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Dimensions);
        assert_eq!(violations[0].message, "grid has 0 rows, expected 6");
    }

    #[test]
    fn test_structure_collects_all_violations() {
        // Wrong row count, one short row, one bad cell value all at once
        let mut rows = codes_grid(4, 3, 1);
        rows[1].pop();
        rows[2][0] = 9;
        let violations = SchemaRegistry::validate_structure(&rows, 4, 4);
        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .any(|v| v.message == "grid has 3 rows, expected 4"));
        assert!(violations
            .iter()
            .any(|v| v.message == "row 1 has 3 columns, expected 4"));
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::CellValue && v.message.contains("value 9")));
    }

    #[test]
    fn test_structure_flags_negative_values() {
        let mut rows = codes_grid(4, 4, 1);
        rows[0][0] = -1;
        let violations = SchemaRegistry::validate_structure(&rows, 4, 4);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("value -1"));
    }

    #[test]
    fn test_semantics_skipped_without_archetype() {
        let grid = typed(codes_grid(4, 4, 1), 4, 4);
        assert!(SchemaRegistry::validate_semantics(&grid, None).is_empty());
    }

    #[test]
    fn test_semantics_path_markers() {
        // All-floor grid has neither start nor end
        let grid = typed(codes_grid(5, 5, 1), 5, 5);
        let violations = SchemaRegistry::validate_semantics(&grid, Some(Archetype::Maze));
        assert!(violations
            .iter()
            .any(|v| v.message.contains("exactly 1 start tile, found 0")));
        assert!(violations
            .iter()
            .any(|v| v.message.contains("exactly 1 end tile, found 0")));
    }

    #[test]
    fn test_semantics_duplicate_markers_flagged() {
        let mut rows = codes_grid(5, 5, 1);
        rows[1][1] = 4;
        rows[1][2] = 4;
        rows[3][3] = 5;
        let grid = typed(rows, 5, 5);
        let violations = SchemaRegistry::validate_semantics(&grid, Some(Archetype::Dungeon));
        assert!(violations
            .iter()
            .any(|v| v.message.contains("exactly 1 start tile, found 2")));
    }

    #[test]
    fn test_semantics_enclosure() {
        // Fallback grid is enclosed by construction
        let enclosed = Grid::fallback(6, 5);
        let violations = SchemaRegistry::validate_semantics(&enclosed, Some(Archetype::Castle));
        assert!(violations.is_empty());

        // All-floor grid leaks everywhere
        let open = typed(codes_grid(6, 5, 1), 6, 5);
        let violations = SchemaRegistry::validate_semantics(&open, Some(Archetype::Castle));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("should be enclosed"));
    }

    #[test]
    fn test_semantics_secret_door_counts_as_boundary() {
        let mut rows = codes_grid(5, 4, 1);
        for (y, row) in rows.iter_mut().enumerate() {
            for (x, cell) in row.iter_mut().enumerate() {
                if y == 0 || y == 3 || x == 0 || x == 4 {
                    *cell = 0;
                }
            }
        }
        rows[0][2] = 3;
        let grid = typed(rows, 5, 4);
        assert!(SchemaRegistry::validate_semantics(&grid, Some(Archetype::Mansion)).is_empty());
    }

    #[test]
    fn test_semantics_cave_ignores_enclosure() {
        let mut rows = codes_grid(5, 5, 1);
        rows[0][0] = 4;
        rows[4][4] = 5;
        let grid = typed(rows, 5, 5);
        assert!(SchemaRegistry::validate_semantics(&grid, Some(Archetype::Cave)).is_empty());
    }

    #[test]
    fn test_dimensions_in_range() {
        assert!(SchemaRegistry::dimensions_in_range(4, 64));
        assert!(SchemaRegistry::dimensions_in_range(16, 16));
        assert!(!SchemaRegistry::dimensions_in_range(3, 16));
        assert!(!SchemaRegistry::dimensions_in_range(16, 65));
    }

    proptest! {
        #[test]
        fn prop_in_vocabulary_cells_never_flagged(
            w in 1usize..16,
            h in 1usize..16,
            fill in 0i64..6,
        ) {
            let rows = codes_grid(w, h, fill);
            prop_assert!(SchemaRegistry::validate_structure(&rows, w, h).is_empty());
        }

        #[test]
        fn prop_out_of_vocabulary_cell_always_flagged(
            w in 2usize..16,
            h in 2usize..16,
            bad in prop_oneof![-100i64..0, 6i64..100],
        ) {
            let mut rows = codes_grid(w, h, 1);
            rows[h / 2][w / 2] = bad;
            let violations = SchemaRegistry::validate_structure(&rows, w, h);
            prop_assert_eq!(violations.len(), 1);
            prop_assert_eq!(violations[0].kind, ViolationKind::CellValue);
        }

        #[test]
        fn prop_validation_is_deterministic(
            w in 1usize..12,
            h in 1usize..12,
            fill in -2i64..8,
        ) {
            let rows = codes_grid(w, h, fill);
            let first = SchemaRegistry::validate_structure(&rows, w, h);
            let second = SchemaRegistry::validate_structure(&rows, w, h);
            prop_assert_eq!(first, second);
        }
    }
}
