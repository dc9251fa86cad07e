//! Location Archetype Catalog
//!
//! **Single source of truth** for the 10 named location templates. Archetypes
//! guide interpretation and enrich prompts and metadata; they never
//! hard-constrain validation. Semantic expectations derived from an archetype
//! are advisory heuristics applied by the validator when one is in play.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Archetype Metadata Table - Single Source of Truth
// =============================================================================

/// Archetype metadata entry containing all template-specific information
struct ArchetypeMeta {
    /// Catalog name (lowercase, round-trips through `FromStr`/`Display`)
    name: &'static str,
    /// Human-readable description embedded into prompts
    description: &'static str,
    /// Typical features used to enrich prompts and metadata
    typical_features: &'static [&'static str],
    /// Whether grids of this kind are expected to carry START/END markers
    requires_path: bool,
    /// Whether grids of this kind are expected to have an enclosed boundary
    expects_enclosure: bool,
}

/// Closed catalog of location templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Dungeon,
    Castle,
    Cave,
    Temple,
    Tavern,
    Prison,
    Maze,
    Mansion,
    Library,
    Arena,
}

impl Archetype {
    /// All archetypes in catalog order
    pub const ALL: [Archetype; 10] = [
        Archetype::Dungeon,
        Archetype::Castle,
        Archetype::Cave,
        Archetype::Temple,
        Archetype::Tavern,
        Archetype::Prison,
        Archetype::Maze,
        Archetype::Mansion,
        Archetype::Library,
        Archetype::Arena,
    ];

    /// Get metadata for this archetype variant
    fn meta(&self) -> ArchetypeMeta {
        match self {
            Archetype::Dungeon => ArchetypeMeta {
                name: "dungeon",
                description: "underground complex of rooms and corridors, often with a goal to reach",
                typical_features: &[
                    "interconnected rooms",
                    "winding corridors",
                    "locked or hidden doors",
                    "entry and goal markers",
                ],
                requires_path: true,
                expects_enclosure: true,
            },
            Archetype::Castle => ArchetypeMeta {
                name: "castle",
                description: "fortified stronghold with thick outer walls, a gate, and inner halls",
                typical_features: &[
                    "thick outer walls",
                    "gatehouse entrance",
                    "great hall",
                    "corner towers",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Cave => ArchetypeMeta {
                name: "cave",
                description: "natural cavern system with irregular chambers and narrow passages",
                typical_features: &[
                    "irregular chambers",
                    "narrow winding passages",
                    "dead ends",
                    "entrance leading to depths",
                ],
                requires_path: true,
                expects_enclosure: false,
            },
            Archetype::Temple => ArchetypeMeta {
                name: "temple",
                description: "ceremonial building with a symmetric layout around a central shrine",
                typical_features: &[
                    "symmetric layout",
                    "central shrine or altar",
                    "pillared halls",
                    "side chapels",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Tavern => ArchetypeMeta {
                name: "tavern",
                description: "single-building inn with a common room, bar, and private rooms",
                typical_features: &[
                    "large common room",
                    "bar counter area",
                    "small private rooms",
                    "single main entrance",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Prison => ArchetypeMeta {
                name: "prison",
                description: "secure block of small cells along guarded corridors",
                typical_features: &[
                    "rows of small cells",
                    "guarded corridors",
                    "heavy doors",
                    "sealed outer wall",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Maze => ArchetypeMeta {
                name: "maze",
                description: "deliberately confusing network of passages from an entry to a goal",
                typical_features: &[
                    "branching passages",
                    "dead ends",
                    "single solution path",
                    "entry and goal markers",
                ],
                requires_path: true,
                expects_enclosure: true,
            },
            Archetype::Mansion => ArchetypeMeta {
                name: "mansion",
                description: "large residence with many connected rooms of varied size",
                typical_features: &[
                    "entrance hall",
                    "many varied rooms",
                    "connecting hallways",
                    "hidden passages",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Library => ArchetypeMeta {
                name: "library",
                description: "hall of shelves arranged in aisles with reading areas",
                typical_features: &[
                    "parallel shelf rows",
                    "reading alcoves",
                    "central atrium",
                    "quiet study rooms",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
            Archetype::Arena => ArchetypeMeta {
                name: "arena",
                description: "open central fighting ground ringed by walls and entry gates",
                typical_features: &[
                    "large open center",
                    "surrounding ring wall",
                    "opposing entry gates",
                    "spectator edge",
                ],
                requires_path: false,
                expects_enclosure: true,
            },
        }
    }

    /// Catalog name (lowercase)
    pub fn name(&self) -> &'static str {
        self.meta().name
    }

    /// Human-readable description for prompts and CLI output
    pub fn description(&self) -> &'static str {
        self.meta().description
    }

    /// Typical features for prompt enrichment
    pub fn typical_features(&self) -> &'static [&'static str] {
        self.meta().typical_features
    }

    /// Whether validation should expect exactly one START and one END tile
    pub fn requires_path(&self) -> bool {
        self.meta().requires_path
    }

    /// Whether validation should expect every edge cell to be wall or door
    pub fn expects_enclosure(&self) -> bool {
        self.meta().expects_enclosure
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Archetype::ALL
            .into_iter()
            .find(|a| a.name() == lower)
            .ok_or_else(|| format!("unknown archetype: '{}'", s))
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Tests
// =============================================================================
