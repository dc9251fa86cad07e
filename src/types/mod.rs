pub mod archetype;
pub mod error;
pub mod generation;
pub mod grid;

pub use archetype::Archetype;
pub use error::{ErrorClassifier, GridsmithError, Result};
pub use generation::{
    GenerationMetadata, GenerationRequest, GenerationResult, Violation, ViolationKind,
};
pub use grid::{Grid, TileType};
