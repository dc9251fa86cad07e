//! Generation Request and Result Types
//!
//! Per-call value objects flowing through the pipeline: the caller's request,
//! the validated result, and the violation records that drive repair prompts.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::grid::Grid;

// =============================================================================
// GenerationRequest
// =============================================================================

/// One caller request: what to generate and at which dimensions
///
/// Created per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Free-text place description, e.g. "a small damp cave with two exits"
    pub description: String,
    /// Target grid width in cells
    pub width: usize,
    /// Target grid height in cells
    pub height: usize,
    /// Optional archetype name to steer interpretation
    pub archetype_hint: Option<String>,
}

impl GenerationRequest {
    pub fn new(description: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            description: description.into(),
            width,
            height,
            archetype_hint: None,
        }
    }

    /// Add an archetype hint
    pub fn with_archetype_hint(mut self, hint: impl Into<String>) -> Self {
        self.archetype_hint = Some(hint.into());
        self
    }
}

// =============================================================================
// GenerationMetadata / GenerationResult
// =============================================================================

/// Model-reported interpretation attached to a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    /// How the description was understood
    pub interpretation: String,
    /// Catalog archetype the model settled on, when it named a known one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    /// Short feature notes, in the model's order
    pub features: Vec<String>,
}

impl GenerationMetadata {
    /// Fixed metadata attached to the degraded fallback grid
    pub fn fallback(attempts: usize) -> Self {
        Self {
            interpretation: format!("generation failed after {} attempts", attempts),
            archetype: None,
            features: Vec::new(),
        }
    }
}

/// Final product of one generate call, successful or fallback-terminated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub grid: Grid,
    pub metadata: GenerationMetadata,
}

// =============================================================================
// Violation
// =============================================================================

/// Which schema rule a violation broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Row count or row length does not match the requested dimensions
    Dimensions,
    /// A cell value falls outside the tile vocabulary
    CellValue,
    /// An archetype-specific expectation is unmet
    Semantics,
}

/// One textual description of a broken schema rule
///
/// `Display` yields the exact message text; repair prompts embed it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn dimensions(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Dimensions, message)
    }

    pub fn cell_value(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::CellValue, message)
    }

    pub fn semantics(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Semantics, message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("a ruined keep", 16, 12).with_archetype_hint("castle");
        assert_eq!(request.width, 16);
        assert_eq!(request.height, 12);
        assert_eq!(request.archetype_hint.as_deref(), Some("castle"));
    }

    #[test]
    fn test_fallback_metadata_wording() {
        let metadata = GenerationMetadata::fallback(3);
        assert_eq!(metadata.interpretation, "generation failed after 3 attempts");
        assert!(metadata.archetype.is_none());
        assert!(metadata.features.is_empty());
    }

    #[test]
    fn test_violation_display_is_verbatim_message() {
        let violation = Violation::dimensions("expected 16 rows, got 14");
        assert_eq!(violation.to_string(), "expected 16 rows, got 14");
        assert_eq!(violation.kind, ViolationKind::Dimensions);
    }

    #[test]
    fn test_metadata_serialization_omits_empty_archetype() {
        let metadata = GenerationMetadata {
            interpretation: "a cave".to_string(),
            archetype: None,
            features: vec!["two exits".to_string()],
        };
        let json = serde_json::to_string(&metadata).unwrap();
        assert!(!json.contains("archetype"));
        assert!(json.contains("two exits"));
    }
}
