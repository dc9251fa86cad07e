//! Grid Validation Pipeline
//!
//! Composes the schema registry's structural and semantic checks into one
//! pass over a decoded payload, producing either a typed result or the
//! canonical violation sequence that drives repair prompts.
//!
//! Check order: row count, per-row column count, per-cell value range, then
//! archetype semantics. Structural problems suppress semantic checks since a
//! misshapen grid makes them meaningless; within each level every violation
//! is collected so one repair prompt can address all of them.

use std::str::FromStr;

use tracing::debug;

use crate::ai::parser::ResponsePayload;
use crate::schema::SchemaRegistry;
use crate::types::{
    Archetype, GenerationMetadata, GenerationRequest, GenerationResult, Grid, TileType, Violation,
};

// =============================================================================
// Validation Outcome
// =============================================================================

/// Result of one validation pass
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every check passed; the typed result is ready for the caller
    Valid(GenerationResult),
    /// At least one rule broke; the violations feed the next repair prompt
    Invalid(Vec<Violation>),
}

// =============================================================================
// GridValidator
// =============================================================================

/// One-pass validation of a decoded payload against a request
pub struct GridValidator;

impl GridValidator {
    /// Validate the payload and, on success, assemble the typed result
    pub fn validate(payload: &ResponsePayload, request: &GenerationRequest) -> ValidationOutcome {
        let structural =
            SchemaRegistry::validate_structure(&payload.grid, request.width, request.height);
        if !structural.is_empty() {
            debug!(count = structural.len(), "structural violations found");
            return ValidationOutcome::Invalid(structural);
        }

        let Some(grid) = Self::to_grid(&payload.grid, request.width, request.height) else {
            return ValidationOutcome::Invalid(vec![Violation::dimensions(format!(
                "grid could not be assembled at {} x {}",
                request.width, request.height
            ))]);
        };

        let archetype = Self::effective_archetype(payload, request);
        let semantic = SchemaRegistry::validate_semantics(&grid, archetype);
        if !semantic.is_empty() {
            debug!(count = semantic.len(), "semantic violations found");
            return ValidationOutcome::Invalid(semantic);
        }

        let metadata = GenerationMetadata {
            interpretation: payload.metadata.interpretation.clone(),
            archetype: Self::known_archetype_name(payload.metadata.archetype.as_deref()),
            features: payload.metadata.features.clone(),
        };

        ValidationOutcome::Valid(GenerationResult { grid, metadata })
    }

    /// Archetype used for semantic checks: the model's reported one when it
    /// names a catalog entry, otherwise the caller's hint, otherwise none
    fn effective_archetype(
        payload: &ResponsePayload,
        request: &GenerationRequest,
    ) -> Option<Archetype> {
        payload
            .metadata
            .archetype
            .as_deref()
            .and_then(|name| Archetype::from_str(name).ok())
            .or_else(|| {
                request
                    .archetype_hint
                    .as_deref()
                    .and_then(|name| Archetype::from_str(name).ok())
            })
    }

    /// Unknown archetype names are dropped, not rejected
    fn known_archetype_name(reported: Option<&str>) -> Option<String> {
        reported
            .and_then(|name| Archetype::from_str(name).ok())
            .map(|a| a.name().to_string())
    }

    fn to_grid(rows: &[Vec<i64>], width: usize, height: usize) -> Option<Grid> {
        let typed = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| TileType::try_from(v).ok())
                    .collect::<Option<Vec<_>>>()
            })
            .collect::<Option<Vec<_>>>()?;
        Grid::from_rows(typed, width, height)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::parser::PayloadMetadata;
    use crate::types::ViolationKind;

    fn payload(grid: Vec<Vec<i64>>, archetype: Option<&str>) -> ResponsePayload {
        ResponsePayload {
            grid,
            metadata: PayloadMetadata {
                interpretation: "a test layout".to_string(),
                archetype: archetype.map(String::from),
                features: vec!["feature".to_string()],
            },
        }
    }

    fn enclosed(width: usize, height: usize) -> Vec<Vec<i64>> {
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if y == 0 || y == height - 1 || x == 0 || x == width - 1 {
                            0
                        } else {
                            1
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_valid_payload_produces_typed_result() {
        let request = GenerationRequest::new("a hall", 6, 5);
        let outcome = GridValidator::validate(&payload(enclosed(6, 5), None), &request);
        match outcome {
            ValidationOutcome::Valid(result) => {
                assert_eq!(result.grid.width(), 6);
                assert_eq!(result.metadata.interpretation, "a test layout");
                assert!(result.metadata.archetype.is_none());
            }
            ValidationOutcome::Invalid(violations) => {
                panic!("expected valid outcome, got {:?}", violations)
            }
        }
    }

    #[test]
    fn test_structural_violations_suppress_semantics() {
        // Wrong height and a maze hint; only the dimension problem is reported
        let request = GenerationRequest::new("a maze", 6, 5).with_archetype_hint("maze");
        let outcome = GridValidator::validate(&payload(enclosed(6, 4), None), &request);
        match outcome {
            ValidationOutcome::Invalid(violations) => {
                assert!(violations
                    .iter()
                    .all(|v| v.kind != ViolationKind::Semantics));
            }
            ValidationOutcome::Valid(_) => panic!("expected invalid outcome"),
        }
    }

    #[test]
    fn test_semantic_check_from_hint() {
        // Enclosed but no start/end markers; hint says maze
        let request = GenerationRequest::new("a maze", 6, 5).with_archetype_hint("maze");
        let outcome = GridValidator::validate(&payload(enclosed(6, 5), None), &request);
        match outcome {
            ValidationOutcome::Invalid(violations) => {
                assert!(violations.iter().any(|v| v.message.contains("start tile")));
            }
            ValidationOutcome::Valid(_) => panic!("expected invalid outcome"),
        }
    }

    #[test]
    fn test_reported_archetype_overrides_hint() {
        // Model says tavern (no path needed); hint says maze. Model wins.
        let request = GenerationRequest::new("a place", 6, 5).with_archetype_hint("maze");
        let outcome = GridValidator::validate(&payload(enclosed(6, 5), Some("tavern")), &request);
        assert!(matches!(outcome, ValidationOutcome::Valid(_)));
    }

    #[test]
    fn test_unknown_reported_archetype_dropped() {
        let request = GenerationRequest::new("a place", 6, 5);
        let outcome = GridValidator::validate(&payload(enclosed(6, 5), Some("spaceship")), &request);
        match outcome {
            ValidationOutcome::Valid(result) => assert!(result.metadata.archetype.is_none()),
            ValidationOutcome::Invalid(violations) => {
                panic!("unknown archetype must not reject: {:?}", violations)
            }
        }
    }

    #[test]
    fn test_known_reported_archetype_kept_in_metadata() {
        let request = GenerationRequest::new("a place", 6, 5);
        let outcome = GridValidator::validate(&payload(enclosed(6, 5), Some("Tavern")), &request);
        match outcome {
            ValidationOutcome::Valid(result) => {
                assert_eq!(result.metadata.archetype.as_deref(), Some("tavern"))
            }
            ValidationOutcome::Invalid(_) => panic!("expected valid outcome"),
        }
    }

    #[test]
    fn test_maze_with_markers_passes() {
        let mut rows = enclosed(6, 5);
        rows[1][1] = 4;
        rows[3][4] = 5;
        let request = GenerationRequest::new("a maze", 6, 5).with_archetype_hint("maze");
        let outcome = GridValidator::validate(&payload(rows, Some("maze")), &request);
        match outcome {
            ValidationOutcome::Valid(result) => {
                assert_eq!(result.grid.count(TileType::Start), 1);
                assert_eq!(result.grid.count(TileType::End), 1);
            }
            ValidationOutcome::Invalid(violations) => {
                panic!("expected valid outcome, got {:?}", violations)
            }
        }
    }

    #[test]
    fn test_out_of_range_cell_reported() {
        let mut rows = enclosed(6, 5);
        rows[2][2] = 7;
        let request = GenerationRequest::new("a hall", 6, 5);
        let outcome = GridValidator::validate(&payload(rows, None), &request);
        match outcome {
            ValidationOutcome::Invalid(violations) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].kind, ViolationKind::CellValue);
            }
            ValidationOutcome::Valid(_) => panic!("expected invalid outcome"),
        }
    }
}
