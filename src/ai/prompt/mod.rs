//! Prompt Builder System
//!
//! Standardized prompt construction for the completion exchange.
//! Deterministic text assembly only; no network or I/O.
//!
//! ## Design Principles
//!
//! 1. **Role Definition**: clear model role for the task
//! 2. **Vocabulary Teaching**: the full schema vocabulary, verbatim
//! 3. **Output Contract**: exact JSON shape the parser expects
//! 4. **Self-Contained Repairs**: every corrective message restates the
//!    dimension contract and demands a complete grid, not a diff

use crate::schema::Vocabulary;
use crate::types::{GenerationRequest, Violation};

// =============================================================================
// Prompt Sections
// =============================================================================

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition with expertise area
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Bulleted list with a header
    List { header: String, items: Vec<String> },
    /// Code block with language
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add bulleted list section
    pub fn list(mut self, header: &str, items: Vec<String>) -> Self {
        self.sections.push(PromptSection::List {
            header: header.to_string(),
            items,
        });
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str("<ROLE>\n");
                    prompt.push_str(&format!("You are an expert {} {}.\n", expertise, task));
                    prompt.push_str("</ROLE>\n\n");
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("<OBJECTIVES>\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push_str("</OBJECTIVES>\n\n");
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::List { header, items } => {
                    prompt.push_str(&format!("# {}\n\n", header));
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

// =============================================================================
// Grid Prompts
// =============================================================================

/// A system/user message pair for the first exchange of a call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

/// Prompt assembly for grid generation and repair
pub struct GridPrompts;

impl GridPrompts {
    /// System/user pair for the first attempt
    ///
    /// The system message teaches the full vocabulary and pins the output
    /// contract; the user message carries the description and the exact
    /// target dimensions.
    pub fn initial(request: &GenerationRequest, vocabulary: &Vocabulary) -> PromptPair {
        let tiles = vocabulary
            .tiles
            .iter()
            .map(|t| format!("{} = {}: {}", t.code(), t.name(), t.meaning()))
            .collect();
        let archetypes = vocabulary
            .archetypes
            .iter()
            .map(|a| format!("{}: {}", a.name(), a.description()))
            .collect();

        let system = PromptBuilder::new()
            .role(
                "game level designer",
                "turning short place descriptions into tile grids",
            )
            .objectives(vec![
                "Read the place description and choose a fitting layout",
                "Fill every cell of the requested grid with a tile code",
                "Report your interpretation and notable features in the metadata",
            ])
            .list("Tile codes", tiles)
            .list("Position terms", Self::render_terms(vocabulary.positions))
            .list("Size terms", Self::render_terms(vocabulary.sizes))
            .list("Shape terms", Self::render_terms(vocabulary.shapes))
            .list("Feature primitives", Self::render_terms(vocabulary.features))
            .list("Known archetypes", archetypes)
            .section(
                "Output format",
                "Respond with one JSON object matching this schema and nothing else. \
                 No prose before or after it.",
            )
            .code("json", OUTPUT_SCHEMA)
            .build();

        let mut user = PromptBuilder::new().section(
            "Place description",
            &format!(
                "{}\n\nGenerate a grid exactly {} columns wide and {} rows tall.",
                request.description, request.width, request.height
            ),
        );
        if let Some(hint) = &request.archetype_hint {
            user = user.section("Archetype hint", &format!("Treat this place as a {}.", hint));
        }

        PromptPair {
            system,
            user: user.build(),
        }
    }

    /// Corrective message after validation violations
    ///
    /// Restates the dimension contract, embeds every violation verbatim, and
    /// demands a complete corrected object rather than a diff.
    pub fn repair(request: &GenerationRequest, violations: &[Violation]) -> String {
        PromptBuilder::new()
            .section(
                "Corrections needed",
                &format!(
                    "Your previous grid broke the rules below. Remember the contract: \
                     exactly {} rows, each with exactly {} columns, every cell a tile \
                     code from 0 to 5.",
                    request.height, request.width
                ),
            )
            .list(
                "Rule violations",
                violations.iter().map(|v| v.to_string()).collect(),
            )
            .text(
                "Return the complete corrected JSON object, every row and cell included. \
                 Do not describe the changes and do not send a partial grid.",
            )
            .build()
    }

    /// Corrective message after a parse failure, emphasizing the format
    pub fn format_repair(request: &GenerationRequest) -> String {
        PromptBuilder::new()
            .section(
                "Response format problem",
                &format!(
                    "Your previous response could not be decoded as JSON. Respond again \
                     with one JSON object matching the schema below and nothing else: no \
                     prose, no code fences, no comments. The grid must be exactly {} rows \
                     of {} integer cells, each from 0 to 5.",
                    request.height, request.width
                ),
            )
            .code("json", OUTPUT_SCHEMA)
            .build()
    }

    fn render_terms(terms: &[crate::schema::Term]) -> Vec<String> {
        terms
            .iter()
            .map(|t| format!("{}: {}", t.word, t.meaning))
            .collect()
    }
}

/// The exact payload shape the parser and validator enforce
const OUTPUT_SCHEMA: &str = r#"{
  "grid": [[0, 0, 0], [0, 1, 0], [0, 0, 0]],
  "metadata": {
    "interpretation": "one sentence on how you read the description",
    "archetype": "one catalog name, or omit the field",
    "features": ["short feature note", "another"]
  }
}"#;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn request() -> GenerationRequest {
        GenerationRequest::new("a damp cave with two exits", 12, 10)
    }

    #[test]
    fn test_builder_sections() {
        let prompt = PromptBuilder::new()
            .role("level designer", "building tile grids")
            .objectives(vec!["Fill the grid", "Report metadata"])
            .list("Things", vec!["one".to_string(), "two".to_string()])
            .build();

        assert!(prompt.contains("<ROLE>"));
        assert!(prompt.contains("1. Fill the grid"));
        assert!(prompt.contains("- two"));
    }

    #[test]
    fn test_initial_teaches_vocabulary() {
        let pair = GridPrompts::initial(&request(), &SchemaRegistry::vocabulary());
        assert!(pair.system.contains("0 = wall"));
        assert!(pair.system.contains("5 = end"));
        assert!(pair.system.contains("dungeon:"));
        assert!(pair.system.contains("corridor:"));
        assert!(pair.system.contains("\"grid\""));
    }

    #[test]
    fn test_initial_user_carries_dimensions() {
        let pair = GridPrompts::initial(&request(), &SchemaRegistry::vocabulary());
        assert!(pair.user.contains("a damp cave with two exits"));
        assert!(pair.user.contains("exactly 12 columns wide and 10 rows tall"));
    }

    #[test]
    fn test_initial_includes_hint_when_present() {
        let hinted = request().with_archetype_hint("cave");
        let pair = GridPrompts::initial(&hinted, &SchemaRegistry::vocabulary());
        assert!(pair.user.contains("Treat this place as a cave."));

        let bare = GridPrompts::initial(&request(), &SchemaRegistry::vocabulary());
        assert!(!bare.user.contains("Archetype hint"));
    }

    #[test]
    fn test_repair_embeds_violations_verbatim() {
        let violations = vec![
            Violation::dimensions("row 4 has 15 columns, expected 16"),
            Violation::cell_value("cell (3, 2) has value 9, valid tile codes are 0..=5"),
        ];
        let prompt = GridPrompts::repair(&request(), &violations);
        assert!(prompt.contains("- row 4 has 15 columns, expected 16"));
        assert!(prompt.contains("- cell (3, 2) has value 9, valid tile codes are 0..=5"));
        assert!(prompt.contains("exactly 10 rows, each with exactly 12 columns"));
        assert!(prompt.contains("complete corrected JSON object"));
    }

    #[test]
    fn test_format_repair_restates_schema() {
        let prompt = GridPrompts::format_repair(&request());
        assert!(prompt.contains("could not be decoded as JSON"));
        assert!(prompt.contains("\"interpretation\""));
        assert!(prompt.contains("exactly 10 rows of 12 integer cells"));
    }
}
