//! Response Payload Extraction
//!
//! Recovers the structured payload from model output that may be wrapped in
//! markdown code fences or interleaved with prose.
//!
//! Handles common model output defects:
//! - Code fence wrapping (```json ... ```)
//! - Explanatory text around the JSON object
//! - Trailing commas before `]` or `}`
//! - Byte order mark and stray whitespace

use serde_json::Value;
use tracing::debug;

use crate::types::{GridsmithError, Result};

// =============================================================================
// Payload Types
// =============================================================================

/// Raw decoded payload before validation
///
/// Cell values stay as plain integers here; the validator owns range checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    pub grid: Vec<Vec<i64>>,
    pub metadata: PayloadMetadata,
}

/// Metadata block as the model reported it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMetadata {
    pub interpretation: String,
    pub archetype: Option<String>,
    pub features: Vec<String>,
}

// =============================================================================
// ResponseParser
// =============================================================================

/// Tolerant extraction of the expected payload from raw model output
pub struct ResponseParser;

impl ResponseParser {
    /// Extract and decode the payload, or fail with `Parse`
    pub fn extract(raw: &str) -> Result<ResponsePayload> {
        let cleaned = Self::preprocess(raw);
        let value = Self::parse_value(&cleaned)?;
        Self::decode(&value)
    }

    /// Strip code fences and BOM, trim whitespace
    fn preprocess(raw: &str) -> String {
        let mut s = raw.trim();
        s = s.trim_start_matches('\u{feff}');

        let mut owned = s.to_string();
        if owned.starts_with("```") {
            if let Some(first_newline) = owned.find('\n') {
                owned = owned[first_newline + 1..].to_string();
            }
        }
        if owned.ends_with("```") {
            owned = owned[..owned.len() - 3].trim_end().to_string();
        }

        owned.trim().to_string()
    }

    /// Parse directly, then fall back to balanced-block extraction
    fn parse_value(cleaned: &str) -> Result<Value> {
        if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
            return Ok(value);
        }

        debug!("direct JSON parse failed, fixing trailing commas");
        let repaired = Self::fix_trailing_commas(cleaned);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            return Ok(value);
        }

        debug!("repaired parse failed, extracting balanced block");
        if let Some(block) = Self::extract_balanced_block(cleaned) {
            let block = Self::fix_trailing_commas(&block);
            if let Ok(value) = serde_json::from_str::<Value>(&block) {
                return Ok(value);
            }
        }

        Err(GridsmithError::Parse(format!(
            "no JSON object found in response. Content preview: {}...",
            cleaned.chars().take(200).collect::<String>()
        )))
    }

    /// Fix trailing commas before ] or }
    fn fix_trailing_commas(s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());

        let mut i = 0;
        while i < chars.len() {
            let ch = chars[i];

            if ch == ',' {
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == ']' || chars[j] == '}') {
                    i += 1;
                    continue;
                }
            }

            result.push(ch);
            i += 1;
        }

        result
    }

    /// Locate the first syntactically balanced `{...}` block
    ///
    /// String and escape aware, so braces inside string values do not
    /// terminate the scan.
    fn extract_balanced_block(s: &str) -> Option<String> {
        let start = s.find('{')?;

        let mut depth = 0;
        let mut in_string = false;
        let mut escape = false;

        for (i, ch) in s[start..].char_indices() {
            if escape {
                escape = false;
                continue;
            }

            match ch {
                '\\' if in_string => escape = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(s[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }

        None
    }

    /// Decode the parsed value, checking every required field
    fn decode(value: &Value) -> Result<ResponsePayload> {
        let grid_value = value
            .get("grid")
            .ok_or_else(|| GridsmithError::Parse("missing required field 'grid'".to_string()))?;
        let rows = grid_value.as_array().ok_or_else(|| {
            GridsmithError::Parse("field 'grid' must be an array of rows".to_string())
        })?;

        let mut grid = Vec::with_capacity(rows.len());
        for (y, row_value) in rows.iter().enumerate() {
            let cells = row_value.as_array().ok_or_else(|| {
                GridsmithError::Parse(format!("grid row {} must be an array of integers", y))
            })?;
            let mut row = Vec::with_capacity(cells.len());
            for (x, cell) in cells.iter().enumerate() {
                let code = cell.as_i64().ok_or_else(|| {
                    GridsmithError::Parse(format!(
                        "grid cell ({}, {}) must be an integer, got {}",
                        x, y, cell
                    ))
                })?;
                row.push(code);
            }
            grid.push(row);
        }

        let metadata = value.get("metadata").ok_or_else(|| {
            GridsmithError::Parse("missing required field 'metadata'".to_string())
        })?;

        let interpretation = metadata
            .get("interpretation")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                GridsmithError::Parse(
                    "missing required field 'metadata.interpretation'".to_string(),
                )
            })?
            .to_string();

        let features = metadata
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                GridsmithError::Parse("missing required field 'metadata.features'".to_string())
            })?
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect();

        let archetype = metadata
            .get("archetype")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(ResponsePayload {
            grid,
            metadata: PayloadMetadata {
                interpretation,
                archetype,
                features,
            },
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
