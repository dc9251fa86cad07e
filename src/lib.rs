//! Gridsmith - AI-Assisted Tile Map Generator
//!
//! Turns free-text place descriptions into validated 2D tile grids by
//! prompting a language model, checking its output against a closed tile
//! vocabulary and archetype semantics, and feeding violations back as repair
//! prompts until the result passes or the attempt budget runs out.
//!
//! ## Core Features
//!
//! - **Closed Vocabulary**: six tile types with numeric wire codes
//! - **Archetype Catalog**: place kinds with per-kind semantic checks
//! - **Tolerant Parsing**: code fences, prose, and trailing commas survive
//! - **Bounded Repair Loop**: violations become corrective prompts
//! - **Graceful Degradation**: exhaustion yields a deterministic fallback grid
//!
//! ## Quick Start
//!
//! ```ignore
//! use gridsmith::pipeline::{GenerateOptions, generate};
//! use secrecy::SecretString;
//!
//! let mut options = GenerateOptions::new(SecretString::from(api_key));
//! options.width = 24;
//! options.height = 16;
//! let result = generate("a torch-lit dungeon with a hidden vault", options).await?;
//! println!("{}", result.metadata.interpretation);
//! ```
//!
//! ## Modules
//!
//! - [`schema`]: tile vocabulary, archetype catalog, validation rules
//! - [`ai`]: prompt assembly, completion transport, response parsing
//! - [`validate`]: structural and semantic checks over decoded payloads
//! - [`pipeline`]: the bounded request/parse/validate/repair loop
//! - [`config`]: layered configuration files and environment overrides

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod validate;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader, GenerationConfig, ProviderConfig};

// Error Types
pub use types::{GridsmithError, Result};

// Domain Types
pub use types::{
    Archetype, GenerationMetadata, GenerationRequest, GenerationResult, Grid, TileType, Violation,
    ViolationKind,
};

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use pipeline::{GenerateOptions, ProgressCallback, RepairOrchestrator, generate};
pub use validate::{GridValidator, ValidationOutcome};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    // Transport
    ChatMessage,
    CompletionClient,
    CompletionRequest,
    // Prompts
    GridPrompts,
    HttpCompletionClient,
    PromptPair,
    ProviderSettings,
    // Parsing
    ResponseParser,
    ResponsePayload,
    // Timeout
    with_timeout,
};

// =============================================================================
// Schema Re-exports
// =============================================================================

pub use schema::{SchemaRegistry, Term, Vocabulary};
