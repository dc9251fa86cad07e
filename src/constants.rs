//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Grid geometry constants
pub mod grid {
    /// Smallest grid edge the pipeline will request or accept
    pub const MIN_DIMENSION: usize = 4;

    /// Largest grid edge the pipeline will request or accept
    pub const MAX_DIMENSION: usize = 64;

    /// Default grid width when the caller does not specify one
    pub const DEFAULT_WIDTH: usize = 16;

    /// Default grid height when the caller does not specify one
    pub const DEFAULT_HEIGHT: usize = 16;
}

/// Repair loop constants
pub mod pipeline {
    /// Total attempts per generation call, including the first
    pub const MAX_ATTEMPTS: usize = 3;
}

/// HTTP/Network constants
pub mod network {
    /// Per-attempt request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Connection establishment timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;
}

/// Completion request constants
pub mod completion {
    /// Default model for the OpenAI-compatible transport
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

    /// Default API base for the OpenAI-compatible transport
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Maximum tokens the model may emit per response
    pub const DEFAULT_MAX_TOKENS: usize = 4096;

    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
}
