//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! - **Auth**: credential absent, blank, or rejected (fail fast, never retried)
//! - **Network**: transport failures and non-success HTTP statuses (consumes
//!   an attempt)
//! - **Timeout**: a per-attempt deadline elapsed (treated like Network)
//! - **Parse**: model output could not be decoded into the expected payload
//! - **Config**: invalid configuration or request parameters
//!
//! ## Design Principles
//!
//! - Single unified error type (GridsmithError) for the entire application
//! - Category-based routing for the repair loop's attempt accounting
//! - No panic/unwrap - all errors are recoverable or surfaced to the caller

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum GridsmithError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Credential absent, blank, or rejected by the service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Connectivity or non-success HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    /// Model output could not be decoded into the expected payload
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GridsmithError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl GridsmithError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Whether this error must abort the repair loop immediately
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Whether the repair loop may spend a further attempt after this error
    pub fn consumes_attempt(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout { .. } | Self::Parse(_)
        )
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps transport-level outcomes onto error categories
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code from the completion service
    ///
    /// 401/403 are credential rejections and abort the loop; every other
    /// non-success status is a Network failure the loop may retry.
    pub fn classify_http_status(status: u16, message: &str) -> GridsmithError {
        match status {
            401 | 403 => GridsmithError::Auth(format!("HTTP {}: {}", status, message)),
            _ => GridsmithError::Network(format!("HTTP {}: {}", status, message)),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
