//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/gridsmith/) and project (.gridsmith/) level
//! configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::schema::SchemaRegistry;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Completion provider settings
    pub provider: ProviderConfig,

    /// Generation pipeline settings
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `GridsmithError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(crate::types::GridsmithError::Config(format!(
                "provider temperature must be between 0.0 and 2.0, got {}",
                self.provider.temperature
            )));
        }

        if self.provider.timeout_secs == 0 {
            return Err(crate::types::GridsmithError::Config(
                "provider timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.provider.max_tokens == 0 {
            return Err(crate::types::GridsmithError::Config(
                "provider max_tokens must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.provider.api_base).is_err() {
            return Err(crate::types::GridsmithError::Config(format!(
                "provider api_base is not a valid URL: {}",
                self.provider.api_base
            )));
        }

        if !SchemaRegistry::dimensions_in_range(self.generation.width, self.generation.height) {
            return Err(crate::types::GridsmithError::Config(format!(
                "generation dimensions must be between {} and {}, got {} x {}",
                constants::grid::MIN_DIMENSION,
                constants::grid::MAX_DIMENSION,
                self.generation.width,
                self.generation.height
            )));
        }

        if self.generation.max_attempts == 0 {
            return Err(crate::types::GridsmithError::Config(
                "generation max_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Provider Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model name
    pub model: String,

    /// Base URL of the OpenAI-compatible completion endpoint
    pub api_base: String,

    /// Per-attempt request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature (0.0 = deterministic, higher = more varied)
    pub temperature: f32,

    /// Maximum tokens the model may emit per response
    pub max_tokens: usize,

    /// API key; prefer GRIDSMITH_API_KEY or OPENAI_API_KEY over the file.
    /// Never serialized back out, so `config show` cannot leak it.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: constants::completion::DEFAULT_MODEL.to_string(),
            api_base: constants::completion::DEFAULT_API_BASE.to_string(),
            timeout_secs: constants::network::DEFAULT_TIMEOUT_SECS,
            temperature: constants::completion::DEFAULT_TEMPERATURE,
            max_tokens: constants::completion::DEFAULT_MAX_TOKENS,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// =============================================================================
// Generation Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Default grid width in columns
    pub width: usize,

    /// Default grid height in rows
    pub height: usize,

    /// Total attempts per generation call, including the first
    pub max_attempts: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: constants::grid::DEFAULT_WIDTH,
            height: constants::grid::DEFAULT_HEIGHT,
            max_attempts: constants::pipeline::MAX_ATTEMPTS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.provider.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_attempts, 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_temperature() {
        let mut config = Config::default();
        config.provider.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.provider.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_api_base() {
        let mut config = Config::default();
        config.provider.api_base = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_dimensions() {
        let mut config = Config::default();
        config.generation.width = 2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.generation.height = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.generation.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_never_serialized() {
        let mut config = Config::default();
        config.provider.api_key = Some("sk-secret".to_string());
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("api_key"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut config = Config::default();
        config.provider.api_key = Some("sk-secret".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
