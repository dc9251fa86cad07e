//! Completion Client Abstraction
//!
//! Defines the CompletionClient trait: exactly one request/response exchange
//! with an external completion service per call. Retry policy never lives
//! here; the repair loop owns it entirely.
//!
//! ## Modules
//!
//! - `http`: OpenAI-compatible Chat Completions transport

mod http;

pub use http::HttpCompletionClient;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants;
use crate::types::Result;

// =============================================================================
// Wire Types
// =============================================================================

/// One message in the conversation sent to the completion service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// One fully-assembled exchange request
///
/// The conversation carries prior attempts of the same call so corrective
/// messages land with their context.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier sent to the service
    pub model: String,
    /// System instructions for the whole conversation
    pub system: String,
    /// Ordered user/assistant turns, oldest first
    pub messages: Vec<ChatMessage>,
    /// Maximum tokens the model may emit
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            messages: Vec::new(),
            max_tokens: constants::completion::DEFAULT_MAX_TOKENS,
            temperature: constants::completion::DEFAULT_TEMPERATURE,
        }
    }

    /// Append a conversation turn
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

// =============================================================================
// Provider Settings
// =============================================================================

/// Transport configuration for one generate call
///
/// The credential lives here for the duration of the call only; `Debug`
/// redacts it and nothing persists it.
#[derive(Clone)]
pub struct ProviderSettings {
    /// API credential, caller-supplied per call
    pub credential: SecretString,
    /// Base URL of the OpenAI-compatible service
    pub api_base: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per response
    pub max_tokens: usize,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ProviderSettings {
    pub fn new(credential: SecretString) -> Self {
        Self {
            credential,
            api_base: constants::completion::DEFAULT_API_BASE.to_string(),
            model: constants::completion::DEFAULT_MODEL.to_string(),
            temperature: constants::completion::DEFAULT_TEMPERATURE,
            max_tokens: constants::completion::DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(constants::network::DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("credential", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// =============================================================================
// CompletionClient Trait
// =============================================================================

/// One request/response exchange with a completion service
///
/// Implementations fail with `Auth` when the credential is absent or
/// rejected and `Network` for transport failures; neither is retried here.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one fully-built request and return the raw response text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Transport name for logs
    fn name(&self) -> &str;

    /// Model identifier this client targets
    fn model(&self) -> &str;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }

    #[test]
    fn test_request_accumulates_turns() {
        let mut request = CompletionRequest::new("gpt-4o-mini", "instructions");
        request.push(ChatMessage::user("first"));
        request.push(ChatMessage::assistant("reply"));
        request.push(ChatMessage::user("second"));
        assert_eq!(request.messages.len(), 3);
        assert_eq!(request.messages[2].content, "second");
    }

    #[test]
    fn test_settings_debug_redacts_credential() {
        let settings = ProviderSettings::new(SecretString::from("sk-very-secret"));
        let debug = format!("{:?}", settings);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = ProviderSettings::new(SecretString::from("k"));
        assert_eq!(settings.model, constants::completion::DEFAULT_MODEL);
        assert_eq!(
            settings.timeout,
            Duration::from_secs(constants::network::DEFAULT_TIMEOUT_SECS)
        );
    }
}
