//! OpenAI-Compatible HTTP Transport
//!
//! Completion client speaking the Chat Completions wire shape over reqwest.
//! One POST per `complete` call; no retry, no caching, no credential
//! persistence.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ChatMessage, CompletionClient, CompletionRequest, ProviderSettings};
use crate::constants;
use crate::types::{ErrorClassifier, GridsmithError, Result};

/// Chat Completions transport with secure credential handling
pub struct HttpCompletionClient {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl HttpCompletionClient {
    /// Build the transport, rejecting blank credentials before any request
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        if settings.credential.expose_secret().trim().is_empty() {
            return Err(GridsmithError::Auth(
                "credential is empty; pass a non-blank API key".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(Duration::from_secs(
                constants::network::CONNECTION_TIMEOUT_SECS,
            ))
            .build()
            .map_err(|e| GridsmithError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    fn build_body(&self, request: &CompletionRequest) -> ChatCompletionBody {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(request.system.clone()));
        messages.extend(request.messages.iter().cloned());

        ChatCompletionBody {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: Some(request.max_tokens),
            response_format: Some(ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        info!(
            model = %request.model,
            turns = request.messages.len(),
            "sending completion request"
        );

        let body = self.build_body(request);
        let url = format!("{}/chat/completions", self.settings.api_base);

        debug!(url = %url, max_tokens = request.max_tokens, "POST chat/completions");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.settings.credential.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| GridsmithError::Network(format!("completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "completion service returned non-success status");
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &body,
            ));
        }

        let decoded: ChatCompletionResponse = response.json().await.map_err(|e| {
            GridsmithError::Network(format!("malformed completion service response: {}", e))
        })?;

        let content = decoded
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                GridsmithError::Network("completion service response had no content".to_string())
            })?;

        debug!(chars = content.len(), "received completion response");
        Ok(content)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.settings.model
    }
}

// Request/Response wire types

#[derive(Debug, Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn settings(key: &str) -> ProviderSettings {
        ProviderSettings::new(SecretString::from(key))
    }

    #[test]
    fn test_blank_credential_rejected_before_any_request() {
        for key in ["", "   ", "\n"] {
            let err = HttpCompletionClient::new(settings(key)).unwrap_err();
            assert!(err.is_auth(), "credential {:?} must fail as auth", key);
        }
    }

    #[test]
    fn test_valid_credential_accepted() {
        let client = HttpCompletionClient::new(settings("sk-test")).unwrap();
        assert_eq!(client.name(), "openai-compatible");
        assert_eq!(client.model(), constants::completion::DEFAULT_MODEL);
    }

    #[test]
    fn test_body_prepends_system_message() {
        let client = HttpCompletionClient::new(settings("sk-test")).unwrap();
        let mut request = CompletionRequest::new("gpt-4o-mini", "teach the vocabulary");
        request.push(ChatMessage::user("a cave"));
        request.push(ChatMessage::assistant("{}"));
        request.push(ChatMessage::user("fix it"));

        let body = client.build_body(&request);
        assert_eq!(body.messages.len(), 4);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[0].content, "teach the vocabulary");
        assert_eq!(body.messages[3].content, "fix it");
    }

    #[test]
    fn test_body_serialization_shape() {
        let client = HttpCompletionClient::new(settings("sk-test")).unwrap();
        let request = CompletionRequest::new("gpt-4o-mini", "sys");
        let json = serde_json::to_value(client.build_body(&request)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["response_format"]["type"], "json_object");
        assert!(json["max_tokens"].is_number());
    }

    #[test]
    fn test_debug_never_leaks_credential() {
        let client = HttpCompletionClient::new(settings("sk-leaky")).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-leaky"));
    }
}
