//! Model Integration Layer
//!
//! Prompt assembly, the completion transport seam, tolerant response payload
//! extraction, and the per-attempt timeout wrapper.

pub mod parser;
pub mod prompt;
pub mod provider;
pub mod timeout;

pub use parser::{PayloadMetadata, ResponseParser, ResponsePayload};
pub use prompt::{GridPrompts, PromptBuilder, PromptPair, PromptSection};
pub use provider::{
    ChatMessage, CompletionClient, CompletionRequest, HttpCompletionClient, ProviderSettings,
};
pub use timeout::with_timeout;
