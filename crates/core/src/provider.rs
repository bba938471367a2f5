//! CompletionProvider trait — the abstraction over the remote LLM endpoint.
//!
//! A provider knows how to send one system message and one user message to a
//! chat-completions service and hand back the first candidate reply. One
//! synchronous request per invocation — no retry, no backoff, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;

/// A single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "llama3-70b-8192")
    pub model: String,

    /// Persona and optional data-context instructions
    pub system: String,

    /// The (possibly digest-augmented) user prompt
    pub user: String,

    /// Temperature (0.0 = deterministic)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Nucleus-sampling parameter
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

fn default_temperature() -> f32 {
    0.3
}

fn default_top_p() -> f32 {
    0.9
}

impl CompletionRequest {
    /// Build a request with the reference defaults: temperature 0.3,
    /// max_tokens 4000, top_p 0.9.
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            temperature: default_temperature(),
            max_tokens: 4000,
            top_p: default_top_p(),
        }
    }
}

/// The first candidate's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionReply {
    /// The reply text
    pub content: String,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// The remote-call primitive shared by `ask_plain` and `ask_with_context`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "groq").
    fn name(&self) -> &str;

    /// Send a request and return the first choice's content.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionReply, RelayError>;
}
