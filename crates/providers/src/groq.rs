//! Groq chat-completions client.
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint, so this
//! client also works against OpenAI, OpenRouter, vLLM, and similar services
//! by pointing `base_url` elsewhere.
//!
//! One blocking request per call. Every failure mode — network, auth, quota,
//! malformed body — surfaces as a classified
//! [`RelayError`](freightdesk_core::error::RelayError).

use async_trait::async_trait;
use freightdesk_core::error::RelayError;
use freightdesk_core::provider::{CompletionProvider, CompletionReply, CompletionRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A Groq (OpenAI-compatible) completion provider.
pub struct GroqProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GroqProvider {
    /// Create a client against an explicit base URL.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| RelayError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a Groq provider (convenience constructor).
    pub fn groq(api_key: impl Into<String>) -> Result<Self, RelayError> {
        Self::new("groq", "https://api.groq.com/openai/v1", api_key)
    }

    fn to_api_messages(request: &CompletionRequest) -> Vec<ApiMessage> {
        vec![
            ApiMessage::new("system", &request.system),
            ApiMessage::new("user", &request.user),
        ]
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionReply, RelayError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": request.model,
            "messages": Self::to_api_messages(&request),
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "top_p": request.top_p,
            "stream": false,
        });

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(RelayError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(RelayError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(RelayError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| RelayError::MalformedResponse(format!("Failed to parse response: {e}")))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RelayError::MalformedResponse("No choices in response".into()))?;

        Ok(CompletionReply {
            content: choice.message.content.unwrap_or_default(),
            model: api_response.model,
        })
    }
}

// --- OpenAI-compatible API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(default)]
    content: Option<String>,
}

impl ApiMessage {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}
