//! Prompt assembly and relay entry points for FreightDesk.
//!
//! Two public ways to ask the remote model a question:
//! - [`Assistant::ask_plain`] — persona + prompt, straight through
//! - [`Assistant::ask_with_context`] — persona + table digest woven into both
//!   the system and user messages
//!
//! Plus a [`Session`] object that owns one conversation and its optionally
//! attached dataset, replacing the global UI session state of the reference
//! implementation with an explicit per-caller value.

pub mod persona;
pub mod session;

use std::sync::Arc;

use freightdesk_config::AppConfig;
use freightdesk_core::error::Error;
use freightdesk_core::provider::{CompletionProvider, CompletionRequest};
use freightdesk_core::table::Table;
use freightdesk_core::Result;
use freightdesk_summary::{summarize_with, SummaryOptions};
use tracing::debug;

pub use session::{Dataset, Session};

/// The prompt assembler and relay front door.
///
/// Holds no mutable state: every call validates the credential, assembles
/// messages, and performs exactly one remote completion.
pub struct Assistant {
    provider: Arc<dyn CompletionProvider>,
    config: AppConfig,
    summary_options: SummaryOptions,
}

impl Assistant {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: AppConfig) -> Self {
        let summary_options = SummaryOptions {
            sample_size: config.sample_size,
            seed: None,
        };
        Self {
            provider,
            config,
            summary_options,
        }
    }

    /// Override the summarization options (mainly to seed the text sample in
    /// tests).
    pub fn with_summary_options(mut self, options: SummaryOptions) -> Self {
        self.summary_options = options;
        self
    }

    /// Send a prompt with the persona system message and return the reply.
    ///
    /// Fails fast with a configuration error when the credential is missing —
    /// no remote call is attempted.
    pub async fn ask_plain(&self, prompt: &str, system_content: Option<&str>) -> Result<String> {
        self.config.require_api_key()?;

        let system = system_content.unwrap_or(persona::LOGISTICS_EXPERT);
        self.relay(system.to_string(), prompt.to_string()).await
    }

    /// Summarize the table once and relay the prompt with the digest embedded
    /// verbatim in both the system and user messages.
    pub async fn ask_with_context(
        &self,
        prompt: &str,
        table: &Table,
        system_content: Option<&str>,
    ) -> Result<String> {
        self.config.require_api_key()?;
        table.validate().map_err(Error::Table)?;

        let digest = summarize_with(table, &self.summary_options)?.render();
        let persona = system_content.unwrap_or(persona::DATA_ANALYST);

        let system = format!(
            "{persona}\n\
             You are analyzing logistics data with these characteristics:\n\
             {digest}\n\
             Provide specific insights from the data when possible."
        );
        let user = format!(
            "When answering this logistics question: {prompt}\n\
             Consider this detailed data context:\n\
             {digest}\n\
             Provide specific numbers and insights from the data where relevant."
        );

        self.relay(system, user).await
    }

    /// The single remote-call primitive both entry points share.
    async fn relay(&self, system: String, user: String) -> Result<String> {
        let request = CompletionRequest {
            model: self.config.default_model.clone(),
            system,
            user,
            temperature: self.config.default_temperature,
            max_tokens: self.config.default_max_tokens,
            top_p: self.config.default_top_p,
        };

        debug!(provider = self.provider.name(), model = %request.model, "Relaying prompt");
        let reply = self.provider.complete(request).await?;
        Ok(reply.content)
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::Mutex;

    use freightdesk_core::error::RelayError;
    use freightdesk_core::provider::{CompletionProvider, CompletionReply, CompletionRequest};

    /// A provider that records every request and returns scripted replies.
    pub struct RecordingProvider {
        pub requests: Mutex<Vec<CompletionRequest>>,
        replies: Mutex<Vec<Result<String, RelayError>>>,
    }

    impl RecordingProvider {
        pub fn replying(reply: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                replies: Mutex::new(vec![Ok(reply.to_string())]),
            }
        }

        pub fn failing(error: RelayError) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                replies: Mutex::new(vec![Err(error)]),
            }
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> CompletionRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl CompletionProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording_mock"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionReply, RelayError> {
            self.requests.lock().unwrap().push(request);
            let mut replies = self.replies.lock().unwrap();
            let reply = if replies.is_empty() {
                Ok("scripted reply".to_string())
            } else {
                replies.remove(0)
            };
            reply.map(|content| CompletionReply {
                content,
                model: "llama3-70b-8192".into(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::RecordingProvider;
    use super::*;
    use freightdesk_core::error::RelayError;
    use freightdesk_core::table::{Cell, Column, ColumnKind};

    fn config_with_key() -> AppConfig {
        AppConfig {
            api_key: Some("gsk_test".into()),
            ..Default::default()
        }
    }

    fn shipments() -> Table {
        Table::new(vec![
            Column::new(
                "qty",
                ColumnKind::Numeric,
                vec![Cell::Number(1.0), Cell::Number(2.0)],
            ),
            Column::new(
                "carrier",
                ColumnKind::Text,
                vec![Cell::Text("DHL".into()), Cell::Text("UPS".into())],
            ),
        ])
    }

    fn seeded_options() -> SummaryOptions {
        SummaryOptions {
            sample_size: 3,
            seed: Some(42),
        }
    }

    #[tokio::test]
    async fn ask_plain_relays_persona_and_prompt() {
        let provider = Arc::new(RecordingProvider::replying("Use cross-docking."));
        let assistant = Assistant::new(provider.clone(), config_with_key());

        let reply = assistant
            .ask_plain("How to optimize warehouse operations?", None)
            .await
            .unwrap();

        assert_eq!(reply, "Use cross-docking.");
        assert_eq!(provider.call_count(), 1);
        let request = provider.last_request();
        assert_eq!(request.system, persona::LOGISTICS_EXPERT);
        assert_eq!(request.user, "How to optimize warehouse operations?");
        assert_eq!(request.model, "llama3-70b-8192");
    }

    #[tokio::test]
    async fn ask_plain_honors_system_override() {
        let provider = Arc::new(RecordingProvider::replying("ok"));
        let assistant = Assistant::new(provider.clone(), config_with_key());

        assistant
            .ask_plain("question", Some("You are a customs broker."))
            .await
            .unwrap();

        assert_eq!(provider.last_request().system, "You are a customs broker.");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_remote_call() {
        let provider = Arc::new(RecordingProvider::replying("never sent"));
        let assistant = Assistant::new(provider.clone(), AppConfig::default());

        let plain = assistant.ask_plain("q", None).await.unwrap_err();
        assert!(matches!(plain, Error::Config { .. }));

        let with_data = assistant
            .ask_with_context("q", &shipments(), None)
            .await
            .unwrap_err();
        assert!(matches!(with_data, Error::Config { .. }));

        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn digest_is_embedded_verbatim_in_both_messages() {
        let provider = Arc::new(RecordingProvider::replying("2 shipments total"));
        let assistant = Assistant::new(provider.clone(), config_with_key())
            .with_summary_options(seeded_options());

        let table = shipments();
        assistant
            .ask_with_context("How many shipments?", &table, None)
            .await
            .unwrap();

        let expected = summarize_with(&table, &seeded_options()).unwrap().render();
        assert_eq!(provider.call_count(), 1);
        let request = provider.last_request();
        assert!(request.system.contains(&expected));
        assert!(request.user.contains(&expected));
        assert!(request.user.contains("How many shipments?"));
    }

    #[tokio::test]
    async fn invalid_table_is_rejected_without_remote_call() {
        let provider = Arc::new(RecordingProvider::replying("never sent"));
        let assistant = Assistant::new(provider.clone(), config_with_key());

        let empty = Table::new(vec![]);
        let err = assistant
            .ask_with_context("q", &empty, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Table(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn relay_failures_surface_classified() {
        let provider = Arc::new(RecordingProvider::failing(RelayError::RateLimited {
            retry_after_secs: 5,
        }));
        let assistant = Assistant::new(provider, config_with_key());

        let err = assistant.ask_plain("q", None).await.unwrap_err();
        assert!(matches!(err, Error::Relay(RelayError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn request_carries_configured_sampling_parameters() {
        let provider = Arc::new(RecordingProvider::replying("ok"));
        let assistant = Assistant::new(provider.clone(), config_with_key());

        assistant.ask_plain("q", None).await.unwrap();

        let request = provider.last_request();
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
        assert!((request.top_p - 0.9).abs() < f32::EPSILON);
        assert_eq!(request.max_tokens, 4000);
    }
}
