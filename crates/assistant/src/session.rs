//! Explicit per-caller session context.
//!
//! One [`Session`] owns one conversation and, optionally, one loaded dataset.
//! The caller holds it and passes it to every operation; there is no
//! process-wide state, so concurrent users each simply own their own session.

use freightdesk_core::error::Error;
use freightdesk_core::message::{Conversation, ConversationId, DataInsights, Message};
use freightdesk_core::table::Table;
use freightdesk_core::transcript::TranscriptStore;
use freightdesk_core::Result;
use tracing::debug;

use crate::Assistant;

/// A named table attached to a session.
pub struct Dataset {
    pub file_name: String,
    pub table: Table,
}

/// One user's conversation plus optional attached data.
pub struct Session {
    conversation: Conversation,
    dataset: Option<Dataset>,
}

impl Session {
    /// Start a fresh conversation.
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            dataset: None,
        }
    }

    /// Resume a previously persisted conversation.
    pub fn resume(conversation: Conversation) -> Self {
        Self {
            conversation,
            dataset: None,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.conversation.id
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Attach a dataset. The table must satisfy the row/column invariant.
    pub fn attach_table(&mut self, file_name: impl Into<String>, table: Table) -> Result<()> {
        table.validate().map_err(Error::Table)?;
        let file_name = file_name.into();
        debug!(
            file = %file_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Attached dataset to session"
        );
        self.dataset = Some(Dataset { file_name, table });
        Ok(())
    }

    /// Drop the attached dataset, if any.
    pub fn detach_table(&mut self) {
        self.dataset = None;
    }

    /// Ask one question and record the exchange.
    ///
    /// Routes through `ask_with_context` when a dataset is attached,
    /// `ask_plain` otherwise. On success the user/assistant pair is appended
    /// atomically and the transcript persisted; on any failure the
    /// conversation and the store are left untouched.
    pub async fn send(
        &mut self,
        assistant: &Assistant,
        store: &dyn TranscriptStore,
        prompt: &str,
    ) -> Result<String> {
        let reply = match &self.dataset {
            Some(dataset) => {
                assistant
                    .ask_with_context(prompt, &dataset.table, None)
                    .await?
            }
            None => assistant.ask_plain(prompt, None).await?,
        };

        let assistant_message = match &self.dataset {
            Some(dataset) => Message::assistant(&reply).with_insights(DataInsights {
                file_name: dataset.file_name.clone(),
                rows: dataset.table.row_count(),
                columns: dataset.table.column_count(),
            }),
            None => Message::assistant(&reply),
        };

        // Stage the exchange so a failed save leaves the live conversation
        // untouched and a retry cannot duplicate the user message
        let mut staged = self.conversation.clone();
        staged.record_exchange(Message::user(prompt), assistant_message);
        store.save(&staged).await.map_err(Error::Store)?;
        self.conversation = staged;

        Ok(reply)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
