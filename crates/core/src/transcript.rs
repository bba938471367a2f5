//! TranscriptStore trait — durable conversation persistence.
//!
//! A transcript store keeps one ordered message sequence per conversation
//! plus a flat index of `{id, title, created_at}` records. The format is an
//! implementation detail; the file backend uses one JSON document per
//! conversation and a `conversations.json` index.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::message::{Conversation, ConversationId, ConversationMeta};

#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// A human-readable name for this backend (e.g., "file").
    fn name(&self) -> &str;

    /// Persist a conversation's full message sequence and update the index.
    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError>;

    /// Load a conversation by id. Missing conversations are `None`, not an
    /// error — the caller decides whether that is a problem.
    async fn load(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError>;

    /// List all known conversation records, in index order.
    async fn list(&self) -> Result<Vec<ConversationMeta>, StoreError>;

    /// Remove a conversation's transcript and its index record.
    /// Returns whether anything was deleted.
    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError>;

    /// Clear a conversation's messages while keeping its index record.
    async fn clear(&self, id: &ConversationId) -> Result<(), StoreError>;
}
