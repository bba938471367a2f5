//! File-backed transcript store — one JSON document per conversation.
//!
//! Layout under the history directory:
//! - `{conversation_id}.json` — the full ordered message sequence
//! - `conversations.json` — the `{id, title, created_at}` index
//!
//! Simple, portable, human-inspectable. Writes go straight to disk on every
//! save; there is no in-memory cache to fall out of sync.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use freightdesk_core::error::StoreError;
use freightdesk_core::message::{Conversation, ConversationId, ConversationMeta};
use freightdesk_core::transcript::TranscriptStore;
use tracing::{debug, warn};

const INDEX_FILE: &str = "conversations.json";

/// A transcript store rooted at one directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn conversation_path(&self, id: &ConversationId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::SaveFailed(format!("Failed to create history directory: {e}"))
        })
    }

    fn read_index(&self) -> Result<Vec<ConversationMeta>, StoreError> {
        read_json_or_default(&self.index_path())
    }

    fn write_index(&self, index: &[ConversationMeta]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(index)
            .map_err(|e| StoreError::SaveFailed(format!("Failed to serialize index: {e}")))?;
        std::fs::write(self.index_path(), content)
            .map_err(|e| StoreError::SaveFailed(format!("Failed to write index: {e}")))
    }

    /// Upsert one conversation record in the index, preserving order.
    fn update_index(&self, meta: ConversationMeta) -> Result<(), StoreError> {
        let mut index = self.read_index()?;
        match index.iter_mut().find(|m| m.id == meta.id) {
            Some(existing) => *existing = meta,
            None => index.push(meta),
        }
        self.write_index(&index)
    }
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> Result<T, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        // Not yet written — start empty
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(StoreError::LoadFailed(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };
    serde_json::from_str(&content).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Corrupted transcript document");
        StoreError::LoadFailed(format!("Failed to parse {}: {e}", path.display()))
    })
}

#[async_trait]
impl TranscriptStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(conversation)
            .map_err(|e| StoreError::SaveFailed(format!("Failed to serialize transcript: {e}")))?;
        std::fs::write(self.conversation_path(&conversation.id), content)
            .map_err(|e| StoreError::SaveFailed(format!("Failed to write transcript: {e}")))?;

        self.update_index(conversation.meta())?;
        debug!(id = %conversation.id, messages = conversation.messages.len(), "Saved transcript");
        Ok(())
    }

    async fn load(&self, id: &ConversationId) -> Result<Option<Conversation>, StoreError> {
        let path = self.conversation_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::LoadFailed(format!("Failed to read transcript: {e}")))?;
        let conversation = serde_json::from_str(&content).map_err(|e| {
            StoreError::LoadFailed(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(conversation))
    }

    async fn list(&self) -> Result<Vec<ConversationMeta>, StoreError> {
        self.read_index()
    }

    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError> {
        let path = self.conversation_path(id);
        let existed = path.exists();
        if existed {
            std::fs::remove_file(&path)
                .map_err(|e| StoreError::SaveFailed(format!("Failed to delete transcript: {e}")))?;
        }

        let mut index = self.read_index()?;
        let len_before = index.len();
        index.retain(|m| &m.id != id);
        if index.len() < len_before {
            self.write_index(&index)?;
        }

        Ok(existed || index.len() < len_before)
    }

    async fn clear(&self, id: &ConversationId) -> Result<(), StoreError> {
        let Some(mut conversation) = self.load(id).await? else {
            return Ok(());
        };
        conversation.messages.clear();
        self.save(&conversation).await
    }
}
