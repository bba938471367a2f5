//! `freightdesk history` — Manage saved conversation transcripts.

use clap::Subcommand;
use freightdesk_config::AppConfig;
use freightdesk_core::message::{ConversationId, Role};
use freightdesk_core::transcript::TranscriptStore;
use freightdesk_transcripts::FileStore;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List saved conversations
    List,

    /// Print a conversation's transcript
    Show {
        /// The conversation id
        id: String,
    },

    /// Remove a conversation's messages, keeping its record
    Clear {
        /// The conversation id
        id: String,
    },

    /// Delete a conversation entirely
    Delete {
        /// The conversation id
        id: String,
    },
}

pub async fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = FileStore::new(&config.history_dir);

    match action {
        HistoryAction::List => {
            let index = store.list().await?;
            if index.is_empty() {
                println!("No saved conversations.");
                return Ok(());
            }
            for meta in index {
                println!(
                    "{}  {}  {}",
                    meta.id,
                    meta.created_at.format("%Y-%m-%d %H:%M"),
                    meta.title
                );
            }
        }
        HistoryAction::Show { id } => {
            let id = ConversationId::from(&id);
            let conversation = store
                .load(&id)
                .await?
                .ok_or_else(|| format!("No saved conversation with id {id}"))?;

            println!("# {}", conversation.title);
            println!();
            for message in &conversation.messages {
                let speaker = match message.role {
                    Role::User => "you",
                    Role::Assistant => "assistant",
                    Role::System => "system",
                };
                println!("[{speaker}] {}", message.content);
                if let Some(insights) = &message.data_insights {
                    println!(
                        "  (analyzed {}: {} rows × {} columns)",
                        insights.file_name, insights.rows, insights.columns
                    );
                }
                println!();
            }
        }
        HistoryAction::Clear { id } => {
            let id = ConversationId::from(&id);
            store.clear(&id).await?;
            println!("Cleared {id}");
        }
        HistoryAction::Delete { id } => {
            let id = ConversationId::from(&id);
            if store.delete(&id).await? {
                println!("Deleted {id}");
            } else {
                println!("No saved conversation with id {id}");
            }
        }
    }

    Ok(())
}
