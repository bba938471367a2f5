//! # FreightDesk Core
//!
//! The domain model of the FreightDesk logistics assistant: tables, messages,
//! conversations, the error taxonomy, and the two collaborator traits
//! ([`CompletionProvider`] and [`TranscriptStore`]).
//!
//! Everything else in the workspace depends inward on this crate and
//! implements against its traits, so the remote endpoint and the persistence
//! backend can each be swapped (or mocked in tests) without touching the
//! prompt-assembly or summarization code.

pub mod error;
pub mod message;
pub mod provider;
pub mod table;
pub mod transcript;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Conversation, ConversationId, ConversationMeta, DataInsights, Message, Role};
pub use provider::{CompletionProvider, CompletionReply, CompletionRequest};
pub use table::{Cell, Column, ColumnKind, Table};
pub use transcript::TranscriptStore;
