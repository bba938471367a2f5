//! Message and Conversation domain types.
//!
//! These are the value objects that flow through the whole system:
//! user asks a question → assistant assembles a prompt → provider answers →
//! the exchange is appended to a conversation and persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How many characters of the first user prompt become the conversation title.
const TITLE_MAX_CHARS: usize = 50;

/// Unique identifier for a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender.
///
/// `System` messages are assembled at relay time (persona + data context) and
/// are never stored in a conversation transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// Persona / data-context instructions
    System,
}

/// Shape metadata recorded on an assistant reply that was grounded in an
/// uploaded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataInsights {
    /// Name of the file the table was loaded from
    pub file_name: String,
    pub rows: usize,
    pub columns: usize,
}

/// A single message in a conversation. Append-only once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Present on assistant replies that analyzed an attached dataset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_insights: Option<DataInsights>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            data_insights: None,
        }
    }

    /// Attach dataset shape metadata to this message.
    pub fn with_insights(mut self, insights: DataInsights) -> Self {
        self.data_insights = Some(insights);
        self
    }
}

/// Lightweight conversation record kept in the store's index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMeta {
    pub id: ConversationId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// A named, ordered, append-only sequence of chat messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique conversation ID
    pub id: ConversationId,

    /// Title — starts as a timestamp label, rewritten once from the first
    /// user prompt (see [`Conversation::record_exchange`])
    pub title: String,

    /// When this conversation was created
    pub created_at: DateTime<Utc>,

    /// When the last message was added
    pub updated_at: DateTime<Utc>,

    /// Ordered messages
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a new empty conversation with a timestamp-label title.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            title: format!("Chat {}", now.format("%Y-%m-%d %H:%M")),
            created_at: now,
            updated_at: now,
            messages: Vec::new(),
        }
    }

    /// Append one completed user/assistant exchange atomically.
    ///
    /// When this takes the message count from 0 to 2 — the conversation's
    /// first exchange — the title is rewritten to a truncated form of the
    /// user prompt. The rewrite happens exactly once per conversation.
    pub fn record_exchange(&mut self, user: Message, assistant: Message) {
        let first_exchange = self.messages.is_empty();
        if first_exchange {
            self.title = truncate_title(&user.content);
        }
        self.messages.push(user);
        self.messages.push(assistant);
        self.updated_at = Utc::now();
    }

    /// Index record for this conversation.
    pub fn meta(&self) -> ConversationMeta {
        ConversationMeta {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_title(prompt: &str) -> String {
    let chars: Vec<char> = prompt.chars().collect();
    if chars.len() > TITLE_MAX_CHARS {
        let head: String = chars[..TITLE_MAX_CHARS].iter().collect();
        format!("{head}...")
    } else {
        prompt.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("What is 3PL in logistics?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "What is 3PL in logistics?");
        assert!(msg.data_insights.is_none());
    }

    #[test]
    fn new_conversation_has_timestamp_title() {
        let conv = Conversation::new();
        assert!(conv.title.starts_with("Chat "));
        assert!(conv.messages.is_empty());
    }

    #[test]
    fn first_exchange_rewrites_title() {
        let mut conv = Conversation::new();
        conv.record_exchange(
            Message::user("How to reduce trucking costs?"),
            Message::assistant("Consolidate loads."),
        );
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.title, "How to reduce trucking costs?");
    }

    #[test]
    fn title_rewrite_happens_exactly_once() {
        let mut conv = Conversation::new();
        conv.record_exchange(Message::user("first question"), Message::assistant("a1"));
        conv.record_exchange(Message::user("second question"), Message::assistant("a2"));
        assert_eq!(conv.messages.len(), 4);
        assert_eq!(conv.title, "first question");
    }

    #[test]
    fn long_prompt_title_is_truncated_with_ellipsis() {
        let prompt = "x".repeat(80);
        let mut conv = Conversation::new();
        conv.record_exchange(Message::user(prompt), Message::assistant("ok"));
        assert_eq!(conv.title.chars().count(), 53);
        assert!(conv.title.ends_with("..."));
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant("42 shipments").with_insights(DataInsights {
            file_name: "orders.csv".into(),
            rows: 42,
            columns: 5,
        });
        let json = serde_json::to_string(&msg).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back.content, "42 shipments");
        assert_eq!(back.data_insights.unwrap().rows, 42);
    }

    #[test]
    fn plain_message_serializes_without_insights_field() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(!json.contains("data_insights"));
    }
}
