//! Conversation history — the record of every exchange.
//!
//! Each turn appends two records, the user's statement then the bot's reply.
//! On disk a record is a two-element JSON array: `["user", "Hi"]`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::HistoryError;

/// Who said it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::User => write!(f, "user"),
            Speaker::Bot => write!(f, "bot"),
        }
    }
}

/// One line of the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord(pub Speaker, pub String);

impl TurnRecord {
    pub fn user(text: impl Into<String>) -> Self {
        Self(Speaker::User, text.into())
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self(Speaker::Bot, text.into())
    }

    pub fn speaker(&self) -> Speaker {
        self.0
    }

    pub fn text(&self) -> &str {
        &self.1
    }
}

/// An append-only conversation log.
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// A human-readable name for this log (e.g., "json", "in_memory").
    fn name(&self) -> &str;

    /// Record one exchange: the statement, then the reply.
    async fn append(&self, statement: &str, reply: &str) -> Result<(), HistoryError>;

    /// All records logged so far, oldest first.
    async fn history(&self) -> Result<Vec<TurnRecord>, HistoryError>;
}
