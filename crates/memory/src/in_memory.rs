//! In-memory conversation log — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use parley_core::error::HistoryError;
use parley_core::history::{ConversationLog, TurnRecord};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A conversation log that keeps records in a Vec.
/// Useful for testing and sessions where persistence isn't needed.
#[derive(Clone, Default)]
pub struct InMemoryHistory {
    records: Arc<RwLock<Vec<TurnRecord>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records (two per turn).
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationLog for InMemoryHistory {
    fn name(&self) -> &str { "in_memory" }

    async fn append(&self, statement: &str, reply: &str) -> Result<(), HistoryError> {
        let mut records = self.records.write().await;
        records.push(TurnRecord::user(statement));
        records.push(TurnRecord::bot(reply));
        Ok(())
    }

    async fn history(&self) -> Result<Vec<TurnRecord>, HistoryError> {
        Ok(self.records.read().await.clone())
    }
}
