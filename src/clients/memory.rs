use chrono::{SubsecRound, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::message::{GeneratedMessage, HistoryQuery, NewMessage};

/// Process-local history, newest first, bounded to `capacity` records.
pub struct MemoryStore {
    messages: RwLock<Vec<GeneratedMessage>>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn save(&self, new: NewMessage) -> GeneratedMessage {
        let message = GeneratedMessage::from_new(new);
        let mut messages = self.messages.write().await;

        messages.insert(0, message.clone());
        if messages.len() > self.capacity {
            let dropped = messages.len() - self.capacity;
            messages.truncate(self.capacity);
            debug!(dropped, capacity = self.capacity, "Oldest messages evicted");
        }

        message
    }

    pub async fn get(&self, id: Uuid) -> Option<GeneratedMessage> {
        self.messages
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub async fn edit(&self, id: Uuid, final_message: &str) -> bool {
        let mut messages = self.messages.write().await;

        match messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.final_message = Some(final_message.to_string());
                message.is_edited = true;
                message.updated_at = Utc::now().trunc_subsecs(6);
                true
            }
            None => false,
        }
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        messages.len() != before
    }

    pub async fn history(&self, query: &HistoryQuery) -> Vec<GeneratedMessage> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| query.accepts(m))
            .take(query.limit)
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<GeneratedMessage> {
        self.messages.read().await.clone()
    }
}
