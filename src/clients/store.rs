use anyhow::{Error, Result};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    clients::{database::DatabaseClient, memory::MemoryStore},
    config::Config,
    models::{
        analytics::{Analytics, ExportBundle},
        message::{GeneratedMessage, HistoryQuery, NewMessage},
    },
};

/// Where generated messages are kept. Postgres when a database is
/// configured and reachable, otherwise process memory.
pub enum MessageStore {
    Memory(MemoryStore),
    Postgres(DatabaseClient),
}

impl MessageStore {
    pub fn memory(capacity: usize) -> Self {
        MessageStore::Memory(MemoryStore::new(capacity))
    }

    pub async fn from_config(config: &Config) -> Self {
        let Some(database_url) = config.database_url.as_deref() else {
            info!("DATABASE_URL not provided, running in memory mode");
            return Self::memory(config.max_stored_messages);
        };

        match DatabaseClient::connect(database_url).await {
            Ok(client) => MessageStore::Postgres(client),
            Err(e) => {
                warn!(error = %e, "Database connection failed, running in memory mode");
                Self::memory(config.max_stored_messages)
            }
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            MessageStore::Memory(_) => "memory",
            MessageStore::Postgres(_) => "postgres",
        }
    }

    pub async fn save(&self, new: NewMessage) -> Result<GeneratedMessage, Error> {
        match self {
            MessageStore::Memory(store) => Ok(store.save(new).await),
            MessageStore::Postgres(db) => db.save(new).await,
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<GeneratedMessage>, Error> {
        match self {
            MessageStore::Memory(store) => Ok(store.get(id).await),
            MessageStore::Postgres(db) => db.get(id).await,
        }
    }

    pub async fn edit(&self, id: Uuid, final_message: &str) -> Result<bool, Error> {
        match self {
            MessageStore::Memory(store) => Ok(store.edit(id, final_message).await),
            MessageStore::Postgres(db) => db.edit(id, final_message).await,
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, Error> {
        match self {
            MessageStore::Memory(store) => Ok(store.delete(id).await),
            MessageStore::Postgres(db) => db.delete(id).await,
        }
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<GeneratedMessage>, Error> {
        match self {
            MessageStore::Memory(store) => Ok(store.history(query).await),
            MessageStore::Postgres(db) => db.history(query).await,
        }
    }

    pub async fn analytics(&self) -> Result<Analytics, Error> {
        let messages = match self {
            MessageStore::Memory(store) => store.all().await,
            MessageStore::Postgres(db) => db.all().await?,
        };

        Ok(Analytics::from_messages(&messages))
    }

    pub async fn export(&self, query: &HistoryQuery) -> Result<ExportBundle, Error> {
        let messages = self.history(query).await?;
        let analytics = self.analytics().await?;

        Ok(ExportBundle {
            messages,
            analytics,
            export_date: Utc::now(),
        })
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        match self {
            MessageStore::Memory(_) => Ok(()),
            MessageStore::Postgres(db) => db.health_check().await,
        }
    }
}
