use anyhow::{Error, Result, anyhow};
use chrono::Utc;
use tokio_postgres::{Client, NoTls, Row, types::ToSql};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::{
    message::{GeneratedMessage, HistoryQuery, NewMessage},
    template::Category,
};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS generated_messages (
        id UUID PRIMARY KEY,
        user_prompt TEXT NOT NULL,
        generated_message TEXT NOT NULL,
        template_used TEXT NOT NULL,
        category TEXT NOT NULL,
        variables_detected TEXT[] NOT NULL,
        is_edited BOOLEAN NOT NULL DEFAULT FALSE,
        final_message TEXT,
        user_id TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    );
    CREATE INDEX IF NOT EXISTS generated_messages_created_at_idx
        ON generated_messages (created_at DESC);
    CREATE INDEX IF NOT EXISTS generated_messages_user_id_idx
        ON generated_messages (user_id);
"#;

const COLUMNS: &str = "id, user_prompt, generated_message, template_used, category, \
    variables_detected, is_edited, final_message, user_id, created_at, updated_at";

pub struct DatabaseClient {
    client: Client,
}

impl DatabaseClient {
    pub async fn connect(database_url: &str) -> Result<Self, Error> {
        info!("Connecting to PostgreSQL database");

        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(|e| anyhow!("Failed to connect to database: {}", e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgreSQL connection closed with error");
            }
        });

        client
            .batch_execute(SCHEMA)
            .await
            .map_err(|e| anyhow!("Failed to prepare schema: {}", e))?;

        info!("PostgreSQL connection established");

        Ok(Self { client })
    }

    pub async fn save(&self, new: NewMessage) -> Result<GeneratedMessage, Error> {
        let message = GeneratedMessage::from_new(new);
        let category = message.category.as_str();

        self.client
            .execute(
                "INSERT INTO generated_messages (
                    id, user_prompt, generated_message, template_used, category,
                    variables_detected, is_edited, final_message, user_id, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
                &[
                    &message.id,
                    &message.user_prompt,
                    &message.generated_message,
                    &message.template_used,
                    &category,
                    &message.variables_detected,
                    &message.is_edited,
                    &message.final_message,
                    &message.user_id,
                    &message.created_at,
                    &message.updated_at,
                ],
            )
            .await
            .map_err(|e| {
                error!(error = %e, id = %message.id, "Failed to write message to database");
                anyhow!("Database write failed: {}", e)
            })?;

        debug!(id = %message.id, category, "Message written to database");

        Ok(message)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<GeneratedMessage>, Error> {
        let query = format!("SELECT {} FROM generated_messages WHERE id = $1", COLUMNS);

        let row = self
            .client
            .query_opt(query.as_str(), &[&id])
            .await
            .map_err(|e| anyhow!("Database read failed: {}", e))?;

        row.map(|r| row_to_message(&r)).transpose()
    }

    pub async fn edit(&self, id: Uuid, final_message: &str) -> Result<bool, Error> {
        let updated = self
            .client
            .execute(
                "UPDATE generated_messages
                 SET final_message = $2, is_edited = TRUE, updated_at = $3
                 WHERE id = $1",
                &[&id, &final_message, &Utc::now()],
            )
            .await
            .map_err(|e| anyhow!("Database update failed: {}", e))?;

        Ok(updated > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, Error> {
        let deleted = self
            .client
            .execute("DELETE FROM generated_messages WHERE id = $1", &[&id])
            .await
            .map_err(|e| anyhow!("Database delete failed: {}", e))?;

        Ok(deleted > 0)
    }

    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<GeneratedMessage>, Error> {
        let category = query.category.map(|c| c.as_str());
        let pattern = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(like_pattern);
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        let sql = format!(
            "SELECT {} FROM generated_messages
             WHERE ($1::TEXT IS NULL OR user_id = $1)
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::TEXT IS NULL
                    OR user_prompt ILIKE $3
                    OR generated_message ILIKE $3
                    OR category ILIKE $3
                    OR template_used ILIKE $3)
               AND ($5::TIMESTAMPTZ IS NULL OR created_at >= $5)
               AND ($6::TIMESTAMPTZ IS NULL OR created_at <= $6)
             ORDER BY created_at DESC
             LIMIT $4",
            COLUMNS
        );

        let params: [&(dyn ToSql + Sync); 6] = [
            &query.user_id,
            &category,
            &pattern,
            &limit,
            &query.from,
            &query.to,
        ];

        let rows = self
            .client
            .query(sql.as_str(), &params)
            .await
            .map_err(|e| anyhow!("Database read failed: {}", e))?;

        rows.iter().map(row_to_message).collect()
    }

    pub async fn all(&self) -> Result<Vec<GeneratedMessage>, Error> {
        let sql = format!(
            "SELECT {} FROM generated_messages ORDER BY created_at DESC",
            COLUMNS
        );

        let rows = self
            .client
            .query(sql.as_str(), &[])
            .await
            .map_err(|e| anyhow!("Database read failed: {}", e))?;

        rows.iter().map(row_to_message).collect()
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        self.client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| anyhow!("Database health check failed: {}", e))?;

        Ok(())
    }
}

fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn row_to_message(row: &Row) -> Result<GeneratedMessage, Error> {
    let raw_category: String = row.try_get("category")?;
    let category = Category::from_string(&raw_category).ok_or_else(|| {
        warn!(category = %raw_category, "Unknown category in stored message");
        anyhow!("Unknown category '{}'", raw_category)
    })?;

    Ok(GeneratedMessage {
        id: row.try_get("id")?,
        user_prompt: row.try_get("user_prompt")?,
        generated_message: row.try_get("generated_message")?,
        template_used: row.try_get("template_used")?,
        category,
        variables_detected: row.try_get("variables_detected")?,
        is_edited: row.try_get("is_edited")?,
        final_message: row.try_get("final_message")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
