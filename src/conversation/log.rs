//! Message persistence (SQLite).

use crate::error::{Result, StoreError};
use crate::{ChannelId, UserId};
use anyhow::Context as _;
use sqlx::{Row as _, SqlitePool};

/// A message about to be recorded. Content is already normalized (mention
/// tokens rewritten to `@name` form) by the router.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub author_name: String,
    pub content: String,
    /// Model id for bot replies, None for user messages.
    pub model: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A persisted message.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: String,
    pub channel_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub model: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Append-only message log. Every inbound and outbound message lands here,
/// independent of policy gating; rows are never mutated or deleted.
///
/// Appends are awaited and their errors propagate — a lost log row breaks
/// the audit invariant, so the caller decides what failing the event means.
#[derive(Debug, Clone)]
pub struct MessageLog {
    pool: SqlitePool,
}

impl MessageLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the messages table.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                channel_id TEXT NOT NULL,
                author_id TEXT NOT NULL,
                author_name TEXT NOT NULL,
                content TEXT NOT NULL,
                model TEXT,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Migration(error.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_channel_time \
             ON messages (channel_id, created_at)",
        )
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Migration(error.to_string()))?;

        Ok(())
    }

    /// Record a message.
    pub async fn append(&self, message: &NewMessage) -> Result<()> {
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO messages (id, channel_id, author_id, author_name, content, model, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(message.channel_id.as_ref())
        .bind(message.author_id.as_ref())
        .bind(&message.author_name)
        .bind(&message.content)
        .bind(&message.model)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await
        .context("failed to persist message")?;

        Ok(())
    }

    /// Load the most recent messages for a channel, returned oldest first.
    pub async fn load_recent(
        &self,
        channel_id: &ChannelId,
        limit: i64,
    ) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query(
            "SELECT id, channel_id, author_id, author_name, content, model, created_at \
             FROM messages \
             WHERE channel_id = ? \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?",
        )
        .bind(channel_id.as_ref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("failed to load channel history")?;

        let mut messages = rows
            .into_iter()
            .map(message_from_row)
            .collect::<Result<Vec<_>>>()?;

        // Reverse to chronological order
        messages.reverse();

        Ok(messages)
    }

    /// How many rows the channel has. Test and diagnostics helper.
    pub async fn count(&self, channel_id: &ChannelId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages WHERE channel_id = ?")
            .bind(channel_id.as_ref())
            .fetch_one(&self.pool)
            .await
            .context("failed to count messages")?;

        Ok(count)
    }
}

fn message_from_row(row: sqlx::sqlite::SqliteRow) -> Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.try_get("id").context("failed to read message id")?,
        channel_id: row
            .try_get("channel_id")
            .context("failed to read message channel_id")?,
        author_id: row
            .try_get("author_id")
            .context("failed to read message author_id")?,
        author_name: row
            .try_get("author_name")
            .context("failed to read message author_name")?,
        content: row
            .try_get("content")
            .context("failed to read message content")?,
        model: row.try_get::<Option<String>, _>("model").ok().flatten(),
        created_at: row
            .try_get("created_at")
            .context("failed to read message created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_log() -> MessageLog {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should connect");

        let log = MessageLog::new(pool);
        log.initialize().await.expect("messages schema should be created");
        log
    }

    fn user_message(channel: &str, author: &str, content: &str, at_secs: i64) -> NewMessage {
        NewMessage {
            channel_id: channel.into(),
            author_id: "1".into(),
            author_name: author.to_string(),
            content: content.to_string(),
            model: None,
            timestamp: chrono::DateTime::from_timestamp(at_secs, 0).expect("valid timestamp"),
        }
    }

    #[tokio::test]
    async fn history_window_is_chronological_and_bounded() {
        let log = setup_log().await;
        let channel: ChannelId = "chan-1".into();

        for (index, content) in ["one", "two", "three", "four"].iter().enumerate() {
            log.append(&user_message("chan-1", "alice", content, index as i64))
                .await
                .expect("append");
        }

        let window = log.load_recent(&channel, 3).await.expect("load");
        let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three", "four"]);
    }

    #[tokio::test]
    async fn bot_replies_record_the_model_id() {
        let log = setup_log().await;
        let channel: ChannelId = "chan-1".into();

        let mut reply = user_message("chan-1", "pomelo", "hello!", 0);
        reply.model = Some("gpt-4.1-mini".to_string());
        log.append(&reply).await.expect("append");

        let window = log.load_recent(&channel, 10).await.expect("load");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].model.as_deref(), Some("gpt-4.1-mini"));
    }

    #[tokio::test]
    async fn channels_do_not_leak_into_each_other() {
        let log = setup_log().await;

        log.append(&user_message("chan-1", "alice", "here", 0))
            .await
            .expect("append");
        log.append(&user_message("chan-2", "bob", "there", 1))
            .await
            .expect("append");

        let channel: ChannelId = "chan-1".into();
        let window = log.load_recent(&channel, 10).await.expect("load");
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].content, "here");
    }
}
