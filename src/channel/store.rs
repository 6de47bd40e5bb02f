//! Channel configuration storage (SQLite).

use crate::channel::{ChannelConfig, VerbosityLevel};
use crate::error::{Result, StoreError};
use anyhow::Context as _;
use sqlx::{Row as _, SqlitePool};

/// Persists per-channel policy. Rows are created lazily on the first
/// administrative write; reads fall back to the default configuration.
#[derive(Debug, Clone)]
pub struct ChannelStore {
    pool: SqlitePool,
}

impl ChannelStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the channels table.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS channels (
                channel_id TEXT PRIMARY KEY,
                disabled INTEGER NOT NULL DEFAULT 0,
                verbosity INTEGER NOT NULL DEFAULT 2
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Migration(error.to_string()))?;

        Ok(())
    }

    /// Load a channel's configuration, or the default when no row exists.
    pub async fn get(&self, channel_id: &crate::ChannelId) -> Result<ChannelConfig> {
        let row = sqlx::query("SELECT disabled, verbosity FROM channels WHERE channel_id = ?")
            .bind(channel_id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .context("failed to load channel config")?;

        let Some(row) = row else {
            return Ok(ChannelConfig::default_for(channel_id.clone()));
        };

        let disabled: i64 = row.try_get("disabled").context("failed to read disabled flag")?;
        let level: i64 = row.try_get("verbosity").context("failed to read verbosity")?;
        let verbosity = VerbosityLevel::from_level(level)
            .with_context(|| format!("invalid verbosity level in database: {level}"))?;

        Ok(ChannelConfig {
            channel_id: channel_id.clone(),
            disabled: disabled != 0,
            verbosity,
        })
    }

    /// Flip the disabled flag, creating the row from the default state when
    /// absent. Returns the new state.
    pub async fn toggle_disabled(&self, channel_id: &crate::ChannelId) -> Result<bool> {
        let disabled: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO channels (channel_id, disabled) VALUES (?, 1)
            ON CONFLICT(channel_id) DO UPDATE SET disabled = 1 - disabled
            RETURNING disabled
            "#,
        )
        .bind(channel_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .context("failed to toggle channel disabled flag")?;

        Ok(disabled != 0)
    }

    /// Set the verbosity level. Idempotent; other fields are untouched.
    pub async fn set_verbosity(
        &self,
        channel_id: &crate::ChannelId,
        verbosity: VerbosityLevel,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO channels (channel_id, verbosity) VALUES (?, ?)
            ON CONFLICT(channel_id) DO UPDATE SET verbosity = excluded.verbosity
            "#,
        )
        .bind(channel_id.as_ref())
        .bind(verbosity.as_level())
        .execute(&self.pool)
        .await
        .context("failed to set channel verbosity")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_store() -> ChannelStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should connect");

        let store = ChannelStore::new(pool);
        store.initialize().await.expect("channels schema should be created");
        store
    }

    #[tokio::test]
    async fn absent_channel_reads_as_default() {
        let store = setup_store().await;
        let channel_id: crate::ChannelId = "chan-1".into();

        let config = store.get(&channel_id).await.expect("get should succeed");
        assert!(!config.disabled);
        assert_eq!(config.verbosity, VerbosityLevel::MentionsOnly);
    }

    #[tokio::test]
    async fn toggle_creates_row_from_default_and_flips() {
        let store = setup_store().await;
        let channel_id: crate::ChannelId = "chan-1".into();

        assert!(store.toggle_disabled(&channel_id).await.expect("first toggle"));
        assert!(store.get(&channel_id).await.expect("get").disabled);

        assert!(!store.toggle_disabled(&channel_id).await.expect("second toggle"));
        assert!(!store.get(&channel_id).await.expect("get").disabled);
    }

    #[tokio::test]
    async fn set_verbosity_preserves_disabled_flag() {
        let store = setup_store().await;
        let channel_id: crate::ChannelId = "chan-1".into();

        store.toggle_disabled(&channel_id).await.expect("toggle");
        store
            .set_verbosity(&channel_id, VerbosityLevel::Unrestricted)
            .await
            .expect("set verbosity");

        let config = store.get(&channel_id).await.expect("get");
        assert!(config.disabled, "verbosity write must not reset the disabled flag");
        assert_eq!(config.verbosity, VerbosityLevel::Unrestricted);
    }

    #[tokio::test]
    async fn set_verbosity_is_idempotent() {
        let store = setup_store().await;
        let channel_id: crate::ChannelId = "chan-1".into();

        store
            .set_verbosity(&channel_id, VerbosityLevel::KarmaOnly)
            .await
            .expect("first set");
        store
            .set_verbosity(&channel_id, VerbosityLevel::KarmaOnly)
            .await
            .expect("second set");

        let config = store.get(&channel_id).await.expect("get");
        assert_eq!(config.verbosity, VerbosityLevel::KarmaOnly);
    }
}
