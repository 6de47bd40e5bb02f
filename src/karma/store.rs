//! Karma ledger storage (SQLite).

use crate::UserId;
use crate::error::{Result, StoreError};
use anyhow::Context as _;
use sqlx::SqlitePool;

/// Persists per-user karma totals.
///
/// Deltas are applied as a single atomic upsert so concurrent events for the
/// same user accumulate commutatively — there is no read-then-write window
/// in which an update can be lost.
#[derive(Debug, Clone)]
pub struct KarmaStore {
    pool: SqlitePool,
}

impl KarmaStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the karma table.
    pub async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS karma (
                user_id TEXT PRIMARY KEY,
                karma INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|error| StoreError::Migration(error.to_string()))?;

        Ok(())
    }

    /// Current karma for a user, 0 when the user has no entry yet.
    pub async fn get(&self, user_id: &UserId) -> Result<i64> {
        let total: Option<i64> = sqlx::query_scalar("SELECT karma FROM karma WHERE user_id = ?")
            .bind(user_id.as_ref())
            .fetch_optional(&self.pool)
            .await
            .context("failed to load karma")?;

        Ok(total.unwrap_or(0))
    }

    /// Apply a delta and return the new total. Creates the entry at 0 on
    /// first use; the increment happens inside the upsert.
    pub async fn apply_delta(&self, user_id: &UserId, delta: i64) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO karma (user_id, karma) VALUES (?, ?)
            ON CONFLICT(user_id) DO UPDATE SET karma = karma + excluded.karma
            RETURNING karma
            "#,
        )
        .bind(user_id.as_ref())
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .context("failed to apply karma delta")?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_store() -> KarmaStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite should connect");

        let store = KarmaStore::new(pool);
        store.initialize().await.expect("karma schema should be created");
        store
    }

    #[tokio::test]
    async fn unknown_user_reads_as_zero() {
        let store = setup_store().await;
        let user: UserId = "42".into();
        assert_eq!(store.get(&user).await.expect("get"), 0);
    }

    #[tokio::test]
    async fn deltas_accumulate_and_may_go_negative() {
        let store = setup_store().await;
        let user: UserId = "42".into();

        assert_eq!(store.apply_delta(&user, 2).await.expect("apply"), 2);
        assert_eq!(store.apply_delta(&user, -5).await.expect("apply"), -3);
        assert_eq!(store.get(&user).await.expect("get"), -3);
    }

    #[tokio::test]
    async fn concurrent_deltas_sum_regardless_of_interleaving() {
        let store = setup_store().await;
        let user: UserId = "42".into();

        let tasks: Vec<_> = [2i64, -1, 3]
            .into_iter()
            .map(|delta| {
                let store = store.clone();
                let user = user.clone();
                tokio::spawn(async move { store.apply_delta(&user, delta).await })
            })
            .collect();

        for task in tasks {
            task.await.expect("task should not panic").expect("delta should apply");
        }

        assert_eq!(store.get(&user).await.expect("get"), 4);
    }

    #[tokio::test]
    async fn users_are_keyed_independently() {
        let store = setup_store().await;
        let bob: UserId = "42".into();
        let carol: UserId = "43".into();

        store.apply_delta(&bob, 1).await.expect("apply");
        store.apply_delta(&carol, 7).await.expect("apply");

        assert_eq!(store.get(&bob).await.expect("get"), 1);
        assert_eq!(store.get(&carol).await.expect("get"), 7);
    }
}
