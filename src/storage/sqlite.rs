//! SQLite-backed key-value store.
//!
//! The pool is configured with:
//! - WAL mode enabled for concurrent access
//! - Automatic database file creation
//! - Schema migrations embedded from `migrations/`

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use super::kv::{KvStore, Namespace};
use crate::error_handling::StoreError;

/// Runs the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Key-value store persisted in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// Opens (creating if needed) the database at `db_path` and migrates it.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to open database {}: {e}", db_path.display());
                StoreError::Sql(e)
            })?;
        run_migrations(&pool).await?;
        info!("Opened store at {}", db_path.display());
        Ok(Self { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// Limited to a single connection: every SQLite in-memory connection is a
    /// separate database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    async fn get(&self, ns: Namespace, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_entries WHERE namespace = ? AND key = ?")
                .bind(ns.as_str())
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    async fn put(&self, ns: Namespace, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv_entries (namespace, key, value, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(namespace, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(ns.as_str())
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
