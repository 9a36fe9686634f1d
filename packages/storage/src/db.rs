// ABOUTME: Database connection management and migrations
// ABOUTME: Provides the shared SQLite pool used by all storage layers

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{StorageError, StorageResult};

/// Open (and create if missing) the Notewise SQLite database at the given
/// path, apply connection pragmas, and run pending migrations.
pub async fn connect(database_path: &Path) -> StorageResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    let database_url = format!("sqlite:{}", database_path.display());

    debug!("Connecting to database: {}", database_url);

    let options = SqliteConnectOptions::from_str(&database_url)
        .map_err(StorageError::Sqlx)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    // Configure SQLite settings
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Apply pending schema migrations to an existing pool.
pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_creates_database_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notewise.db");

        let pool = connect(&path).await.unwrap();

        // Both tables from the migrations should exist
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'ai_usage_logs')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(count, 2);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notewise.db");

        let pool = connect(&path).await.unwrap();
        run_migrations(&pool).await.unwrap();
    }
}
