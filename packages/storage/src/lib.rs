// ABOUTME: Data layer and persistence for Notewise
// ABOUTME: SQLite-backed quota counters and AI usage ledger

pub mod db;
pub mod quota;
pub mod usage;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
}

pub type StorageResult<T> = Result<T, StorageError>;

pub use quota::{QuotaStorage, UserQuota};
pub use usage::{AiUsageLog, UsageLogStorage, UsageTotals};
