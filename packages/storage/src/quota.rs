// ABOUTME: Per-user AI token quota storage layer using SQLite
// ABOUTME: Quota reads for the admission gate and the atomic post-completion increment

use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{StorageError, StorageResult};

/// Quota counters for one user.
///
/// `tokens_used` is monotonically non-decreasing and is only ever advanced
/// by [`QuotaStorage::increment_tokens`] after a completed invocation.
#[derive(Debug, Clone, Serialize)]
pub struct UserQuota {
    #[serde(rename = "tokensUsed")]
    pub tokens_used: i64,
    #[serde(rename = "tokensLimit")]
    pub tokens_limit: i64,
}

impl UserQuota {
    /// True once the cap is reached; further invocations must be rejected.
    pub fn is_exhausted(&self) -> bool {
        self.tokens_used >= self.tokens_limit
    }
}

pub struct QuotaStorage {
    pool: SqlitePool,
}

impl QuotaStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch quota counters for a user, or `StorageError::NotFound` if the
    /// user record is missing.
    pub async fn get_quota(&self, user_id: &str) -> StorageResult<UserQuota> {
        debug!("Fetching quota for user: {}", user_id);

        let row = sqlx::query("SELECT ai_tokens_used, ai_tokens_limit FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or(StorageError::NotFound)?;

        Ok(UserQuota {
            tokens_used: row.try_get("ai_tokens_used")?,
            tokens_limit: row.try_get("ai_tokens_limit")?,
        })
    }

    /// Atomically add `tokens` to the user's consumed counter.
    ///
    /// A single in-database increment, not a read-modify-write, so concurrent
    /// invocations for the same user cannot lose updates.
    pub async fn increment_tokens(&self, user_id: &str, tokens: i64) -> StorageResult<()> {
        debug!("Incrementing tokens for user {} by {}", user_id, tokens);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET ai_tokens_used = ai_tokens_used + ?, updated_at = datetime('now', 'utc')
            WHERE id = ?
            "#,
        )
        .bind(tokens)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
