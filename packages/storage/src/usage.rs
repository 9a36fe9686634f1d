// ABOUTME: AI usage ledger storage layer using SQLite
// ABOUTME: Append-only invocation records plus per-user aggregate queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{StorageError, StorageResult};

/// One completed AI invocation. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiUsageLog {
    pub id: String,
    pub user_id: String,
    pub note_id: Option<String>,
    pub action: String,
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
    pub model: String,
    pub cost_usd: f64,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over a user's ledger, independent of the live quota counter.
#[derive(Debug, Clone, Serialize)]
pub struct UsageTotals {
    #[serde(rename = "totalRequests")]
    pub total_requests: i64,
    #[serde(rename = "totalCost")]
    pub total_cost: f64,
}

pub struct UsageLogStorage {
    pool: SqlitePool,
}

impl UsageLogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one usage record to the ledger.
    pub async fn create_log(&self, log: &AiUsageLog) -> StorageResult<()> {
        let created_at_str = log.created_at.to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO ai_usage_logs (
                id, user_id, note_id, action,
                prompt_tokens, completion_tokens, total_tokens,
                model, cost_usd, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.id)
        .bind(&log.user_id)
        .bind(&log.note_id)
        .bind(&log.action)
        .bind(log.prompt_tokens)
        .bind(log.completion_tokens)
        .bind(log.total_tokens)
        .bind(&log.model)
        .bind(log.cost_usd)
        .bind(&created_at_str)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Request count and cost sum across a user's records.
    pub async fn user_totals(&self, user_id: &str) -> StorageResult<UsageTotals> {
        debug!("Fetching usage totals for user: {}", user_id);

        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) as total_requests,
                COALESCE(SUM(cost_usd), 0.0) as total_cost
            FROM ai_usage_logs
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(UsageTotals {
            total_requests: row.try_get("total_requests")?,
            total_cost: row.try_get("total_cost")?,
        })
    }

    /// List a user's usage records, newest first.
    pub async fn list_logs(
        &self,
        user_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> StorageResult<Vec<AiUsageLog>> {
        let limit = limit.unwrap_or(100);
        let offset = offset.unwrap_or(0);

        let rows = sqlx::query(
            r#"
            SELECT * FROM ai_usage_logs
            WHERE user_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| Self::row_to_log(row)).collect()
    }

    fn row_to_log(row: &sqlx::sqlite::SqliteRow) -> StorageResult<AiUsageLog> {
        let created_at_str: String = row.try_get("created_at").map_err(StorageError::Sqlx)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| {
                StorageError::Database(format!("Failed to parse created_at timestamp: {}", e))
            })?
            .with_timezone(&Utc);

        Ok(AiUsageLog {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            note_id: row.try_get("note_id")?,
            action: row.try_get("action")?,
            prompt_tokens: row.try_get("prompt_tokens")?,
            completion_tokens: row.try_get("completion_tokens")?,
            total_tokens: row.try_get("total_tokens")?,
            model: row.try_get("model")?,
            cost_usd: row.try_get("cost_usd")?,
            created_at,
        })
    }
}
