// ABOUTME: Shared state for API handlers
// ABOUTME: Owns the SQLite pool, storage layers, and the AI service

use std::sync::Arc;

use sqlx::SqlitePool;

use notewise_ai::{AiService, CompletionGateway};
use notewise_storage::{QuotaStorage, UsageLogStorage};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub quota_storage: Arc<QuotaStorage>,
    pub usage_storage: Arc<UsageLogStorage>,
    pub ai_service: Arc<AiService>,
}

impl DbState {
    /// Create new state from a SQLite pool and a configured completion gateway.
    pub fn new(pool: SqlitePool, gateway: CompletionGateway) -> Self {
        Self::with_default_model(pool, gateway, None)
    }

    /// Same as [`DbState::new`], with an optional override for the default
    /// completion model.
    pub fn with_default_model(
        pool: SqlitePool,
        gateway: CompletionGateway,
        default_model: Option<String>,
    ) -> Self {
        let quota_storage = Arc::new(QuotaStorage::new(pool.clone()));
        let usage_storage = Arc::new(UsageLogStorage::new(pool.clone()));

        let mut ai_service = AiService::new(gateway, quota_storage.clone(), usage_storage.clone());
        if let Some(model) = default_model {
            ai_service = ai_service.with_default_model(model);
        }
        let ai_service = Arc::new(ai_service);

        Self {
            pool,
            quota_storage,
            usage_storage,
            ai_service,
        }
    }
}
