// ABOUTME: AI request orchestrator: admission gate, gateway call, metering
// ABOUTME: The one place that writes the usage ledger and the quota counter

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

use notewise_storage::{AiUsageLog, QuotaStorage, StorageError, UsageLogStorage};

use crate::action::AiAction;
use crate::error::{AiError, AiResult};
use crate::gateway::{CompletionGateway, DEFAULT_MODEL};
use crate::pricing::estimate_cost;
use crate::prompt::build_messages;

/// One AI invocation as requested by the boundary layer. Ephemeral.
#[derive(Debug)]
pub struct AiRequest {
    pub user_id: String,
    pub note_id: Option<String>,
    pub action: AiAction,
    pub prompt: Option<String>,
    pub context: Option<String>,
    pub model: Option<String>,
}

/// Generated text plus the accounting that was persisted for it.
#[derive(Debug)]
pub struct AiResponse {
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub model: String,
    pub cost_usd: f64,
}

/// Orchestrates one metered completion: quota gate, prompt build, upstream
/// call, cost computation, ledger append, quota increment.
pub struct AiService {
    gateway: CompletionGateway,
    quota_storage: Arc<QuotaStorage>,
    usage_storage: Arc<UsageLogStorage>,
    default_model: String,
}

impl AiService {
    pub fn new(
        gateway: CompletionGateway,
        quota_storage: Arc<QuotaStorage>,
        usage_storage: Arc<UsageLogStorage>,
    ) -> Self {
        Self {
            gateway,
            quota_storage,
            usage_storage,
            default_model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_default_model(mut self, model: String) -> Self {
        self.default_model = model;
        self
    }

    /// Run one invocation. Each step's failure short-circuits the rest; the
    /// ledger and quota counter are only touched after a successful upstream
    /// call, so a failed or timed-out call is never charged.
    ///
    /// Two concurrent invocations for a user just under the limit can both
    /// pass the admission check and push `tokens_used` past the cap by one
    /// invocation's worth. The increment itself is atomic; admission is
    /// deliberately best-effort rather than reserve-then-spend.
    pub async fn generate(&self, request: AiRequest) -> AiResult<AiResponse> {
        let quota = match self.quota_storage.get_quota(&request.user_id).await {
            Ok(quota) => quota,
            Err(StorageError::NotFound) => return Err(AiError::UserNotFound),
            Err(e) => return Err(AiError::Storage(e)),
        };

        if quota.is_exhausted() {
            info!(
                "Rejecting AI request for user {}: {} of {} tokens used",
                request.user_id, quota.tokens_used, quota.tokens_limit
            );
            return Err(AiError::QuotaExceeded);
        }

        let messages = build_messages(
            &request.action,
            request.prompt.as_deref(),
            request.context.as_deref(),
        );

        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.default_model)
            .to_string();

        let completion = self.gateway.complete(&model, &messages).await?;

        let cost = estimate_cost(completion.usage.total_tokens, &model);

        let log = AiUsageLog {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id.clone(),
            note_id: request.note_id.clone(),
            action: request.action.as_str().to_string(),
            prompt_tokens: completion.usage.prompt_tokens as i64,
            completion_tokens: completion.usage.completion_tokens as i64,
            total_tokens: completion.usage.total_tokens as i64,
            model: model.clone(),
            cost_usd: cost,
            created_at: Utc::now(),
        };

        // Quota correctness is the safety property here: a lost ledger row is
        // tolerable, an uncharged invocation is not. The increment runs even
        // if the ledger insert failed.
        if let Err(e) = self.usage_storage.create_log(&log).await {
            error!("Failed to record AI usage for user {}: {}", request.user_id, e);
        }

        self.quota_storage
            .increment_tokens(&request.user_id, completion.usage.total_tokens as i64)
            .await?;

        info!(
            "AI {} completed for user {}: {} tokens, ${:.6}",
            request.action.as_str(),
            request.user_id,
            completion.usage.total_tokens,
            cost
        );

        Ok(AiResponse {
            text: completion.text,
            prompt_tokens: completion.usage.prompt_tokens,
            completion_tokens: completion.usage.completion_tokens,
            total_tokens: completion.usage.total_tokens,
            model,
            cost_usd: cost,
        })
    }
}
