// ABOUTME: Error taxonomy for the AI proxy core
// ABOUTME: Typed failures that the HTTP boundary maps to status codes

use notewise_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    /// No API key configured. Fatal and operator-facing, never retried.
    #[error("OpenAI API key not configured")]
    Configuration,

    /// The quota record for the requesting user is missing. The caller is
    /// assumed authenticated, so this means the record was removed out of band.
    #[error("User not found")]
    UserNotFound,

    /// The admission gate rejected the invocation before any upstream call.
    #[error("AI token limit exceeded. Please upgrade your plan.")]
    QuotaExceeded,

    /// Upstream returned HTTP 429. Transient; the client should retry later.
    #[error("OpenAI rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Upstream call succeeded but omitted token-usage accounting. Without
    /// it cost and quota cannot be computed, so the invocation is not charged.
    #[error("Failed to get token usage from OpenAI")]
    IncompleteResponse,

    /// Catch-all for any other upstream failure, message passed through.
    #[error("AI service error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AiResult<T> = Result<T, AiError>;
