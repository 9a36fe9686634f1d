// ABOUTME: HTTP request handlers for the AI assist endpoints
// ABOUTME: One handler per action plus the per-user usage stats read

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use notewise_ai::{AiAction, AiRequest};
use notewise_storage::StorageError;

use crate::auth::CurrentUser;
use crate::response::{ai_error_response, storage_error_response, ApiResponse};
use crate::state::DbState;

async fn run_ai_request(
    db: &DbState,
    request: AiRequest,
    success_message: &str,
) -> axum::response::Response {
    match db.ai_service.generate(request).await {
        Ok(response) => Json(ApiResponse::success(
            json!({ "content": response.text }),
            success_message,
        ))
        .into_response(),
        Err(e) => ai_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub context: Option<String>,
    #[serde(rename = "noteId")]
    pub note_id: Option<String>,
    pub model: Option<String>,
}

/// Generate new content from a caller-supplied prompt
pub async fn handle_generate(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(body): Json<GenerateRequest>,
) -> impl IntoResponse {
    info!("AI generate request from user {}", current_user.id);

    let request = AiRequest {
        user_id: current_user.id,
        note_id: body.note_id,
        action: AiAction::Generate,
        prompt: Some(body.prompt),
        context: body.context,
        model: body.model,
    };

    run_ai_request(&db, request, "Content generated successfully").await
}

#[derive(Deserialize)]
pub struct ImproveRequest {
    pub text: String,
    #[serde(rename = "noteId")]
    pub note_id: Option<String>,
}

/// Improve the supplied text
pub async fn handle_improve(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(body): Json<ImproveRequest>,
) -> impl IntoResponse {
    info!("AI improve request from user {}", current_user.id);

    let request = AiRequest {
        user_id: current_user.id,
        note_id: body.note_id,
        action: AiAction::Improve,
        prompt: None,
        context: Some(body.text),
        model: None,
    };

    run_ai_request(&db, request, "Text improved successfully").await
}

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub text: String,
    #[serde(rename = "noteId")]
    pub note_id: Option<String>,
}

/// Summarize the supplied text
pub async fn handle_summarize(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(body): Json<SummarizeRequest>,
) -> impl IntoResponse {
    info!("AI summarize request from user {}", current_user.id);

    let request = AiRequest {
        user_id: current_user.id,
        note_id: body.note_id,
        action: AiAction::Summarize,
        prompt: None,
        context: Some(body.text),
        model: None,
    };

    run_ai_request(&db, request, "Text summarized successfully").await
}

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
    #[serde(rename = "noteId")]
    pub note_id: Option<String>,
}

/// Translate the supplied text to the requested language
pub async fn handle_translate(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(body): Json<TranslateRequest>,
) -> impl IntoResponse {
    info!("AI translate request from user {}", current_user.id);

    let request = AiRequest {
        user_id: current_user.id,
        note_id: body.note_id,
        action: AiAction::Translate {
            target_language: body.target_language,
        },
        prompt: None,
        context: Some(body.text),
        model: None,
    };

    run_ai_request(&db, request, "Text translated successfully").await
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub context: Option<String>,
    #[serde(rename = "noteId")]
    pub note_id: Option<String>,
}

/// Answer a question, optionally against note context
pub async fn handle_answer(
    State(db): State<DbState>,
    current_user: CurrentUser,
    Json(body): Json<AnswerRequest>,
) -> impl IntoResponse {
    info!("AI answer request from user {}", current_user.id);

    let request = AiRequest {
        user_id: current_user.id,
        note_id: body.note_id,
        action: AiAction::Answer,
        prompt: Some(body.question),
        context: body.context,
        model: None,
    };

    run_ai_request(&db, request, "Question answered successfully").await
}

/// Per-user AI usage stats: live quota counters plus ledger aggregates
pub async fn get_usage_stats(
    State(db): State<DbState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    info!("AI usage stats request from user {}", current_user.id);

    // A user without a quota record reads as zero usage, matching the
    // behavior of the account endpoints.
    let (tokens_used, tokens_limit) = match db.quota_storage.get_quota(&current_user.id).await {
        Ok(quota) => (quota.tokens_used, quota.tokens_limit),
        Err(StorageError::NotFound) => (0, 0),
        Err(e) => {
            error!("Failed to read quota for user {}: {}", current_user.id, e);
            return storage_error_response(e);
        }
    };

    let totals = match db.usage_storage.user_totals(&current_user.id).await {
        Ok(totals) => totals,
        Err(e) => {
            error!(
                "Failed to read usage totals for user {}: {}",
                current_user.id, e
            );
            return storage_error_response(e);
        }
    };

    Json(ApiResponse::success(
        json!({
            "tokensUsed": tokens_used,
            "tokensLimit": tokens_limit,
            "totalRequests": totals.total_requests,
            "totalCost": totals.total_cost,
        }),
        "AI usage stats retrieved",
    ))
    .into_response()
}
