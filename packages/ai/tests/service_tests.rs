// ABOUTME: Orchestrator tests covering the admission gate and charge-on-success metering
// ABOUTME: In-memory SQLite for quota/ledger, wiremock for the upstream API

use std::sync::Arc;

use serde_json::json;
use sqlx::SqlitePool;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notewise_ai::{AiAction, AiError, AiRequest, AiService, CompletionGateway};
use notewise_storage::{QuotaStorage, UsageLogStorage};

async fn setup_test_db(tokens_used: i64, tokens_limit: i64) -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();

    sqlx::query(
        r#"
        CREATE TABLE users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            ai_tokens_used INTEGER NOT NULL DEFAULT 0,
            ai_tokens_limit INTEGER NOT NULL DEFAULT 100000,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'utc')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'utc'))
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        r#"
        CREATE TABLE ai_usage_logs (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            note_id TEXT,
            action TEXT NOT NULL,
            prompt_tokens INTEGER NOT NULL,
            completion_tokens INTEGER NOT NULL,
            total_tokens INTEGER NOT NULL,
            model TEXT NOT NULL,
            cost_usd REAL NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO users (id, email, name, ai_tokens_used, ai_tokens_limit) VALUES ('test-user', 'test@example.com', 'Test User', ?, ?)")
        .bind(tokens_used)
        .bind(tokens_limit)
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn service_for(pool: &SqlitePool, server: &MockServer) -> AiService {
    let gateway = CompletionGateway::with_base_url(Some("test-key".to_string()), server.uri());
    AiService::new(
        gateway,
        Arc::new(QuotaStorage::new(pool.clone())),
        Arc::new(UsageLogStorage::new(pool.clone())),
    )
}

fn generate_request(prompt: &str) -> AiRequest {
    AiRequest {
        user_id: "test-user".to_string(),
        note_id: None,
        action: AiAction::Generate,
        prompt: Some(prompt.to_string()),
        context: None,
        model: None,
    }
}

fn completion_body(content: &str, prompt_tokens: u32, completion_tokens: u32) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": prompt_tokens + completion_tokens
        }
    })
}

async fn tokens_used(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT ai_tokens_used FROM users WHERE id = 'test-user'")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn ledger_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM ai_usage_logs")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_successful_generate_charges_and_records() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("generated", 20, 30)))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let response = service.generate(generate_request("hello")).await.unwrap();

    assert_eq!(response.text, "generated");
    assert_eq!(response.total_tokens, 50);
    assert_eq!(response.model, "gpt-4o-mini");

    assert_eq!(tokens_used(&pool).await, 50);
    assert_eq!(ledger_count(&pool).await, 1);

    let (action, total, model): (String, i64, String) = sqlx::query_as(
        "SELECT action, total_tokens, model FROM ai_usage_logs WHERE user_id = 'test-user'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(action, "generate");
    assert_eq!(total, 50);
    assert_eq!(model, "gpt-4o-mini");
}

#[tokio::test]
async fn test_exhausted_quota_rejects_without_upstream_call() {
    let pool = setup_test_db(1000, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("x", 1, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let result = service.generate(generate_request("hello")).await;

    assert!(matches!(result, Err(AiError::QuotaExceeded)));
    assert_eq!(tokens_used(&pool).await, 1000);
    assert_eq!(ledger_count(&pool).await, 0);
}

#[tokio::test]
async fn test_over_limit_quota_also_rejects() {
    let pool = setup_test_db(1200, 1000).await;
    let server = MockServer::start().await;

    let service = service_for(&pool, &server);
    let result = service.generate(generate_request("hello")).await;

    assert!(matches!(result, Err(AiError::QuotaExceeded)));
}

#[tokio::test]
async fn test_missing_user_is_user_not_found() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    let service = service_for(&pool, &server);
    let mut request = generate_request("hello");
    request.user_id = "deleted-user".to_string();

    let result = service.generate(request).await;

    assert!(matches!(result, Err(AiError::UserNotFound)));
}

#[tokio::test]
async fn test_rate_limited_upstream_is_not_charged() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let result = service.generate(generate_request("hello")).await;

    assert!(matches!(result, Err(AiError::RateLimited)));
    assert_eq!(tokens_used(&pool).await, 0);
    assert_eq!(ledger_count(&pool).await, 0);
}

#[tokio::test]
async fn test_upstream_failure_is_not_charged() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let result = service.generate(generate_request("hello")).await;

    assert!(matches!(result, Err(AiError::Upstream(_))));
    assert_eq!(tokens_used(&pool).await, 0);
    assert_eq!(ledger_count(&pool).await, 0);
}

#[tokio::test]
async fn test_missing_usage_accounting_is_not_charged() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    let body = json!({
        "id": "chatcmpl-123",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": "hi" } }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let result = service.generate(generate_request("hello")).await;

    assert!(matches!(result, Err(AiError::IncompleteResponse)));
    assert_eq!(tokens_used(&pool).await, 0);
    assert_eq!(ledger_count(&pool).await, 0);
}

#[tokio::test]
async fn test_quota_accumulates_across_invocations() {
    let pool = setup_test_db(0, 10_000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("a", 10, 15)))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    for _ in 0..3 {
        service.generate(generate_request("hello")).await.unwrap();
    }

    assert_eq!(tokens_used(&pool).await, 75);
    assert_eq!(ledger_count(&pool).await, 3);
}

#[tokio::test]
async fn test_model_override_drives_cost_rate() {
    let pool = setup_test_db(0, 10_000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("a", 500, 500)))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let mut request = generate_request("hello");
    request.model = Some("gpt-4o".to_string());

    let response = service.generate(request).await.unwrap();

    assert_eq!(response.model, "gpt-4o");
    // 1000 tokens at 0.005 per 1k
    assert!((response.cost_usd - 0.005).abs() < 1e-9);

    let cost: f64 = sqlx::query_scalar("SELECT cost_usd FROM ai_usage_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert!((cost - 0.005).abs() < 1e-9);
}

#[tokio::test]
async fn test_note_reference_lands_in_ledger() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok", 5, 5)))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let mut request = generate_request("hello");
    request.note_id = Some("note-42".to_string());

    service.generate(request).await.unwrap();

    let note_id: Option<String> = sqlx::query_scalar("SELECT note_id FROM ai_usage_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(note_id.as_deref(), Some("note-42"));
}

#[tokio::test]
async fn test_translate_action_is_recorded_by_name() {
    let pool = setup_test_db(0, 1000).await;
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello", 8, 2)))
        .mount(&server)
        .await;

    let service = service_for(&pool, &server);
    let request = AiRequest {
        user_id: "test-user".to_string(),
        note_id: None,
        action: AiAction::Translate {
            target_language: "English".to_string(),
        },
        prompt: None,
        context: Some("Hola".to_string()),
        model: None,
    };

    service.generate(request).await.unwrap();

    let action: String = sqlx::query_scalar("SELECT action FROM ai_usage_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(action, "translate");
}
