// ABOUTME: Notewise HTTP server entry point
// ABOUTME: Wires config, storage, and the AI service into an axum app

use std::net::SocketAddr;

use axum::http::Method;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use notewise_ai::CompletionGateway;
use notewise_api::{create_ai_router, DbState};

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "notewise-server"
    }))
}

fn build_cors() -> Result<CorsLayer, anyhow::Error> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    // A configured origin restricts the browser client; otherwise stay open
    // for local development.
    match notewise_config::cors_origin() {
        Some(origin) => Ok(cors.allow_origin(origin.parse::<axum::http::HeaderValue>()?)),
        None => Ok(cors.allow_origin(Any)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = notewise_config::api_port();
    let db_path = notewise_config::database_path();

    info!("Starting Notewise server on port {}", port);
    info!("Using database at {}", db_path.display());

    let pool = notewise_storage::db::connect(&db_path).await?;

    let api_key = notewise_config::openai_api_key();
    if api_key.is_none() {
        info!("OPENAI_API_KEY is not set; AI requests will be rejected");
    }

    let gateway = match notewise_config::openai_base_url() {
        Some(base_url) => CompletionGateway::with_base_url(api_key, base_url),
        None => CompletionGateway::new(api_key),
    };

    let default_model = notewise_config::openai_model();
    if let Some(model) = &default_model {
        info!("Default completion model overridden to {}", model);
    }

    let state = DbState::with_default_model(pool, gateway, default_model);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1/ai", create_ai_router())
        .with_state(state)
        .layer(build_cors()?)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
