// ABOUTME: AI completion proxy and quota metering core
// ABOUTME: Prompt building, OpenAI gateway, and the metered request orchestrator

pub mod action;
pub mod error;
pub mod gateway;
pub mod pricing;
pub mod prompt;
pub mod service;

pub use action::AiAction;
pub use error::{AiError, AiResult};
pub use gateway::{Completion, CompletionGateway, TokenUsage, DEFAULT_MODEL};
pub use prompt::{build_messages, ChatMessage};
pub use service::{AiRequest, AiResponse, AiService};
