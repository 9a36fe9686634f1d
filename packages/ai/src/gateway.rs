// ABOUTME: Completion gateway wrapping the OpenAI chat completions API
// ABOUTME: Request construction, timeout and error translation, usage extraction

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{AiError, AiResult};
use crate::prompt::ChatMessage;

const OPENAI_API_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Token accounting reported by the upstream API.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One completed upstream call: generated text plus accounting.
#[derive(Debug)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
}

/// Narrow wrapper around the OpenAI chat completions endpoint.
///
/// One client instance is shared across concurrent invocations; each call is
/// a self-contained request/response. No retries happen here.
pub struct CompletionGateway {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl CompletionGateway {
    fn create_client(timeout: Duration) -> Client {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client")
    }

    /// Create a gateway. A missing key is not an error until the first call,
    /// which fails with `AiError::Configuration`.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL.to_string())
    }

    /// Create a gateway against a custom base URL (self-hosted gateways, tests).
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        let timeout = Duration::from_secs(REQUEST_TIMEOUT_SECS);
        Self {
            client: Self::create_client(timeout),
            api_key,
            base_url,
            timeout,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::create_client(timeout);
        self.timeout = timeout;
        self
    }

    /// Run one chat completion with fixed temperature 0.7 and max 2000 output
    /// tokens. A 2xx response without usage accounting is an error: the caller
    /// cannot compute cost or update quota, and treating it as zero cost would
    /// undercharge silently.
    pub async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> AiResult<Completion> {
        let api_key = self.api_key.as_ref().ok_or(AiError::Configuration)?;

        let request = ChatCompletionRequest {
            model,
            messages,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };

        info!(
            "Making OpenAI completion request: model={}, messages={}",
            model,
            messages.len()
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, COMPLETIONS_PATH))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("OpenAI request timed out after {}s", self.timeout.as_secs());
                    AiError::Upstream(format!(
                        "Request timed out after {} seconds",
                        self.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    error!("Failed to connect to OpenAI: {}", e);
                    AiError::Upstream(format!("Connection failed: {}", e))
                } else {
                    error!("OpenAI request failed: {}", e);
                    AiError::Upstream(e.to_string())
                }
            })?;

        let status = response.status();
        info!("Received response from OpenAI: status={}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI API error: {} - {}", status, error_text);
            return Err(AiError::Upstream(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Upstream(format!("Failed to parse response: {}", e)))?;

        let usage = completion.usage.ok_or(AiError::IncompleteResponse)?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(Completion { text, usage })
    }
}
