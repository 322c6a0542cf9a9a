use super::retry::retry_with_backoff;
use super::{CompletionGateway, RawCompletion, Usage};
use crate::config::{Config, RetryConfig};
use crate::error::{ConfigError, GatewayError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenAI chat-completions client.
///
/// Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_base: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    retry: RetryConfig,
}

impl OpenAiGateway {
    pub fn from_config(config: &Config, api_key: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ConfigError::InvalidApiKey(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
            retry: config.retry.clone(),
        })
    }

    /// Single-attempt variant with its own timeout and token cap, for probes
    pub fn probe(mut self, timeout: Duration, max_tokens: u32) -> Self {
        self.timeout = timeout;
        self.max_tokens = max_tokens;
        self.retry.max_attempts = 1;
        self
    }

    fn build_request<'a>(&'a self, system_instruction: &'a str, user_text: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !system_instruction.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system_instruction,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user_text,
        });

        ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    async fn attempt(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<RawCompletion, GatewayError> {
        let request = self.build_request(system_instruction, user_text);
        let start = std::time::Instant::now();

        let call = async {
            let response = self
                .client
                .post(format!("{}/chat/completions", self.api_base))
                .json(&request)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        let (status, body) = tokio_timeout(self.timeout, call)
            .await
            .map_err(|_| GatewayError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(self.timeout)
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        if !(200..300).contains(&status) {
            return Err(classify_status(status, &body));
        }

        let (text, model, usage) = parse_chat_response(&body).map_err(|message| {
            GatewayError::Upstream {
                status,
                message: format!("malformed response: {}", message),
            }
        })?;

        Ok(RawCompletion {
            text,
            model: model.unwrap_or_else(|| self.model.clone()),
            usage,
            duration: start.elapsed(),
        })
    }
}

#[async_trait]
impl CompletionGateway for OpenAiGateway {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<RawCompletion, GatewayError> {
        let completion = retry_with_backoff(
            &self.retry,
            || self.attempt(system_instruction, user_text),
            GatewayError::is_retryable,
        )
        .await?;

        debug!(
            "Completion from {} in {:?} (usage: {:?})",
            completion.model, completion.duration, completion.usage
        );
        Ok(completion)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

type ParsedResponse = (String, Option<String>, Option<Usage>);

fn parse_chat_response(body: &str) -> Result<ParsedResponse, String> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;

    let text = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| "response contained no choices".to_string())?
        .message
        .content
        .unwrap_or_default();

    let usage = response.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok((text, response.model, usage))
}

/// Map a non-2xx response onto the gateway error taxonomy
fn classify_status(status: u16, body: &str) -> GatewayError {
    let message = extract_error_message(body);
    match status {
        401 | 403 => GatewayError::Authentication { status, message },
        _ => GatewayError::Upstream { status, message },
    }
}

/// OpenAI errors look like `{"error": {"message": "..."}}`; anything else is
/// passed through as-is
fn extract_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorEnvelope {
        error: ErrorBody,
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
