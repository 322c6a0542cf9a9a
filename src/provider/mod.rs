mod openai;
mod retry;
#[cfg(test)]
pub mod scripted;
#[cfg(test)]
pub mod stub_server;

pub use openai::OpenAiGateway;

use crate::config::Config;
use crate::error::{ConfigError, GatewayError};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Text returned by one completion call
#[derive(Debug, Clone)]
pub struct RawCompletion {
    pub text: String,
    pub model: String,
    pub usage: Option<Usage>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Boundary around the external chat-completion service.
///
/// Implementations are shared across concurrent personality calls and
/// concurrent requests, and own any retry policy.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn complete(
        &self,
        system_instruction: &str,
        user_text: &str,
    ) -> Result<RawCompletion, GatewayError>;
}

/// Build the process-wide gateway, failing when no credential is available
pub fn create_gateway(
    config: &Config,
    api_key: Option<&str>,
) -> Result<Arc<dyn CompletionGateway>, ConfigError> {
    Ok(Arc::new(OpenAiGateway::from_config(config, api_key)?))
}
