use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    /// Chat-completion model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-attempt timeout for a single completion call
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    /// Deadline for a whole analyze request across all personalities
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,

    /// Max personality calls in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Replaces the built-in personality panel when set
    #[serde(default)]
    pub personalities: Option<Vec<PersonalityConfig>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PersonalityConfig {
    /// Stable identifier used as the response key (e.g. "free_spirit")
    pub key: String,

    /// Display name; derived from the key when omitted
    #[serde(default)]
    pub name: Option<String>,

    /// System prompt fragment describing this perspective
    pub instruction: String,
}
