use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("OPENAI_API_KEY is not set (pass --api-key or add it to .env)")]
    MissingApiKey,

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Personality registry error: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Personality registry is empty")]
    Empty,

    #[error("Personality at position {0} has an empty key")]
    EmptyKey(usize),

    #[error("Duplicate personality key '{0}'")]
    DuplicateKey(String),

    #[error("Unknown personality '{0}'")]
    NotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication failed (status {status}): {message}")]
    Authentication { status: u16, message: String },

    #[error("Upstream error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),
}

impl GatewayError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Authentication { .. } => false,
            GatewayError::Upstream { status, .. } => {
                matches!(status, 408 | 409 | 429) || *status >= 500
            }
            GatewayError::Timeout(_) | GatewayError::Network(_) => true,
        }
    }

    /// Failures that say nothing about one personality and everything about
    /// the service as a whole.
    pub fn is_request_wide(&self) -> bool {
        matches!(
            self,
            GatewayError::Authentication { .. } | GatewayError::Network(_)
        )
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Story is required")]
    MissingStory,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("All {attempted} personality calls failed: {cause}")]
    TotalFailure {
        attempted: usize,
        #[source]
        cause: GatewayError,
    },

    #[error("Analysis did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),
}
