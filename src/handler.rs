//! Front door for analyze requests.
//!
//! Transport-agnostic: takes the raw request body and returns a status code
//! plus JSON body, so any HTTP layer (or the CLI) can sit on top.

use crate::error::{AnalyzeError, ConfigError, ValidationError};
use crate::parser::AnalysisResult;
use crate::runner::Orchestrator;
use crate::story::Story;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_SERVER_ERROR: u16 = 500;
pub const STATUS_GATEWAY_TIMEOUT: u16 = 504;

const GENERIC_FAILURE: &str = "Failed to analyze your story. Please try again.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub story: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: Value,
}

impl HandlerResponse {
    fn ok(body: Value) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    fn error(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": { "message": message.into(), "code": code } }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// `error.code` for error responses
    pub fn error_code(&self) -> Option<&str> {
        self.body.pointer("/error/code").and_then(Value::as_str)
    }
}

impl From<ValidationError> for HandlerResponse {
    fn from(e: ValidationError) -> Self {
        let code = match e {
            ValidationError::MissingStory => "MISSING_STORY",
            ValidationError::InvalidBody(_) => "INVALID_REQUEST",
        };
        HandlerResponse::error(STATUS_BAD_REQUEST, code, e.to_string())
    }
}

/// Parse and validate a raw `{ "story": ... }` body
pub fn parse_request(body: &str) -> Result<Story, ValidationError> {
    let request: AnalyzeRequest =
        serde_json::from_str(body).map_err(|e| ValidationError::InvalidBody(e.to_string()))?;
    Story::new(request.story.unwrap_or_default())
}

/// Handle a raw request body.
///
/// `orchestrator` is the startup result: a missing credential is reported
/// only once the request itself has been validated.
pub async fn handle_analyze(
    orchestrator: Result<&Orchestrator, &ConfigError>,
    body: &str,
) -> HandlerResponse {
    match parse_request(body) {
        Ok(story) => handle_story(orchestrator, &story).await,
        Err(e) => {
            warn!("Rejected analyze request: {}", e);
            e.into()
        }
    }
}

/// Handle an already-validated story
pub async fn handle_story(
    orchestrator: Result<&Orchestrator, &ConfigError>,
    story: &Story,
) -> HandlerResponse {
    let result = match analyze_story(orchestrator, story).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match serde_json::to_value(&result) {
        Ok(body) => HandlerResponse::ok(body),
        Err(e) => {
            error!("Failed to serialize analysis: {}", e);
            HandlerResponse::error(STATUS_SERVER_ERROR, "ANALYSIS_FAILED", GENERIC_FAILURE)
        }
    }
}

/// Run the analysis, mapping every request-level failure to its error
/// response
pub async fn analyze_story(
    orchestrator: Result<&Orchestrator, &ConfigError>,
    story: &Story,
) -> Result<AnalysisResult, HandlerResponse> {
    let orchestrator = match orchestrator {
        Ok(o) => o,
        Err(ConfigError::MissingApiKey) => {
            error!("OpenAI API key not configured");
            return Err(HandlerResponse::error(
                STATUS_SERVER_ERROR,
                "MISSING_API_KEY",
                "OpenAI API key not configured",
            ));
        }
        Err(e) => {
            error!("Service misconfigured: {}", e);
            return Err(HandlerResponse::error(
                STATUS_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "Service is not configured correctly",
            ));
        }
    };

    info!(
        "Analyzing story ({} chars) with {} personalities",
        story.as_str().chars().count(),
        orchestrator.registry().len()
    );

    orchestrator.analyze(story).await.map_err(|e| match e {
        AnalyzeError::TimedOut(_) => {
            error!("{}", e);
            HandlerResponse::error(
                STATUS_GATEWAY_TIMEOUT,
                "ANALYSIS_TIMEOUT",
                "Analysis took too long. Please try again.",
            )
        }
        _ => {
            error!("Analysis failed: {}", e);
            HandlerResponse::error(STATUS_SERVER_ERROR, "ANALYSIS_FAILED", GENERIC_FAILURE)
        }
    })
}
