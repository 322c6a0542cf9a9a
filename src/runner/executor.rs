use crate::error::GatewayError;
use crate::parser::{parse_analysis, Analysis};
use crate::personality::Personality;
use crate::provider::CompletionGateway;
use crate::story::Story;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct PersonalityOutcome {
    pub key: String,
    pub status: PersonalityStatus,
    /// Parsed analysis, or the fallback when the call failed
    pub analysis: Analysis,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PersonalityStatus {
    Completed,
    Failed { error: GatewayError },
}

impl PersonalityOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PersonalityStatus::Failed { .. })
    }

    pub fn error(&self) -> Option<&GatewayError> {
        match &self.status {
            PersonalityStatus::Failed { error } => Some(error),
            PersonalityStatus::Completed => None,
        }
    }
}

impl std::fmt::Display for PersonalityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersonalityStatus::Completed => write!(f, "completed"),
            PersonalityStatus::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// Run one personality against the story; never fails, failures become the
/// fallback analysis
pub async fn execute_personality(
    gateway: &dyn CompletionGateway,
    personality: &Personality,
    story: &Story,
) -> PersonalityOutcome {
    let start = std::time::Instant::now();
    let system_prompt = personality.system_prompt();

    match gateway.complete(&system_prompt, story.as_str()).await {
        Ok(completion) => {
            debug!(
                "Personality {} answered in {:?}",
                personality.key, completion.duration
            );
            PersonalityOutcome {
                key: personality.key.clone(),
                status: PersonalityStatus::Completed,
                analysis: parse_analysis(&completion.text, &personality.key),
                duration: start.elapsed(),
            }
        }
        Err(e) => {
            warn!("Personality {} failed: {}", personality.key, e);
            PersonalityOutcome {
                key: personality.key.clone(),
                analysis: Analysis::fallback(&personality.key, &e.to_string()),
                status: PersonalityStatus::Failed { error: e },
                duration: start.elapsed(),
            }
        }
    }
}
