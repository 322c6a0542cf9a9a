//! Fan-out orchestrator: one completion call per personality, merged into a
//! keyed result in registry order.
//!
//! Calls run concurrently on the request's task and are dropped together if
//! the request times out or is cancelled, so no partial result escapes.

use crate::error::{AnalyzeError, GatewayError};
use crate::parser::AnalysisResult;
use crate::personality::PersonalityRegistry;
use crate::provider::CompletionGateway;
use crate::story::Story;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use super::executor::{execute_personality, PersonalityOutcome};

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    /// Max personality calls in flight for one request
    pub concurrency: usize,

    /// Deadline for the whole fan-out
    pub request_timeout: Duration,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            concurrency: 10,
            request_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug)]
pub struct AnalysisReport {
    /// One outcome per personality, in registry order
    pub outcomes: Vec<PersonalityOutcome>,
    pub total_duration: Duration,
}

impl AnalysisReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn into_result(self) -> AnalysisResult {
        let mut result = AnalysisResult::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            result.push(outcome.key, outcome.analysis);
        }
        result
    }
}

pub struct Orchestrator {
    registry: Arc<PersonalityRegistry>,
    gateway: Arc<dyn CompletionGateway>,
    options: OrchestratorOptions,
}

impl Orchestrator {
    pub fn new(
        registry: Arc<PersonalityRegistry>,
        gateway: Arc<dyn CompletionGateway>,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            registry,
            gateway,
            options,
        }
    }

    pub fn registry(&self) -> &PersonalityRegistry {
        &self.registry
    }

    /// Judge a story with every personality
    pub async fn analyze(&self, story: &Story) -> Result<AnalysisResult, AnalyzeError> {
        Ok(self.run(story).await?.into_result())
    }

    /// Like [`analyze`](Self::analyze) but keeps per-personality status and timing
    pub async fn run(&self, story: &Story) -> Result<AnalysisReport, AnalyzeError> {
        let request_id = Uuid::new_v4();
        self.run_with_deadline(story)
            .instrument(info_span!("analyze", %request_id))
            .await
    }

    async fn run_with_deadline(&self, story: &Story) -> Result<AnalysisReport, AnalyzeError> {
        let start = std::time::Instant::now();
        let deadline = self.options.request_timeout;

        let outcomes = match tokio::time::timeout(deadline, self.fan_out(story)).await {
            Ok(outcomes) => outcomes?,
            Err(_) => {
                warn!("Analysis exceeded {:?}; discarding partial results", deadline);
                return Err(AnalyzeError::TimedOut(deadline));
            }
        };

        let report = AnalysisReport {
            outcomes,
            total_duration: start.elapsed(),
        };

        check_total_failure(&report)?;

        info!(
            "Completed in {:.1}s: {} personalities, {} failed",
            report.total_duration.as_secs_f64(),
            report.outcomes.len(),
            report.failed_count()
        );
        Ok(report)
    }

    async fn fan_out(&self, story: &Story) -> Result<Vec<PersonalityOutcome>, AnalyzeError> {
        let total = self.registry.len();
        let semaphore = Semaphore::new(self.options.concurrency.max(1));
        let gateway = self.gateway.as_ref();

        info!(
            "Running {} personalities via {} with concurrency {}",
            total,
            gateway.name(),
            self.options.concurrency
        );

        let mut futures = FuturesUnordered::new();
        for (idx, personality) in self.registry.iter().enumerate() {
            let semaphore = &semaphore;
            futures.push(async move {
                let _permit = semaphore.acquire().await?; // hold until done
                let outcome = execute_personality(gateway, personality, story).await;
                Ok::<_, AnalyzeError>((idx, outcome))
            });
        }

        // Each task owns exactly one slot, so completion order is irrelevant
        let mut slots: Vec<Option<PersonalityOutcome>> = (0..total).map(|_| None).collect();
        while let Some(result) = futures.next().await {
            let (idx, outcome) = result?;
            info!(
                "Completed {}: {} ({:?})",
                outcome.key, outcome.status, outcome.duration
            );
            slots[idx] = Some(outcome);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}

/// Every call failing for a reason that is not about any one personality
/// (bad credential, service unreachable) fails the request as a whole
fn check_total_failure(report: &AnalysisReport) -> Result<(), AnalyzeError> {
    let all_request_wide = report
        .outcomes
        .iter()
        .all(|o| o.error().is_some_and(GatewayError::is_request_wide));

    match report.outcomes.first().and_then(|o| o.error()) {
        Some(cause) if all_request_wide => Err(AnalyzeError::TotalFailure {
            attempted: report.outcomes.len(),
            cause: cause.clone(),
        }),
        _ => Ok(()),
    }
}
