//! In-memory gateway for tests: answers by personality key, with optional
//! forced failures and delays.

use super::{CompletionGateway, RawCompletion};
use crate::error::GatewayError;
use crate::personality::{Personality, PersonalityRegistry};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const PERSONA_PREFIX: &str = "persona:";

/// Registry whose instructions let the scripted gateway recover the key
pub fn scripted_registry(keys: &[&str]) -> PersonalityRegistry {
    PersonalityRegistry::new(
        keys.iter()
            .map(|key| Personality::new(*key, format!("{PERSONA_PREFIX}{key}")))
            .collect(),
    )
    .unwrap()
}

#[derive(Default)]
pub struct ScriptedGateway {
    failures: HashMap<String, GatewayError>,
    fail_all: Option<GatewayError>,
    delays: HashMap<String, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, key: &str, error: GatewayError) -> Self {
        self.failures.insert(key.to_string(), error);
        self
    }

    pub fn failing_all(mut self, error: GatewayError) -> Self {
        self.fail_all = Some(error);
        self
    }

    pub fn delayed(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn reply_for(key: &str) -> String {
        format!("[USER: YTA]\n[OTHERS: NTA]\n{key} weighs in.")
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(
        &self,
        system_instruction: &str,
        _user_text: &str,
    ) -> Result<RawCompletion, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let key = system_instruction
            .lines()
            .next()
            .and_then(|line| line.strip_prefix(PERSONA_PREFIX))
            .unwrap_or_default()
            .to_string();

        let delay = self.delays.get(&key).copied().unwrap_or(self.default_delay);
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.fail_all.clone().or_else(|| self.failures.get(&key).cloned()) {
            return Err(error);
        }

        Ok(RawCompletion {
            text: Self::reply_for(&key),
            model: "scripted".to_string(),
            usage: None,
            duration: delay,
        })
    }
}
