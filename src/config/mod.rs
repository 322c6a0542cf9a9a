mod defaults;
mod types;

pub use defaults::default_config_path;
pub use types::*;

use crate::error::ConfigError;
use crate::personality::{Personality, PersonalityRegistry};
use defaults::*;
use std::path::Path;
use std::time::Duration;

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base: default_api_base(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_sec: default_timeout_sec(),
            request_timeout_sec: default_request_timeout_sec(),
            concurrency: default_concurrency(),
            retry: RetryConfig::default(),
            personalities: None,
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file when it exists, fall back to defaults otherwise.
    ///
    /// An explicitly requested path must exist.
    pub fn load_or_default(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        if explicit || path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.backoff_base_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_base_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.timeout_sec == 0 || self.request_timeout_sec == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_sec",
                reason: "timeouts must be non-zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                reason: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }

        // Surface registry problems at startup rather than per request
        self.registry()?;
        Ok(())
    }

    /// Build the personality registry, from the config or the built-in panel
    pub fn registry(&self) -> Result<PersonalityRegistry, ConfigError> {
        let registry = match &self.personalities {
            Some(entries) => PersonalityRegistry::new(
                entries
                    .iter()
                    .map(|p| match &p.name {
                        Some(name) => Personality::with_name(&p.key, name, &p.instruction),
                        None => Personality::new(&p.key, &p.instruction),
                    })
                    .collect(),
            )?,
            None => PersonalityRegistry::builtin(),
        };
        Ok(registry)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_sec)
    }
}
