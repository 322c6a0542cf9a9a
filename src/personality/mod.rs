//! Personality registry: the fixed, ordered panel of perspectives a story is
//! judged by.
//!
//! Built once at startup and shared read-only across requests. Keys are the
//! response's JSON keys, so they are validated for uniqueness up front.

mod builtin;

pub use builtin::VERDICT_FORMAT;

use crate::error::RegistryError;
use builtin::BUILTIN_PERSONALITIES;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Personality {
    /// Stable identifier (e.g. "free_spirit")
    pub key: String,

    /// Human-readable name (e.g. "Free Spirit")
    pub name: String,

    /// System prompt fragment
    pub instruction: String,
}

impl Personality {
    pub fn new(key: impl Into<String>, instruction: impl Into<String>) -> Self {
        let key = key.into();
        let name = title_case(&key);
        Self {
            key,
            name,
            instruction: instruction.into(),
        }
    }

    pub fn with_name(
        key: impl Into<String>,
        name: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            instruction: instruction.into(),
        }
    }

    /// Full system prompt: the persona followed by the answer format
    pub fn system_prompt(&self) -> String {
        format!("{}\n\n{}", self.instruction.trim(), VERDICT_FORMAT.trim())
    }
}

/// "free_spirit" -> "Free Spirit"
pub fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone)]
pub struct PersonalityRegistry {
    entries: Vec<Personality>,
}

impl PersonalityRegistry {
    /// Build a registry, rejecting empty panels, empty keys and duplicates
    pub fn new(entries: Vec<Personality>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for (idx, personality) in entries.iter().enumerate() {
            if personality.key.trim().is_empty() {
                return Err(RegistryError::EmptyKey(idx));
            }
            if !seen.insert(personality.key.as_str()) {
                return Err(RegistryError::DuplicateKey(personality.key.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// The built-in ten-personality panel
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_PERSONALITIES
                .iter()
                .map(|(key, instruction)| Personality::new(*key, instruction.trim()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Result<&Personality, RegistryError> {
        self.entries
            .iter()
            .find(|p| p.key == key)
            .ok_or_else(|| RegistryError::NotFound(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Personality> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|p| p.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
