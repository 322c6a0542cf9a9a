use schemars::JsonSchema;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum Verdict {
    #[serde(rename = "YTA")]
    Yta,
    #[serde(rename = "NTA")]
    Nta,
    #[default]
    #[serde(rename = "UNDECIDED")]
    Undecided,
}

impl Verdict {
    /// Badge text shown next to a verdict
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Yta => "The Asshole",
            Verdict::Nta => "Not The Asshole",
            Verdict::Undecided => "Undecided",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Yta => write!(f, "YTA"),
            Verdict::Nta => write!(f, "NTA"),
            Verdict::Undecided => write!(f, "UNDECIDED"),
        }
    }
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YTA" => Ok(Verdict::Yta),
            "NTA" => Ok(Verdict::Nta),
            "UNDECIDED" => Ok(Verdict::Undecided),
            _ => Err(format!("Unknown verdict: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Verdicts {
    /// Judgement of the person telling the story
    pub user: Verdict,
    /// Judgement of everyone else in the story
    pub others: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Analysis {
    pub content: String,
    pub verdicts: Verdicts,
}

impl Analysis {
    /// Stand-in for a personality whose completion call failed
    pub fn fallback(key: &str, error: &str) -> Self {
        Self {
            content: format!("Error getting {}'s perspective: {}", key, error),
            verdicts: Verdicts::default(),
        }
    }
}

/// Personality key -> analysis, in registry order.
///
/// Serializes as a JSON object whose key order follows the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    entries: Vec<(String, Analysis)>,
}

impl AnalysisResult {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append an entry; callers insert each key once, in registry order
    pub fn push(&mut self, key: impl Into<String>, analysis: Analysis) {
        self.entries.push((key.into(), analysis));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Analysis)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), a))
    }

    /// How many personalities gave each verdict about the narrator
    pub fn tally(&self) -> VerdictTally {
        let mut tally = VerdictTally::default();
        for (_, analysis) in &self.entries {
            match analysis.verdicts.user {
                Verdict::Yta => tally.yta += 1,
                Verdict::Nta => tally.nta += 1,
                Verdict::Undecided => tally.undecided += 1,
            }
        }
        tally
    }
}

// Lookups used by tests; callers otherwise walk the result with `iter`
#[cfg(test)]
impl AnalysisResult {
    pub fn get(&self, key: &str) -> Option<&Analysis> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, analysis)| analysis)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for AnalysisResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, analysis) in &self.entries {
            map.serialize_entry(key, analysis)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictTally {
    pub yta: usize,
    pub nta: usize,
    pub undecided: usize,
}
