use crate::error::ValidationError;

/// A validated, non-blank story submitted for judgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story(String);

impl Story {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::MissingStory);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Story {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
