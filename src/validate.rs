//! Input validation. Rejects text outside the length bounds before the
//! pipeline ever sees it; the validated value is immutable afterwards.

use crate::error::ValidationError;

pub const MIN_CHARS: usize = 10;
pub const MAX_CHARS: usize = 2000;

/// A validated legal-text snippet. Trimmed, non-blank, 10–2000 chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalText(String);

impl LegalText {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Blank);
        }
        let n = trimmed.chars().count();
        if n < MIN_CHARS {
            return Err(ValidationError::TooShort { chars: n, min: MIN_CHARS });
        }
        if n > MAX_CHARS {
            return Err(ValidationError::TooLong { chars: n, max: MAX_CHARS });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-separated token count; the `word_count` of the response.
    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }
}

impl std::fmt::Display for LegalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
