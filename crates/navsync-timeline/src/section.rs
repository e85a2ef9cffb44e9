//! A single content section.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Identifier of a section. Doubles as DOM element id and URL fragment, so it
/// may not be empty and may not contain `#` or whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Validates and wraps `id`.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidId` if `id` is empty or contains `#` or
    /// whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, TimelineError> {
        let id = id.into();
        if id.is_empty() || id.contains('#') || id.chars().any(char::is_whitespace) {
            return Err(TimelineError::InvalidId(id));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectionId {
    type Error = TimelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectionId> for String {
    fn from(value: SectionId) -> Self {
        value.0
    }
}

impl AsRef<str> for SectionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SectionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SectionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A section of the video timeline. Its end is derived from the next
/// section, see [`Sections::end_of`](crate::Sections::end_of).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    id: SectionId,
    start: f64,
}

impl Section {
    /// Creates a section starting at `start` seconds.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::InvalidStart` if `start` is negative, NaN or
    /// infinite.
    pub fn new(id: SectionId, start: f64) -> Result<Self, TimelineError> {
        if !start.is_finite() || start < 0.0 {
            return Err(TimelineError::InvalidStart {
                id: id.0,
                value: start.to_string(),
            });
        }
        Ok(Self { id, start })
    }

    /// The section identifier.
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Start time in seconds.
    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }
}
