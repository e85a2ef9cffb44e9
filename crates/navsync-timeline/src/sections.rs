//! The ordered, validated section timeline.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::TimelineError;
use crate::section::Section;

/// Ordered sections partitioning the video into `[start_i, start_{i+1})`
/// intervals, the last one unbounded.
///
/// Invariants (checked by [`Sections::new`]): at least one section, unique
/// ids, strictly increasing start times.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sections {
    sections: Vec<Section>,
}

impl Sections {
    /// Builds a timeline from sections in document order.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::Empty` for an empty list,
    /// `TimelineError::DuplicateId` if an id repeats and
    /// `TimelineError::NotIncreasing` if a start time does not exceed the
    /// previous one.
    pub fn new(sections: Vec<Section>) -> Result<Self, TimelineError> {
        if sections.is_empty() {
            return Err(TimelineError::Empty);
        }

        let mut seen = HashSet::with_capacity(sections.len());
        for section in &sections {
            if !seen.insert(section.id().as_str()) {
                return Err(TimelineError::DuplicateId(section.id().to_string()));
            }
        }

        for pair in sections.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.start() <= previous.start() {
                return Err(TimelineError::NotIncreasing {
                    id: current.id().to_string(),
                    start: current.start(),
                    previous: previous.start(),
                });
            }
        }

        Ok(Self { sections })
    }

    /// Number of sections (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Sections in timeline order.
    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// The section at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// The first section of the timeline.
    #[must_use]
    pub fn first(&self) -> &Section {
        &self.sections[0]
    }

    /// Position of the section named `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id() == id)
    }

    /// The section named `id`.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&Section> {
        self.position(id).map(|index| &self.sections[index])
    }

    /// End of the section at `index`: the next section's start, or `None`
    /// when it is the last (unbounded) section or `index` is out of range.
    #[must_use]
    pub fn end_of(&self, index: usize) -> Option<f64> {
        self.sections.get(index + 1).map(Section::start)
    }

    /// The section whose interval contains `seconds`.
    ///
    /// Returns `None` before the first section's start and for NaN.
    #[must_use]
    pub fn resolve_time(&self, seconds: f64) -> Option<&Section> {
        if seconds.is_nan() || seconds < self.first().start() {
            return None;
        }
        let after = self.sections.partition_point(|s| s.start() <= seconds);
        self.sections.get(after - 1)
    }

    /// Resolves a URL fragment (with or without its leading `#`).
    ///
    /// An exact id match wins; otherwise a plain decimal number is read as an
    /// index into the timeline, so index-based deep links keep working.
    #[must_use]
    pub fn resolve_fragment(&self, fragment: &str) -> Option<&Section> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        if fragment.is_empty() {
            return None;
        }
        if let Some(section) = self.by_id(fragment) {
            return Some(section);
        }
        if !fragment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        fragment
            .parse::<usize>()
            .ok()
            .and_then(|index| self.sections.get(index))
    }

    /// The configured default section, falling back to the first one.
    #[must_use]
    pub fn default_section(&self, default_id: &str) -> &Section {
        self.by_id(default_id).unwrap_or_else(|| self.first())
    }
}

impl<'a> IntoIterator for &'a Sections {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
