//! Timeline error types.

use thiserror::Error;

/// Errors raised while building a [`Sections`](crate::Sections) timeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimelineError {
    /// No sections were supplied.
    #[error("timeline has no sections")]
    Empty,

    /// A section identifier cannot double as a URL fragment.
    #[error("invalid section id {0:?}")]
    InvalidId(String),

    /// Two sections share an identifier.
    #[error("duplicate section id {0:?}")]
    DuplicateId(String),

    /// A start attribute is not a finite, non-negative number of seconds.
    #[error("section {id:?} has invalid start {value:?}")]
    InvalidStart {
        /// The offending section.
        id: String,
        /// The raw attribute value.
        value: String,
    },

    /// Start times must be strictly increasing in document order.
    #[error("section {id:?} starts at {start}s, not after the previous section ({previous}s)")]
    NotIncreasing {
        /// The offending section.
        id: String,
        /// Its start time.
        start: f64,
        /// Start time of the section before it.
        previous: f64,
    },
}
