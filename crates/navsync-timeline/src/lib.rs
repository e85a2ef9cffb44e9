//! Navsync Timeline — the partition of a video into content sections.
//!
//! Sections are parsed once from page markup and never change afterwards.
//! Each section stores only its start time; its end is the next section's
//! start (or unbounded for the last one).

pub mod error;
pub mod markup;
pub mod section;
pub mod sections;

pub use error::TimelineError;
pub use section::{Section, SectionId};
pub use sections::Sections;
