//! Shared test mocks and utilities for the video-synced carousel.

mod clock;
mod page;
mod player;

pub use clock::FixedClock;
pub use page::{HistoryEntry, RecordingPage};
pub use player::{
    FailingPlayer, NeverReadyPlayer, PlayerCall, ScriptedPlayer, StallingPlayer,
};
