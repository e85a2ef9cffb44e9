//! Video player capability.
//!
//! The synchronization logic never talks to a concrete embed. Anything that
//! can report readiness, play, pause, seek and publish periodic playback
//! ticks can drive the carousel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PlayerError;

/// A periodic playback-position notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackTick {
    /// Elapsed playback time, in seconds.
    pub seconds: f64,
}

/// Callback invoked for every playback tick.
pub type TimeUpdateListener = Box<dyn Fn(PlaybackTick) + Send + Sync>;

/// Black-box video player.
#[async_trait]
pub trait Player: Send + Sync {
    /// Resolves once the player can accept commands.
    async fn ready(&self) -> Result<(), PlayerError>;

    /// Starts or resumes playback.
    async fn play(&self) -> Result<(), PlayerError>;

    /// Pauses playback.
    async fn pause(&self) -> Result<(), PlayerError>;

    /// Whether playback is currently paused.
    async fn is_paused(&self) -> Result<bool, PlayerError>;

    /// Current playback position, in seconds.
    async fn current_time(&self) -> Result<f64, PlayerError>;

    /// Seeks to `seconds`.
    async fn set_current_time(&self, seconds: f64) -> Result<(), PlayerError>;

    /// Registers a listener for playback ticks. Listeners stay registered for
    /// the lifetime of the player.
    fn subscribe_time_updates(&self, listener: TimeUpdateListener);
}
