//! Test players — mock `Player` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use navsync_core::error::PlayerError;
use navsync_core::player::{PlaybackTick, Player, TimeUpdateListener};

/// A state-changing call made on a [`ScriptedPlayer`]. Status queries
/// (`is_paused`, `current_time`) are not recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCall {
    /// `ready()`
    Ready,
    /// `play()`
    Play,
    /// `pause()`
    Pause,
    /// `set_current_time(seconds)`
    Seek(f64),
}

impl PlayerCall {
    fn operation(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Seek(_) => "seek",
        }
    }
}

#[derive(Default)]
struct Script {
    paused: bool,
    position: f64,
    calls: Vec<PlayerCall>,
    failures: Vec<PlayerCall>,
    listeners: Vec<TimeUpdateListener>,
}

/// An in-memory player that records calls, resolves every command
/// immediately and rejects the calls it was told to fail.
pub struct ScriptedPlayer {
    script: Mutex<Script>,
}

impl std::fmt::Debug for ScriptedPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let script = self.script.lock().unwrap();
        f.debug_struct("ScriptedPlayer")
            .field("paused", &script.paused)
            .field("position", &script.position)
            .field("calls", &script.calls)
            .finish_non_exhaustive()
    }
}

impl ScriptedPlayer {
    fn with_paused(paused: bool) -> Self {
        Self {
            script: Mutex::new(Script {
                paused,
                ..Script::default()
            }),
        }
    }

    /// A player whose playback is running.
    #[must_use]
    pub fn playing() -> Self {
        Self::with_paused(false)
    }

    /// A player whose playback is paused.
    #[must_use]
    pub fn paused() -> Self {
        Self::with_paused(true)
    }

    /// Rejects `call` whenever it is made. The rejected call is still
    /// recorded.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn failing_on(self, call: PlayerCall) -> Self {
        self.script.lock().unwrap().failures.push(call);
        self
    }

    /// Calls made so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<PlayerCall> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Forgets the recorded calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear_calls(&self) {
        self.script.lock().unwrap().calls.clear();
    }

    /// Whether playback is currently paused.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn is_paused_now(&self) -> bool {
        self.script.lock().unwrap().paused
    }

    /// Moves the playhead and notifies every listener, as the real player
    /// does on its periodic time update.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn emit_tick(&self, seconds: f64) {
        let mut script = self.script.lock().unwrap();
        script.position = seconds;
        for listener in &script.listeners {
            listener(PlaybackTick { seconds });
        }
    }

    fn invoke(&self, call: PlayerCall) -> Result<(), PlayerError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(call);
        if script.failures.contains(&call) {
            return Err(PlayerError::rejected(call.operation(), "scripted failure"));
        }
        match call {
            PlayerCall::Ready => {}
            PlayerCall::Play => script.paused = false,
            PlayerCall::Pause => script.paused = true,
            PlayerCall::Seek(seconds) => script.position = seconds,
        }
        Ok(())
    }
}

#[async_trait]
impl Player for ScriptedPlayer {
    async fn ready(&self) -> Result<(), PlayerError> {
        self.invoke(PlayerCall::Ready)
    }

    async fn play(&self) -> Result<(), PlayerError> {
        self.invoke(PlayerCall::Play)
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.invoke(PlayerCall::Pause)
    }

    async fn is_paused(&self) -> Result<bool, PlayerError> {
        Ok(self.script.lock().unwrap().paused)
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(self.script.lock().unwrap().position)
    }

    async fn set_current_time(&self, seconds: f64) -> Result<(), PlayerError> {
        self.invoke(PlayerCall::Seek(seconds))
    }

    fn subscribe_time_updates(&self, listener: TimeUpdateListener) {
        self.script.lock().unwrap().listeners.push(listener);
    }
}

/// A player that rejects every call. Useful for testing error-handling
/// paths.
#[derive(Debug)]
pub struct FailingPlayer;

#[async_trait]
impl Player for FailingPlayer {
    async fn ready(&self) -> Result<(), PlayerError> {
        Err(PlayerError::Unavailable("embed failed to load".into()))
    }

    async fn play(&self) -> Result<(), PlayerError> {
        Err(PlayerError::rejected("play", "embed failed to load"))
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        Err(PlayerError::rejected("pause", "embed failed to load"))
    }

    async fn is_paused(&self) -> Result<bool, PlayerError> {
        Err(PlayerError::rejected("is_paused", "embed failed to load"))
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Err(PlayerError::rejected("current_time", "embed failed to load"))
    }

    async fn set_current_time(&self, _seconds: f64) -> Result<(), PlayerError> {
        Err(PlayerError::rejected("seek", "embed failed to load"))
    }

    fn subscribe_time_updates(&self, _listener: TimeUpdateListener) {}
}

/// A player whose `ready()` never resolves, like an embed stuck loading.
#[derive(Debug)]
pub struct NeverReadyPlayer;

#[async_trait]
impl Player for NeverReadyPlayer {
    async fn ready(&self) -> Result<(), PlayerError> {
        std::future::pending().await
    }

    async fn play(&self) -> Result<(), PlayerError> {
        Err(PlayerError::Unavailable("not ready".into()))
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        Err(PlayerError::Unavailable("not ready".into()))
    }

    async fn is_paused(&self) -> Result<bool, PlayerError> {
        Ok(true)
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(0.0)
    }

    async fn set_current_time(&self, _seconds: f64) -> Result<(), PlayerError> {
        Err(PlayerError::Unavailable("not ready".into()))
    }

    fn subscribe_time_updates(&self, _listener: TimeUpdateListener) {}
}

/// A ready, paused player whose seeks never settle, like an embed that
/// stopped answering mid-session.
#[derive(Debug)]
pub struct StallingPlayer;

#[async_trait]
impl Player for StallingPlayer {
    async fn ready(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn is_paused(&self) -> Result<bool, PlayerError> {
        Ok(true)
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(0.0)
    }

    async fn set_current_time(&self, _seconds: f64) -> Result<(), PlayerError> {
        std::future::pending().await
    }

    fn subscribe_time_updates(&self, _listener: TimeUpdateListener) {}
}
