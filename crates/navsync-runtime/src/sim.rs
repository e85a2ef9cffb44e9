//! Simulated player and logging page for running the carousel headless.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use navsync_core::error::PlayerError;
use navsync_core::page::{Page, Surface};
use navsync_core::player::{PlaybackTick, Player, TimeUpdateListener};
use navsync_navigation::domain::commands::NavigationOrigin;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use crate::error::AppError;

#[derive(Debug, Default)]
struct Playhead {
    /// Position at the last pause/seek/resume.
    anchor: f64,
    /// When playback last resumed; `None` while paused.
    resumed_at: Option<Instant>,
}

impl Playhead {
    fn position(&self) -> f64 {
        match self.resumed_at {
            Some(resumed_at) => self.anchor + resumed_at.elapsed().as_secs_f64(),
            None => self.anchor,
        }
    }
}

#[derive(Default)]
struct SimShared {
    playhead: Mutex<Playhead>,
    listeners: Mutex<Vec<TimeUpdateListener>>,
}

impl SimShared {
    fn emit(&self, seconds: f64) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(PlaybackTick { seconds });
        }
    }
}

/// A clock-driven stand-in for the embedded video player.
///
/// Position advances in real (tokio) time while playing. In debug mode the
/// player never starts playback, which keeps the page inspectable without
/// the video running away.
#[derive(Clone)]
pub struct SimulatedPlayer {
    shared: Arc<SimShared>,
    debug_mode: bool,
}

impl std::fmt::Debug for SimulatedPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedPlayer")
            .field("debug_mode", &self.debug_mode)
            .finish_non_exhaustive()
    }
}

impl SimulatedPlayer {
    /// A paused player at position zero.
    #[must_use]
    pub fn new(debug_mode: bool) -> Self {
        Self {
            shared: Arc::new(SimShared::default()),
            debug_mode,
        }
    }

    fn playhead(&self) -> std::sync::MutexGuard<'_, Playhead> {
        self.shared
            .playhead
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawns the task publishing a tick every `interval` while playing.
    /// Abort the returned handle to stop it.
    #[must_use]
    pub fn start_ticker(&self, interval: Duration) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let position = {
                    let playhead = shared.playhead.lock().unwrap_or_else(PoisonError::into_inner);
                    playhead.resumed_at.map(|_| playhead.position())
                };
                if let Some(seconds) = position {
                    shared.emit(seconds);
                }
            }
        })
    }
}

#[async_trait]
impl Player for SimulatedPlayer {
    async fn ready(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    async fn play(&self) -> Result<(), PlayerError> {
        if self.debug_mode {
            info!("debug mode: playback suppressed");
            return Ok(());
        }
        let mut playhead = self.playhead();
        if playhead.resumed_at.is_none() {
            playhead.resumed_at = Some(Instant::now());
            info!(position = playhead.anchor, "player: play");
        }
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        let mut playhead = self.playhead();
        playhead.anchor = playhead.position();
        playhead.resumed_at = None;
        info!(position = playhead.anchor, "player: pause");
        Ok(())
    }

    async fn is_paused(&self) -> Result<bool, PlayerError> {
        Ok(self.playhead().resumed_at.is_none())
    }

    async fn current_time(&self) -> Result<f64, PlayerError> {
        Ok(self.playhead().position())
    }

    async fn set_current_time(&self, seconds: f64) -> Result<(), PlayerError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(PlayerError::rejected("seek", format!("invalid position {seconds}")));
        }
        let mut playhead = self.playhead();
        playhead.anchor = seconds;
        if playhead.resumed_at.is_some() {
            playhead.resumed_at = Some(Instant::now());
        }
        info!(position = seconds, "player: seek");
        Ok(())
    }

    fn subscribe_time_updates(&self, listener: TimeUpdateListener) {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}

/// A `Page` that logs every mutation and keeps the fragment in memory.
#[derive(Debug, Default)]
pub struct LoggingPage {
    fragment: Mutex<String>,
}

impl LoggingPage {
    /// A page loaded with `fragment` (with or without the leading `#`).
    #[must_use]
    pub fn new(fragment: &str) -> Self {
        Self {
            fragment: Mutex::new(fragment.trim_start_matches('#').to_owned()),
        }
    }

    /// Changes the fragment the way the address bar or back button would.
    pub fn set_fragment(&self, fragment: &str) {
        let fragment = fragment.trim_start_matches('#');
        info!(fragment, "browser: fragment changed");
        *self.slot() = fragment.to_owned();
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, String> {
        self.fragment.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Page for LoggingPage {
    fn fragment(&self) -> String {
        self.slot().clone()
    }

    fn push_fragment(&self, fragment: &str) {
        info!(fragment, "history: push");
        *self.slot() = fragment.to_owned();
    }

    fn replace_fragment(&self, fragment: &str) {
        info!(fragment, "history: replace");
        *self.slot() = fragment.to_owned();
    }

    fn mark_active(&self, surface: Surface, section_id: &str) {
        info!(?surface, section = section_id, "ui: active");
    }

    fn reveal_content(&self) {
        info!("ui: content revealed");
    }

    fn close_menu(&self) {
        info!("ui: mobile menu closed");
    }

    fn scroll_to_top(&self) {
        info!("ui: scrolled to top");
    }
}

/// A line of simulator input.
#[derive(Debug, Clone, PartialEq)]
pub enum SimCommand {
    /// `go <id>`, `menu <id>`, `link <id>`: click a trigger.
    Navigate {
        /// The clicked trigger's target.
        target: String,
        /// The trigger kind.
        origin: NavigationOrigin,
    },
    /// `hash <fragment>`: change the address bar.
    Fragment(String),
    /// `play`
    Play,
    /// `pause`
    Pause,
    /// `view`: print the navigation state.
    View,
    /// `quit`
    Quit,
}

impl FromStr for SimCommand {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let argument = words.next();
        let unknown = || AppError::UnknownCommand(line.trim().to_owned());

        let navigate = |origin| {
            argument
                .map(|target| SimCommand::Navigate {
                    target: target.to_owned(),
                    origin,
                })
                .ok_or_else(unknown)
        };

        match (verb, argument) {
            ("go", _) => navigate(NavigationOrigin::NavItem),
            ("menu", _) => navigate(NavigationOrigin::MobileMenu),
            ("link", _) => navigate(NavigationOrigin::InPageLink),
            ("hash", fragment) => Ok(SimCommand::Fragment(fragment.unwrap_or_default().to_owned())),
            ("play", None) => Ok(SimCommand::Play),
            ("pause", None) => Ok(SimCommand::Pause),
            ("view", None) => Ok(SimCommand::View),
            ("quit" | "exit", None) => Ok(SimCommand::Quit),
            _ => Err(unknown()),
        }
    }
}
