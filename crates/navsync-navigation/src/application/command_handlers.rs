//! The `NavSync` controller.
//!
//! Handles the four inputs of the carousel (startup, playback ticks, user
//! navigation, fragment changes) against the owned [`NavigationState`] and
//! drives the two outputs (player commands, page updates). Nothing in here
//! is fatal: player failures are logged and journaled, unknown targets are
//! ignored, and the page stays usable without a player.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use navsync_core::clock::Clock;
use navsync_core::error::PlayerError;
use navsync_core::page::{Page, Surface};
use navsync_core::player::{PlaybackTick, Player};
use navsync_timeline::{Section, SectionId, Sections};
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

use crate::domain::aggregates::NavigationState;
use crate::domain::commands::{FollowFragment, NavigateTo, NavigationOrigin};
use crate::domain::events::{ActivationTrigger, NavigationEvent, PlayerStep};

/// Default section id used for an empty fragment.
pub const DEFAULT_SECTION_ID: &str = "intro";

/// Tunables of the synchronization logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// How long playback ticks stay suppressed after a programmatic seek.
    pub settle_delay: Duration,
    /// Section shown for an empty fragment. Falls back to the first section
    /// if no section has this id.
    pub default_section: String,
    /// How long startup waits for the player before running without it.
    pub ready_timeout: Duration,
    /// How long a single pause, seek or resume may take before it counts as
    /// failed.
    pub player_call_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(1000),
            default_section: DEFAULT_SECTION_ID.to_owned(),
            ready_timeout: Duration::from_secs(10),
            player_call_timeout: Duration::from_secs(5),
        }
    }
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// The navigation ran (UI updated, seek issued if a player is attached).
    Navigated,
    /// The target was already active; nothing changed.
    AlreadyActive,
    /// The target names no section; nothing changed.
    Ignored,
}

/// Whether startup ended with a usable player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerLink {
    /// The player is ready and attached.
    Connected,
    /// The carousel runs UI-only.
    Unavailable,
}

/// How a navigation reflects itself in browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryUpdate {
    Push,
    Replace,
    Keep,
}

/// Synchronizes the active section, the player and the URL fragment.
pub struct NavSync {
    sections: Arc<Sections>,
    settings: SyncSettings,
    page: Arc<dyn Page>,
    clock: Arc<dyn Clock>,
    player: Option<Arc<dyn Player>>,
    state: NavigationState,
}

impl fmt::Debug for NavSync {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavSync")
            .field("sections", &self.sections)
            .field("settings", &self.settings)
            .field("player_attached", &self.player.is_some())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NavSync {
    /// Creates a controller with no player attached and no active section.
    /// Call [`NavSync::initialize`] before feeding it events.
    #[must_use]
    pub fn new(
        sections: Arc<Sections>,
        settings: SyncSettings,
        page: Arc<dyn Page>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sections,
            settings,
            page,
            clock,
            player: None,
            state: NavigationState::new(),
        }
    }

    /// The section timeline.
    #[must_use]
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// The controller's settings.
    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// The navigation state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The attached player, if startup connected one.
    #[must_use]
    pub fn player(&self) -> Option<&Arc<dyn Player>> {
        self.player.as_ref()
    }

    /// Drains the journal.
    pub fn take_events(&mut self) -> Vec<NavigationEvent> {
        self.state.take_events()
    }

    fn default_section(&self) -> &Section {
        self.sections.default_section(&self.settings.default_section)
    }

    /// Makes `section_id` active on every surface. Returns `false` without
    /// touching the page if it already is.
    fn activate(
        &mut self,
        section_id: &SectionId,
        trigger: ActivationTrigger,
        correlation_id: Uuid,
    ) -> bool {
        if !self
            .state
            .activate(section_id, trigger, correlation_id, self.clock.as_ref())
        {
            return false;
        }
        for surface in Surface::ALL {
            self.page.mark_active(surface, section_id.as_str());
        }
        info!(section = %section_id, ?trigger, "active section changed");
        true
    }

    /// Marks the section named `section_id` active on every surface.
    ///
    /// Idempotent: returns `false` with no page writes if the section is
    /// already active or does not exist.
    pub fn set_active_section(&mut self, section_id: &str) -> bool {
        let sections = Arc::clone(&self.sections);
        let Some(section) = sections.by_id(section_id) else {
            debug!(section = section_id, "ignoring unknown section");
            return false;
        };
        self.activate(section.id(), ActivationTrigger::Navigation, Uuid::new_v4())
    }

    /// Resolves the startup section from the URL fragment, shows the
    /// content, then waits (bounded) for the player and seeks it to that
    /// section.
    ///
    /// Content is revealed before the player is awaited, so a player that
    /// fails or never becomes ready leaves a usable page.
    #[instrument(skip(self, player), fields(player = player.is_some()))]
    pub async fn initialize(&mut self, player: Option<Arc<dyn Player>>) -> PlayerLink {
        let correlation_id = Uuid::new_v4();
        let sections = Arc::clone(&self.sections);
        let fragment = self.page.fragment();

        let section = if fragment.is_empty() {
            self.default_section()
        } else {
            self.page.scroll_to_top();
            sections.resolve_fragment(&fragment).unwrap_or_else(|| {
                debug!(fragment = %fragment, "unresolvable startup fragment, using default");
                self.default_section()
            })
        };
        let section = section.clone();

        self.activate(section.id(), ActivationTrigger::Initial, correlation_id);
        if !fragment.is_empty() && fragment != section.id().as_str() {
            self.page.replace_fragment(section.id().as_str());
        }
        self.page.reveal_content();

        let Some(player) = player else {
            warn!("no player embedded; running without video sync");
            self.state.record_player_unavailable(
                "no player embedded".to_owned(),
                correlation_id,
                self.clock.as_ref(),
            );
            return PlayerLink::Unavailable;
        };

        let ready = match tokio::time::timeout(self.settings.ready_timeout, player.ready()).await
        {
            Ok(result) => result,
            Err(_) => Err(PlayerError::Unavailable(format!(
                "not ready after {:?}",
                self.settings.ready_timeout
            ))),
        };
        if let Err(err) = ready {
            error!(error = %err, "error initializing player");
            self.state.record_player_unavailable(
                err.to_string(),
                correlation_id,
                self.clock.as_ref(),
            );
            return PlayerLink::Unavailable;
        }

        info!(section = %section.id(), start = section.start(), "player ready");
        if section.start() > 0.0 {
            let generation = self.state.begin_seek(section.id());
            self.state
                .record_seek_requested(&section, correlation_id, self.clock.as_ref());
            let seek = bounded(
                self.settings.player_call_timeout,
                PlayerStep::Seek,
                player.set_current_time(section.start()),
            );
            if let Err((_, err)) = seek.await {
                error!(error = %err, "error setting initial time");
                self.state.record_player_failure(
                    Some(section.id()),
                    PlayerStep::Seek,
                    err.to_string(),
                    correlation_id,
                    self.clock.as_ref(),
                );
            }
            self.state
                .arm_settle_timer(generation, self.settings.settle_delay);
        }

        self.player = Some(player);
        PlayerLink::Connected
    }

    /// Follows organic playback. Ignored entirely while a seek settles;
    /// otherwise activates the section containing the tick and reflects it
    /// in the URL without adding a history entry.
    ///
    /// Returns `true` if the active section changed.
    pub fn handle_time_update(&mut self, tick: PlaybackTick) -> bool {
        if self.state.is_suppressing() {
            trace!(seconds = tick.seconds, "tick ignored while seeking");
            return false;
        }
        let sections = Arc::clone(&self.sections);
        let Some(section) = sections.resolve_time(tick.seconds) else {
            return false;
        };
        if !self.activate(section.id(), ActivationTrigger::Playback, Uuid::new_v4()) {
            return false;
        }
        self.page.replace_fragment(section.id().as_str());
        true
    }

    /// Handles a user click on a navigation trigger.
    ///
    /// Order: suppress ticks, update the UI and push a history entry, pause
    /// if playing, seek, resume if it was playing, then arm the settle timer.
    /// A rejected player call is logged and ends the player steps early; the
    /// settle timer is armed regardless so ticks are never ignored for good.
    #[instrument(
        skip(self, command),
        fields(
            correlation_id = %command.correlation_id,
            target = %command.target,
            origin = ?command.origin,
        )
    )]
    pub async fn navigate_to(&mut self, command: &NavigateTo) -> NavOutcome {
        if command.origin == NavigationOrigin::MobileMenu {
            self.page.close_menu();
        }

        let sections = Arc::clone(&self.sections);
        let Some(section) = sections.by_id(&command.target) else {
            debug!("ignoring navigation to unknown section");
            return NavOutcome::Ignored;
        };

        info!("handling navigate_to command");
        self.run_navigation(
            section,
            ActivationTrigger::Navigation,
            HistoryUpdate::Push,
            command.correlation_id,
        )
        .await;
        NavOutcome::Navigated
    }

    /// Handles an external change of the URL fragment.
    ///
    /// The fragment is resolved by id, then by index; an empty fragment means
    /// the default section. A fragment naming the already active section is a
    /// no-op, which keeps a click (that pushed the fragment) and the
    /// resulting fragment event from seeking twice. Index fragments are
    /// rewritten to the section id in place.
    #[instrument(skip(self, command), fields(correlation_id = %command.correlation_id))]
    pub async fn handle_fragment_change(&mut self, command: &FollowFragment) -> NavOutcome {
        self.page.scroll_to_top();

        let fragment = self.page.fragment();
        let sections = Arc::clone(&self.sections);
        let section = if fragment.is_empty() {
            Some(sections.default_section(&self.settings.default_section))
        } else {
            sections.resolve_fragment(&fragment)
        };
        let Some(section) = section else {
            debug!(fragment = %fragment, "ignoring unresolvable fragment");
            return NavOutcome::Ignored;
        };

        let history = if fragment.is_empty() || fragment == section.id().as_str() {
            HistoryUpdate::Keep
        } else {
            HistoryUpdate::Replace
        };

        if self.state.active() == Some(section.id()) {
            if history == HistoryUpdate::Replace {
                self.page.replace_fragment(section.id().as_str());
            }
            debug!(section = %section.id(), "fragment already active");
            return NavOutcome::AlreadyActive;
        }

        info!(fragment = %fragment, "following fragment change");
        self.run_navigation(
            section,
            ActivationTrigger::Fragment,
            history,
            command.correlation_id,
        )
        .await;
        NavOutcome::Navigated
    }

    async fn run_navigation(
        &mut self,
        section: &Section,
        trigger: ActivationTrigger,
        history: HistoryUpdate,
        correlation_id: Uuid,
    ) {
        // Raise the guard before anything can yield to the player.
        let generation = self.state.begin_seek(section.id());

        self.activate(section.id(), trigger, correlation_id);
        match history {
            HistoryUpdate::Push => self.page.push_fragment(section.id().as_str()),
            HistoryUpdate::Replace => self.page.replace_fragment(section.id().as_str()),
            HistoryUpdate::Keep => {}
        }

        if let Some(player) = self.player.clone() {
            self.state
                .record_seek_requested(section, correlation_id, self.clock.as_ref());
            let seek = seek_player(
                player.as_ref(),
                section.start(),
                self.settings.player_call_timeout,
            );
            if let Err((step, err)) = seek.await {
                error!(error = %err, ?step, section = %section.id(), "error navigating to section");
                self.state.record_player_failure(
                    Some(section.id()),
                    step,
                    err.to_string(),
                    correlation_id,
                    self.clock.as_ref(),
                );
            }
        } else {
            debug!("no player attached; navigation is UI-only");
        }

        self.state
            .arm_settle_timer(generation, self.settings.settle_delay);
    }
}

/// Awaits one player call, failing it with `PlayerError::Unavailable` if
/// it has not settled within `limit`.
async fn bounded<T>(
    limit: Duration,
    step: PlayerStep,
    call: impl Future<Output = Result<T, PlayerError>>,
) -> Result<T, (PlayerStep, PlayerError)> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(|e| (step, e)),
        Err(_) => Err((
            step,
            PlayerError::Unavailable(format!("no response within {limit:?}")),
        )),
    }
}

/// Pause (if playing), seek, resume (if it was playing). The first rejected
/// or stalled call ends the sequence.
async fn seek_player(
    player: &dyn Player,
    start: f64,
    limit: Duration,
) -> Result<(), (PlayerStep, PlayerError)> {
    let was_playing = !bounded(limit, PlayerStep::Status, player.is_paused()).await?;
    if was_playing {
        bounded(limit, PlayerStep::Pause, player.pause()).await?;
    }
    bounded(limit, PlayerStep::Seek, player.set_current_time(start)).await?;
    if was_playing {
        bounded(limit, PlayerStep::Resume, player.play()).await?;
    }
    Ok(())
}
