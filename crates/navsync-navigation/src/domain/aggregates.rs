//! The navigation state aggregate.
//!
//! `NavigationState` is the single owned value behind the carousel: which
//! section is active, whether a programmatic seek is settling, and the
//! timer that ends the settling period.
//!
//! ```text
//!   Idle(active) ──navigate / fragment──▶ Seeking(active, target)
//!        ▲                                     │
//!        └───────── settle timer expiry ───────┘
//! ```
//!
//! While seeking, playback ticks are ignored. A new navigation during a seek
//! supersedes it: the old timer is aborted and the guard generation bumped,
//! so a stale timer can never end the newer seek early.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use navsync_core::clock::Clock;
use navsync_core::event::EventMetadata;
use navsync_timeline::{Section, SectionId};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use super::events::{
    ActivationTrigger, NavigationEvent, NavigationEventKind, PlayerCallFailed, PlayerStep,
    PlayerUnavailable, SectionActivated, SeekRequested,
};

/// Coarse state of the navigation state machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Playback ticks drive the active section.
    Idle,
    /// A programmatic seek is settling; playback ticks are ignored.
    Seeking {
        /// The section being sought.
        target: SectionId,
    },
}

#[derive(Debug, Default)]
struct GuardSlot {
    generation: u64,
    suppressing: bool,
}

/// The "ignore playback ticks" flag, shared with the settle timer task.
#[derive(Debug, Clone, Default)]
pub struct SettleGuard {
    slot: Arc<Mutex<GuardSlot>>,
}

impl SettleGuard {
    /// Whether playback ticks are currently suppressed.
    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .suppressing
    }

    /// Sets the flag and returns the generation of this engagement.
    fn engage(&self) -> u64 {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.generation += 1;
        slot.suppressing = true;
        slot.generation
    }

    /// Clears the flag if `generation` is still the latest engagement.
    fn release(&self, generation: u64) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.generation != generation {
            return false;
        }
        slot.suppressing = false;
        true
    }
}

/// The aggregate root for a page's navigation state.
#[derive(Debug, Default)]
pub struct NavigationState {
    /// The active section, `None` until startup resolves one.
    active: Option<SectionId>,
    /// Target of the most recent seek.
    target: Option<SectionId>,
    guard: SettleGuard,
    settle_timer: Option<JoinHandle<()>>,
    /// Journal events not yet taken by the host.
    uncommitted_events: Vec<NavigationEvent>,
}

impl NavigationState {
    /// Creates an empty state: no active section, idle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The active section.
    #[must_use]
    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Whether playback ticks are currently ignored.
    #[must_use]
    pub fn is_suppressing(&self) -> bool {
        self.guard.is_suppressing()
    }

    /// The current phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match (&self.target, self.guard.is_suppressing()) {
            (Some(target), true) => Phase::Seeking {
                target: target.clone(),
            },
            _ => Phase::Idle,
        }
    }

    fn record(&mut self, kind: NavigationEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        self.uncommitted_events.push(NavigationEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        });
    }

    /// Makes `section_id` the active section. Returns `false`, recording
    /// nothing, if it already is.
    pub fn activate(
        &mut self,
        section_id: &SectionId,
        trigger: ActivationTrigger,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> bool {
        if self.active.as_ref() == Some(section_id) {
            return false;
        }
        self.active = Some(section_id.clone());
        self.record(
            NavigationEventKind::SectionActivated(SectionActivated {
                section_id: section_id.clone(),
                trigger,
            }),
            correlation_id,
            clock,
        );
        true
    }

    /// Enters `Seeking(target)`: aborts any pending settle timer and raises
    /// the guard. Returns the guard generation to hand to
    /// [`NavigationState::arm_settle_timer`].
    pub fn begin_seek(&mut self, target: &SectionId) -> u64 {
        if let Some(timer) = self.settle_timer.take() {
            timer.abort();
            debug!(target = %target, "superseding pending settle timer");
        }
        self.target = Some(target.clone());
        self.guard.engage()
    }

    /// Records that the player was asked to seek to `section`.
    pub fn record_seek_requested(
        &mut self,
        section: &Section,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.record(
            NavigationEventKind::SeekRequested(SeekRequested {
                target: section.id().clone(),
                start: section.start(),
            }),
            correlation_id,
            clock,
        );
    }

    /// Records a rejected player call.
    pub fn record_player_failure(
        &mut self,
        target: Option<&SectionId>,
        step: PlayerStep,
        reason: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.record(
            NavigationEventKind::PlayerCallFailed(PlayerCallFailed {
                target: target.cloned(),
                step,
                reason,
            }),
            correlation_id,
            clock,
        );
    }

    /// Records that the carousel runs without a player.
    pub fn record_player_unavailable(
        &mut self,
        reason: String,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) {
        self.record(
            NavigationEventKind::PlayerUnavailable(PlayerUnavailable { reason }),
            correlation_id,
            clock,
        );
    }

    /// Starts the timer that returns the state machine to `Idle` after
    /// `delay`. Must run inside a tokio runtime.
    ///
    /// The timer only clears the guard if no newer seek has engaged it.
    pub fn arm_settle_timer(&mut self, generation: u64, delay: Duration) {
        if let Some(previous) = self.settle_timer.take() {
            previous.abort();
        }
        let guard = self.guard.clone();
        self.settle_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if guard.release(generation) {
                debug!(generation, "seek settled");
            }
        }));
    }

    /// Journal events recorded since the last call to
    /// [`NavigationState::take_events`].
    #[must_use]
    pub fn uncommitted_events(&self) -> &[NavigationEvent] {
        &self.uncommitted_events
    }

    /// Drains the journal.
    pub fn take_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }
}

impl Drop for NavigationState {
    fn drop(&mut self) {
        if let Some(timer) = self.settle_timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use navsync_core::event::JournalEvent;
    use navsync_test_support::FixedClock;

    fn id(raw: &str) -> SectionId {
        SectionId::new(raw).unwrap()
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_activate_records_section_activated_once() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let clock = clock();
        let mut state = NavigationState::new();

        // Act
        let first = state.activate(&id("intro"), ActivationTrigger::Initial, correlation_id, &clock);
        let second =
            state.activate(&id("intro"), ActivationTrigger::Playback, correlation_id, &clock);

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(state.active(), Some(&id("intro")));

        let events = state.uncommitted_events();
        assert_eq!(events.len(), 1);
        let meta = events[0].metadata();
        assert_eq!(meta.event_type, "navigation.section_activated");
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, clock.0);
    }

    #[test]
    fn test_new_state_is_idle_without_active_section() {
        let state = NavigationState::new();
        assert_eq!(state.active(), None);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.is_suppressing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_seek_enters_seeking_until_timer_expires() {
        // Arrange
        let mut state = NavigationState::new();
        let delay = Duration::from_millis(500);

        // Act
        let generation = state.begin_seek(&id("pricing"));
        state.arm_settle_timer(generation, delay);

        // Assert
        assert_eq!(
            state.phase(),
            Phase::Seeking {
                target: id("pricing")
            }
        );

        tokio::time::sleep(delay - Duration::from_millis(1)).await;
        assert!(state.is_suppressing());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!state.is_suppressing());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseding_seek_is_not_cleared_by_stale_generation() {
        // Arrange
        let mut state = NavigationState::new();
        let first = state.begin_seek(&id("features"));
        state.arm_settle_timer(first, Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(400)).await;

        // Act: a second navigation before the first settles.
        let second = state.begin_seek(&id("pricing"));
        state.arm_settle_timer(second, Duration::from_millis(500));

        // Assert: the first timer's deadline passes without effect.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(
            state.phase(),
            Phase::Seeking {
                target: id("pricing")
            }
        );

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_release_with_stale_generation_keeps_guard() {
        let guard = SettleGuard::default();
        let old = guard.engage();
        let new = guard.engage();

        assert!(!guard.release(old));
        assert!(guard.is_suppressing());
        assert!(guard.release(new));
        assert!(!guard.is_suppressing());
    }

    #[test]
    fn test_take_events_drains_journal() {
        let clock = clock();
        let mut state = NavigationState::new();
        state.record_player_unavailable("no embed".into(), Uuid::new_v4(), &clock);

        let taken = state.take_events();

        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].event_type(), "navigation.player_unavailable");
        assert!(state.uncommitted_events().is_empty());
    }
}
