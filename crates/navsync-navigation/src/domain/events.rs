//! Journal events for the navigation context.

use navsync_core::event::{EventMetadata, JournalEvent};
use navsync_timeline::SectionId;
use serde::{Deserialize, Serialize};

/// What caused a section to become active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationTrigger {
    /// Startup resolution from the URL fragment.
    Initial,
    /// Organic playback crossed into the section.
    Playback,
    /// A click on a navigation trigger.
    Navigation,
    /// An external fragment change.
    Fragment,
}

/// A player call made while seeking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStep {
    /// Waiting for the player to become ready.
    Ready,
    /// Querying whether playback is running.
    Status,
    /// Pausing before the seek.
    Pause,
    /// The seek itself.
    Seek,
    /// Resuming after the seek.
    Resume,
}

/// Emitted when the active section changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionActivated {
    /// The newly active section.
    pub section_id: SectionId,
    /// What caused the change.
    pub trigger: ActivationTrigger,
}

/// Emitted when the player is told to seek to a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekRequested {
    /// The section being sought.
    pub target: SectionId,
    /// Its start time in seconds.
    pub start: f64,
}

/// Emitted when the player rejects a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCallFailed {
    /// The section being sought, if any.
    pub target: Option<SectionId>,
    /// The call that failed.
    pub step: PlayerStep,
    /// The player's reason.
    pub reason: String,
}

/// Emitted when the carousel gives up on the player and runs UI-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerUnavailable {
    /// Why the player is unusable.
    pub reason: String,
}

/// Event type identifier for [`SectionActivated`].
pub const SECTION_ACTIVATED_EVENT_TYPE: &str = "navigation.section_activated";

/// Event type identifier for [`SeekRequested`].
pub const SEEK_REQUESTED_EVENT_TYPE: &str = "navigation.seek_requested";

/// Event type identifier for [`PlayerCallFailed`].
pub const PLAYER_CALL_FAILED_EVENT_TYPE: &str = "navigation.player_call_failed";

/// Event type identifier for [`PlayerUnavailable`].
pub const PLAYER_UNAVAILABLE_EVENT_TYPE: &str = "navigation.player_unavailable";

/// Event payload variants for the navigation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavigationEventKind {
    /// The active section changed.
    SectionActivated(SectionActivated),
    /// A seek was requested.
    SeekRequested(SeekRequested),
    /// A player call failed.
    PlayerCallFailed(PlayerCallFailed),
    /// The player is unusable.
    PlayerUnavailable(PlayerUnavailable),
}

impl NavigationEventKind {
    /// The type identifier of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SectionActivated(_) => SECTION_ACTIVATED_EVENT_TYPE,
            Self::SeekRequested(_) => SEEK_REQUESTED_EVENT_TYPE,
            Self::PlayerCallFailed(_) => PLAYER_CALL_FAILED_EVENT_TYPE,
            Self::PlayerUnavailable(_) => PLAYER_UNAVAILABLE_EVENT_TYPE,
        }
    }
}

/// Journal event envelope for the navigation context.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: NavigationEventKind,
}

impl JournalEvent for NavigationEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("NavigationEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn test_payload_is_externally_tagged_by_variant() {
        // Arrange
        let event = NavigationEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: SECTION_ACTIVATED_EVENT_TYPE.to_owned(),
                correlation_id: Uuid::new_v4(),
                occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            },
            kind: NavigationEventKind::SectionActivated(SectionActivated {
                section_id: SectionId::new("pricing").unwrap(),
                trigger: ActivationTrigger::Playback,
            }),
        };

        // Act
        let payload = event.to_payload();

        // Assert
        assert_eq!(event.event_type(), "navigation.section_activated");
        assert_eq!(
            payload,
            serde_json::json!({
                "SectionActivated": { "section_id": "pricing", "trigger": "playback" }
            })
        );
    }

    #[test]
    fn test_player_call_failed_round_trips_through_json() {
        let kind = NavigationEventKind::PlayerCallFailed(PlayerCallFailed {
            target: None,
            step: PlayerStep::Seek,
            reason: "player rejected seek: out of range".into(),
        });

        let value = serde_json::to_value(&kind).unwrap();
        let back: NavigationEventKind = serde_json::from_value(value).unwrap();

        assert_eq!(back, kind);
        assert_eq!(back.event_type(), PLAYER_CALL_FAILED_EVENT_TYPE);
    }
}
