//! Query handlers for the navigation context.
//!
//! Read-only snapshots of the controller, for debugging overlays and logs.

use navsync_timeline::SectionId;
use serde::Serialize;

use crate::application::command_handlers::NavSync;
use crate::domain::aggregates::Phase;

/// Read-only view of the navigation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationView {
    /// The active section.
    pub active_section: Option<SectionId>,
    /// Idle or seeking (with target).
    #[serde(flatten)]
    pub phase: Phase,
    /// Whether a player is attached.
    pub player_connected: bool,
    /// Section ids in timeline order.
    pub sections: Vec<SectionId>,
}

/// Snapshots the controller's navigation state.
#[must_use]
pub fn get_navigation_view(sync: &NavSync) -> NavigationView {
    NavigationView {
        active_section: sync.state().active().cloned(),
        phase: sync.state().phase(),
        player_connected: sync.player().is_some(),
        sections: sync.sections().iter().map(|s| s.id().clone()).collect(),
    }
}
