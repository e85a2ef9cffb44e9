//! Commands for the navigation context.

use navsync_core::command::Command;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a user-initiated navigation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationOrigin {
    /// An entry of the primary navigation list.
    NavItem,
    /// An entry of the mobile menu. The menu is closed on navigation.
    MobileMenu,
    /// An in-page `href="#..."` link inside a section.
    InPageLink,
}

/// Command to navigate to a section on behalf of the user.
#[derive(Debug, Clone)]
pub struct NavigateTo {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The requested section id, as written on the trigger element.
    pub target: String,
    /// The element that triggered the navigation.
    pub origin: NavigationOrigin,
}

impl NavigateTo {
    /// Creates the command with a fresh correlation ID.
    #[must_use]
    pub fn new(target: impl Into<String>, origin: NavigationOrigin) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            target: target.into(),
            origin,
        }
    }
}

impl Command for NavigateTo {
    fn command_type(&self) -> &'static str {
        "navigation.navigate_to"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to follow an externally changed URL fragment (back/forward,
/// pasted deep link).
#[derive(Debug, Clone)]
pub struct FollowFragment {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl FollowFragment {
    /// Creates the command with a fresh correlation ID.
    #[must_use]
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
        }
    }
}

impl Default for FollowFragment {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for FollowFragment {
    fn command_type(&self) -> &'static str {
        "navigation.follow_fragment"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_report_type_and_correlation_id() {
        let navigate = NavigateTo::new("pricing", NavigationOrigin::MobileMenu);
        let follow = FollowFragment::new();

        let commands: [&dyn Command; 2] = [&navigate, &follow];

        assert_eq!(commands[0].command_type(), "navigation.navigate_to");
        assert_eq!(commands[0].correlation_id(), navigate.correlation_id);
        assert_eq!(commands[1].command_type(), "navigation.follow_fragment");
        assert_ne!(commands[1].correlation_id(), navigate.correlation_id);
    }
}
