//! Hosting page capability: URL fragment, active-state surfaces and the few
//! layout hooks navigation needs.

use serde::{Deserialize, Serialize};

/// A UI surface that mirrors the active section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    /// The primary navigation list.
    PrimaryNav,
    /// The mobile menu list.
    MobileNav,
    /// The content panels themselves.
    ContentPanels,
}

impl Surface {
    /// Every surface, in the order they are updated.
    pub const ALL: [Surface; 3] = [
        Surface::PrimaryNav,
        Surface::MobileNav,
        Surface::ContentPanels,
    ];
}

/// The page hosting the carousel.
///
/// Implementations are expected to use interior mutability; every call is
/// synchronous and infallible, like the DOM writes it stands for.
pub trait Page: Send + Sync {
    /// The current URL fragment without the leading `#` (empty if none).
    fn fragment(&self) -> String;

    /// Sets the fragment and adds a browser history entry.
    fn push_fragment(&self, fragment: &str);

    /// Sets the fragment in place, without a new history entry.
    fn replace_fragment(&self, fragment: &str);

    /// Marks `section_id` as the only active entry on `surface`.
    fn mark_active(&self, surface: Surface, section_id: &str);

    /// Makes the content visible. Called exactly once at startup, whether or
    /// not the player became ready.
    fn reveal_content(&self);

    /// Collapses the mobile menu.
    fn close_menu(&self);

    /// Resets the viewport to the top, undoing the browser's fragment scroll.
    fn scroll_to_top(&self);
}
