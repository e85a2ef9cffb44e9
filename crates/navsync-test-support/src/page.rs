//! Test page — a `Page` that records every mutation.

use std::sync::Mutex;

use navsync_core::page::{Page, Surface};

/// A history mutation made through the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// `push_fragment` — a new browser history entry.
    Push(String),
    /// `replace_fragment` — the current entry rewritten in place.
    Replace(String),
}

#[derive(Debug, Default)]
struct Recorded {
    fragment: String,
    history: Vec<HistoryEntry>,
    marks: Vec<(Surface, String)>,
    revealed: usize,
    menu_closed: usize,
    scrolled_to_top: usize,
}

/// A page that keeps the fragment in memory and records all writes. Pushed
/// and replaced fragments become the current fragment, like in a browser.
#[derive(Debug, Default)]
pub struct RecordingPage {
    recorded: Mutex<Recorded>,
}

impl RecordingPage {
    /// A page loaded without a fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page loaded with `#fragment` (pass it without the `#`).
    #[must_use]
    pub fn with_fragment(fragment: &str) -> Self {
        let page = Self::default();
        page.set_fragment(fragment);
        page
    }

    /// Changes the fragment the way the browser would on back/forward,
    /// without recording a history write.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_fragment(&self, fragment: &str) {
        self.recorded.lock().unwrap().fragment = fragment.to_owned();
    }

    /// Forgets everything recorded so far except the current fragment.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn clear(&self) {
        let mut recorded = self.recorded.lock().unwrap();
        let fragment = std::mem::take(&mut recorded.fragment);
        *recorded = Recorded {
            fragment,
            ..Recorded::default()
        };
    }

    /// History writes in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.recorded.lock().unwrap().history.clone()
    }

    /// `mark_active` calls in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn marks(&self) -> Vec<(Surface, String)> {
        self.recorded.lock().unwrap().marks.clone()
    }

    /// Number of `reveal_content` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn revealed(&self) -> usize {
        self.recorded.lock().unwrap().revealed
    }

    /// Number of `close_menu` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn menu_closed(&self) -> usize {
        self.recorded.lock().unwrap().menu_closed
    }

    /// Number of `scroll_to_top` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn scrolled_to_top(&self) -> usize {
        self.recorded.lock().unwrap().scrolled_to_top
    }
}

impl Page for RecordingPage {
    fn fragment(&self) -> String {
        self.recorded.lock().unwrap().fragment.clone()
    }

    fn push_fragment(&self, fragment: &str) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.fragment = fragment.to_owned();
        recorded.history.push(HistoryEntry::Push(fragment.to_owned()));
    }

    fn replace_fragment(&self, fragment: &str) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.fragment = fragment.to_owned();
        recorded
            .history
            .push(HistoryEntry::Replace(fragment.to_owned()));
    }

    fn mark_active(&self, surface: Surface, section_id: &str) {
        self.recorded
            .lock()
            .unwrap()
            .marks
            .push((surface, section_id.to_owned()));
    }

    fn reveal_content(&self) {
        self.recorded.lock().unwrap().revealed += 1;
    }

    fn close_menu(&self) {
        self.recorded.lock().unwrap().menu_closed += 1;
    }

    fn scroll_to_top(&self) {
        self.recorded.lock().unwrap().scrolled_to_top += 1;
    }
}
