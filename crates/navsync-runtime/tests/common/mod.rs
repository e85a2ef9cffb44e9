//! Shared test helpers for runtime integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use navsync_core::clock::Clock;
use navsync_core::page::Page;
use navsync_navigation::application::command_handlers::{NavSync, SyncSettings};
use navsync_test_support::{FixedClock, RecordingPage};
use navsync_timeline::markup::parse_sections;

/// Carousel markup used across the runtime tests.
pub const CAROUSEL_MARKUP: &str = r#"
<nav>
  <a class="nav-item" data-section="intro">Intro</a>
  <a class="nav-item" data-section="features">Features</a>
  <a class="nav-item" data-section="pricing">Pricing</a>
</nav>
<section class="carousel-section" id="intro" data-start="0">Welcome</section>
<section class="carousel-section" id="features" data-start="30">Features</section>
<section class="carousel-section" id="pricing" data-start="75">Pricing</section>
"#;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Builds a controller over [`CAROUSEL_MARKUP`] writing to `page`, with the
/// default settings (1 s settle delay, `intro` as default section).
pub fn build_controller(page: &Arc<RecordingPage>) -> NavSync {
    let sections = parse_sections(CAROUSEL_MARKUP).unwrap();
    NavSync::new(
        Arc::new(sections),
        SyncSettings::default(),
        Arc::clone(page) as Arc<dyn Page>,
        fixed_clock(),
    )
}
