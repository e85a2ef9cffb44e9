//! Reads the section timeline out of page markup.
//!
//! The markup contract is small: every content `<section>` carries an `id`
//! and a `data-start` attribute (seconds, decimals allowed), and every
//! navigation trigger carries `data-section` naming its target. A full HTML
//! parser is not needed for that, so tags are scanned with regular
//! expressions.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::TimelineError;
use crate::section::{Section, SectionId};
use crate::sections::Sections;

static SECTION_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<section\b([^>]*)>").expect("section tag pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z_:][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

static NAV_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-section\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("nav target pattern is valid")
});

/// What a page's markup declares.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupReport {
    /// The section timeline.
    pub sections: Sections,
    /// `data-section` values that name no section. Clicking them is a no-op.
    pub dangling_targets: Vec<String>,
}

fn attributes(tag_body: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(tag_body)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or_else(String::new, |m| m.as_str().to_owned());
            (name, value)
        })
        .collect()
}

fn parse_start(id: &SectionId, raw: &str) -> Result<f64, TimelineError> {
    let trimmed = raw.trim();
    let invalid = || TimelineError::InvalidStart {
        id: id.to_string(),
        value: raw.to_owned(),
    };
    // `f64::from_str` also accepts "inf" and "NaN"; only plain decimals count.
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(invalid());
    }
    trimmed.parse::<f64>().map_err(|_| invalid())
}

/// Parses every `<section id=".." data-start="..">` in document order.
///
/// Sections without a `data-start` attribute are not part of the timeline and
/// are skipped. A legacy `data-end` attribute is ignored.
///
/// # Errors
///
/// Returns `TimelineError::InvalidId` or `TimelineError::InvalidStart` for a
/// malformed section, and any error of [`Sections::new`].
pub fn parse_sections(html: &str) -> Result<Sections, TimelineError> {
    let mut sections = Vec::new();

    for caps in SECTION_TAG.captures_iter(html) {
        let attrs = attributes(&caps[1]);
        let Some(start) = attrs.get("data-start") else {
            debug!(tag = %caps[0].trim(), "skipping section without data-start");
            continue;
        };
        let id = SectionId::new(attrs.get("id").cloned().unwrap_or_default())?;
        let start = parse_start(&id, start)?;
        sections.push(Section::new(id, start)?);
    }

    Sections::new(sections)
}

/// Every `data-section` value in document order, duplicates included.
#[must_use]
pub fn parse_nav_targets(html: &str) -> Vec<String> {
    NAV_TARGET
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// Parses the timeline and cross-checks the navigation triggers against it.
///
/// # Errors
///
/// Propagates errors from [`parse_sections`].
pub fn parse_page(html: &str) -> Result<MarkupReport, TimelineError> {
    let sections = parse_sections(html)?;

    let mut dangling_targets = Vec::new();
    for target in parse_nav_targets(html) {
        if sections.by_id(&target).is_none() && !dangling_targets.contains(&target) {
            warn!(target = %target, "navigation trigger names an unknown section");
            dangling_targets.push(target);
        }
    }

    Ok(MarkupReport {
        sections,
        dangling_targets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <nav>
          <ul class="nav-list">
            <li class="nav-item" data-section="intro">Intro</li>
            <li class="nav-item" data-section="features">Features</li>
            <li class="nav-item" data-section='pricing'>Pricing</li>
          </ul>
        </nav>
        <div class="mobile-menu">
          <li data-section="intro">Intro</li>
          <li data-section="faq">FAQ</li>
        </div>
        <div class="content-carousel">
          <section id="intro" class="active" data-start="0">
            <h2>Intro</h2>
          </section>
          <SECTION data-start='30.5' ID="features" data-end="75">
            <h2>Features</h2>
          </SECTION>
          <section
              id="pricing"
              data-start="75">
            <a class="link" href="#features">Back</a>
          </section>
        </div>
        <section class="footer"></section>
    "##;

    #[test]
    fn test_parse_sections_reads_ids_and_starts_in_order() {
        // Act
        let sections = parse_sections(PAGE).unwrap();

        // Assert
        let parsed: Vec<(&str, f64)> = sections
            .iter()
            .map(|s| (s.id().as_str(), s.start()))
            .collect();
        assert_eq!(
            parsed,
            vec![("intro", 0.0), ("features", 30.5), ("pricing", 75.0)]
        );
    }

    #[test]
    fn test_parse_nav_targets_handles_both_quote_styles() {
        assert_eq!(
            parse_nav_targets(PAGE),
            vec!["intro", "features", "pricing", "intro", "faq"]
        );
    }

    #[test]
    fn test_parse_page_reports_dangling_targets_once() {
        let report = parse_page(PAGE).unwrap();
        assert_eq!(report.sections.len(), 3);
        assert_eq!(report.dangling_targets, vec!["faq".to_owned()]);
    }

    #[test]
    fn test_parse_sections_rejects_non_numeric_start() {
        let html = r#"<section id="intro" data-start="soon"></section>"#;
        assert_eq!(
            parse_sections(html),
            Err(TimelineError::InvalidStart {
                id: "intro".into(),
                value: "soon".into(),
            })
        );

        let html = r#"<section id="intro" data-start="NaN"></section>"#;
        assert!(parse_sections(html).is_err());
    }

    #[test]
    fn test_parse_sections_requires_id_when_timed() {
        let html = r#"<section data-start="0"></section>"#;
        assert_eq!(
            parse_sections(html),
            Err(TimelineError::InvalidId(String::new()))
        );
    }

    #[test]
    fn test_parse_sections_without_timed_sections_is_empty_error() {
        let html = r#"<section class="hero"></section>"#;
        assert_eq!(parse_sections(html), Err(TimelineError::Empty));
    }
}
