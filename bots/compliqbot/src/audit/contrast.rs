// SPDX-License-Identifier: PMPL-1.0-or-later
//! Low-contrast heuristic.
//!
//! A cheap proxy for contrast checking, not a luminance-ratio computation.
//! Each rendered text element whose foreground and background are both
//! light (channel average above 200) counts once; both very dark (average
//! below 50) counts once more. Colors are classified from their textual
//! `rgb(...)`/`rgba(...)` form with alpha ignored; anything else is neither
//! light nor dark.

use crate::audit::Rule;
use crate::document::{Document, DocumentError, Query};
use crate::findings::{Finding, Severity};
use regex::Regex;
use std::sync::LazyLock;
use tracing::trace;

/// Tags whose text is inspected
pub const TEXT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "a", "span", "div", "button", "label",
];

const LIGHT_THRESHOLD: f64 = 200.0;
const DARK_THRESHOLD: f64 = 50.0;

static RGBA_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rgba\((\d+),\s*(\d+),\s*(\d+),\s*[\d.]+\)").expect("valid regex")
});

static RGB_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rgb\((\d+),\s*(\d+),\s*(\d+)\)").expect("valid regex"));

/// Rule 2: no text drawn light-on-light or dark-on-dark
pub struct ContrastRule;

impl Rule for ContrastRule {
    fn id(&self) -> &'static str {
        "contrast"
    }

    fn description(&self) -> &'static str {
        "Text and background colors must not both be light or both be very dark"
    }

    fn severity(&self) -> Severity {
        Severity::Serious
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        let issues = count_contrast_issues(doc)?;
        if issues == 0 {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            self.id(),
            self.severity(),
            format!("{} potential contrast issues detected", issues),
        )))
    }
}

/// Count flagged color pairs over all rendered text elements. One element
/// can contribute at most 2.
pub fn count_contrast_issues(doc: &dyn Document) -> Result<usize, DocumentError> {
    let mut issues = 0;

    for element in doc.query(&Query::tags(TEXT_TAGS))? {
        if doc.text_content(element)?.trim().is_empty() || !doc.is_rendered(element)? {
            continue;
        }

        let color = doc.computed_style(element, "color")?.unwrap_or_default();
        let background = doc
            .computed_style(element, "background-color")?
            .unwrap_or_default();

        if is_light_color(&color) && is_light_color(&background) {
            trace!(%element, %color, %background, "Light text on light background");
            issues += 1;
        }
        if is_very_dark_color(&color) && is_very_dark_color(&background) {
            trace!(%element, %color, %background, "Dark text on dark background");
            issues += 1;
        }
    }

    Ok(issues)
}

/// Channel average above 200
pub fn is_light_color(color: &str) -> bool {
    channel_average(color).is_some_and(|avg| avg > LIGHT_THRESHOLD)
}

/// Channel average below 50
pub fn is_very_dark_color(color: &str) -> bool {
    channel_average(color).is_some_and(|avg| avg < DARK_THRESHOLD)
}

fn channel_average(color: &str) -> Option<f64> {
    let caps = if color.starts_with("rgba") {
        RGBA_COLOR.captures(color).or_else(|| RGB_COLOR.captures(color))
    } else if color.starts_with("rgb") {
        RGB_COLOR.captures(color)
    } else {
        None
    }?;

    let mut sum = 0.0;
    for i in 1..=3 {
        sum += caps[i].parse::<f64>().ok()?;
    }
    Some(sum / 3.0)
}
