// SPDX-License-Identifier: PMPL-1.0-or-later
//! Page structure: title and heading outline.

use crate::audit::Rule;
use crate::document::{Document, DocumentError, Query};
use crate::findings::{Finding, Severity};

pub const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Rule 6: the page has a non-blank title
pub struct PageTitleRule;

impl Rule for PageTitleRule {
    fn id(&self) -> &'static str {
        "page-title"
    }

    fn description(&self) -> &'static str {
        "Page must have a non-empty title"
    }

    fn severity(&self) -> Severity {
        Severity::Serious
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        match doc.title()? {
            Some(title) if !title.trim().is_empty() => Ok(None),
            _ => Ok(Some(Finding::new(self.id(), self.severity(), "Page is missing a title"))),
        }
    }
}

/// Rule 7: the page has headings, one of which is an `h1`.
///
/// A page without any heading gets the serious finding only; the missing
/// `h1` is reported on its own, as moderate, when other headings exist.
pub struct HeadingsRule;

impl Rule for HeadingsRule {
    fn id(&self) -> &'static str {
        "headings"
    }

    fn description(&self) -> &'static str {
        "Page must have headings including a main h1"
    }

    fn severity(&self) -> Severity {
        Severity::Serious
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        if doc.query(&Query::tags(HEADING_TAGS))?.is_empty() {
            return Ok(Some(Finding::new(self.id(), self.severity(), "Page has no headings")));
        }
        if doc.query(&Query::tag("h1"))?.is_empty() {
            return Ok(Some(Finding::new(
                self.id(),
                Severity::Moderate,
                "Page has no main heading (h1)",
            )));
        }
        Ok(None)
    }
}
