// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link rules: empty links and the skip link.

use crate::audit::Rule;
use crate::document::{Document, DocumentError, Query};
use crate::findings::{Finding, Severity};

/// Words that mark an in-page link as a skip link
pub const SKIP_LINK_KEYWORDS: &[&str] = &["skip", "jump", "main"];

/// Rule 4: every link has content or an accessible name attribute
pub struct EmptyLinkRule;

impl Rule for EmptyLinkRule {
    fn id(&self) -> &'static str {
        "empty-links"
    }

    fn description(&self) -> &'static str {
        "Links must have content, aria-label or aria-labelledby"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        let candidates = doc.query(
            &Query::tag("a")
                .without_attr("aria-label")
                .without_attr("aria-labelledby"),
        )?;

        let mut empty = 0;
        for link in candidates {
            if !doc.has_child_nodes(link)? {
                empty += 1;
            }
        }

        if empty == 0 {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            self.id(),
            self.severity(),
            format!("{} empty links without accessible names", empty),
        )))
    }
}

/// Rule 8: an in-page link lets keyboard users bypass navigation
pub struct SkipLinkRule;

impl Rule for SkipLinkRule {
    fn id(&self) -> &'static str {
        "skip-link"
    }

    fn description(&self) -> &'static str {
        "Page should offer a skip link to the main content"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        for link in doc.query(&Query::tag("a"))? {
            let Some(href) = doc.attribute(link, "href")? else {
                continue;
            };
            if !href.contains('#') {
                continue;
            }
            let text = doc.text_content(link)?.to_lowercase();
            if SKIP_LINK_KEYWORDS.iter().any(|k| text.contains(k)) {
                return Ok(None);
            }
        }

        Ok(Some(Finding::new(
            self.id(),
            self.severity(),
            "No skip link found for keyboard users",
        )))
    }
}
