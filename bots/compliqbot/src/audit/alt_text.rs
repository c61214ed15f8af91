// SPDX-License-Identifier: PMPL-1.0-or-later
//! Images without an `alt` attribute.
//!
//! Only a missing attribute fails; `alt=""` marks a decorative image and is
//! accepted.

use crate::audit::Rule;
use crate::document::{Document, DocumentError, Query};
use crate::findings::{Finding, Severity};

/// Rule 1: every `<img>` carries alternative text
pub struct ImageAltRule;

impl Rule for ImageAltRule {
    fn id(&self) -> &'static str {
        "image-alt"
    }

    fn description(&self) -> &'static str {
        "Images must have an alt attribute"
    }

    fn severity(&self) -> Severity {
        Severity::Serious
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        let missing = doc.query(&Query::tag("img").without_attr("alt"))?.len();
        if missing == 0 {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            self.id(),
            self.severity(),
            format!("{} images missing alt text", missing),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::html::HtmlDocument;

    fn evaluate(html: &str) -> Option<Finding> {
        ImageAltRule.evaluate(&HtmlDocument::parse(html)).unwrap()
    }

    #[test]
    fn test_all_images_described() {
        assert!(evaluate(r#"<img src="a.png" alt="Chart"><img src="b.png" alt="">"#).is_none());
    }

    #[test]
    fn test_counts_missing_alt() {
        let finding = evaluate(r#"<img src="a.png"><img src="b.png" alt="x"><IMG SRC="c.png">"#)
            .expect("finding");
        assert_eq!(finding.message, "2 images missing alt text");
        assert_eq!(finding.severity, Severity::Serious);
        assert_eq!(finding.rule_id, "image-alt");
    }

    #[test]
    fn test_no_images() {
        assert!(evaluate("<p>text only</p>").is_none());
    }
}
