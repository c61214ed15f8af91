// SPDX-License-Identifier: PMPL-1.0-or-later
//! The page audit: eight independent rules over one document snapshot.
//!
//! Rules run in a fixed order that is also the order findings are reported
//! in. Each rule either passes (one point) or appends exactly one finding;
//! the score is the rounded percentage of passed rules.
//!
//! [`run_audit`] never fails. A [`DocumentError`] from any rule, or a panic
//! inside the host's [`Document`] implementation, abandons the whole pass and
//! yields [`AuditResult::failed`] instead of a partial result.

pub mod alt_text;
pub mod contrast;
pub mod forms;
pub mod language;
pub mod links;
pub mod structure;

use crate::document::{Document, DocumentError};
use crate::findings::{AuditResult, Finding, Severity};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, warn};

/// Number of rules contributing to every score.
pub const TOTAL_RULES: usize = 8;

/// Trait implemented by all audit rules
pub trait Rule: Send + Sync {
    /// Stable identifier (e.g. `image-alt`)
    fn id(&self) -> &'static str;

    /// Short description of what this rule checks
    fn description(&self) -> &'static str;

    /// Severity of the finding raised when the rule fails
    fn severity(&self) -> Severity;

    /// Evaluate against the document; `None` means the rule passed
    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError>;
}

/// The rule set, in evaluation and display order
pub fn rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(alt_text::ImageAltRule),
        Box::new(contrast::ContrastRule),
        Box::new(forms::FormLabelRule),
        Box::new(links::EmptyLinkRule),
        Box::new(language::DocumentLanguageRule),
        Box::new(structure::PageTitleRule),
        Box::new(structure::HeadingsRule),
        Box::new(links::SkipLinkRule),
    ]
}

/// Audit a document snapshot
pub fn run_audit(doc: &dyn Document) -> AuditResult {
    match catch_unwind(AssertUnwindSafe(|| evaluate_rules(doc))) {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            warn!(error = %err, "Audit aborted by document error");
            AuditResult::failed(&err.to_string(), TOTAL_RULES)
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!(%reason, "Audit aborted by panic in document host");
            AuditResult::failed(&reason, TOTAL_RULES)
        }
    }
}

fn evaluate_rules(doc: &dyn Document) -> Result<AuditResult, DocumentError> {
    let rules = rules();
    debug_assert_eq!(rules.len(), TOTAL_RULES);

    let mut issues = Vec::new();
    let mut passed = 0;

    for rule in &rules {
        match rule.evaluate(doc)? {
            Some(finding) => {
                debug!(rule = rule.id(), severity = %finding.severity, "Rule failed");
                issues.push(finding);
            }
            None => {
                debug!(rule = rule.id(), "Rule passed");
                passed += 1;
            }
        }
    }

    Ok(AuditResult::new(issues, passed, TOTAL_RULES))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::html::HtmlDocument;
    use crate::document::{ElementId, Query};

    const ACCESSIBLE_PAGE: &str = r##"<!DOCTYPE html>
        <html lang="en">
        <head><title>Accessible page</title></head>
        <body>
            <a href="#main">Skip to main content</a>
            <main id="main">
                <h1>Welcome</h1>
                <h2>Details</h2>
                <p>Plain text with default colors.</p>
                <a href="/about">About us</a>
            </main>
        </body>
        </html>"##;

    /// A host whose every query fails.
    struct BrokenDocument;

    impl Document for BrokenDocument {
        fn root_element(&self) -> Result<ElementId, DocumentError> {
            Err(DocumentError::query("root element", "tree unavailable"))
        }
        fn query(&self, _query: &Query) -> Result<Vec<ElementId>, DocumentError> {
            Err(DocumentError::query("elements", "tree unavailable"))
        }
        fn tag_name(&self, e: ElementId) -> Result<String, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn attribute(&self, e: ElementId, _: &str) -> Result<Option<String>, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn text_content(&self, e: ElementId) -> Result<String, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn has_child_nodes(&self, e: ElementId) -> Result<bool, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn computed_style(&self, e: ElementId, _: &str) -> Result<Option<String>, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn is_rendered(&self, e: ElementId) -> Result<bool, DocumentError> {
            Err(DocumentError::Detached(e))
        }
        fn title(&self) -> Result<Option<String>, DocumentError> {
            Err(DocumentError::query("title", "tree unavailable"))
        }
    }

    /// Delegates to a real document but panics on style lookups.
    struct PanickingStyles(HtmlDocument);

    impl Document for PanickingStyles {
        fn root_element(&self) -> Result<ElementId, DocumentError> {
            self.0.root_element()
        }
        fn query(&self, query: &Query) -> Result<Vec<ElementId>, DocumentError> {
            self.0.query(query)
        }
        fn tag_name(&self, e: ElementId) -> Result<String, DocumentError> {
            self.0.tag_name(e)
        }
        fn attribute(&self, e: ElementId, name: &str) -> Result<Option<String>, DocumentError> {
            self.0.attribute(e, name)
        }
        fn text_content(&self, e: ElementId) -> Result<String, DocumentError> {
            self.0.text_content(e)
        }
        fn has_child_nodes(&self, e: ElementId) -> Result<bool, DocumentError> {
            self.0.has_child_nodes(e)
        }
        fn computed_style(&self, _: ElementId, _: &str) -> Result<Option<String>, DocumentError> {
            panic!("style engine crashed")
        }
        fn is_rendered(&self, e: ElementId) -> Result<bool, DocumentError> {
            self.0.is_rendered(e)
        }
        fn title(&self) -> Result<Option<String>, DocumentError> {
            self.0.title()
        }
    }

    #[test]
    fn test_rule_set_is_fixed() {
        let ids: Vec<&str> = rules().iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            [
                "image-alt",
                "contrast",
                "form-labels",
                "empty-links",
                "document-language",
                "page-title",
                "headings",
                "skip-link",
            ]
        );
    }

    #[test]
    fn test_accessible_page_scores_100() {
        let doc = HtmlDocument::parse(ACCESSIBLE_PAGE);
        let result = run_audit(&doc);
        assert_eq!(result.score, 100, "unexpected issues: {:?}", result.issues);
        assert!(result.issues.is_empty());
        assert_eq!(result.passed_rules, 8);
        assert_eq!(result.total_rules, 8);
        assert!(!result.error);
    }

    #[test]
    fn test_single_missing_alt() {
        let page = ACCESSIBLE_PAGE.replace("<h2>Details</h2>", r#"<img src="chart.png">"#);
        let result = run_audit(&HtmlDocument::parse(&page));
        assert_eq!(result.passed_rules, 7);
        assert_eq!(result.score, 88);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Serious);
        assert_eq!(result.issues[0].message, "1 images missing alt text");
    }

    #[test]
    fn test_empty_page_fails_most_rules() {
        let result = run_audit(&HtmlDocument::parse(""));
        let messages: Vec<&str> = result.issues.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            [
                "Page language is not specified",
                "Page is missing a title",
                "Page has no headings",
                "No skip link found for keyboard users",
            ]
        );
        assert_eq!(result.passed_rules, 4);
        assert_eq!(result.score, 50);
        assert_eq!(result.total_rules, 8);
    }

    #[test]
    fn test_findings_follow_rule_order() {
        let page = r##"<html><body>
            <a href="/x"></a>
            <input type="text">
            <img src="a.png">
            <h2>Sub</h2>
        </body></html>"##;
        let result = run_audit(&HtmlDocument::parse(page));
        let rule_ids: Vec<&str> = result.issues.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(
            rule_ids,
            ["image-alt", "form-labels", "empty-links", "document-language", "page-title", "headings", "skip-link"]
        );
        assert_eq!(result.passed_rules + result.issues.len(), TOTAL_RULES);
    }

    #[test]
    fn test_score_invariant_holds() {
        for page in ["", ACCESSIBLE_PAGE, "<html lang=\"de\"><h3>x</h3></html>"] {
            let result = run_audit(&HtmlDocument::parse(page));
            assert_eq!(result.total_rules, 8);
            let expected = ((result.passed_rules as f64 / 8.0) * 100.0).round() as u8;
            assert_eq!(result.score, expected);
            assert!(result.score <= 100);
        }
    }

    #[test]
    fn test_document_error_yields_fallback() {
        let result = run_audit(&BrokenDocument);
        assert_eq!(result.score, 0);
        assert_eq!(result.passed_rules, 0);
        assert_eq!(result.total_rules, 8);
        assert!(result.error);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Critical);
        assert_eq!(
            result.issues[0].message,
            "Error running tests: query for elements failed: tree unavailable"
        );
    }

    #[test]
    fn test_host_panic_yields_fallback() {
        let page = ACCESSIBLE_PAGE.to_string();
        let result = run_audit(&PanickingStyles(HtmlDocument::parse(&page)));
        assert!(result.error);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].message, "Error running tests: style engine crashed");
    }

    #[test]
    fn test_svg_title_does_not_pass_title_rule() {
        let page = r##"<html lang="en"><head></head><body>
            <a href="#m">skip</a><h1>H</h1><svg><title>Logo</title></svg>
        </body></html>"##;
        let result = run_audit(&HtmlDocument::parse(page));
        assert_eq!(result.passed_rules, 7);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].message, "Page is missing a title");
    }

    #[test]
    fn test_padded_hidden_input_needs_label() {
        let page =
            ACCESSIBLE_PAGE.replace("<h2>Details</h2>", r#"<input type=" hidden " name="t">"#);
        let result = run_audit(&HtmlDocument::parse(&page));
        assert_eq!(result.passed_rules, 7);
        assert_eq!(result.issues[0].message, "1 form controls missing labels");
        assert_eq!(result.issues[0].severity, Severity::Critical);

        let page =
            ACCESSIBLE_PAGE.replace("<h2>Details</h2>", r#"<input type="hidden" name="t">"#);
        assert_eq!(run_audit(&HtmlDocument::parse(&page)).score, 100);
    }

    #[test]
    fn test_deeply_nested_page_is_audited() {
        let depth = 20_000;
        let page = ACCESSIBLE_PAGE.replace(
            "<h2>Details</h2>",
            &format!("{}<h2>Details</h2>{}", "<section>".repeat(depth), "</section>".repeat(depth)),
        );
        let result = run_audit(&HtmlDocument::parse(&page));
        assert!(!result.error);
        assert_eq!(result.score, 100, "unexpected issues: {:?}", result.issues);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let doc = HtmlDocument::parse(r#"<html><body><img src="x"><h2>h</h2></body></html>"#);
        let first = run_audit(&doc);
        let second = run_audit(&doc);
        assert_eq!(first, second);
    }
}
