// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form controls without a label.

use crate::audit::Rule;
use crate::document::{Document, DocumentError, ElementId, Query};
use crate::findings::{Finding, Severity};

/// Elements that accept user input
pub const FORM_CONTROL_TAGS: &[&str] = &["input", "select", "textarea"];

/// Rule 3: every visible form control has a label
pub struct FormLabelRule;

impl Rule for FormLabelRule {
    fn id(&self) -> &'static str {
        "form-labels"
    }

    fn description(&self) -> &'static str {
        "Form controls must have a label, aria-label or aria-labelledby"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        let missing = count_unlabelled_controls(doc)?;
        if missing == 0 {
            return Ok(None);
        }
        Ok(Some(Finding::new(
            self.id(),
            self.severity(),
            format!("{} form controls missing labels", missing),
        )))
    }
}

/// Count `input`, `select` and `textarea` elements (hidden inputs excluded)
/// with no `<label for>`, `aria-label` or `aria-labelledby`.
pub fn count_unlabelled_controls(doc: &dyn Document) -> Result<usize, DocumentError> {
    let mut missing = 0;
    for control in doc.query(&Query::tags(FORM_CONTROL_TAGS))? {
        if is_hidden_input(doc, control)? {
            continue;
        }
        if !has_label(doc, control)? {
            missing += 1;
        }
    }
    Ok(missing)
}

/// `type` is an enumerated attribute: matched ignoring case but not
/// whitespace, so `" hidden "` is an invalid type and renders as a text box.
fn is_hidden_input(doc: &dyn Document, control: ElementId) -> Result<bool, DocumentError> {
    if doc.tag_name(control)? != "input" {
        return Ok(false);
    }
    Ok(doc
        .attribute(control, "type")?
        .is_some_and(|t| t.eq_ignore_ascii_case("hidden")))
}

fn has_label(doc: &dyn Document, control: ElementId) -> Result<bool, DocumentError> {
    if let Some(id) = non_empty(doc.attribute(control, "id")?) {
        if !doc.query(&Query::tag("label").with_attr_value("for", &id))?.is_empty() {
            return Ok(true);
        }
    }
    Ok(non_empty(doc.attribute(control, "aria-label")?).is_some()
        || non_empty(doc.attribute(control, "aria-labelledby")?).is_some())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
