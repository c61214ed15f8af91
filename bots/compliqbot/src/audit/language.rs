// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document language.

use crate::audit::Rule;
use crate::document::{Document, DocumentError};
use crate::findings::{Finding, Severity};

/// Rule 5: the root element declares a non-empty `lang`
pub struct DocumentLanguageRule;

impl Rule for DocumentLanguageRule {
    fn id(&self) -> &'static str {
        "document-language"
    }

    fn description(&self) -> &'static str {
        "The html element must have a lang attribute"
    }

    fn severity(&self) -> Severity {
        Severity::Moderate
    }

    fn evaluate(&self, doc: &dyn Document) -> Result<Option<Finding>, DocumentError> {
        let root = doc.root_element()?;
        match doc.attribute(root, "lang")? {
            Some(lang) if !lang.is_empty() => Ok(None),
            _ => Ok(Some(Finding::new(
                self.id(),
                self.severity(),
                "Page language is not specified",
            ))),
        }
    }
}
