// SPDX-License-Identifier: PMPL-1.0-or-later
//! Screen-reader preview: what an assistive tool would announce for one
//! element (role, accessible name or text, hidden state, link/button kind).

use crate::document::html::HtmlDocument;
use crate::document::{Document, DocumentError, ElementId};
use crate::error;
use crate::roles::implicit_role;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Longest text excerpt shown before truncation
pub const MAX_TEXT_CHARS: usize = 50;

/// Interactive kind announced after the role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElementKind {
    Link,
    Button,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Link => write!(f, "Link"),
            ElementKind::Button => write!(f, "Button"),
        }
    }
}

/// Announcement for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenReaderPreview {
    pub role: Option<String>,
    pub label: Option<String>,
    /// Trimmed text content, only when there is no label
    pub text: Option<String>,
    pub hidden: bool,
    pub kind: Option<ElementKind>,
}

impl ScreenReaderPreview {
    /// Nothing would be announced apart from the hidden state.
    pub fn is_missing_attributes(&self) -> bool {
        self.role.is_none()
            && self.label.is_none()
            && self.text.is_none()
            && !self.hidden
            && self.kind.is_none()
    }
}

impl fmt::Display for ScreenReaderPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing_attributes() {
            writeln!(f, "Missing accessibility attributes!")?;
            return write!(f, "This element may not be properly announced by screen readers.");
        }
        if let Some(role) = &self.role {
            writeln!(f, "Role: {}", role)?;
        }
        if let Some(label) = &self.label {
            writeln!(f, "Label: {}", label)?;
        } else if let Some(text) = &self.text {
            writeln!(f, "Text: {}", text)?;
        }
        write!(f, "Hidden: {}", if self.hidden { "Yes" } else { "No" })?;
        if let Some(kind) = self.kind {
            write!(f, "\nType: {}", kind)?;
        }
        Ok(())
    }
}

/// Build the preview for `element`
pub fn describe(doc: &dyn Document, element: ElementId) -> Result<ScreenReaderPreview, DocumentError> {
    let tag = doc.tag_name(element)?;
    let input_type = doc.attribute(element, "type")?;

    let role = match non_empty(doc.attribute(element, "role")?) {
        Some(role) => Some(role),
        None => implicit_role(&tag, input_type.as_deref()).map(String::from),
    };

    let mut label = None;
    for name in ["aria-label", "alt", "title"] {
        label = non_empty(doc.attribute(element, name)?);
        if label.is_some() {
            break;
        }
    }
    if label.is_none() && tag == "input" {
        label = non_empty(doc.attribute(element, "placeholder")?);
    }

    let text = if label.is_none() {
        let content = doc.text_content(element)?;
        let trimmed = content.trim();
        (!trimmed.is_empty()).then(|| truncate(trimmed))
    } else {
        None
    };

    let hidden = doc.attribute(element, "aria-hidden")?.as_deref() == Some("true");

    let is_button_input = tag == "input"
        && input_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("button"));
    let kind = if tag == "a" && non_empty(doc.attribute(element, "href")?).is_some() {
        Some(ElementKind::Link)
    } else if tag == "button" || is_button_input {
        Some(ElementKind::Button)
    } else {
        None
    };

    Ok(ScreenReaderPreview { role, label, text, hidden, kind })
}

/// Preview of one element matched in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementPreview {
    pub tag: String,
    pub element: usize,
    pub preview: ScreenReaderPreview,
}

/// Describe every element of an HTML file matching a CSS selector
pub fn preview_file(path: &Path, selector: &str) -> error::Result<Vec<ElementPreview>> {
    let content = std::fs::read_to_string(path)?;
    let doc = HtmlDocument::parse(&content);
    let mut previews = Vec::new();
    for element in doc.select(selector)? {
        previews.push(ElementPreview {
            tag: doc.tag_name(element)?,
            element: element.0,
            preview: describe(&doc, element)?,
        });
    }
    Ok(previews)
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(html: &str, css: &str) -> ScreenReaderPreview {
        let doc = HtmlDocument::parse(html);
        let element = doc.select(css).unwrap()[0];
        describe(&doc, element).unwrap()
    }

    #[test]
    fn test_link() {
        let p = preview(r#"<a href="/docs">Read the docs</a>"#, "a");
        assert_eq!(p.role.as_deref(), Some("link"));
        assert_eq!(p.label, None);
        assert_eq!(p.text.as_deref(), Some("Read the docs"));
        assert_eq!(p.kind, Some(ElementKind::Link));
        assert!(!p.hidden);
        assert_eq!(p.to_string(), "Role: link\nText: Read the docs\nHidden: No\nType: Link");
    }

    #[test]
    fn test_explicit_role_and_label() {
        let p = preview(r#"<div role="dialog" aria-label="Settings" aria-hidden="true">x</div>"#, "div");
        assert_eq!(p.role.as_deref(), Some("dialog"));
        assert_eq!(p.label.as_deref(), Some("Settings"));
        assert_eq!(p.text, None);
        assert!(p.hidden);
    }

    #[test]
    fn test_label_precedence() {
        let p = preview(r#"<img src="a.png" alt="" title="Company logo">"#, "img");
        assert_eq!(p.label.as_deref(), Some("Company logo"));

        let p = preview(r#"<input type="search" placeholder="Search site">"#, "input");
        assert_eq!(p.role.as_deref(), Some("searchbox"));
        assert_eq!(p.label.as_deref(), Some("Search site"));

        // Placeholder only names inputs
        let p = preview(r#"<textarea placeholder="Notes"></textarea>"#, "textarea");
        assert_eq!(p.label, None);
    }

    #[test]
    fn test_buttons() {
        assert_eq!(preview("<button>Save</button>", "button").kind, Some(ElementKind::Button));
        let p = preview(r#"<input type="button" value="Go">"#, "input");
        assert_eq!(p.kind, Some(ElementKind::Button));
        assert_eq!(p.role.as_deref(), Some("button"));

        // The kind ignores case, the role lookup does not
        let p = preview(r#"<input type="BUTTON">"#, "input");
        assert_eq!(p.kind, Some(ElementKind::Button));
        assert_eq!(p.role.as_deref(), Some("textbox"));

        assert_eq!(preview(r#"<input type=" button ">"#, "input").kind, None);
    }

    #[test]
    fn test_text_truncated() {
        let long = "a".repeat(60);
        let p = preview(&format!("<p>  {}  </p>", long), "p");
        assert_eq!(p.text, Some(format!("{}...", "a".repeat(50))));

        let exact = "b".repeat(50);
        let p = preview(&format!("<p>{}</p>", exact), "p");
        assert_eq!(p.text, Some(exact));
    }

    #[test]
    fn test_missing_attributes() {
        let p = preview("<div><span></span></div>", "span");
        assert!(p.is_missing_attributes());
        assert!(p.to_string().starts_with("Missing accessibility attributes!"));

        // An anchor without href is still a link by role
        assert!(!preview("<a></a>", "a").is_missing_attributes());
    }
}
