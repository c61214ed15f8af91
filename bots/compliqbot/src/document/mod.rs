// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document query capability consumed by the audit engine.
//!
//! The audit never touches a concrete DOM. It reads a snapshot through the
//! [`Document`] trait: attribute lookup, descendant queries by tag and
//! attribute predicates, computed-style lookup, text content and
//! rendered-ness. Any host (a headless browser bridge, a parsed HTML tree)
//! can supply one; [`html::HtmlDocument`] is the implementation shipped here.
//!
//! Every query is fallible so a host whose lookups break mid-pass can report
//! it; the audit turns such errors into its fallback result.

pub mod html;

use std::fmt;
use thiserror::Error;

/// Errors raised by a [`Document`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("query for {what} failed: {reason}")]
    Query { what: String, reason: String },

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("element {0} is not part of this document")]
    Detached(ElementId),
}

impl DocumentError {
    /// Build a [`DocumentError::Query`].
    pub fn query(what: impl Into<String>, reason: impl Into<String>) -> Self {
        DocumentError::Query { what: what.into(), reason: reason.into() }
    }
}

/// Opaque handle to an element inside one document snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute predicate used by [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrFilter {
    /// Attribute is present (any value, including empty).
    Present(String),
    /// Attribute is absent.
    Absent(String),
    /// Attribute is present with exactly this value.
    Equals(String, String),
}

/// A descendant query: elements whose tag is one of `tags` (any tag when
/// empty) and which satisfy every attribute filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    tags: Vec<String>,
    filters: Vec<AttrFilter>,
}

impl Query {
    /// Match any of the given tag names (case-insensitive).
    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tags: tags.into_iter().map(|t| t.as_ref().to_ascii_lowercase()).collect(),
            filters: Vec::new(),
        }
    }

    /// Match a single tag name.
    pub fn tag(tag: &str) -> Self {
        Self::tags([tag])
    }

    /// Require the attribute to be present.
    pub fn with_attr(mut self, name: &str) -> Self {
        self.filters.push(AttrFilter::Present(name.to_ascii_lowercase()));
        self
    }

    /// Require the attribute to be absent.
    pub fn without_attr(mut self, name: &str) -> Self {
        self.filters.push(AttrFilter::Absent(name.to_ascii_lowercase()));
        self
    }

    /// Require the attribute to equal `value`.
    pub fn with_attr_value(mut self, name: &str, value: &str) -> Self {
        self.filters
            .push(AttrFilter::Equals(name.to_ascii_lowercase(), value.to_string()));
        self
    }

    /// Tag names this query accepts; empty means any.
    pub fn tag_names(&self) -> &[String] {
        &self.tags
    }

    /// Attribute filters, all of which must hold.
    pub fn filters(&self) -> &[AttrFilter] {
        &self.filters
    }

    /// Evaluate the query against one element, given its lowercase tag name
    /// and an attribute lookup.
    pub fn matches<'a, F>(&self, tag: &str, attr: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        if !self.tags.is_empty() && !self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.filters.iter().all(|f| match f {
            AttrFilter::Present(name) => attr(name.as_str()).is_some(),
            AttrFilter::Absent(name) => attr(name.as_str()).is_none(),
            AttrFilter::Equals(name, value) => attr(name.as_str()) == Some(value.as_str()),
        })
    }
}

/// Read-only view of a document snapshot.
pub trait Document {
    /// The root element (`<html>`).
    fn root_element(&self) -> Result<ElementId, DocumentError>;

    /// All elements matching `query`, in document order.
    fn query(&self, query: &Query) -> Result<Vec<ElementId>, DocumentError>;

    /// Lowercase tag name of an element.
    fn tag_name(&self, element: ElementId) -> Result<String, DocumentError>;

    /// Value of an attribute, `None` when absent.
    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, DocumentError>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, element: ElementId) -> Result<String, DocumentError>;

    /// Whether the element has any element or text children. An element
    /// without any matches CSS `:empty`.
    fn has_child_nodes(&self, element: ElementId) -> Result<bool, DocumentError>;

    /// Computed value of a style property in `rgb(...)`/`rgba(...)` form for
    /// colors, `None` when the host cannot resolve it.
    fn computed_style(
        &self,
        element: ElementId,
        property: &str,
    ) -> Result<Option<String>, DocumentError>;

    /// Whether the element produces a layout box.
    fn is_rendered(&self, element: ElementId) -> Result<bool, DocumentError>;

    /// Document title, `None` when the document has none.
    fn title(&self) -> Result<Option<String>, DocumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> + 'a {
        move |name| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[test]
    fn test_query_tag_match() {
        let q = Query::tags(["H1", "h2"]);
        assert!(q.matches("h1", attrs(&[])));
        assert!(q.matches("h2", attrs(&[])));
        assert!(!q.matches("h3", attrs(&[])));
    }

    #[test]
    fn test_query_attribute_filters() {
        let q = Query::tag("img").without_attr("alt");
        assert!(q.matches("img", attrs(&[("src", "a.png")])));
        assert!(!q.matches("img", attrs(&[("alt", "")])));

        let q = Query::tag("label").with_attr_value("for", "email");
        assert!(q.matches("label", attrs(&[("for", "email")])));
        assert!(!q.matches("label", attrs(&[("for", "name")])));
        assert!(!q.matches("label", attrs(&[])));
    }

    #[test]
    fn test_empty_query_matches_any_tag() {
        let q = Query::default().with_attr("role");
        assert!(q.matches("div", attrs(&[("role", "banner")])));
        assert!(!q.matches("div", attrs(&[])));
    }

    #[test]
    fn test_error_display() {
        let err = DocumentError::query("img", "tree unavailable");
        assert_eq!(err.to_string(), "query for img failed: tree unavailable");
        assert_eq!(
            DocumentError::Detached(ElementId(7)).to_string(),
            "element #7 is not part of this document"
        );
    }
}
