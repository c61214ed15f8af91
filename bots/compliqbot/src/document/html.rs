// SPDX-License-Identifier: PMPL-1.0-or-later
//! [`Document`] implementation over a parsed HTML tree.
//!
//! The page is parsed once with `scraper` and flattened into an owned
//! snapshot of element records in document order; `ElementId(n)` is the n-th
//! element in that order. Computed styles are resolved from inline `style`
//! declarations only:
//! - `color` inherits from the nearest ancestor that declares a parseable color
//! - `background-color` (or a color inside `background`) is never inherited
//! - colors are normalized to `rgb(r, g, b)` / `rgba(r, g, b, a)`
//!
//! Properties nobody declared resolve to `None`.

use super::{Document, DocumentError, ElementId, Query};
use crate::color::{parse_color, parse_rgb_function};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Elements that never produce a layout box, nor do their descendants.
const NON_RENDERED_TAGS: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "template", "noscript",
];

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

static RGB_IN_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rgba?\([^)]*\)").expect("valid regex"));

#[derive(Debug)]
enum ChildNode {
    Element(usize),
    Text(String),
}

#[derive(Debug)]
struct ElementRecord {
    tag: String,
    /// False for foreign content such as `<svg>` and `<math>` subtrees.
    html_namespace: bool,
    attrs: Vec<(String, String)>,
    /// Inline style declarations in source order, property lowercased.
    declarations: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<ChildNode>,
}

impl ElementRecord {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last declared value for any of `properties` (later declarations win).
    fn declared(&self, properties: &[&str]) -> Option<(&str, &str)> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| properties.contains(&p.as_str()))
            .map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

/// A parsed HTML page exposed through the [`Document`] trait.
pub struct HtmlDocument {
    html: Html,
    records: Vec<ElementRecord>,
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("elements", &self.records.len())
            .finish()
    }
}

impl HtmlDocument {
    /// Parse a full HTML document. Parsing is lenient and never fails.
    pub fn parse(content: &str) -> Self {
        let html = Html::parse_document(content);
        let records = flatten(html.root_element());
        Self { html, records }
    }

    /// Number of elements in the snapshot.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no elements.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Elements matching a CSS selector, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<ElementId>, DocumentError> {
        let selector =
            Selector::parse(css).map_err(|_| DocumentError::InvalidSelector(css.to_string()))?;
        Ok(self
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .map(|(idx, _)| ElementId(idx))
            .collect())
    }

    fn record(&self, id: ElementId) -> Result<&ElementRecord, DocumentError> {
        self.records.get(id.0).ok_or(DocumentError::Detached(id))
    }

    /// The record itself followed by its ancestors up to the root.
    fn lineage(&self, id: ElementId) -> Result<Vec<&ElementRecord>, DocumentError> {
        let mut chain = vec![self.record(id)?];
        let mut cur = chain[0].parent;
        while let Some(idx) = cur {
            let rec = self.record(ElementId(idx))?;
            chain.push(rec);
            cur = rec.parent;
        }
        Ok(chain)
    }

    fn collect_text(&self, id: ElementId) -> Result<String, DocumentError> {
        let mut out = String::new();
        // Children go on in reverse so they pop off in document order
        let mut pending: Vec<&ChildNode> = self.record(id)?.children.iter().rev().collect();
        while let Some(child) = pending.pop() {
            match child {
                ChildNode::Text(text) => out.push_str(text),
                ChildNode::Element(idx) => {
                    pending.extend(self.record(ElementId(*idx))?.children.iter().rev())
                }
            }
        }
        Ok(out)
    }
}

/// Flatten the tree under `root` into element records in document order.
///
/// The walk is a single pre-order pass, so every parent is recorded before
/// its children and nesting depth costs no stack.
fn flatten(root: ElementRef<'_>) -> Vec<ElementRecord> {
    let mut records: Vec<ElementRecord> = Vec::new();
    let mut index_of: HashMap<_, usize> = HashMap::new();

    for node in root.descendants() {
        let parent = node.parent().and_then(|p| index_of.get(&p.id()).copied());
        let child = match node.value() {
            Node::Element(value) => {
                let index = records.len();
                records.push(ElementRecord {
                    tag: value.name().to_ascii_lowercase(),
                    html_namespace: &*value.name.ns == HTML_NAMESPACE,
                    attrs: value
                        .attrs()
                        .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                        .collect(),
                    declarations: value.attr("style").map(parse_declarations).unwrap_or_default(),
                    parent,
                    children: Vec::new(),
                });
                index_of.insert(node.id(), index);
                ChildNode::Element(index)
            }
            Node::Text(text) => {
                let text: &str = text;
                ChildNode::Text(text.to_string())
            }
            // Comments and processing instructions don't count as content
            _ => continue,
        };
        if let Some(parent) = parent {
            records[parent].children.push(child);
        }
    }
    records
}

/// Split an inline `style` attribute into `(property, value)` pairs.
fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            let value = value
                .strip_suffix("!important")
                .map(str::trim_end)
                .unwrap_or(value);
            if prop.is_empty() || value.is_empty() {
                None
            } else {
                Some((prop, value.to_string()))
            }
        })
        .collect()
}

/// Find a color inside a `background` shorthand value.
fn color_in_background(value: &str) -> Option<String> {
    if let Some(rgb) = parse_color(value) {
        return Some(rgb.to_string());
    }
    if let Some(m) = RGB_IN_VALUE.find(value) {
        if let Some(rgb) = parse_rgb_function(&m.as_str().to_lowercase()) {
            return Some(rgb.to_string());
        }
    }
    value
        .split_whitespace()
        .find_map(parse_color)
        .map(|rgb| rgb.to_string())
}

impl Document for HtmlDocument {
    fn root_element(&self) -> Result<ElementId, DocumentError> {
        if self.records.is_empty() {
            Err(DocumentError::query("root element", "document has no elements"))
        } else {
            Ok(ElementId(0))
        }
    }

    fn query(&self, query: &Query) -> Result<Vec<ElementId>, DocumentError> {
        Ok(self
            .records
            .iter()
            .enumerate()
            .filter(|(_, rec)| query.matches(&rec.tag, |name| rec.attr(name)))
            .map(|(idx, _)| ElementId(idx))
            .collect())
    }

    fn tag_name(&self, element: ElementId) -> Result<String, DocumentError> {
        Ok(self.record(element)?.tag.clone())
    }

    fn attribute(&self, element: ElementId, name: &str) -> Result<Option<String>, DocumentError> {
        let name = name.to_ascii_lowercase();
        Ok(self.record(element)?.attr(&name).map(String::from))
    }

    fn text_content(&self, element: ElementId) -> Result<String, DocumentError> {
        self.collect_text(element)
    }

    fn has_child_nodes(&self, element: ElementId) -> Result<bool, DocumentError> {
        Ok(!self.record(element)?.children.is_empty())
    }

    fn computed_style(
        &self,
        element: ElementId,
        property: &str,
    ) -> Result<Option<String>, DocumentError> {
        let property = property.to_ascii_lowercase();
        match property.as_str() {
            "color" => Ok(self.lineage(element)?.into_iter().find_map(|rec| {
                rec.declared(&["color"])
                    .and_then(|(_, v)| parse_color(v))
                    .map(|rgb| rgb.to_string())
            })),
            "background-color" => {
                let rec = self.record(element)?;
                Ok(rec
                    .declared(&["background-color", "background"])
                    .and_then(|(prop, value)| match prop {
                        "background" => color_in_background(value),
                        _ => parse_color(value).map(|rgb| rgb.to_string()),
                    }))
            }
            other => Ok(self
                .record(element)?
                .declared(&[other])
                .map(|(_, v)| v.to_string())),
        }
    }

    fn is_rendered(&self, element: ElementId) -> Result<bool, DocumentError> {
        for rec in self.lineage(element)? {
            if NON_RENDERED_TAGS.contains(&rec.tag.as_str()) || rec.attr("hidden").is_some() {
                return Ok(false);
            }
            if let Some((_, display)) = rec.declared(&["display"]) {
                if display.eq_ignore_ascii_case("none") {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    fn title(&self) -> Result<Option<String>, DocumentError> {
        let page_title = self
            .records
            .iter()
            .position(|rec| rec.tag == "title" && rec.html_namespace);
        let Some(idx) = page_title else {
            return Ok(None);
        };
        let raw = self.text_content(ElementId(idx))?;
        Ok(Some(raw.split_whitespace().collect::<Vec<_>>().join(" ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(doc: &HtmlDocument, tag: &str) -> ElementId {
        doc.query(&Query::tag(tag)).unwrap()[0]
    }

    #[test]
    fn test_root_and_lang() {
        let doc = HtmlDocument::parse(r#"<!DOCTYPE html><html lang="en"><body></body></html>"#);
        let root = doc.root_element().unwrap();
        assert_eq!(doc.tag_name(root).unwrap(), "html");
        assert_eq!(doc.attribute(root, "lang").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_query_document_order() {
        let doc = HtmlDocument::parse("<body><h2>b</h2><section><h1>a</h1></section><h3>c</h3></body>");
        let headings = doc.query(&Query::tags(["h1", "h2", "h3"])).unwrap();
        let tags: Vec<String> = headings.iter().map(|h| doc.tag_name(*h).unwrap()).collect();
        assert_eq!(tags, ["h2", "h1", "h3"]);
    }

    #[test]
    fn test_text_content_and_empty() {
        let doc = HtmlDocument::parse(
            r##"<body><a id="x" href="/">Go <b>home</b></a><a id="y" href="#"></a><a id="z" href="#"> </a><a id="c"><!-- note --></a></body>"##,
        );
        let anchors = doc.query(&Query::tag("a")).unwrap();
        assert_eq!(doc.text_content(anchors[0]).unwrap(), "Go home");
        assert!(doc.has_child_nodes(anchors[0]).unwrap());
        assert!(!doc.has_child_nodes(anchors[1]).unwrap());
        // Whitespace text is still a child node
        assert!(doc.has_child_nodes(anchors[2]).unwrap());
        // Comments are not
        assert!(!doc.has_child_nodes(anchors[3]).unwrap());
    }

    #[test]
    fn test_color_inherits_background_does_not() {
        let doc = HtmlDocument::parse(
            r##"<body><div style="color: #eee; background-color: #fff"><p>text</p></div></body>"##,
        );
        let p = first(&doc, "p");
        assert_eq!(doc.computed_style(p, "color").unwrap().as_deref(), Some("rgb(238, 238, 238)"));
        assert_eq!(doc.computed_style(p, "background-color").unwrap(), None);

        let div = first(&doc, "div");
        assert_eq!(
            doc.computed_style(div, "background-color").unwrap().as_deref(),
            Some("rgb(255, 255, 255)")
        );
    }

    #[test]
    fn test_background_shorthand_and_important() {
        let doc = HtmlDocument::parse(
            r#"<body><span style="background: url(x.png) rgb(10, 20, 30) no-repeat; color: white !important">s</span></body>"#,
        );
        let span = first(&doc, "span");
        assert_eq!(
            doc.computed_style(span, "background-color").unwrap().as_deref(),
            Some("rgb(10, 20, 30)")
        );
        assert_eq!(doc.computed_style(span, "color").unwrap().as_deref(), Some("rgb(255, 255, 255)"));
    }

    #[test]
    fn test_later_declaration_wins() {
        let doc = HtmlDocument::parse(
            r#"<body><p style="background-color: black; background: white">x</p></body>"#,
        );
        let p = first(&doc, "p");
        assert_eq!(
            doc.computed_style(p, "background-color").unwrap().as_deref(),
            Some("rgb(255, 255, 255)")
        );
    }

    #[test]
    fn test_rendered() {
        let doc = HtmlDocument::parse(
            r#"<html><head><title>T</title></head><body>
                <p id="a">shown</p>
                <div hidden><p id="b">hidden</p></div>
                <div style="display:none"><span>gone</span></div>
                <template><p>tpl</p></template>
            </body></html>"#,
        );
        let ps = doc.query(&Query::tag("p")).unwrap();
        assert!(doc.is_rendered(ps[0]).unwrap());
        assert!(!doc.is_rendered(ps[1]).unwrap());
        assert!(!doc.is_rendered(first(&doc, "span")).unwrap());
        assert!(!doc.is_rendered(first(&doc, "title")).unwrap());
    }

    #[test]
    fn test_title() {
        let doc = HtmlDocument::parse("<html><head><title>  My \n  Page </title></head></html>");
        assert_eq!(doc.title().unwrap().as_deref(), Some("My Page"));

        let doc = HtmlDocument::parse("<html><head></head><body></body></html>");
        assert_eq!(doc.title().unwrap(), None);
    }

    #[test]
    fn test_svg_title_is_not_page_title() {
        let doc = HtmlDocument::parse(
            "<html><head></head><body><svg><title>Logo</title></svg></body></html>",
        );
        assert_eq!(doc.title().unwrap(), None);

        let doc = HtmlDocument::parse(
            "<html><body><svg><title>Logo</title></svg><title>Real</title></body></html>",
        );
        assert_eq!(doc.title().unwrap().as_deref(), Some("Real"));
    }

    #[test]
    fn test_deeply_nested_page() {
        let depth = 20_000;
        let html = format!(
            "<html><body>{}<span>deep</span>{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let doc = HtmlDocument::parse(&html);
        // html, head, body, the divs and the span
        assert_eq!(doc.len(), depth + 4);

        let root = doc.root_element().unwrap();
        assert_eq!(doc.text_content(root).unwrap(), "deep");
        let span = first(&doc, "span");
        assert!(doc.is_rendered(span).unwrap());
        assert_eq!(doc.computed_style(span, "color").unwrap(), None);
    }

    #[test]
    fn test_select_matches_query_ids() {
        let doc = HtmlDocument::parse(
            r##"<body><nav><a href="/a">A</a></nav><main><a class="skip" href="#m">B</a></main></body>"##,
        );
        let by_css = doc.select("a.skip").unwrap();
        assert_eq!(by_css.len(), 1);
        assert_eq!(doc.text_content(by_css[0]).unwrap(), "B");
        assert_eq!(doc.select("a").unwrap(), doc.query(&Query::tag("a")).unwrap());
        assert!(matches!(doc.select("a[["), Err(DocumentError::InvalidSelector(_))));
    }

    #[test]
    fn test_detached_element() {
        let doc = HtmlDocument::parse("<p>x</p>");
        let bogus = ElementId(doc.len() + 10);
        assert_eq!(doc.tag_name(bogus), Err(DocumentError::Detached(bogus)));
    }
}
