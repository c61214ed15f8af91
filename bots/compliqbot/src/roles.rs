// SPDX-License-Identifier: PMPL-1.0-or-later
//! Implicit ARIA roles of HTML elements.
//!
//! Used by the screen-reader preview; the audit score does not depend on it.

/// Default role of an element, from its tag name and, for `input`, its
/// `type` attribute. `None` for elements without a mapped role.
pub fn implicit_role(tag: &str, type_attr: Option<&str>) -> Option<&'static str> {
    let role = match tag.to_ascii_lowercase().as_str() {
        "a" => "link",
        "article" => "article",
        "aside" => "complementary",
        "button" => "button",
        "footer" => "contentinfo",
        "form" => "form",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "header" => "banner",
        "img" => "img",
        "input" => input_role(type_attr),
        "li" => "listitem",
        "main" => "main",
        "nav" => "navigation",
        "ol" | "ul" => "list",
        "section" => "region",
        "select" => "combobox",
        "table" => "table",
        _ => return None,
    };
    Some(role)
}

/// Role of an `input` by its raw `type` attribute. The match is exact, so
/// `Button` or ` radio` fall back like unknown or absent types: text boxes.
pub fn input_role(type_attr: Option<&str>) -> &'static str {
    match type_attr {
        Some("button") => "button",
        Some("checkbox") => "checkbox",
        Some("radio") => "radio",
        Some("range") => "slider",
        Some("search") => "searchbox",
        _ => "textbox",
    }
}
