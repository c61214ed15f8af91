// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compliqbot - heuristic page accessibility audit
//!
//! Compliqbot runs a fixed set of eight accessibility rules over a document
//! snapshot and reports a 0-100 score with one finding per failed rule. The
//! engine reads pages through the [`document::Document`] trait, so any host
//! can feed it; [`document::html::HtmlDocument`] audits plain HTML files.
//!
//! ## Rules
//!
//! 1. **Image alt**: `<img>` without an `alt` attribute (serious)
//! 2. **Contrast**: light-on-light or dark-on-dark text (serious)
//! 3. **Form labels**: controls without label, `aria-label` or `aria-labelledby` (critical)
//! 4. **Empty links**: anchors with no content or accessible name (critical)
//! 5. **Language**: missing `lang` on the root element (moderate)
//! 6. **Title**: missing or blank page title (serious)
//! 7. **Headings**: no headings (serious) or no `h1` (moderate)
//! 8. **Skip link**: no in-page link to skip to the main content (moderate)
//!
//! ## Simulation helpers
//!
//! Alongside the audit, [`preview`] shows what a screen reader would announce
//! for an element and [`simulation`] models impairment simulation toggles and
//! the color-vision deficiency transforms.

pub mod audit;
pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod findings;
pub mod preview;
pub mod report;
pub mod roles;
pub mod scanner;
pub mod simulation;

pub use audit::run_audit;
pub use findings::{AuditResult, Finding, Severity};
