// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audits HTML files on disk.
//!
//! Walks directory trees, picks the configured page extensions and runs the
//! audit on each page.

use crate::audit::run_audit;
use crate::config::ScanConfig;
use crate::document::html::HtmlDocument;
use crate::error::Result;
use crate::findings::AuditResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Audit outcome for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAudit {
    pub path: PathBuf,
    pub audited_at: DateTime<Utc>,
    pub result: AuditResult,
}

/// Audit HTML already in memory
pub fn audit_html(path: &Path, content: &str) -> PageAudit {
    let doc = HtmlDocument::parse(content);
    let result = run_audit(&doc);
    debug!(
        path = %path.display(),
        elements = doc.len(),
        score = result.score,
        "Audited page"
    );
    PageAudit {
        path: path.to_path_buf(),
        audited_at: Utc::now(),
        result,
    }
}

/// Audit a single HTML file
pub fn scan_file(path: &Path) -> Result<PageAudit> {
    let content = std::fs::read_to_string(path)?;
    Ok(audit_html(path, &content))
}

/// Audit every page under `dir`, ordered by path
pub fn scan_directory(dir: &Path, config: &ScanConfig) -> Result<Vec<PageAudit>> {
    let mut audits = Vec::new();

    info!("Scanning directory: {}", dir.display());

    for entry in WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            // Skip hidden and excluded directories, but never the root itself
            let name = e.file_name().to_str().unwrap_or("");
            if e.depth() > 0 && e.file_type().is_dir() {
                return !config.exclude.iter().any(|x| x == name) && !name.starts_with('.');
            }
            true
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !config.is_page(entry.path()) {
            continue;
        }

        match scan_file(entry.path()) {
            Ok(audit) => audits.push(audit),
            Err(e) => info!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    audits.sort_by(|a, b| a.path.cmp(&b.path));

    let issues: usize = audits.iter().map(|a| a.result.issues.len()).sum();
    info!("Audited {} pages, found {} issues", audits.len(), issues);

    Ok(audits)
}
