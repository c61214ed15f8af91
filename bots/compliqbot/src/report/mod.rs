// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for page audits.
//!
//! Supports multiple output formats:
//! - Text: per-page score and findings grouped by severity
//! - JSON: `{ path, auditedAt, result }` records, `result` in audit wire form
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::findings::Severity;
use crate::scanner::PageAudit;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Aggregate figures over a set of audits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub pages: usize,
    pub average_score: u8,
    pub lowest_score: u8,
    pub failed_audits: usize,
}

/// Summarize audits; `None` when there are none
pub fn summarize(audits: &[PageAudit]) -> Option<Summary> {
    if audits.is_empty() {
        return None;
    }
    let total: usize = audits.iter().map(|a| a.result.score as usize).sum();
    let pages = audits.len();
    Some(Summary {
        pages,
        average_score: ((2 * total + pages) / (2 * pages)) as u8,
        lowest_score: audits.iter().map(|a| a.result.score).min().unwrap_or(0),
        failed_audits: audits.iter().filter(|a| a.result.error).count(),
    })
}

/// Generate a report from page audits
pub fn generate_report(audits: &[PageAudit], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(audits),
        OutputFormat::Json => generate_json_report(audits),
        OutputFormat::Sarif => generate_sarif_report(audits),
    }
}

/// Generate human-readable text report
fn generate_text_report(audits: &[PageAudit]) -> String {
    let mut output = String::new();

    output.push_str("=== Compliqbot Accessibility Audit ===\n\n");

    let Some(summary) = summarize(audits) else {
        output.push_str("No pages audited.\n");
        return output;
    };

    for audit in audits {
        let result = &audit.result;
        output.push_str(&format!("{}\n", audit.path.display()));

        if result.error {
            output.push_str("  Audit failed\n");
        } else {
            output.push_str(&format!(
                "  Score: {}/100 ({}), {} of {} rules passed\n",
                result.score,
                result.grade(),
                result.passed_rules,
                result.total_rules
            ));
        }

        if result.issues.is_empty() {
            output.push_str("  No accessibility issues found.\n\n");
            continue;
        }

        for severity in Severity::ALL {
            let sev_findings = result.by_severity(severity);
            if sev_findings.is_empty() {
                continue;
            }

            output.push_str(&format!("  --- {} ({}) ---\n", severity, sev_findings.len()));
            for finding in sev_findings {
                output.push_str(&format!("  [{}] {}\n", finding.rule_id, finding.message));
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Audited {} page(s): average score {}, lowest {}\n",
        summary.pages, summary.average_score, summary.lowest_score
    ));
    if summary.failed_audits > 0 {
        output.push_str(&format!("{} audit(s) could not complete\n", summary.failed_audits));
    }

    output
}

/// Generate JSON report
fn generate_json_report(audits: &[PageAudit]) -> String {
    serde_json::to_string_pretty(audits).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize audits: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
struct SarifRule {
    id: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

/// SARIF level for a severity
fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "error",
        Severity::Serious => "warning",
        Severity::Moderate => "note",
    }
}

/// Generate SARIF report
fn generate_sarif_report(audits: &[PageAudit]) -> String {
    let results: Vec<SarifResult> = audits
        .iter()
        .flat_map(|audit| {
            audit.result.issues.iter().map(move |f| SarifResult {
                rule_id: f.rule_id.clone(),
                level: sarif_level(f.severity).to_string(),
                message: SarifMessage { text: f.message.clone() },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation {
                            uri: audit.path.display().to_string(),
                        },
                    },
                }],
            })
        })
        .collect();

    let rules = crate::audit::rules()
        .iter()
        .map(|rule| SarifRule {
            id: rule.id().to_string(),
            short_description: SarifMessage { text: rule.description().to_string() },
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "compliqbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
