// SPDX-License-Identifier: PMPL-1.0-or-later
//! Audit result types.
//!
//! `AuditResult` serializes to the wire form other surfaces consume:
//!
//! ```json
//! { "score": 88, "passedRules": 7, "totalRules": 8,
//!   "issues": [ { "message": "1 images missing alt text", "severity": "serious" } ] }
//! ```
//!
//! `error: true` is only present on the fallback result of a failed audit.

use serde::{Deserialize, Serialize};

/// Severity levels for findings, ordered `Moderate < Serious < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Degrades the experience for some users
    Moderate,
    /// Blocks some users from parts of the page
    Serious,
    /// Blocks users from completing core tasks
    Critical,
}

impl Severity {
    /// All severities, most severe first (display grouping order).
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Serious, Severity::Moderate];

    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Moderate => "moderate",
            Severity::Serious => "serious",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Moderate => write!(f, "MODERATE"),
            Severity::Serious => write!(f, "SERIOUS"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A failed check, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Human-readable description
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Identifier of the rule that produced this finding. Not part of the
    /// wire form.
    #[serde(skip)]
    pub rule_id: String,
}

impl Finding {
    /// Create a new finding
    pub fn new(rule_id: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            rule_id: rule_id.to_string(),
        }
    }
}

/// Coarse quality band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreGrade {
    /// 90 and above
    Good,
    /// 70 to 89
    Fair,
    /// Below 70
    Poor,
}

impl ScoreGrade {
    pub fn from_score(score: u8) -> Self {
        if score >= 90 {
            ScoreGrade::Good
        } else if score >= 70 {
            ScoreGrade::Fair
        } else {
            ScoreGrade::Poor
        }
    }
}

impl std::fmt::Display for ScoreGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreGrade::Good => write!(f, "good"),
            ScoreGrade::Fair => write!(f, "fair"),
            ScoreGrade::Poor => write!(f, "poor"),
        }
    }
}

/// Outcome of one audit pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// `round(100 * passed_rules / total_rules)`
    pub score: u8,
    /// Number of rules that did not fail
    pub passed_rules: usize,
    /// Number of rules evaluated
    pub total_rules: usize,
    /// Findings in rule order
    pub issues: Vec<Finding>,
    /// Set only on the fallback result of a failed audit
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
}

impl AuditResult {
    /// Assemble a completed audit; the score is derived.
    pub fn new(issues: Vec<Finding>, passed_rules: usize, total_rules: usize) -> Self {
        Self {
            score: compute_score(passed_rules, total_rules),
            passed_rules,
            total_rules,
            issues,
            error: false,
        }
    }

    /// The result reported when an audit could not complete.
    pub fn failed(reason: &str, total_rules: usize) -> Self {
        Self {
            score: 0,
            passed_rules: 0,
            total_rules,
            issues: vec![Finding::new(
                "audit-error",
                Severity::Critical,
                format!("Error running tests: {}", reason),
            )],
            error: true,
        }
    }

    pub fn grade(&self) -> ScoreGrade {
        ScoreGrade::from_score(self.score)
    }

    /// Findings of one severity, in rule order
    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.issues.iter().filter(|f| f.severity == severity).collect()
    }

    /// Most severe finding level, if any
    pub fn worst_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|f| f.severity).max()
    }
}

/// Percentage of passed rules, rounded half up.
pub fn compute_score(passed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let passed = passed.min(total);
    ((200 * passed + total) / (2 * total)) as u8
}
