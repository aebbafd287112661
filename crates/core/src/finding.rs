//! Sensitive-data findings — the output of a DLP scan.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a sensitive-data match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sensitive-pattern match that survived validation.
///
/// Findings never carry the matched text itself, only a lossy redacted
/// sample. They are created per scan and aggregated into the audit entry
/// for the call that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the pattern that matched (e.g. "aws_access_key").
    pub pattern: String,

    /// Severity copied from the pattern at scan time.
    pub severity: Severity,

    /// Where the match was found (e.g. "file_read:output").
    pub location: String,

    /// Redacted sample of the matched text.
    pub redacted_sample: String,
}
