//! Audit entries — the durable record of one intercepted call.

use crate::decision::PolicyDecision;
use crate::finding::Finding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One intercepted tool invocation and its outcome.
///
/// Created exactly once per invocation, on every exit path: success,
/// policy denial, validation failure, handler failure, or DLP override.
/// Append-only; retention and compaction are someone else's problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the call started (serialized as RFC 3339 text).
    pub timestamp: DateTime<Utc>,

    /// Session identifier from the call context.
    pub session_id: String,

    /// Resolved user identity.
    pub user: String,

    /// Name of the invoked operation.
    pub tool_name: String,

    /// Snapshot of the arguments as submitted.
    pub tool_input: serde_json::Value,

    /// Handler output, truncated for storage. Absent when the handler
    /// never ran or failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<String>,

    /// Findings from scanning input and output.
    pub dlp_findings: Vec<Finding>,

    /// The final decision, after any DLP override.
    pub policy_result: PolicyDecision,

    /// Milliseconds from validation start to just before persistence.
    pub latency_ms: u64,

    /// Error message for failed, denied, or blocked calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;

    fn sample_entry() -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            session_id: "session-1".into(),
            user: "alice".into(),
            tool_name: "file_read".into(),
            tool_input: serde_json::json!({"path": "/tmp/notes.txt"}),
            tool_output: Some("hello".into()),
            dlp_findings: vec![Finding {
                pattern: "email".into(),
                severity: Severity::Low,
                location: "file_read:output".into(),
                redacted_sample: "ali***com".into(),
            }],
            policy_result: PolicyDecision::allow(),
            latency_ms: 12,
            error: None,
        }
    }

    #[test]
    fn entry_serializes_and_deserializes() {
        let entry = sample_entry();
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tool_name, "file_read");
        assert_eq!(back.dlp_findings.len(), 1);
        assert!(back.policy_result.is_allowed());
    }

    #[test]
    fn absent_output_and_error_are_omitted() {
        let mut entry = sample_entry();
        entry.tool_output = None;
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("tool_output"));
        assert!(!json.contains("\"error\""));
    }
}
