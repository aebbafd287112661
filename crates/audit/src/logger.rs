//! The audit logger — fan-out of one entry to stdout and the store.
//!
//! A persistence failure is the logger's problem, not the caller's: it
//! is reported via tracing and never propagates into the intercepted
//! call's result.

use crate::store::AuditStore;
use ironsieve_core::AuditEntry;
use std::sync::Arc;
use tracing::warn;

/// Maximum stored output length before truncation.
const MAX_OUTPUT_LEN: usize = 500;

/// Records audit entries to the configured sinks.
#[derive(Clone)]
pub struct AuditLogger {
    stdout: bool,
    store: Option<Arc<AuditStore>>,
}

impl AuditLogger {
    pub fn new(stdout: bool, store: Option<Arc<AuditStore>>) -> Self {
        Self { stdout, store }
    }

    /// Record one entry on every configured sink.
    ///
    /// Failures are logged and swallowed; the caller's response must not
    /// depend on the audit trail being writable.
    pub async fn record(&self, entry: &AuditEntry) {
        if self.stdout {
            match serde_json::to_string(entry) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!("Failed to serialize audit entry: {e}"),
            }
        }

        if let Some(store) = &self.store {
            if let Err(e) = store.insert(entry).await {
                warn!("Failed to persist audit entry: {e}");
            }
        }
    }

    /// Truncate tool output for storage.
    ///
    /// Keeps the first `MAX_OUTPUT_LEN` characters and appends an
    /// explicit truncation marker with the dropped length.
    pub fn sanitize_output(output: &str) -> String {
        let chars: Vec<char> = output.chars().collect();
        if chars.len() <= MAX_OUTPUT_LEN {
            return output.to_string();
        }
        let kept: String = chars[..MAX_OUTPUT_LEN].iter().collect();
        format!("{kept}... [truncated {} chars]", chars.len() - MAX_OUTPUT_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ironsieve_core::PolicyDecision;

    fn make_entry() -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            session_id: "s-1".into(),
            user: "alice".into(),
            tool_name: "file_read".into(),
            tool_input: serde_json::json!({"path": "/tmp/x"}),
            tool_output: None,
            dlp_findings: vec![],
            policy_result: PolicyDecision::allow(),
            latency_ms: 1,
            error: None,
        }
    }

    #[test]
    fn short_output_is_untouched() {
        assert_eq!(AuditLogger::sanitize_output("hello"), "hello");
        let exact = "x".repeat(500);
        assert_eq!(AuditLogger::sanitize_output(&exact), exact);
    }

    #[test]
    fn long_output_is_truncated_with_marker() {
        let long = "y".repeat(620);
        let sanitized = AuditLogger::sanitize_output(&long);
        assert!(sanitized.starts_with(&"y".repeat(500)));
        assert!(sanitized.ends_with("... [truncated 120 chars]"));
    }

    #[tokio::test]
    async fn record_without_store_does_not_panic() {
        let logger = AuditLogger::new(false, None);
        logger.record(&make_entry()).await;
    }

    #[tokio::test]
    async fn record_persists_to_store() {
        let store = Arc::new(AuditStore::new("sqlite::memory:").await.unwrap());
        let logger = AuditLogger::new(false, Some(store.clone()));
        logger.record(&make_entry()).await;

        let recent = store.recent(5).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].tool_name, "file_read");
    }
}
