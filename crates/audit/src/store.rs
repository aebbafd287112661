//! SQLite audit store.
//!
//! One table for intercepted tool calls (`audit_log`), one for captured
//! browser events (`events`). WAL journal mode gives the
//! single-writer/many-reader discipline the callers assume; every insert
//! is a single statement, so concurrent writers never interleave partial
//! records.

use chrono::{DateTime, Utc};
use ironsieve_core::{AuditEntry, AuditError, BrowserEvent, Finding, Severity};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// Aggregated finding counts for one pattern.
#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    pub pattern: String,
    pub count: u64,
    /// Severity of the first finding seen for this pattern.
    pub severity: Severity,
}

/// Invocation count for one tool over the recent window.
#[derive(Debug, Clone, Serialize)]
pub struct ToolStat {
    pub tool_name: String,
    pub count: u64,
}

/// Per-session activity over the recent window.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub user: String,
    pub tool_count: u64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Total finding count across the session's entries.
    pub dlp_violations: u64,
}

/// Window size for the tool-stats and session aggregations.
const RECENT_WINDOW: i64 = 1000;

/// The append-only audit database.
pub struct AuditStore {
    pool: SqlitePool,
}

impl AuditStore {
    /// Open (or create) the audit database at the given path.
    ///
    /// Pass `"sqlite::memory:"` for an ephemeral in-process database
    /// (useful for tests).
    pub async fn new(path: &str) -> Result<Self, AuditError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| AuditError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| AuditError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("Audit store initialized at {path}");
        Ok(store)
    }

    /// Create tables and indexes if they do not exist yet.
    async fn run_migrations(&self) -> Result<(), AuditError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                session_id TEXT NOT NULL,
                user TEXT NOT NULL,
                tool_name TEXT NOT NULL,
                tool_input TEXT NOT NULL,
                tool_output TEXT,
                dlp_findings TEXT NOT NULL,
                policy_result TEXT NOT NULL,
                latency_ms INTEGER NOT NULL,
                error TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::MigrationFailed(format!("audit_log table: {e}")))?;

        for (name, column) in [
            ("idx_audit_timestamp", "timestamp"),
            ("idx_audit_session_id", "session_id"),
            ("idx_audit_user", "user"),
            ("idx_audit_tool_name", "tool_name"),
        ] {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {name} ON audit_log({column})"
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| AuditError::MigrationFailed(format!("{name}: {e}")))?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                source TEXT NOT NULL,
                event_type TEXT NOT NULL,
                user_id TEXT,
                session_id TEXT NOT NULL,
                domain TEXT NOT NULL,
                ai_service TEXT NOT NULL,
                action TEXT NOT NULL,
                input_length INTEGER,
                duration_seconds INTEGER,
                dlp_findings TEXT NOT NULL,
                dlp_severity TEXT NOT NULL,
                dlp_action_taken TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::MigrationFailed(format!("events table: {e}")))?;

        for (name, column) in [
            ("idx_events_timestamp", "timestamp"),
            ("idx_events_session_id", "session_id"),
            ("idx_events_domain", "domain"),
        ] {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS {name} ON events({column})"
            ))
            .execute(&self.pool)
            .await
            .map_err(|e| AuditError::MigrationFailed(format!("{name}: {e}")))?;
        }

        debug!("Audit store migrations complete");
        Ok(())
    }

    /// Append one audit entry. A single atomic insert; never updated.
    pub async fn insert(&self, entry: &AuditEntry) -> Result<(), AuditError> {
        let tool_input = entry.tool_input.to_string();
        let dlp_findings = serde_json::to_string(&entry.dlp_findings)
            .map_err(|e| AuditError::InsertFailed(format!("findings serialization: {e}")))?;
        let policy_result = serde_json::to_string(&entry.policy_result)
            .map_err(|e| AuditError::InsertFailed(format!("decision serialization: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO audit_log (
                timestamp, session_id, user, tool_name, tool_input,
                tool_output, dlp_findings, policy_result, latency_ms, error
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(entry.timestamp.to_rfc3339())
        .bind(&entry.session_id)
        .bind(&entry.user)
        .bind(&entry.tool_name)
        .bind(&tool_input)
        .bind(&entry.tool_output)
        .bind(&dlp_findings)
        .bind(&policy_result)
        .bind(entry.latency_ms as i64)
        .bind(&entry.error)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::InsertFailed(e.to_string()))?;

        debug!("Audit entry recorded for {}", entry.tool_name);
        Ok(())
    }

    /// The N most recently inserted entries, newest first.
    pub async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>, AuditError> {
        let rows = sqlx::query("SELECT * FROM audit_log ORDER BY id DESC LIMIT ?1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Aggregate findings across all entries, grouped by pattern name.
    ///
    /// Count plus the severity of the first finding seen per pattern,
    /// in order of first appearance.
    pub async fn summary(&self) -> Result<Vec<PatternSummary>, AuditError> {
        let rows = sqlx::query(
            "SELECT dlp_findings FROM audit_log WHERE dlp_findings != '[]' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        let mut summaries: Vec<PatternSummary> = Vec::new();
        for row in &rows {
            let findings_json: String = row
                .try_get("dlp_findings")
                .map_err(|e| AuditError::QueryFailed(format!("dlp_findings column: {e}")))?;
            let findings: Vec<Finding> = serde_json::from_str(&findings_json)
                .map_err(|e| AuditError::QueryFailed(format!("findings parse: {e}")))?;

            for finding in findings {
                match summaries.iter_mut().find(|s| s.pattern == finding.pattern) {
                    Some(existing) => existing.count += 1,
                    None => summaries.push(PatternSummary {
                        pattern: finding.pattern,
                        count: 1,
                        severity: finding.severity,
                    }),
                }
            }
        }

        Ok(summaries)
    }

    /// Invocation counts per tool over the most recent entries,
    /// descending.
    pub async fn tool_stats(&self) -> Result<Vec<ToolStat>, AuditError> {
        let rows = sqlx::query(
            r#"
            SELECT tool_name, COUNT(*) AS count
            FROM (SELECT tool_name FROM audit_log ORDER BY id DESC LIMIT ?1)
            GROUP BY tool_name
            ORDER BY count DESC, tool_name
            "#,
        )
        .bind(RECENT_WINDOW)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let tool_name: String = row
                    .try_get("tool_name")
                    .map_err(|e| AuditError::QueryFailed(format!("tool_name column: {e}")))?;
                let count: i64 = row
                    .try_get("count")
                    .map_err(|e| AuditError::QueryFailed(format!("count column: {e}")))?;
                Ok(ToolStat {
                    tool_name,
                    count: count as u64,
                })
            })
            .collect()
    }

    /// Per-session activity over the most recent entries, most recently
    /// active first.
    pub async fn sessions(&self) -> Result<Vec<SessionSummary>, AuditError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, user, timestamp, dlp_findings
            FROM (SELECT * FROM audit_log ORDER BY id DESC LIMIT ?1)
            ORDER BY id
            "#,
        )
        .bind(RECENT_WINDOW)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        let mut sessions: Vec<SessionSummary> = Vec::new();
        for row in &rows {
            let session_id: String = row
                .try_get("session_id")
                .map_err(|e| AuditError::QueryFailed(format!("session_id column: {e}")))?;
            let user: String = row
                .try_get("user")
                .map_err(|e| AuditError::QueryFailed(format!("user column: {e}")))?;
            let timestamp = parse_timestamp(
                &row.try_get::<String, _>("timestamp")
                    .map_err(|e| AuditError::QueryFailed(format!("timestamp column: {e}")))?,
            );
            let findings_json: String = row
                .try_get("dlp_findings")
                .map_err(|e| AuditError::QueryFailed(format!("dlp_findings column: {e}")))?;
            let finding_count = serde_json::from_str::<Vec<Finding>>(&findings_json)
                .map(|f| f.len() as u64)
                .unwrap_or(0);

            match sessions.iter_mut().find(|s| s.session_id == session_id) {
                Some(existing) => {
                    existing.tool_count += 1;
                    existing.last_seen = timestamp;
                    existing.dlp_violations += finding_count;
                }
                None => sessions.push(SessionSummary {
                    session_id,
                    user,
                    tool_count: 1,
                    first_seen: timestamp,
                    last_seen: timestamp,
                    dlp_violations: finding_count,
                }),
            }
        }

        sessions.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        Ok(sessions)
    }

    /// Append one captured browser event.
    pub async fn record_event(&self, event: &BrowserEvent) -> Result<(), AuditError> {
        let dlp_findings = serde_json::to_string(&event.dlp_findings)
            .map_err(|e| AuditError::InsertFailed(format!("findings serialization: {e}")))?;
        let action = serde_json::to_value(event.action)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "text_input".into());

        sqlx::query(
            r#"
            INSERT INTO events (
                timestamp, source, event_type, user_id, session_id,
                domain, ai_service, action, input_length, duration_seconds,
                dlp_findings, dlp_severity, dlp_action_taken
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
        )
        .bind(event.timestamp.to_rfc3339())
        .bind(&event.source)
        .bind(&event.event_type)
        .bind(&event.user_id)
        .bind(&event.session_id)
        .bind(&event.domain)
        .bind(&event.ai_service)
        .bind(&action)
        .bind(event.input_length.map(|n| n as i64))
        .bind(event.duration_seconds)
        .bind(&dlp_findings)
        .bind(&event.dlp_severity)
        .bind(&event.dlp_action_taken)
        .execute(&self.pool)
        .await
        .map_err(|e| AuditError::InsertFailed(e.to_string()))?;

        debug!("Browser event recorded for {}", event.domain);
        Ok(())
    }

    /// The N most recently inserted browser events, newest first.
    pub async fn recent_events(&self, limit: u32) -> Result<Vec<BrowserEvent>, AuditError> {
        let rows = sqlx::query("SELECT * FROM events ORDER BY id DESC LIMIT ?1")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuditError::QueryFailed(e.to_string()))?;

        rows.iter().map(Self::row_to_event).collect()
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<AuditEntry, AuditError> {
        let timestamp_str: String = row
            .try_get("timestamp")
            .map_err(|e| AuditError::QueryFailed(format!("timestamp column: {e}")))?;
        let tool_input_json: String = row
            .try_get("tool_input")
            .map_err(|e| AuditError::QueryFailed(format!("tool_input column: {e}")))?;
        let dlp_findings_json: String = row
            .try_get("dlp_findings")
            .map_err(|e| AuditError::QueryFailed(format!("dlp_findings column: {e}")))?;
        let policy_result_json: String = row
            .try_get("policy_result")
            .map_err(|e| AuditError::QueryFailed(format!("policy_result column: {e}")))?;
        let latency_ms: i64 = row
            .try_get("latency_ms")
            .map_err(|e| AuditError::QueryFailed(format!("latency_ms column: {e}")))?;

        Ok(AuditEntry {
            timestamp: parse_timestamp(&timestamp_str),
            session_id: row
                .try_get("session_id")
                .map_err(|e| AuditError::QueryFailed(format!("session_id column: {e}")))?,
            user: row
                .try_get("user")
                .map_err(|e| AuditError::QueryFailed(format!("user column: {e}")))?,
            tool_name: row
                .try_get("tool_name")
                .map_err(|e| AuditError::QueryFailed(format!("tool_name column: {e}")))?,
            tool_input: serde_json::from_str(&tool_input_json)
                .map_err(|e| AuditError::QueryFailed(format!("tool_input parse: {e}")))?,
            tool_output: row
                .try_get("tool_output")
                .map_err(|e| AuditError::QueryFailed(format!("tool_output column: {e}")))?,
            dlp_findings: serde_json::from_str(&dlp_findings_json)
                .map_err(|e| AuditError::QueryFailed(format!("findings parse: {e}")))?,
            policy_result: serde_json::from_str(&policy_result_json)
                .map_err(|e| AuditError::QueryFailed(format!("decision parse: {e}")))?,
            latency_ms: latency_ms as u64,
            error: row
                .try_get("error")
                .map_err(|e| AuditError::QueryFailed(format!("error column: {e}")))?,
        })
    }

    fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Result<BrowserEvent, AuditError> {
        let timestamp_str: String = row
            .try_get("timestamp")
            .map_err(|e| AuditError::QueryFailed(format!("timestamp column: {e}")))?;
        let action_str: String = row
            .try_get("action")
            .map_err(|e| AuditError::QueryFailed(format!("action column: {e}")))?;
        let action = serde_json::from_value(serde_json::Value::String(action_str))
            .map_err(|e| AuditError::QueryFailed(format!("action parse: {e}")))?;
        let dlp_findings_json: String = row
            .try_get("dlp_findings")
            .map_err(|e| AuditError::QueryFailed(format!("dlp_findings column: {e}")))?;
        let input_length: Option<i64> = row
            .try_get("input_length")
            .map_err(|e| AuditError::QueryFailed(format!("input_length column: {e}")))?;

        Ok(BrowserEvent {
            timestamp: parse_timestamp(&timestamp_str),
            source: row
                .try_get("source")
                .map_err(|e| AuditError::QueryFailed(format!("source column: {e}")))?,
            event_type: row
                .try_get("event_type")
                .map_err(|e| AuditError::QueryFailed(format!("event_type column: {e}")))?,
            user_id: row
                .try_get("user_id")
                .map_err(|e| AuditError::QueryFailed(format!("user_id column: {e}")))?,
            session_id: row
                .try_get("session_id")
                .map_err(|e| AuditError::QueryFailed(format!("session_id column: {e}")))?,
            domain: row
                .try_get("domain")
                .map_err(|e| AuditError::QueryFailed(format!("domain column: {e}")))?,
            ai_service: row
                .try_get("ai_service")
                .map_err(|e| AuditError::QueryFailed(format!("ai_service column: {e}")))?,
            action,
            input_length: input_length.map(|n| n as u64),
            duration_seconds: row
                .try_get("duration_seconds")
                .map_err(|e| AuditError::QueryFailed(format!("duration_seconds column: {e}")))?,
            dlp_findings: serde_json::from_str(&dlp_findings_json)
                .map_err(|e| AuditError::QueryFailed(format!("findings parse: {e}")))?,
            dlp_severity: row
                .try_get("dlp_severity")
                .map_err(|e| AuditError::QueryFailed(format!("dlp_severity column: {e}")))?,
            dlp_action_taken: row
                .try_get("dlp_action_taken")
                .map_err(|e| AuditError::QueryFailed(format!("dlp_action_taken column: {e}")))?,
        })
    }
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsieve_core::{EventAction, PolicyDecision};

    async fn test_store() -> AuditStore {
        AuditStore::new("sqlite::memory:").await.unwrap()
    }

    fn make_entry(tool_name: &str, session_id: &str, findings: Vec<Finding>) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            session_id: session_id.into(),
            user: "alice".into(),
            tool_name: tool_name.into(),
            tool_input: serde_json::json!({"path": "/tmp/x"}),
            tool_output: Some("ok".into()),
            dlp_findings: findings,
            policy_result: PolicyDecision::allow(),
            latency_ms: 3,
            error: None,
        }
    }

    fn make_finding(pattern: &str, severity: Severity) -> Finding {
        Finding {
            pattern: pattern.into(),
            severity,
            location: "test:output".into(),
            redacted_sample: "***".into(),
        }
    }

    #[tokio::test]
    async fn insert_and_read_back() {
        let store = test_store().await;
        let entry = make_entry("file_read", "s-1", vec![]);
        store.insert(&entry).await.unwrap();

        let recent = store.recent(10).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].tool_name, "file_read");
        assert_eq!(recent[0].tool_input["path"], "/tmp/x");
        assert!(recent[0].policy_result.allowed);
        assert!(recent[0].error.is_none());
    }

    #[tokio::test]
    async fn recent_returns_reverse_insertion_order() {
        let store = test_store().await;
        for name in ["first", "second", "third"] {
            store.insert(&make_entry(name, "s-1", vec![])).await.unwrap();
        }

        let recent = store.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].tool_name, "third");
        assert_eq!(recent[1].tool_name, "second");
    }

    #[tokio::test]
    async fn summary_groups_by_pattern() {
        let store = test_store().await;
        store
            .insert(&make_entry(
                "file_read",
                "s-1",
                vec![
                    make_finding("credit_card", Severity::High),
                    make_finding("email", Severity::Low),
                ],
            ))
            .await
            .unwrap();
        store
            .insert(&make_entry(
                "file_write",
                "s-1",
                vec![make_finding("credit_card", Severity::High)],
            ))
            .await
            .unwrap();

        let summary = store.summary().await.unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].pattern, "credit_card");
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[0].severity, Severity::High);
        assert_eq!(summary[1].pattern, "email");
        assert_eq!(summary[1].count, 1);
    }

    #[tokio::test]
    async fn tool_stats_counts_descending() {
        let store = test_store().await;
        for _ in 0..3 {
            store
                .insert(&make_entry("file_read", "s-1", vec![]))
                .await
                .unwrap();
        }
        store
            .insert(&make_entry("web_fetch", "s-1", vec![]))
            .await
            .unwrap();

        let stats = store.tool_stats().await.unwrap();
        assert_eq!(stats[0].tool_name, "file_read");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[1].tool_name, "web_fetch");
        assert_eq!(stats[1].count, 1);
    }

    #[tokio::test]
    async fn sessions_aggregate_counts_and_violations() {
        let store = test_store().await;
        store
            .insert(&make_entry(
                "file_read",
                "s-1",
                vec![make_finding("ssn", Severity::High)],
            ))
            .await
            .unwrap();
        store
            .insert(&make_entry("file_write", "s-1", vec![]))
            .await
            .unwrap();
        store
            .insert(&make_entry("web_fetch", "s-2", vec![]))
            .await
            .unwrap();

        let sessions = store.sessions().await.unwrap();
        assert_eq!(sessions.len(), 2);
        // s-2 was active last
        assert_eq!(sessions[0].session_id, "s-2");
        let s1 = sessions.iter().find(|s| s.session_id == "s-1").unwrap();
        assert_eq!(s1.tool_count, 2);
        assert_eq!(s1.dlp_violations, 1);
        assert!(s1.first_seen <= s1.last_seen);
    }

    #[tokio::test]
    async fn browser_events_round_trip() {
        let store = test_store().await;
        let event = BrowserEvent {
            timestamp: Utc::now(),
            source: "browser_extension".into(),
            event_type: "ai_interaction".into(),
            user_id: Some("alice".into()),
            session_id: "b-1".into(),
            domain: "claude.ai".into(),
            ai_service: "Claude".into(),
            action: EventAction::Paste,
            input_length: Some(240),
            duration_seconds: None,
            dlp_findings: vec![make_finding("email", Severity::Low)],
            dlp_severity: "low".into(),
            dlp_action_taken: "logged".into(),
        };
        store.record_event(&event).await.unwrap();

        let events = store.recent_events(5).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].domain, "claude.ai");
        assert_eq!(events[0].action, EventAction::Paste);
        assert_eq!(events[0].input_length, Some(240));
        assert_eq!(events[0].dlp_findings.len(), 1);
    }
}
