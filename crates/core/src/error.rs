//! Error types for the ironsieve domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all ironsieve operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- DLP errors ---
    #[error("DLP error: {0}")]
    Dlp(#[from] DlpError),

    // --- Policy errors ---
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    // --- Audit errors ---
    #[error("Audit error: {0}")]
    Audit(#[from] AuditError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Errors surfaced by intercepted tool calls.
///
/// The interceptor maps every exit path onto one of these: an unknown
/// operation, malformed arguments, a policy (or DLP) denial, or a handler
/// failure. Each is audited before it is surfaced.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Permission denied for '{tool_name}': {reason}")]
    PermissionDenied { tool_name: String, reason: String },

    #[error("Tool execution failed for '{tool_name}': {reason}")]
    ExecutionFailed { tool_name: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum DlpError {
    #[error("Invalid DLP pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum PolicyError {
    #[error("Invalid policy pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Insert failed: {0}")]
    InsertFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::PermissionDenied {
            tool_name: "file_read".into(),
            reason: "Path matches denied pattern: /etc/shadow".into(),
        });
        assert!(err.to_string().contains("file_read"));
        assert!(err.to_string().contains("/etc/shadow"));
    }

    #[test]
    fn dlp_error_names_the_pattern() {
        let err = Error::Dlp(DlpError::InvalidPattern {
            name: "internal_id".into(),
            reason: "unclosed group".into(),
        });
        assert!(err.to_string().contains("internal_id"));
        assert!(err.to_string().contains("unclosed group"));
    }

    #[test]
    fn audit_error_never_loses_detail() {
        let err = AuditError::InsertFailed("database is locked".into());
        assert!(err.to_string().contains("database is locked"));
    }
}
