//! Policy decisions — the allow/warn/block verdict for one call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The action attached to a policy decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Allow,
    Warn,
    Block,
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyAction::Allow => "allow",
            PolicyAction::Warn => "warn",
            PolicyAction::Block => "block",
        };
        f.write_str(s)
    }
}

/// The globally configured response to non-empty DLP findings.
///
/// Applied uniformly: a critical finding and a low-severity one trigger
/// the same configured action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DlpAction {
    #[default]
    Log,
    Warn,
    Block,
}

/// The verdict rendered for one tool invocation.
///
/// Invariant: `allowed == false` implies `action == Block`. The
/// constructors uphold this; code that mutates `action` afterwards may
/// only move an allowed decision to `Warn`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub action: PolicyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PolicyDecision {
    /// An allowing decision with no reason attached.
    pub fn allow() -> Self {
        Self {
            allowed: true,
            action: PolicyAction::Allow,
            reason: None,
        }
    }

    /// A blocking decision carrying a human-readable reason.
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            action: PolicyAction::Block,
            reason: Some(reason.into()),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_implies_not_allowed() {
        let decision = PolicyDecision::block("File tools are disabled");
        assert!(!decision.is_allowed());
        assert_eq!(decision.action, PolicyAction::Block);
        assert_eq!(decision.reason.as_deref(), Some("File tools are disabled"));
    }

    #[test]
    fn allow_has_no_reason() {
        let decision = PolicyDecision::allow();
        assert!(decision.is_allowed());
        assert_eq!(decision.action, PolicyAction::Allow);
        assert!(decision.reason.is_none());
    }

    #[test]
    fn reason_is_omitted_from_json_when_absent() {
        let json = serde_json::to_string(&PolicyDecision::allow()).unwrap();
        assert_eq!(json, r#"{"allowed":true,"action":"allow"}"#);

        let json = serde_json::to_string(&PolicyDecision::block("nope")).unwrap();
        assert!(json.contains(r#""reason":"nope""#));
    }

    #[test]
    fn dlp_action_defaults_to_log() {
        assert_eq!(DlpAction::default(), DlpAction::Log);
        let parsed: DlpAction = serde_json::from_str("\"block\"").unwrap();
        assert_eq!(parsed, DlpAction::Block);
    }
}
