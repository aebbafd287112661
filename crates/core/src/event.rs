//! Browser activity events — normalized records from capture frontends.
//!
//! A capture frontend (browser extension, proxy) observes interactions
//! with AI services, runs its own DLP pass, and ships one normalized
//! record per interaction. This core does not capture anything itself;
//! it defines the record shape, classifies hostnames against the known
//! AI service registry, and persists what it is given.

use crate::finding::Finding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user did on the AI service page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    PageVisit,
    TextInput,
    Paste,
    FileUpload,
}

/// One captured interaction with an AI service.
///
/// `dlp_severity` is the producer's worst-finding severity, or `"none"`;
/// `dlp_action_taken` is what the producer did about it
/// (`"logged"` / `"warned"` / `"blocked"`). Both are carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserEvent {
    pub timestamp: DateTime<Utc>,

    /// Producer identifier, e.g. "browser".
    pub source: String,

    /// Record kind, e.g. "text_input" or "ai_visit".
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub session_id: String,

    /// Hostname the interaction happened on.
    pub domain: String,

    /// AI service name as classified by the producer.
    pub ai_service: String,

    pub action: EventAction,

    /// Character count of the captured input, if applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_length: Option<u64>,

    /// Time spent on the service, if tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i64>,

    pub dlp_findings: Vec<Finding>,

    pub dlp_severity: String,

    pub dlp_action_taken: String,
}

/// A known AI service and the domains it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiService {
    pub name: &'static str,
    pub domains: &'static [&'static str],
    pub description: &'static str,
}

/// Registry of AI services recognized by the gateway.
pub const AI_SERVICES: &[AiService] = &[
    AiService {
        name: "ChatGPT",
        domains: &["chatgpt.com", "chat.openai.com"],
        description: "OpenAI ChatGPT",
    },
    AiService {
        name: "Claude",
        domains: &["claude.ai"],
        description: "Anthropic Claude",
    },
    AiService {
        name: "Gemini",
        domains: &["gemini.google.com"],
        description: "Google Gemini",
    },
    AiService {
        name: "Perplexity",
        domains: &["perplexity.ai", "www.perplexity.ai"],
        description: "Perplexity AI",
    },
    AiService {
        name: "DeepSeek",
        domains: &["chat.deepseek.com", "deepseek.com"],
        description: "DeepSeek",
    },
    AiService {
        name: "Copilot",
        domains: &["copilot.microsoft.com"],
        description: "Microsoft Copilot",
    },
    AiService {
        name: "Poe",
        domains: &["poe.com"],
        description: "Poe (Quora)",
    },
    AiService {
        name: "HuggingChat",
        domains: &["huggingface.co"],
        description: "HuggingFace Chat",
    },
    AiService {
        name: "You.com",
        domains: &["you.com"],
        description: "You.com AI Search",
    },
    AiService {
        name: "Phind",
        domains: &["phind.com", "www.phind.com"],
        description: "Phind",
    },
];

/// Classify a hostname against the AI service registry.
///
/// Matches the registered domain exactly or any subdomain of it.
pub fn detect_ai_service(hostname: &str) -> Option<&'static AiService> {
    AI_SERVICES.iter().find(|service| {
        service
            .domains
            .iter()
            .any(|domain| hostname == *domain || hostname.ends_with(&format!(".{domain}")))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_exact_domain() {
        let service = detect_ai_service("claude.ai").unwrap();
        assert_eq!(service.name, "Claude");
    }

    #[test]
    fn detects_subdomain() {
        let service = detect_ai_service("api.chatgpt.com").unwrap();
        assert_eq!(service.name, "ChatGPT");
    }

    #[test]
    fn does_not_match_lookalike_suffix() {
        // "notclaude.ai" is not a subdomain of "claude.ai"
        assert!(detect_ai_service("notclaude.ai").is_none());
        assert!(detect_ai_service("example.com").is_none());
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = BrowserEvent {
            timestamp: Utc::now(),
            source: "browser".into(),
            event_type: "text_input".into(),
            user_id: Some("alice".into()),
            session_id: "s-1".into(),
            domain: "claude.ai".into(),
            ai_service: "Claude".into(),
            action: EventAction::Paste,
            input_length: Some(512),
            duration_seconds: None,
            dlp_findings: vec![],
            dlp_severity: "none".into(),
            dlp_action_taken: "logged".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"action\":\"paste\""));
        let back: BrowserEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back.domain, "claude.ai");
        assert_eq!(back.action, EventAction::Paste);
    }
}
