//! The policy engine — allow/deny rules for ironsieve tool calls.
//!
//! The engine holds an immutable compiled view of the policy
//! configuration: path globs and domain patterns are compiled once at
//! construction, so a bad pattern fails at startup with a field-level
//! error rather than mid-call. Hot reload means building a new engine
//! and swapping it whole.

pub mod domain;
pub mod path;

use domain::DomainRules;
use ironsieve_config::AppConfig;
use ironsieve_core::{DlpAction, PolicyDecision, PolicyError};
use path::PathRules;
use tracing::debug;

pub use path::normalize_path;

/// Evaluates allow/deny rules for tool categories, file paths, and
/// network domains.
pub struct PolicyEngine {
    file: PathRules,
    web: DomainRules,
    shell_enabled: bool,
    database_enabled: bool,
    dlp_action: DlpAction,
}

impl PolicyEngine {
    /// Compile the engine from configuration. Invalid patterns fail here.
    pub fn from_config(config: &AppConfig) -> Result<Self, PolicyError> {
        let file = PathRules::compile(
            config.tools.file.enabled,
            &config.tools.file.allowed_paths,
            &config.tools.file.denied_paths,
        )?;
        let web = DomainRules::compile(
            config.tools.web.enabled,
            &config.tools.web.allowed_domains,
            &config.tools.web.denied_domains,
        )?;
        Ok(Self {
            file,
            web,
            shell_enabled: config.tools.shell.enabled,
            database_enabled: config.tools.database.enabled,
            dlp_action: config.dlp.action,
        })
    }

    /// Evaluate a tool call against the policy rules.
    pub fn evaluate(&self, tool_name: &str, args: &serde_json::Value) -> PolicyDecision {
        let decision = match tool_name {
            "file_read" | "file_write" | "file_list" => match args["path"].as_str() {
                Some(path) => self.check_path(path),
                None => PolicyDecision::allow(),
            },
            "web_fetch" => {
                if !self.web.enabled {
                    PolicyDecision::block("Web tools are disabled")
                } else {
                    match args["url"].as_str() {
                        Some(url) => self.check_domain(url),
                        None => PolicyDecision::allow(),
                    }
                }
            }
            // TODO: command allow/deny lists for shell_exec
            "shell_exec" => {
                if self.shell_enabled {
                    PolicyDecision::allow()
                } else {
                    PolicyDecision::block("Shell tools are disabled")
                }
            }
            "db_query" => {
                if self.database_enabled {
                    PolicyDecision::allow()
                } else {
                    PolicyDecision::block("Database tools are disabled")
                }
            }
            _ => PolicyDecision::allow(),
        };
        debug!(
            "Policy evaluation for {tool_name}: action={}",
            decision.action
        );
        decision
    }

    /// Check a file path against the category gate and path rules.
    pub fn check_path(&self, file_path: &str) -> PolicyDecision {
        self.file.check(file_path)
    }

    /// Check a URL's hostname against the domain rules.
    pub fn check_domain(&self, url: &str) -> PolicyDecision {
        self.web.check(url)
    }

    /// The one globally configured response to DLP findings.
    ///
    /// Applied uniformly to any non-empty finding set regardless of
    /// individual finding severity.
    pub fn dlp_action(&self) -> DlpAction {
        self.dlp_action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironsieve_config::{FileToolsConfig, ToolsConfig, WebToolsConfig};
    use ironsieve_core::PolicyAction;
    use serde_json::json;

    fn engine(tools: ToolsConfig) -> PolicyEngine {
        let config = AppConfig {
            tools,
            ..AppConfig::default()
        };
        PolicyEngine::from_config(&config).unwrap()
    }

    #[test]
    fn default_engine_allows_file_reads() {
        let engine = engine(ToolsConfig::default());
        let decision = engine.evaluate("file_read", &json!({"path": "/tmp/notes.txt"}));
        assert!(decision.allowed);
        assert_eq!(decision.action, PolicyAction::Allow);
    }

    #[test]
    fn disabled_file_category_denies_every_file_tool() {
        let engine = engine(ToolsConfig {
            file: FileToolsConfig {
                enabled: false,
                ..FileToolsConfig::default()
            },
            ..ToolsConfig::default()
        });
        for tool in ["file_read", "file_write", "file_list"] {
            let decision = engine.evaluate(tool, &json!({"path": "/tmp/anything"}));
            assert!(!decision.allowed, "{tool} should be denied");
            assert_eq!(decision.reason.as_deref(), Some("File tools are disabled"));
        }
    }

    #[test]
    fn denied_path_blocks_with_pattern_in_reason() {
        let engine = engine(ToolsConfig {
            file: FileToolsConfig {
                denied_paths: vec!["**/.ssh/**".into()],
                ..FileToolsConfig::default()
            },
            ..ToolsConfig::default()
        });
        let decision = engine.evaluate("file_read", &json!({"path": "/home/user/.ssh/id_rsa"}));
        assert!(!decision.allowed);
        assert!(decision.reason.as_deref().unwrap().contains("**/.ssh/**"));
    }

    #[test]
    fn shell_disabled_by_default() {
        let engine = engine(ToolsConfig::default());
        let decision = engine.evaluate("shell_exec", &json!({"command": "ls"}));
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Shell tools are disabled"));
    }

    #[test]
    fn database_disabled_by_default() {
        let engine = engine(ToolsConfig::default());
        let decision = engine.evaluate("db_query", &json!({"query": "SELECT 1"}));
        assert!(!decision.allowed);
        assert_eq!(
            decision.reason.as_deref(),
            Some("Database tools are disabled")
        );
    }

    #[test]
    fn web_disabled_blocks_before_url_parsing() {
        let engine = engine(ToolsConfig {
            web: WebToolsConfig {
                enabled: false,
                ..WebToolsConfig::default()
            },
            ..ToolsConfig::default()
        });
        let decision = engine.evaluate("web_fetch", &json!({"url": "https://example.com"}));
        assert_eq!(decision.reason.as_deref(), Some("Web tools are disabled"));
    }

    #[test]
    fn web_fetch_with_bad_url_is_blocked() {
        let engine = engine(ToolsConfig::default());
        let decision = engine.evaluate("web_fetch", &json!({"url": "::not-a-url::"}));
        assert!(!decision.allowed);
        assert_eq!(decision.reason.as_deref(), Some("Invalid URL"));
    }

    #[test]
    fn unknown_tools_default_to_allow() {
        let engine = engine(ToolsConfig::default());
        assert!(engine.evaluate("calculator", &json!({})).allowed);
    }

    #[test]
    fn bad_path_pattern_fails_at_construction() {
        let config = AppConfig {
            tools: ToolsConfig {
                file: FileToolsConfig {
                    denied_paths: vec!["[".into()],
                    ..FileToolsConfig::default()
                },
                ..ToolsConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(PolicyEngine::from_config(&config).is_err());
    }

    #[test]
    fn dlp_action_comes_from_config() {
        let config = AppConfig::default();
        let engine = PolicyEngine::from_config(&config).unwrap();
        assert_eq!(engine.dlp_action(), DlpAction::Log);
    }
}
