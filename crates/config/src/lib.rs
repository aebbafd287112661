//! Configuration loading, validation, and identity resolution for ironsieve.
//!
//! Loads configuration from an `ironsieve.toml` file (path overridable via
//! the `IRONSIEVE_CONFIG` environment variable). Every field has a resolved
//! default; validation runs once at load time and enumerates every problem
//! it finds — there is no silent fallback after startup.

use ironsieve_core::{DlpAction, Severity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// The root configuration structure.
///
/// Maps directly to `ironsieve.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// How to resolve the user identity attached to audit entries
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Per-category tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// DLP scanning settings
    #[serde(default)]
    pub dlp: DlpConfig,

    /// Audit logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How the user identity is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityMethod {
    /// Read from an environment variable
    #[default]
    Env,
    /// Use a fixed string from the config file
    Static,
}

/// Identity resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default)]
    pub method: IdentityMethod,

    /// Environment variable to read when method = "env"
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Fixed user string when method = "static"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_user: Option<String>,
}

fn default_env_var() -> String {
    "USER".into()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            method: IdentityMethod::Env,
            env_var: default_env_var(),
            static_user: None,
        }
    }
}

/// Per-category tool settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub file: FileToolsConfig,

    #[serde(default)]
    pub web: WebToolsConfig,

    #[serde(default)]
    pub shell: ShellToolsConfig,

    #[serde(default)]
    pub database: DatabaseToolsConfig,
}

/// File tool settings: category gate plus path allow/deny globs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path prefixes or glob patterns. Empty = allow all (except denied).
    #[serde(default)]
    pub allowed_paths: Vec<String>,

    /// Glob patterns that always block, regardless of allowed_paths.
    #[serde(default)]
    pub denied_paths: Vec<String>,

    /// Maximum file size for file_read, in megabytes.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

fn default_max_file_size_mb() -> u64 {
    10
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_paths: Vec::new(),
            denied_paths: Vec::new(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

/// Web tool settings: category gate plus domain allow/deny patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebToolsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Domain patterns (supports `*.suffix`). Empty = allow all (except denied).
    #[serde(default)]
    pub allowed_domains: Vec<String>,

    /// Domain patterns that always block.
    #[serde(default)]
    pub denied_domains: Vec<String>,
}

impl Default for WebToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_domains: Vec::new(),
            denied_domains: Vec::new(),
        }
    }
}

/// Shell tool settings. Disabled by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShellToolsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub allowed_commands: Vec<String>,

    #[serde(default)]
    pub denied_commands: Vec<String>,
}

/// Database tool settings. Disabled by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseToolsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub connection_string: String,

    #[serde(default = "default_true")]
    pub read_only: bool,
}

impl Default for DatabaseToolsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            connection_string: String::new(),
            read_only: true,
        }
    }
}

/// DLP scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlpConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// The one global response to non-empty findings: log, warn, or block.
    #[serde(default)]
    pub action: DlpAction,

    #[serde(default)]
    pub patterns: DlpPatternsConfig,
}

impl Default for DlpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            action: DlpAction::Log,
            patterns: DlpPatternsConfig::default(),
        }
    }
}

/// Which built-in pattern groups are active, plus custom patterns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DlpPatternsConfig {
    #[serde(default = "default_true")]
    pub credit_cards: bool,

    #[serde(default = "default_true")]
    pub ssn: bool,

    /// Gates every key/token/secret built-in.
    #[serde(default = "default_true")]
    pub api_keys: bool,

    /// Emails are noisy; off by default.
    #[serde(default)]
    pub emails: bool,

    #[serde(default)]
    pub custom: Vec<CustomPattern>,
}

impl Default for DlpPatternsConfig {
    fn default() -> Self {
        Self {
            credit_cards: true,
            ssn: true,
            api_keys: true,
            emails: false,
            custom: Vec::new(),
        }
    }
}

/// A user-supplied DLP pattern. The expression must compile at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPattern {
    pub name: String,
    pub pattern: String,
    pub severity: Severity,
}

/// Audit logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Emit each audit entry as one JSON line on stdout.
    #[serde(default = "default_true")]
    pub stdout: bool,

    #[serde(default)]
    pub sqlite: SqliteLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stdout: true,
            sqlite: SqliteLoggingConfig::default(),
        }
    }
}

/// SQLite audit store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteLoggingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "./ironsieve.db".into()
}

impl Default for SqliteLoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_db_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the default location.
    ///
    /// Checks `IRONSIEVE_CONFIG` first, then `./ironsieve.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("IRONSIEVE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./ironsieve.toml"));
        Self::load_from(&path)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file yields the defaults; an unreadable or unparsable
    /// file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Every problem is collected so the error names all offending fields
    /// at once, not just the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.tools.file.max_file_size_mb == 0 {
            problems.push("tools.file.max_file_size_mb must be nonzero".to_string());
        }

        for custom in &self.dlp.patterns.custom {
            if custom.name.trim().is_empty() {
                problems.push("dlp.patterns.custom: pattern name must not be empty".to_string());
                continue;
            }
            if let Err(e) = regex_lite::Regex::new(&custom.pattern) {
                problems.push(format!(
                    "dlp.patterns.custom '{}': invalid expression: {e}",
                    custom.name
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(problems.join("; ")))
        }
    }

    /// Resolve the user identity attached to audit entries.
    pub fn resolve_user(&self) -> String {
        match self.identity.method {
            IdentityMethod::Env => {
                std::env::var(&self.identity.env_var).unwrap_or_else(|_| "unknown".into())
            }
            IdentityMethod::Static => self
                .identity
                .static_user
                .clone()
                .unwrap_or_else(|| "unknown".into()),
        }
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
