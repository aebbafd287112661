//! Path rules — lexical normalization and glob-based allow/deny checks.

use glob::Pattern;
use ironsieve_core::{PolicyDecision, PolicyError};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// A path pattern compiled once at engine construction.
///
/// Keeps the raw string alongside the compiled glob: deny/allow checks
/// run the glob against both the normalized and the raw candidate path,
/// and allow rules additionally match by prefix on the raw pattern text.
pub struct PathRule {
    pub raw: String,
    pub glob: Pattern,
}

impl PathRule {
    pub fn compile(pattern: &str) -> Result<Self, PolicyError> {
        let glob = Pattern::new(pattern).map_err(|e| PolicyError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            raw: pattern.to_string(),
            glob,
        })
    }

    fn matches(&self, candidate: &str) -> bool {
        self.glob.matches(candidate)
    }
}

/// Resolve a path to a canonical absolute form without touching the
/// filesystem.
///
/// Relative paths are joined onto the current directory; `.` and `..`
/// components are resolved lexically. Staying lexical keeps decisions
/// deterministic and lets the engine rule on paths that do not exist.
pub fn normalize_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);
    let absolute = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(candidate)
    };

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Compiled file-path policy for one configuration lifetime.
pub struct PathRules {
    pub enabled: bool,
    allowed: Vec<PathRule>,
    denied: Vec<PathRule>,
}

impl PathRules {
    pub fn compile(
        enabled: bool,
        allowed_paths: &[String],
        denied_paths: &[String],
    ) -> Result<Self, PolicyError> {
        let allowed = allowed_paths
            .iter()
            .map(|p| PathRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let denied = denied_paths
            .iter()
            .map(|p| PathRule::compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            enabled,
            allowed,
            denied,
        })
    }

    /// Render a decision for a candidate file path.
    ///
    /// Order is fixed: category gate, then denied patterns (deny always
    /// wins), then the allow list — where an empty allow list means
    /// allow-all.
    pub fn check(&self, file_path: &str) -> PolicyDecision {
        if !self.enabled {
            return PolicyDecision::block("File tools are disabled");
        }

        let normalized = normalize_path(file_path);
        let normalized_str = normalized.to_string_lossy();
        debug!("Path check: {file_path} -> {normalized_str}");

        for rule in &self.denied {
            if rule.matches(&normalized_str) || rule.matches(file_path) {
                return PolicyDecision::block(format!(
                    "Path matches denied pattern: {}",
                    rule.raw
                ));
            }
        }

        if self.allowed.is_empty() {
            return PolicyDecision::allow();
        }

        for rule in &self.allowed {
            if normalized_str.starts_with(&rule.raw)
                || rule.matches(&normalized_str)
                || rule.matches(file_path)
            {
                return PolicyDecision::allow();
            }
        }

        PolicyDecision::block("Path not in allowed paths")
    }
}
