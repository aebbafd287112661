//! CLI command implementations, one file per command.

pub mod audit_cmd;
pub mod check;
pub mod config_cmd;
pub mod events;
pub mod run;
pub mod scan;
pub mod tools_cmd;

use anyhow::Context;
use ironsieve_audit::{AuditLogger, AuditStore};
use ironsieve_config::AppConfig;
use ironsieve_dlp::{PatternCatalog, Scanner};
use ironsieve_gate::Interceptor;
use ironsieve_policy::PolicyEngine;
use ironsieve_tools::builtin_registry;
use std::sync::Arc;

/// Open the configured audit store, or `None` when SQLite logging is off.
pub(crate) async fn open_store(config: &AppConfig) -> anyhow::Result<Option<Arc<AuditStore>>> {
    if !config.logging.sqlite.enabled {
        return Ok(None);
    }
    let store = AuditStore::new(&config.logging.sqlite.path)
        .await
        .context("Failed to open audit store")?;
    Ok(Some(Arc::new(store)))
}

/// Open the audit store regardless of the stdout setting; the read-side
/// commands need it.
pub(crate) async fn require_store(config: &AppConfig) -> anyhow::Result<Arc<AuditStore>> {
    open_store(config)
        .await?
        .context("SQLite logging is disabled; nothing to query")
}

/// Assemble the full gateway from configuration.
pub(crate) async fn build_gateway(config: &AppConfig) -> anyhow::Result<Interceptor> {
    let registry = builtin_registry(config);
    let policy = PolicyEngine::from_config(config).context("Invalid policy configuration")?;
    let catalog = PatternCatalog::from_config(&config.dlp.patterns)
        .context("Invalid DLP pattern configuration")?;
    let scanner = Scanner::new(Arc::new(catalog));
    let store = open_store(config).await?;
    let logger = AuditLogger::new(config.logging.stdout, store);
    Ok(Interceptor::new(
        registry,
        policy,
        scanner,
        logger,
        config.dlp.enabled,
    ))
}

/// Build a scanner alone, for read-only scanning commands.
pub(crate) fn build_scanner(config: &AppConfig) -> anyhow::Result<Scanner> {
    let catalog = PatternCatalog::from_config(&config.dlp.patterns)
        .context("Invalid DLP pattern configuration")?;
    Ok(Scanner::new(Arc::new(catalog)))
}

/// Parse a `--args` JSON object string.
pub(crate) fn parse_args(args: &str) -> anyhow::Result<serde_json::Value> {
    let value: serde_json::Value =
        serde_json::from_str(args).context("--args must be a JSON object")?;
    anyhow::ensure!(value.is_object(), "--args must be a JSON object");
    Ok(value)
}
