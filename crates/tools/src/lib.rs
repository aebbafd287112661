//! Built-in tool handlers for ironsieve.
//!
//! Handlers are pure executors: access control and DLP scanning belong
//! to the interceptor, which is the only caller. Every handler is
//! registered regardless of category enablement so that a disabled
//! category surfaces as a policy denial rather than an unknown tool;
//! only the listing surface filters by category.

pub mod file_list;
pub mod file_read;
pub mod file_write;
pub mod web_fetch;

use ironsieve_config::AppConfig;
use ironsieve_core::tool::{ToolDefinition, ToolRegistry};

/// Build the registry of built-in tools.
pub fn builtin_registry(config: &AppConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(file_read::FileReadTool::new(
        config.tools.file.max_file_size_mb,
    )));
    registry.register(Box::new(file_list::FileListTool));
    registry.register(Box::new(file_write::FileWriteTool));
    registry.register(Box::new(web_fetch::WebFetchTool::new()));
    registry
}

/// Tool definitions filtered by category enablement, for listing surfaces.
pub fn enabled_definitions(registry: &ToolRegistry, config: &AppConfig) -> Vec<ToolDefinition> {
    registry
        .definitions()
        .into_iter()
        .filter(|def| match def.name.as_str() {
            "file_read" | "file_write" | "file_list" => config.tools.file.enabled,
            "web_fetch" => config.tools.web.enabled,
            "shell_exec" => config.tools.shell.enabled,
            "db_query" => config.tools.database.enabled,
            _ => true,
        })
        .collect()
}
