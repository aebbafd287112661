//! File list tool — directory listing.

use async_trait::async_trait;
use ironsieve_core::error::ToolError;
use ironsieve_core::tool::{Tool, ToolResult};

pub struct FileListTool;

#[async_trait]
impl Tool for FileListTool {
    fn name(&self) -> &str {
        "file_list"
    }

    fn description(&self) -> &str {
        "List files in a directory"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The directory path to list"
                }
            },
            "required": ["path"]
        })
    }

    fn validate_args(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        if arguments["path"].as_str().is_none() {
            return Err(ToolError::InvalidArguments("Missing 'path' argument".into()));
        }
        Ok(())
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;

        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "file_list".into(),
                reason: format!("Failed to list directory: {e}"),
            })?;

        let mut lines = Vec::new();
        while let Some(entry) =
            dir.next_entry()
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "file_list".into(),
                    reason: format!("Failed to read directory entry: {e}"),
                })?
        {
            let kind = match entry.file_type().await {
                Ok(t) if t.is_dir() => "dir",
                _ => "file",
            };
            lines.push(format!("{kind}: {}", entry.file_name().to_string_lossy()));
        }

        Ok(ToolResult {
            output: lines.join("\n"),
            data: None,
        })
    }
}
