//! File read tool — read a UTF-8 file's contents.

use async_trait::async_trait;
use ironsieve_core::error::ToolError;
use ironsieve_core::tool::{Tool, ToolResult};

pub struct FileReadTool {
    /// Maximum file size in megabytes, from configuration.
    max_file_size_mb: u64,
}

impl FileReadTool {
    pub fn new(max_file_size_mb: u64) -> Self {
        Self { max_file_size_mb }
    }
}

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "file_read"
    }

    fn description(&self) -> &str {
        "Read the contents of a file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to read"
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

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "file_read".into(),
                reason: format!("Failed to stat file: {e}"),
            })?;

        let max_bytes = self.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(ToolError::ExecutionFailed {
                tool_name: "file_read".into(),
                reason: format!(
                    "File exceeds maximum size of {} MB",
                    self.max_file_size_mb
                ),
            });
        }

        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "file_read".into(),
                    reason: format!("Failed to read file: {e}"),
                })?;

        Ok(ToolResult {
            output: content,
            data: None,
        })
    }
}
