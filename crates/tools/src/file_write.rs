//! File write tool — write content to a file.

use async_trait::async_trait;
use ironsieve_core::error::ToolError;
use ironsieve_core::tool::{Tool, ToolResult};

pub struct FileWriteTool;

#[async_trait]
impl Tool for FileWriteTool {
    fn name(&self) -> &str {
        "file_write"
    }

    fn description(&self) -> &str {
        "Write content to a file"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The path to the file to write"
                },
                "content": {
                    "type": "string",
                    "description": "The content to write to the file"
                }
            },
            "required": ["path", "content"]
        })
    }

    fn validate_args(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        if arguments["path"].as_str().is_none() {
            return Err(ToolError::InvalidArguments("Missing 'path' argument".into()));
        }
        if arguments["content"].as_str().is_none() {
            return Err(ToolError::InvalidArguments(
                "Missing 'content' argument".into(),
            ));
        }
        Ok(())
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let path = arguments["path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let content = arguments["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'content' argument".into()))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "file_write".into(),
                reason: format!("Failed to write file: {e}"),
            })?;

        Ok(ToolResult {
            output: format!("Successfully wrote {} bytes to {path}", content.len()),
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_content_and_reports_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("out.txt");

        let tool = FileWriteTool;
        let result = tool
            .execute(serde_json::json!({
                "path": file_path.to_str().unwrap(),
                "content": "hello"
            }))
            .await
            .unwrap();

        assert_eq!(
            result.output,
            format!("Successfully wrote 5 bytes to {}", file_path.display())
        );
        assert_eq!(std::fs::read_to_string(&file_path).unwrap(), "hello");
    }

    #[test]
    fn validate_requires_both_arguments() {
        let tool = FileWriteTool;
        assert!(
            tool.validate_args(&serde_json::json!({"path": "/tmp/x", "content": "c"}))
                .is_ok()
        );
        assert!(tool.validate_args(&serde_json::json!({"path": "/tmp/x"})).is_err());
        assert!(tool.validate_args(&serde_json::json!({"content": "c"})).is_err());
    }

    #[tokio::test]
    async fn unwritable_path_fails() {
        let tool = FileWriteTool;
        let err = tool
            .execute(serde_json::json!({
                "path": "/proc/ironsieve/denied.txt",
                "content": "x"
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }
}
