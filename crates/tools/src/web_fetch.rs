//! Web fetch tool — HTTP requests via reqwest.

use async_trait::async_trait;
use ironsieve_core::error::ToolError;
use ironsieve_core::tool::{Tool, ToolResult};
use reqwest::Method;
use tracing::debug;

const USER_AGENT: &str = concat!("ironsieve/", env!("CARGO_PKG_VERSION"));

pub struct WebFetchTool {
    client: reqwest::Client,
}

impl WebFetchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_method(method: &str) -> Option<Method> {
    match method {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch content from a URL"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL to fetch"
                },
                "method": {
                    "type": "string",
                    "enum": ["GET", "POST", "PUT", "DELETE"],
                    "description": "HTTP method",
                    "default": "GET"
                },
                "headers": {
                    "type": "object",
                    "description": "HTTP headers"
                },
                "body": {
                    "type": "string",
                    "description": "Request body for POST/PUT"
                }
            },
            "required": ["url"]
        })
    }

    fn validate_args(&self, arguments: &serde_json::Value) -> Result<(), ToolError> {
        if arguments["url"].as_str().is_none() {
            return Err(ToolError::InvalidArguments("Missing 'url' argument".into()));
        }
        if let Some(method) = arguments["method"].as_str() {
            if parse_method(method).is_none() {
                return Err(ToolError::InvalidArguments(format!(
                    "Unsupported HTTP method: {method}"
                )));
            }
        }
        Ok(())
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let url = arguments["url"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'url' argument".into()))?;
        let method = arguments["method"]
            .as_str()
            .map(parse_method)
            .unwrap_or(Some(Method::GET))
            .ok_or_else(|| {
                ToolError::InvalidArguments(format!(
                    "Unsupported HTTP method: {}",
                    arguments["method"]
                ))
            })?;

        debug!("Fetching {method} {url}");
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("User-Agent", USER_AGENT);

        if let Some(headers) = arguments["headers"].as_object() {
            for (name, value) in headers {
                if let Some(value) = value.as_str() {
                    request = request.header(name, value);
                }
            }
        }

        // Body only travels with POST/PUT
        if matches!(method, Method::POST | Method::PUT) {
            if let Some(body) = arguments["body"].as_str() {
                request = request.body(body.to_string());
            }
        }

        let response = request.send().await.map_err(|e| ToolError::ExecutionFailed {
            tool_name: "web_fetch".into(),
            reason: format!("Request failed: {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::ExecutionFailed {
                tool_name: "web_fetch".into(),
                reason: format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("unknown")
                ),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let content_length = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let output = if content_type.contains("application/json") {
            let json: serde_json::Value =
                response.json().await.map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "web_fetch".into(),
                    reason: format!("Failed to parse JSON response: {e}"),
                })?;
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        } else if content_type.contains("text/") {
            response.text().await.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_fetch".into(),
                reason: format!("Failed to read response body: {e}"),
            })?
        } else {
            format!(
                "Binary content ({content_type}), size: {} bytes",
                content_length.as_deref().unwrap_or("unknown")
            )
        };

        Ok(ToolResult {
            output,
            data: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition() {
        let tool = WebFetchTool::new();
        assert_eq!(tool.name(), "web_fetch");
        let schema = tool.parameters_schema();
        assert_eq!(schema["required"], serde_json::json!(["url"]));
        assert_eq!(schema["properties"]["method"]["default"], "GET");
    }

    #[test]
    fn validate_accepts_known_methods_only() {
        let tool = WebFetchTool::new();
        for method in ["GET", "POST", "PUT", "DELETE"] {
            assert!(
                tool.validate_args(
                    &serde_json::json!({"url": "https://example.com", "method": method})
                )
                .is_ok()
            );
        }
        assert!(
            tool.validate_args(
                &serde_json::json!({"url": "https://example.com", "method": "PATCH"})
            )
            .is_err()
        );
        assert!(tool.validate_args(&serde_json::json!({})).is_err());
    }

    #[tokio::test]
    async fn unreachable_host_is_an_execution_error() {
        let tool = WebFetchTool::new();
        let err = tool
            .execute(serde_json::json!({"url": "http://127.0.0.1:1/nothing"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }
}
