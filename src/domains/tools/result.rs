//! Uniform tool result shape.
//!
//! Every tool call, success or failure, produces a [`ToolResult`] holding a
//! single text block. Failures carry `isError: true`; the flag is omitted on
//! success.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::Value;

/// One text block inside a tool result.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Result of a tool invocation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolResult {
    /// Successful result carrying plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text: text.into(),
            }],
            is_error: None,
        }
    }

    /// Successful result carrying a pretty-printed JSON payload.
    pub fn json(value: &Value) -> Self {
        let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        Self::text(text)
    }

    /// Failed result with an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent {
                kind: "text".to_string(),
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error == Some(true)
    }

    /// Text of the first content block, for tests and logging.
    pub fn first_text(&self) -> &str {
        self.content.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        let content = result
            .content
            .iter()
            .map(|c| Content::text(c.text.clone()))
            .collect();
        if result.is_error() {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_error_flag() {
        let result = ToolResult::text("ok");
        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["content"][0]["type"], "text");
        assert_eq!(serialized["content"][0]["text"], "ok");
        assert!(serialized.get("isError").is_none());
    }

    #[test]
    fn error_sets_flag() {
        let result = ToolResult::error("boom");
        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["isError"], true);
        assert_eq!(serialized["content"][0]["text"], "boom");
    }

    #[test]
    fn json_result_is_pretty_printed() {
        let result = ToolResult::json(&json!({"id": 7, "name": "Acme"}));
        let text = result.first_text();
        assert!(text.contains("\n"));
        assert!(text.contains("\"id\": 7"));
    }
}
