//! Tool registry and dispatcher.
//!
//! Each resource area registers its tools at startup. Listing preserves
//! registration order so related tools stay grouped; dispatch looks the
//! handler up by name and never lets a handler panic escape to the MCP
//! layer.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use tracing::error;

use crate::core::client::ApiTransport;
use crate::domains::tools::result::ToolResult;

/// Handler signature shared by every tool.
pub type ToolHandler =
    fn(Arc<dyn ApiTransport>, Map<String, Value>) -> BoxFuture<'static, ToolResult>;

/// One registered tool: its MCP-facing contract plus the handler.
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

/// Insertion-ordered collection of tools with by-name lookup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
    index: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Panics on a duplicate name; this runs once at
    /// startup, before the server accepts requests.
    pub fn register(&mut self, tool: ToolDef) {
        if self.index.contains_key(tool.name) {
            panic!("duplicate tool name registered: {}", tool.name);
        }
        self.index.insert(tool.name, self.tools.len());
        self.tools.push(tool);
    }

    /// All tools in registration order.
    pub fn list(&self) -> &[ToolDef] {
        &self.tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Run the named tool. `None` means the tool does not exist; the caller
    /// decides how to phrase that. A panicking handler is caught here and
    /// reported as an error result.
    pub async fn dispatch(
        &self,
        name: &str,
        args: Map<String, Value>,
        client: Arc<dyn ApiTransport>,
    ) -> Option<ToolResult> {
        let tool = self.index.get(name).map(|&i| &self.tools[i])?;
        let future = (tool.handler)(client, args);
        let result = match std::panic::AssertUnwindSafe(future).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let detail = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(tool = name, %detail, "tool handler panicked");
                ToolResult::error(format!("Error: internal failure in tool '{name}'"))
            }
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;
    use serde_json::json;

    fn ok_tool(name: &'static str) -> ToolDef {
        ToolDef {
            name,
            description: "test tool",
            input_schema: json!({"type": "object", "properties": {}}),
            handler: |_, _| async { ToolResult::text("ok") }.boxed(),
        }
    }

    #[test]
    fn listing_preserves_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(ok_tool("b_tool"));
        registry.register(ok_tool("a_tool"));
        let names: Vec<_> = registry.list().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b_tool", "a_tool"]);
    }

    #[test]
    #[should_panic(expected = "duplicate tool name registered: a_tool")]
    fn duplicate_name_panics() {
        let mut registry = ToolRegistry::new();
        registry.register(ok_tool("a_tool"));
        registry.register(ok_tool("a_tool"));
    }

    #[tokio::test]
    async fn dispatch_unknown_tool_returns_none() {
        let registry = ToolRegistry::new();
        let client: Arc<dyn ApiTransport> = Arc::new(FakeTransport::new());
        let result = registry.dispatch("missing", Map::new(), client).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn dispatch_catches_handler_panics() {
        let mut registry = ToolRegistry::new();
        registry.register(ToolDef {
            name: "explodes",
            description: "always panics",
            input_schema: json!({"type": "object"}),
            handler: |_, _| async { panic!("boom") }.boxed(),
        });
        let client: Arc<dyn ApiTransport> = Arc::new(FakeTransport::new());
        let result = registry
            .dispatch("explodes", Map::new(), client)
            .await
            .unwrap();
        assert!(result.is_error());
        assert!(result.first_text().contains("explodes"));
    }
}
