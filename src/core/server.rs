//! MCP server handler.
//!
//! The handler owns the tool registry and the upstream transport. Tool calls
//! are dispatched by name; resources expose the bundled API documentation.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult, ListToolsResult,
        PaginatedRequestParam, RawResource, ReadResourceRequestParam, ReadResourceResult,
        Resource, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
};
use serde_json::Map;
use tracing::{info, instrument};

use super::client::{ApiTransport, RebilliaClient};
use super::config::Config;
use crate::domains::resources::{ApiDoc, all_docs, find_doc};
use crate::domains::tools::result::ToolResult;
use crate::domains::tools::{ToolRegistry, register_all};

/// The main MCP server handler.
#[derive(Clone)]
pub struct RebilliaServer {
    config: Arc<Config>,
    client: Arc<dyn ApiTransport>,
    registry: Arc<ToolRegistry>,
}

impl RebilliaServer {
    /// Build a server backed by the real HTTP client.
    pub fn new(config: Config) -> Self {
        let client = Arc::new(RebilliaClient::new(
            config.api.api_key.clone(),
            config.api.base_url.clone(),
        ));
        Self::with_transport(config, client)
    }

    /// Build a server with an explicit transport, used by tests.
    pub fn with_transport(config: Config, client: Arc<dyn ApiTransport>) -> Self {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry);
        info!(tools = registry.len(), "tool registry built");
        Self {
            config: Arc::new(config),
            client,
            registry: Arc::new(registry),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    fn doc_resource(doc: &ApiDoc) -> Resource {
        let mut raw = RawResource::new(doc.uri, doc.name);
        raw.description = Some(doc.description.to_string());
        raw.mime_type = Some(ApiDoc::MIME_TYPE.to_string());
        raw.no_annotation()
    }
}

impl ServerHandler for RebilliaServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Exposes the Rebillia billing API: customers, subscriptions, invoices, \
                 products, rate plans, transactions, bill runs, gateways, currencies, \
                 integrations, shipping, and filters. Call get_api_docs or read the \
                 rebillia://docs/* resources for base URLs, auth, pagination, and enums."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        info!("Listing tools");
        let tools = self
            .registry
            .list()
            .iter()
            .map(|def| {
                Tool::new(
                    def.name,
                    def.description,
                    Arc::new(def.input_schema.as_object().cloned().unwrap_or_default()),
                )
            })
            .collect();
        Ok(ListToolsResult {
            tools,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context, request), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        info!("Calling tool");
        let args = request.arguments.unwrap_or_else(Map::new);
        match self
            .registry
            .dispatch(&request.name, args, self.client.clone())
            .await
        {
            Some(result) => Ok(result.into()),
            None => Ok(ToolResult::error(format!("Unknown tool: {}", request.name)).into()),
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        let resources = all_docs().iter().map(Self::doc_resource).collect();
        Ok(ListResourcesResult {
            resources,
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        let doc = find_doc(&request.uri).ok_or_else(|| {
            McpError::resource_not_found(format!("Resource not found: {}", request.uri), None)
        })?;
        Ok(ReadResourceResult {
            contents: vec![ResourceContents::text(doc.text, doc.uri)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::testing::FakeTransport;

    fn test_config() -> Config {
        use crate::core::config::{ApiConfig, LoggingConfig, ServerConfig};
        Config {
            server: ServerConfig {
                name: "rebillia-mcp-server".to_string(),
                version: "0.0.0".to_string(),
            },
            api: ApiConfig {
                api_key: "test-key".to_string(),
                base_url: "http://localhost:9999/v1".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn registry_covers_every_resource_area() {
        let server = RebilliaServer::with_transport(test_config(), Arc::new(FakeTransport::new()));
        assert!(server.registry.len() >= 90);
        assert!(server.registry.contains("get_api_docs"));
    }

    #[test]
    fn doc_resources_expose_markdown() {
        let resources: Vec<_> = all_docs().iter().map(RebilliaServer::doc_resource).collect();
        assert_eq!(resources.len(), 4);
        assert_eq!(
            resources[0].raw.mime_type.as_deref(),
            Some("text/markdown")
        );
        assert!(resources[0].raw.uri.starts_with("rebillia://docs/"));
    }
}
