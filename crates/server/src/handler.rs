//! MCP server handler implementation.
//!
//! The MCP client plays the dashboard: every request it sends through
//! `shell_fetch` is intercepted by the shell worker.

use std::sync::Arc;

use crate::tools::cache::{CacheGetParams, get_impl, keys_impl, namespaces_impl};
use crate::tools::shell_fetch::{ShellFetchParams, fetch_impl};
use crate::tools::shell_status::status_impl;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use topview_client::ShellWorker;
use topview_core::CacheDb;
use url::Url;

/// The MCP server handler for topview-shell.
#[derive(Clone)]
pub struct ShellServer {
    tool_router: ToolRouter<Self>,
    worker: Arc<ShellWorker>,
    cache: CacheDb,
    origin: Url,
}

#[tool_router]
impl ShellServer {
    /// Create a new server handler around an activated worker.
    pub fn new(worker: Arc<ShellWorker>, cache: CacheDb, origin: Url) -> Self {
        Self { tool_router: Self::tool_router(), worker, cache, origin }
    }

    #[tool(
        description = "Send a request through the offline shell layer. GET requests fall back to the shell cache when the network fails; other methods go straight to the network."
    )]
    async fn shell_fetch(&self, params: Parameters<ShellFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, &self.origin, params.0).await
    }

    #[tool(description = "Report the shell worker's lifecycle state, cache namespace and entry count.")]
    async fn shell_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(&self.worker, &self.cache).await
    }

    #[tool(description = "Read the cached GET response for a URL from the active shell cache namespace.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.cache, self.worker.cache_name(), &self.origin, params.0).await
    }

    #[tool(description = "List the entries stored in the active shell cache namespace.")]
    async fn cache_keys(&self) -> Result<CallToolResult, McpError> {
        keys_impl(&self.cache, self.worker.cache_name()).await
    }

    #[tool(description = "List every cache namespace in the database, marking the one in use.")]
    async fn cache_namespaces(&self) -> Result<CallToolResult, McpError> {
        namespaces_impl(&self.cache, self.worker.cache_name()).await
    }
}

impl ServerHandler for ShellServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "topview-shell".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
