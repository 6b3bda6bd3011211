//! shell_status tool implementation.
//!
//! Reports the worker's lifecycle state and how full its namespace is.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_client::{ShellWorker, WorkerState};
use topview_core::CacheDb;

use super::json_result;

/// Output from the shell_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShellStatusOutput {
    pub state: WorkerState,
    /// Whether the namespace has been populated by a successful install
    pub installed: bool,
    pub cache_name: String,
    pub shell_assets: Vec<String>,
    pub entry_count: u64,
}

/// Implementation of the shell_status tool.
pub async fn status_impl(worker: &ShellWorker, db: &CacheDb) -> Result<CallToolResult, McpError> {
    let state = worker.state();
    let output = ShellStatusOutput {
        state,
        installed: state.is_installed(),
        cache_name: worker.cache_name().to_string(),
        shell_assets: worker.shell_assets().iter().map(|u| u.to_string()).collect(),
        entry_count: db.entry_count(worker.cache_name()).await?,
    };

    json_result(&output)
}
