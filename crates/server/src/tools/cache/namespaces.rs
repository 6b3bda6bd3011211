//! cache_namespaces tool implementation.
//!
//! Lists every namespace in the database. Namespaces from earlier versions
//! stay listed; they are orphaned, not deleted.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_core::CacheDb;

use crate::tools::json_result;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NamespaceSummary {
    pub name: String,
    pub created_at: String,
    pub entry_count: u64,
    /// True for the namespace the running worker reads from.
    pub current: bool,
}

/// Output from the cache_namespaces tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheNamespacesOutput {
    pub namespaces: Vec<NamespaceSummary>,
}

/// Implementation of the cache_namespaces tool.
pub async fn namespaces_impl(cache: &CacheDb, current: &str) -> Result<CallToolResult, McpError> {
    let namespaces = cache
        .list_namespaces()
        .await?
        .into_iter()
        .map(|ns| NamespaceSummary {
            current: ns.name == current,
            name: ns.name,
            created_at: ns.created_at,
            entry_count: ns.entry_count,
        })
        .collect();

    json_result(&CacheNamespacesOutput { namespaces })
}
