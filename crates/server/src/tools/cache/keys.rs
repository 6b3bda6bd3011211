//! cache_keys tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_core::{CacheDb, EntryInfo};

use crate::tools::json_result;

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    pub cache_name: String,
    pub entries: Vec<EntryInfo>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(cache: &CacheDb, cache_name: &str) -> Result<CallToolResult, McpError> {
    let entries = cache.list_entries(cache_name).await?;
    json_result(&CacheKeysOutput { cache_name: cache_name.to_string(), entries })
}
