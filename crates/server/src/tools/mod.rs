//! MCP tool implementations.
//!
//! Each tool has a plain `*_impl` function taking the state it needs so it
//! can be exercised without an MCP transport.

pub mod cache;
pub mod shell_fetch;
pub mod shell_status;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_core::Error;

/// A single response header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeaderPair {
    pub name: String,
    pub value: String,
}

/// Header values that are not UTF-8 are shown with replacement characters.
pub(crate) fn header_pairs<V: AsRef<[u8]>>(headers: &[(String, V)]) -> Vec<HeaderPair> {
    headers
        .iter()
        .map(|(name, value)| HeaderPair {
            name: name.clone(),
            value: String::from_utf8_lossy(value.as_ref()).into_owned(),
        })
        .collect()
}

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::Serialization(format!("failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
pub(crate) fn output_text(result: &CallToolResult) -> String {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content")
        .to_string()
}
