//! cache_get tool implementation.
//!
//! Retrieves the cached GET response for a URL from the active namespace.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_core::request::resolve;
use topview_core::{CacheDb, Error, Method, Request};
use url::Url;

use crate::tools::{HeaderPair, header_pairs, json_result};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Absolute URL, or a path relative to the dashboard origin.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub cache_name: String,
    pub url: String,
    pub key_hash: String,
    pub status: u16,
    pub headers: Vec<HeaderPair>,
    pub body: String,
    pub body_len: usize,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(
    cache: &CacheDb, cache_name: &str, origin: &Url, params: CacheGetParams,
) -> Result<CallToolResult, McpError> {
    let url = resolve(origin, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let request = Request::from_url(Method::Get, url);
    let key_hash = request.cache_key();

    let response = cache
        .match_entry(cache_name, &key_hash)
        .await?
        .ok_or_else(|| Error::CacheMiss(request.url.to_string()))?;

    let output = CacheGetOutput {
        cache_name: cache_name.to_string(),
        url: request.url.to_string(),
        key_hash,
        status: response.status,
        headers: header_pairs(&response.headers),
        body: String::from_utf8_lossy(&response.body).into_owned(),
        body_len: response.body.len(),
    };

    json_result(&output)
}
