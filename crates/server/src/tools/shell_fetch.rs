//! shell_fetch tool implementation.
//!
//! Sends one request through the interception layer.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use topview_client::{FetchSource, ShellWorker};
use topview_core::request::resolve;
use topview_core::{Error, Method, Request};
use url::Url;

use super::{HeaderPair, header_pairs, json_result};

/// Input parameters for the shell_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShellFetchParams {
    /// Absolute URL, or a path relative to the dashboard origin.
    pub url: String,

    /// HTTP method (default: GET). Only GET is eligible for cache fallback.
    #[serde(default = "default_method")]
    pub method: String,

    /// Request headers to forward.
    #[serde(default)]
    pub headers: Vec<HeaderPair>,

    /// Request body to forward (non-GET requests).
    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the shell_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShellFetchOutput {
    /// The canonical URL that was requested.
    pub url: String,
    pub method: String,
    pub status: u16,
    pub headers: Vec<HeaderPair>,
    /// Response body decoded as UTF-8 (lossy).
    pub body: String,
    pub body_len: usize,
    /// "network", "cache" or "passthrough".
    pub source: FetchSource,
}

/// Implementation of the shell_fetch tool.
pub async fn fetch_impl(
    worker: &ShellWorker, origin: &Url, params: ShellFetchParams,
) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let method: Method = params.method.parse()?;
    let url = resolve(origin, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

    let mut request = Request::from_url(method, url);
    for header in params.headers {
        request = request.with_header(header.name, header.value);
    }
    if let Some(body) = params.body {
        request = request.with_body(body);
    }

    let outcome = worker.handle_fetch(&request).await?;
    let response = outcome.response;

    let output = ShellFetchOutput {
        url: request.url.to_string(),
        method: method.to_string(),
        status: response.status,
        headers: header_pairs(&response.headers),
        body: String::from_utf8_lossy(&response.body).into_owned(),
        body_len: response.body.len(),
        source: outcome.source,
    };

    json_result(&output)
}
