//! Request and response values that flow through the interception layer.
//!
//! A [`Request`] is transient: it lives for the duration of one fetch
//! handling and is never persisted. A [`Response`] is what the network
//! primitive yields and what the cache store keeps, byte-for-byte.

pub mod url;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub use self::url::{UrlError, canonicalize, resolve};

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Only GET requests are eligible for caching or cache fallback.
    pub fn is_cacheable(&self) -> bool {
        matches!(self, Self::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "HEAD" => Ok(Self::Head),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            other => Err(crate::Error::InvalidInput(format!("unsupported method: {other}"))),
        }
    }
}

/// An intercepted outbound request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: ::url::Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl Request {
    /// Build a request from an absolute URL string, canonicalizing it.
    pub fn new(method: Method, url: &str) -> Result<Self, crate::Error> {
        let url = canonicalize(url).map_err(|e| crate::Error::InvalidUrl(e.to_string()))?;
        Ok(Self::from_url(method, url))
    }

    pub fn get(url: &str) -> Result<Self, crate::Error> {
        Self::new(Method::Get, url)
    }

    /// Build a request from an already canonical URL.
    pub fn from_url(method: Method, url: ::url::Url) -> Self {
        Self { method, url, headers: Vec::new(), body: None }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Cache identity for this request (see [`crate::cache::hash::compute_cache_key`]).
    pub fn cache_key(&self) -> String {
        crate::cache::hash::compute_cache_key(self.method, &self.url)
    }
}

/// A response as returned by the network or stored in a cache namespace.
///
/// Header values are kept as raw bytes: HTTP allows non-UTF-8 octets there
/// and a stored response must come back exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, Bytes)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl AsRef<[u8]>) -> Self {
        self.headers.push((name.into(), Bytes::copy_from_slice(value.as_ref())));
        self
    }

    /// 2xx status, the condition a shell asset must meet to be stored.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw bytes of the first header value matching `name`, compared
    /// case-insensitively.
    pub fn header_bytes(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }

    /// Like [`Response::header_bytes`], but only for values that are valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.header_bytes(name).and_then(|v| std::str::from_utf8(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!(" Post ".parse::<Method>().unwrap(), Method::Post);
        assert!("BREW".parse::<Method>().is_err());
    }

    #[test]
    fn test_only_get_is_cacheable() {
        assert!(Method::Get.is_cacheable());
        for method in [Method::Head, Method::Post, Method::Put, Method::Patch, Method::Delete, Method::Options] {
            assert!(!method.is_cacheable(), "{method} should bypass the cache");
        }
    }

    #[test]
    fn test_request_new_canonicalizes() {
        let request = Request::get("http://LOCALHOST:8080/index.html#top").unwrap();
        assert_eq!(request.url.as_str(), "http://localhost:8080/index.html");
    }

    #[test]
    fn test_request_new_rejects_relative() {
        let result = Request::get("/index.html");
        assert!(matches!(result, Err(crate::Error::InvalidUrl(_))));
    }

    #[test]
    fn test_response_header_lookup() {
        let response = Response::new(200, "{}").with_header("Content-Type", "application/json");
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("etag"), None);
        assert!(response.is_success());
        assert!(!Response::new(404, "").is_success());
    }

    #[test]
    fn test_response_keeps_non_utf8_header() {
        let raw = b"attachment; filename=caf\xe9.csv";
        let response = Response::new(200, "").with_header("Content-Disposition", raw);
        assert_eq!(response.header_bytes("content-disposition"), Some(&raw[..]));
        assert_eq!(response.header("content-disposition"), None);
    }
}
