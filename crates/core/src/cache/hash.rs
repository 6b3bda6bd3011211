//! Request identity for cache entries.

use sha2::{Digest, Sha256};
use url::Url;

use crate::request::Method;

/// Compute the cache key for a request identity (method + canonical URL).
pub fn compute_cache_key(method: Method, url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::canonicalize;

    #[test]
    fn test_hash_stability() {
        let url = Url::parse("http://localhost:8080/index.html").unwrap();
        assert_eq!(compute_cache_key(Method::Get, &url), compute_cache_key(Method::Get, &url));
    }

    #[test]
    fn test_hash_different_method() {
        let url = Url::parse("http://localhost:8080/api/leads").unwrap();
        assert_ne!(compute_cache_key(Method::Get, &url), compute_cache_key(Method::Post, &url));
    }

    #[test]
    fn test_hash_stable_under_canonicalization() {
        let a = canonicalize("http://LocalHost:8080/index.html#hero").unwrap();
        let b = canonicalize("http://localhost:8080/index.html").unwrap();
        assert_eq!(compute_cache_key(Method::Get, &a), compute_cache_key(Method::Get, &b));
    }

    #[test]
    fn test_hash_query_is_significant() {
        let a = canonicalize("http://localhost:8080/reports?month=1").unwrap();
        let b = canonicalize("http://localhost:8080/reports?month=2").unwrap();
        assert_ne!(compute_cache_key(Method::Get, &a), compute_cache_key(Method::Get, &b));
    }

    #[test]
    fn test_hash_format() {
        let url = Url::parse("http://localhost:8080/").unwrap();
        let hash = compute_cache_key(Method::Get, &url);
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
