//! URL canonicalization so equal requests map to the same cache identity.

use url::Url;

/// Error type for URL canonicalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("relative URL without an origin: {0}")]
    Relative(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize an absolute URL string.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an http or https scheme
/// 3. Lowercase the host
/// 4. Remove fragment (#...)
/// 5. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => return Err(UrlError::Relative(trimmed.to_string())),
        Err(e) => return Err(UrlError::InvalidUrl(e.to_string())),
    };

    normalize(parsed)
}

/// Resolve a resource identifier against the application origin.
///
/// Absolute URLs are canonicalized as-is; relative paths such as
/// `/index.html` are joined onto `origin` first.
pub fn resolve(origin: &Url, input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    match canonicalize(trimmed) {
        Err(UrlError::Relative(_)) => {
            let joined = origin.join(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
            normalize(joined)
        }
        other => other,
    }
}

fn normalize(mut parsed: Url) -> Result<Url, UrlError> {
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let lowered = host.to_lowercase();
        parsed
            .set_host(Some(&lowered))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost:8080").unwrap()
    }

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://topview.example/dashboard").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("topview.example"));
        assert_eq!(url.path(), "/dashboard");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://TOPVIEW.Example").unwrap();
        assert_eq!(url.host_str(), Some("topview.example"));
    }

    #[test]
    fn test_canonicalize_remove_fragment_keep_query() {
        let url = canonicalize("https://topview.example/projects?site=12#budget").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), Some("site=12"));
    }

    #[test]
    fn test_canonicalize_relative_rejected() {
        let result = canonicalize("/index.html");
        assert!(matches!(result, Err(UrlError::Relative(_))));
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_root_and_paths() {
        assert_eq!(resolve(&origin(), "/").unwrap().as_str(), "http://localhost:8080/");
        assert_eq!(resolve(&origin(), "/index.html").unwrap().as_str(), "http://localhost:8080/index.html");
        assert_eq!(resolve(&origin(), "manifest.json").unwrap().as_str(), "http://localhost:8080/manifest.json");
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let url = resolve(&origin(), "https://CDN.example/app.css#x").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example/app.css");
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve(&origin(), ""), Err(UrlError::Empty)));
    }
}
