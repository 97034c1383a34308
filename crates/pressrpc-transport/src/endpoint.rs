//! Endpoint URL construction.

use std::fmt;

use url::Url;

use crate::TransportError;

/// The URL every call is posted to, fixed at construction.
///
/// Built from a site's base address and the XML-RPC sub-path:
/// `base` without trailing slashes, `/`, `path` without leading or
/// trailing slashes.
///
/// ```rust
/// use pressrpc_transport::Endpoint;
///
/// let endpoint = Endpoint::new("http://host/", "/xmlrpc.php/").unwrap();
/// assert_eq!(endpoint.as_str(), "http://host/xmlrpc.php");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Joins `base` and `path` into an endpoint.
    ///
    /// # Errors
    /// Returns `TransportError::InvalidEndpoint` if the joined string is
    /// not an absolute `http` or `https` URL.
    pub fn new(base: &str, path: &str) -> Result<Self, TransportError> {
        let joined = format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_matches('/')
        );
        let url = Url::parse(&joined).map_err(|e| TransportError::InvalidEndpoint {
            url: joined.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::InvalidEndpoint {
                url: joined,
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slashes_are_normalised() {
        let endpoint = Endpoint::new("http://host/", "/xmlrpc.php/").unwrap();
        assert_eq!(endpoint.as_str(), "http://host/xmlrpc.php");
    }

    #[test]
    fn test_plain_inputs_join_with_one_slash() {
        let endpoint = Endpoint::new("https://blog.example.com", "xmlrpc.php").unwrap();
        assert_eq!(endpoint.as_str(), "https://blog.example.com/xmlrpc.php");
    }

    #[test]
    fn test_base_with_subdirectory() {
        let endpoint = Endpoint::new("https://example.com/blog/", "wp/xmlrpc.php").unwrap();
        assert_eq!(endpoint.as_str(), "https://example.com/blog/wp/xmlrpc.php");
    }

    #[test]
    fn test_empty_path_is_the_base() {
        let endpoint = Endpoint::new("http://host", "").unwrap();
        assert_eq!(endpoint.as_str(), "http://host/");
    }

    #[test]
    fn test_relative_base_is_rejected() {
        let err = Endpoint::new("not a url", "xmlrpc.php").unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = Endpoint::new("ftp://host", "xmlrpc.php").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_display_matches_as_str() {
        let endpoint = Endpoint::new("http://host", "x").unwrap();
        assert_eq!(endpoint.to_string(), endpoint.as_str());
    }
}
