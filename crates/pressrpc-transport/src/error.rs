/// Errors that can occur in the transport layer.
///
/// Everything here is an unexpected failure from the caller's point of
/// view. Remote faults are not transport errors; they arrive as data in
/// a successful HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base address and path do not form a usable HTTP(S) URL.
    #[error("invalid endpoint {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The HTTP client could not be constructed.
    #[cfg(feature = "http")]
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Sending the request failed (DNS, connect, TLS, reset, ...).
    #[cfg(feature = "http")]
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// Reading the response body failed.
    #[cfg(feature = "http")]
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The response body is not a parsable document.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}
