//! Transport abstraction layer for pressrpc.
//!
//! Provides the [`Transport`] trait, which moves one request document to
//! the server and brings the response body back, and [`Endpoint`], the
//! URL it goes to. The transport deals in bytes only; it never looks
//! inside the documents.
//!
//! # Feature Flags
//!
//! - `http` (default): HTTP transport via `reqwest`

mod endpoint;
mod error;
#[cfg(feature = "http")]
mod http;

pub use endpoint::Endpoint;
pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::{HttpTransport, XML_CONTENT_TYPE};

use std::future::Future;

/// Carries a request document to the server and returns the reply body.
///
/// The client never sees sockets, headers or status codes. It hands over
/// a finished request document and gets back whatever bytes the server
/// answered with. Swapping the transport (HTTP, an in-memory fake in
/// tests) changes nothing above this trait.
///
/// # Trait bounds
///
/// - `Send + Sync` → one transport is shared by every call a client
///   makes, and Tokio may poll those calls from different threads at
///   the same time.
/// - `'static` → the transport owns everything it needs. It lives inside
///   an `Arc` for as long as any clone of the client does, so it cannot
///   borrow temporary data.
/// - the returned future is `Send` → calls can be moved into
///   `tokio::spawn` on a multi-threaded runtime.
///
/// Implementations send each body exactly once. A failure is reported to
/// the caller that issued the call; nothing is retried.
///
/// # Example
///
/// ```rust
/// use pressrpc_transport::{Transport, TransportError};
///
/// /// Answers every request with the same canned document.
/// struct Canned(&'static str);
///
/// impl Transport for Canned {
///     async fn post(&self, _body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
///         Ok(self.0.as_bytes().to_vec())
///     }
/// }
/// ```
pub trait Transport: Send + Sync + 'static {
    /// Sends `body` and returns the response body.
    ///
    /// # Arguments
    /// - `body`: a complete XML-RPC request document, already encoded
    ///
    /// # Returns
    /// - `Ok(bytes)`: the server answered with a success status
    /// - `Err(TransportError)`: network failure or non-success status
    fn post(
        &self,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = TransportError::Status(502);
        assert_eq!(err.to_string(), "server responded with HTTP 502");
    }

    #[test]
    fn test_malformed_body_display() {
        let err = TransportError::MalformedBody("no root element".into());
        assert!(err.to_string().contains("no root element"));
    }
}
