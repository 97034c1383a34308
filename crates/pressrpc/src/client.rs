//! `XmlRpcClient` builder and call pipeline.
//!
//! This is the entry point for making XML-RPC calls. It ties together
//! both layers: protocol (documents) → transport (bytes over HTTP).

use std::sync::Arc;

use pressrpc_protocol::{
    build_call, parse_response, MethodCall, MethodResponse, Native,
    ProtocolError, Value,
};
#[cfg(feature = "http")]
use pressrpc_transport::{Endpoint, HttpTransport};
use pressrpc_transport::{Transport, TransportError};

use crate::{CallError, Error};

/// Default XML-RPC path, relative to the site's base address.
pub const DEFAULT_XMLRPC_PATH: &str = "xmlrpc.php";

/// `User-Agent` sent with every request unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = concat!("pressrpc/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Configuration for an HTTP-backed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// The site's base address, e.g. `https://blog.example.com/`.
    pub base_url: String,

    /// Path of the XML-RPC endpoint under `base_url`. Leading and
    /// trailing slashes are ignored.
    pub xmlrpc_path: String,

    /// Sent as the `User-Agent` header.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            xmlrpc_path: DEFAULT_XMLRPC_PATH.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring an HTTP-backed [`XmlRpcClient`].
///
/// # Example
///
/// ```rust
/// use pressrpc::XmlRpcClient;
///
/// let client = XmlRpcClient::builder()
///     .base_url("https://blog.example.com/")
///     .xmlrpc_path("/xmlrpc.php")
///     .build()
///     .unwrap();
/// assert_eq!(
///     client.transport().endpoint().as_str(),
///     "https://blog.example.com/xmlrpc.php"
/// );
/// ```
#[cfg(feature = "http")]
#[derive(Debug, Clone, Default)]
pub struct XmlRpcClientBuilder {
    config: ClientConfig,
}

#[cfg(feature = "http")]
impl XmlRpcClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the site's base address.
    pub fn base_url(mut self, url: &str) -> Self {
        self.config.base_url = url.to_string();
        self
    }

    /// Sets the XML-RPC path under the base address.
    pub fn xmlrpc_path(mut self, path: &str) -> Self {
        self.config.xmlrpc_path = path.to_string();
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        self.config.user_agent = user_agent.to_string();
        self
    }

    /// Computes the endpoint and builds the client.
    ///
    /// The endpoint is fixed from here on; every call goes to it.
    pub fn build(self) -> Result<XmlRpcClient<HttpTransport>, TransportError> {
        let endpoint = Endpoint::new(&self.config.base_url, &self.config.xmlrpc_path)?;
        let transport = HttpTransport::new(endpoint, &self.config.user_agent)?;
        Ok(XmlRpcClient::with_transport(transport))
    }
}

// ---------------------------------------------------------------------------
// XmlRpcClient
// ---------------------------------------------------------------------------

/// An XML-RPC client.
///
/// Stateless between calls: the only thing it holds is the transport.
/// No ordering, rate limiting or deduplication is imposed across calls.
///
/// # Sharing
///
/// The transport sits behind an `Arc` (Atomic Reference Count), so a
/// clone is one pointer copy plus a counter increment, and every clone
/// talks to the same endpoint through the same connection state.
///
/// `Clone` is implemented by hand rather than derived. `#[derive(Clone)]`
/// would add a `T: Clone` bound, but only the `Arc` is cloned here, so
/// any transport works, including ones that are not `Clone` themselves.
#[derive(Debug)]
pub struct XmlRpcClient<T> {
    transport: Arc<T>,
}

impl<T> Clone for XmlRpcClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
        }
    }
}

#[cfg(feature = "http")]
impl XmlRpcClient<HttpTransport> {
    /// Creates a new builder.
    pub fn builder() -> XmlRpcClientBuilder {
        XmlRpcClientBuilder::new()
    }

    /// Builds a client straight from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        XmlRpcClientBuilder::new().config(config).build()
    }
}

impl<T: Transport> XmlRpcClient<T> {
    /// Creates a client over any transport.
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Calls `method` with `params` and returns the decoded outcome.
    ///
    /// Each parameter is encoded (see [`encode`](pressrpc_protocol::encode)),
    /// the request document is posted once, and the reply is parsed.
    ///
    /// # Returns
    /// - `Ok(MethodResponse::Success(value))`: the method returned
    /// - `Ok(MethodResponse::Fault(fault))`: the server reported a fault
    /// - `Err(CallError::Transport)`: network failure, non-success
    ///   status, or a body that is not a parsable document
    /// - `Err(CallError::Protocol)`: a document that breaks XML-RPC rules
    pub async fn call<I, P>(&self, method: &str, params: I) -> Result<MethodResponse, CallError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Native>,
    {
        let call = MethodCall::new(method, params);
        let body = build_call(&call)?;
        tracing::debug!(method, params = call.params.len(), "calling");
        tracing::trace!(document = %String::from_utf8_lossy(&body), "request document");

        let reply = self.transport.post(body).await.inspect_err(|e| {
            tracing::warn!(method, error = %e, "call failed in transport");
        })?;
        tracing::trace!(document = %String::from_utf8_lossy(&reply), "response document");

        let response = read_response(&reply).inspect_err(|e| {
            tracing::warn!(method, error = %e, "unreadable response");
        })?;
        if let MethodResponse::Fault(fault) = &response {
            tracing::warn!(method, code = %fault.code, message = %fault.message, "remote fault");
        }
        Ok(response)
    }

    /// Like [`call`](Self::call), but with a fault turned into
    /// [`Error::Fault`].
    pub async fn call_value<I, P>(&self, method: &str, params: I) -> Result<Value, Error>
    where
        I: IntoIterator<Item = P>,
        P: Into<Native>,
    {
        Ok(self.call(method, params).await?.into_result()?)
    }
}

/// Parses a reply body, filing unparsable bodies under transport errors.
///
/// A body that is not XML at all (an HTML error page served with a 200,
/// a truncated download) means the endpoint is not speaking XML-RPC, so
/// it is reported next to network failures. A well-formed document
/// that breaks the XML-RPC rules stays a protocol error.
fn read_response(reply: &[u8]) -> Result<MethodResponse, CallError> {
    let text = std::str::from_utf8(reply)
        .map_err(|e| TransportError::MalformedBody(e.to_string()))?;
    match parse_response(text) {
        Ok(response) => Ok(response),
        Err(ProtocolError::Malformed(reason)) => {
            Err(TransportError::MalformedBody(reason).into())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_response_success() {
        let body = b"<methodResponse><params><param><value><i4>0</i4></value></param></params></methodResponse>";
        assert_eq!(
            read_response(body).unwrap(),
            MethodResponse::Success(Value::Integer(0))
        );
    }

    #[test]
    fn test_read_response_garbage_is_transport_error() {
        let err = read_response(b"<html><body>Bad Gateway").unwrap_err();
        assert!(matches!(
            err,
            CallError::Transport(TransportError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_read_response_invalid_utf8_is_transport_error() {
        let err = read_response(&[0x3c, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(
            err,
            CallError::Transport(TransportError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_read_response_missing_result_is_protocol_error() {
        let err = read_response(b"<methodResponse/>").unwrap_err();
        assert!(matches!(
            err,
            CallError::Protocol(ProtocolError::MissingResult)
        ));
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.xmlrpc_path, "xmlrpc.php");
        assert!(config.user_agent.starts_with("pressrpc/"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_builder_rejects_bad_base_url() {
        let err = XmlRpcClient::builder().base_url("blog.example.com").build().unwrap_err();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_new_uses_config() {
        let client = XmlRpcClient::new(ClientConfig {
            base_url: "http://host/".into(),
            xmlrpc_path: "/xmlrpc.php/".into(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.transport().endpoint().as_str(), "http://host/xmlrpc.php");
    }
}
