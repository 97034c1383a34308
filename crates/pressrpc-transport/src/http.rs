//! HTTP transport implementation using `reqwest`.

use reqwest::header::CONTENT_TYPE;

use crate::{Endpoint, Transport, TransportError};

/// MIME type sent with every request body.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// A [`Transport`] that POSTs each request to a fixed endpoint.
///
/// One request per call, no retries, no timeout beyond what `reqwest`
/// applies by default. Cloning is cheap: `reqwest::Client` is an `Arc`
/// internally, so clones share the same connection state.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    /// Creates a transport posting to `endpoint` with the given
    /// `User-Agent`.
    pub fn new(endpoint: Endpoint, user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(TransportError::Client)?;
        tracing::debug!(%endpoint, user_agent, "HTTP transport ready");
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        tracing::trace!(endpoint = %self.endpoint, bytes = body.len(), "POST");

        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(TransportError::Request)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(endpoint = %self.endpoint, %status, "non-success HTTP status");
            return Err(TransportError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(TransportError::Body)?;
        Ok(bytes.to_vec())
    }
}
