//! Unified error types for pressrpc.

use pressrpc_protocol::{Fault, ProtocolError};
use pressrpc_transport::TransportError;

/// Why a call produced no response at all.
///
/// A remote fault is *not* a `CallError`: it comes back as
/// [`MethodResponse::Fault`](crate::MethodResponse::Fault), an ordinary
/// outcome. These two variants are the unexpected failures.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Network failure, non-success status, or an unparsable body.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A parsable document that breaks the XML-RPC rules: no result and
    /// no fault, an unknown value type, a bad scalar.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Top-level error that wraps all crate-specific errors.
///
/// Used by the convenience APIs ([`XmlRpcClient::call_value`] and the
/// [`wordpress`](crate::wordpress) facade) that turn a fault into an
/// error. The `#[from]` attribute on each variant auto-generates `From`
/// impls, so the `?` operator converts automatically.
///
/// [`XmlRpcClient::call_value`]: crate::XmlRpcClient::call_value
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transport-level error (connect, status, body).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (document shape, value decoding).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with a fault.
    #[error(transparent)]
    Fault(#[from] Fault),
}

impl Error {
    /// Returns the fault if this error is one.
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<CallError> for Error {
    fn from(err: CallError) -> Self {
        match err {
            CallError::Transport(e) => Self::Transport(e),
            CallError::Protocol(e) => Self::Protocol(e),
        }
    }
}
