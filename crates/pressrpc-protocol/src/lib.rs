//! XML-RPC wire format for pressrpc.
//!
//! This crate turns native Rust values into XML-RPC documents and back:
//!
//! - **Types** ([`Value`], [`MethodCall`], [`MethodResponse`], [`Fault`]):
//!   the data that travels on the wire.
//! - **Native input** ([`Native`]): the categories of Rust data the
//!   encoder accepts.
//! - **Encoding** ([`encode`], [`build_call`]): native values to wire
//!   values to request documents.
//! - **Decoding** ([`parse_response`], [`decode`]): response documents
//!   to a generic tree ([`tree::Node`]) to wire values.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! The protocol layer knows nothing about HTTP. It only builds and reads
//! documents; the transport crate moves the bytes.
//!
//! ```text
//! Native → encode → Value → build_call → bytes
//! bytes → tree::parse_document → Node → decode → MethodResponse
//! ```

mod codec;
mod decode;
mod encode;
mod error;
mod native;
pub mod tree;
mod types;

pub use codec::{build_call, build_response, encode_call, parse_call, parse_response};
pub use decode::decode;
pub use encode::encode;
pub use error::ProtocolError;
pub use native::Native;
pub use types::{
    Fault, MethodCall, MethodResponse, Value, DATETIME_FORMAT,
    MAX_SAFE_INTEGER,
};

// Re-exported so callers can build structs and datetimes without adding
// the crates themselves.
pub use chrono::NaiveDateTime;
pub use indexmap::IndexMap;
