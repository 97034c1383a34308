//! # pressrpc
//!
//! XML-RPC client for blog publishing endpoints.
//!
//! pressrpc marshals native Rust values into XML-RPC documents, posts them
//! over HTTP, and unmarshals the reply. A remote fault is an ordinary
//! outcome ([`MethodResponse::Fault`]); only network, HTTP and document
//! failures are errors ([`CallError`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pressrpc::prelude::*;
//!
//! # async fn run() -> Result<(), pressrpc::Error> {
//! let client = XmlRpcClient::builder()
//!     .base_url("https://blog.example.com")
//!     .build()?;
//!
//! match client.call("wp.getProfile", vec![
//!     Native::from(1),
//!     Native::from("admin"),
//!     Native::from("secret"),
//! ]).await? {
//!     MethodResponse::Success(profile) => println!("hello {}", profile),
//!     MethodResponse::Fault(fault) => eprintln!("refused: {}", fault.message),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod wordpress;

#[cfg(feature = "http")]
pub use client::XmlRpcClientBuilder;
pub use client::{ClientConfig, XmlRpcClient, DEFAULT_USER_AGENT, DEFAULT_XMLRPC_PATH};
pub use error::{CallError, Error};

pub use pressrpc_protocol as protocol;
pub use pressrpc_protocol::{Fault, MethodResponse, Native, ProtocolError, Value};
pub use pressrpc_transport as transport;
pub use pressrpc_transport::{Endpoint, Transport, TransportError};
#[cfg(feature = "http")]
pub use pressrpc_transport::HttpTransport;

/// Everything needed to make calls, in one import.
pub mod prelude {
    pub use crate::wordpress::{
        Category, CommentStatus, Credentials, PostParams, PostStatus, WordPressClient,
    };
    pub use crate::{
        CallError, ClientConfig, Error, Fault, MethodResponse, Native, Transport, Value,
        XmlRpcClient,
    };
    pub use pressrpc_protocol::IndexMap;
}
