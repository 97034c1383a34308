//! Error types for the protocol layer.
//!
//! Each crate in pressrpc defines its own error enum. A `ProtocolError`
//! always means the problem is in the XML-RPC document itself (building
//! it, or making sense of what the server sent back), never in the
//! network underneath.

/// Errors that can occur while encoding or decoding XML-RPC documents.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Writing the request document failed.
    #[error("encode failed: {0}")]
    Encode(String),

    /// The text is not a well-formed XML document, or its root element
    /// is not the envelope we expected.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// A `methodResponse` carried neither `params` nor `fault`.
    #[error("neither a result nor a fault was present")]
    MissingResult,

    /// A `methodResponse` carried both `params` and `fault`.
    #[error("response carries both a result and a fault")]
    AmbiguousResponse,

    /// An envelope section was present but had no `value` inside it.
    #[error("{0} carries no value")]
    MissingValue(&'static str),

    /// Several `value` elements stood where exactly one belongs, e.g.
    /// twice inside one `member` or `param`.
    #[error("more than one <value> where one was expected")]
    RepeatedValue,

    /// A `value` element whose type element is not one we know.
    ///
    /// Only `i4`/`int`, `double`, `boolean`, `dateTime.iso8601`,
    /// `array`, `struct` and `string` are understood.
    #[error("unrecognized value type <{0}>")]
    UnrecognizedValue(String),

    /// A typed value whose text does not parse as that type,
    /// e.g. `<i4>twelve</i4>`.
    #[error("invalid <{kind}> value {text:?}")]
    InvalidValue {
        /// The wire element name (`i4`, `double`, ...).
        kind: &'static str,
        /// The offending text.
        text: String,
    },

    /// The `fault` value is not a struct with `faultCode` and
    /// `faultString` members.
    #[error("invalid fault payload: {0}")]
    InvalidFault(String),

    /// Converting between a Rust type and a wire value through
    /// `serde_json` failed.
    #[cfg(feature = "json")]
    #[error("json conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}
