//! Envelope building and response parsing.
//!
//! A request document looks like this:
//!
//! ```text
//! <?xml version="1.0"?>
//! <methodCall>
//!   <methodName>wp.getProfile</methodName>
//!   <params>
//!     <param><value><i4>1</i4></value></param>
//!     <param><value><string>admin</string></value></param>
//!   </params>
//! </methodCall>
//! ```
//!
//! and a reply is either `methodResponse/params/param/value` (success) or
//! `methodResponse/fault/value` (a struct with `faultCode` and
//! `faultString`). Documents are written without indentation.

use chrono::{Datelike, NaiveDateTime};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::tree::{self, Node};
use crate::{
    decode, Fault, MethodCall, MethodResponse, Native, ProtocolError, Value,
    DATETIME_FORMAT,
};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Serializes a call into a complete request document.
///
/// The method name is written verbatim (escaped as XML text), followed
/// by one `param`/`value` pair per parameter, in order.
///
/// # Errors
/// Returns `ProtocolError::Encode` if the XML writer fails.
pub fn build_call(call: &MethodCall) -> Result<Vec<u8>, ProtocolError> {
    let mut xml = XmlWriter::new();
    xml.declaration()?;
    xml.start("methodCall")?;
    xml.leaf("methodName", &call.method)?;
    xml.start("params")?;
    for param in &call.params {
        xml.start("param")?;
        xml.value(param)?;
        xml.end("param")?;
    }
    xml.end("params")?;
    xml.end("methodCall")?;
    Ok(xml.finish())
}

/// Encodes native parameters and serializes the call in one step.
///
/// ```rust
/// use pressrpc_protocol::{encode_call, Native};
///
/// let doc = encode_call("demo.add", vec![Native::from(1), Native::from(2)]).unwrap();
/// let text = String::from_utf8(doc).unwrap();
/// assert!(text.contains("<methodName>demo.add</methodName>"));
/// assert!(text.contains("<param><value><i4>2</i4></value></param>"));
/// ```
pub fn encode_call<I, P>(method: &str, params: I) -> Result<Vec<u8>, ProtocolError>
where
    I: IntoIterator<Item = P>,
    P: Into<Native>,
{
    build_call(&MethodCall::new(method, params))
}

/// Parses a request document back into a [`MethodCall`].
///
/// This is the server-side half of [`build_call`]. The client never needs
/// it; it exists so request documents can be inspected and tested.
pub fn parse_call(text: &str) -> Result<MethodCall, ProtocolError> {
    let (root, doc) = tree::parse_document(text)?;
    if root != "methodCall" {
        return Err(ProtocolError::Malformed(format!(
            "expected <methodCall>, found <{root}>"
        )));
    }
    let method = doc
        .get("methodName")
        .and_then(Node::text)
        .ok_or_else(|| ProtocolError::Malformed("missing <methodName>".into()))?
        .trim()
        .to_owned();

    let mut params = Vec::new();
    if let Some(list) = doc.get("params").and_then(|p| p.get("param")) {
        for param in list.items() {
            let value = param
                .get("value")
                .ok_or(ProtocolError::MissingValue("param"))?;
            params.push(decode(value)?);
        }
    }
    Ok(MethodCall { method, params })
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Parses a response document into a [`MethodResponse`].
///
/// The top-level element alone decides the outcome: `params` is a
/// success, `fault` is a fault. No recovery is attempted when both or
/// neither are present.
///
/// # Errors
/// - `Malformed`: not XML, or the root is not `methodResponse`.
/// - `MissingResult` / `AmbiguousResponse`: neither or both paths.
/// - `MissingValue`: `params` or `fault` without a `value`.
/// - `InvalidFault`: the fault value is not a well-formed fault struct.
/// - any value decoding error.
pub fn parse_response(text: &str) -> Result<MethodResponse, ProtocolError> {
    let (root, doc) = tree::parse_document(text)?;
    if root != "methodResponse" {
        return Err(ProtocolError::Malformed(format!(
            "expected <methodResponse>, found <{root}>"
        )));
    }

    match (doc.get("params"), doc.get("fault")) {
        (Some(_), Some(_)) => Err(ProtocolError::AmbiguousResponse),
        (Some(params), None) => {
            let value = params
                .path(&["param", "value"])
                .ok_or(ProtocolError::MissingValue("params"))?;
            Ok(MethodResponse::Success(decode(value)?))
        }
        (None, Some(fault)) => {
            let value = fault
                .get("value")
                .ok_or(ProtocolError::MissingValue("fault"))?;
            Ok(MethodResponse::Fault(fault_from(decode(value)?)?))
        }
        (None, None) => Err(ProtocolError::MissingResult),
    }
}

fn fault_from(value: Value) -> Result<Fault, ProtocolError> {
    let mut members = match value {
        Value::Struct(members) => members,
        other => {
            return Err(ProtocolError::InvalidFault(format!(
                "expected a struct, found <{}>",
                other.kind()
            )));
        }
    };
    let code = members
        .shift_remove("faultCode")
        .ok_or_else(|| ProtocolError::InvalidFault("missing faultCode".into()))?;
    let message = members
        .shift_remove("faultString")
        .ok_or_else(|| ProtocolError::InvalidFault("missing faultString".into()))?;
    Ok(Fault {
        code: code.to_string(),
        message: message.to_string(),
    })
}

/// Serializes a response document. Server-side counterpart of
/// [`parse_response`], used to build fixtures.
pub fn build_response(response: &MethodResponse) -> Result<Vec<u8>, ProtocolError> {
    let mut xml = XmlWriter::new();
    xml.declaration()?;
    xml.start("methodResponse")?;
    match response {
        MethodResponse::Success(value) => {
            xml.start("params")?;
            xml.start("param")?;
            xml.value(value)?;
            xml.end("param")?;
            xml.end("params")?;
        }
        MethodResponse::Fault(fault) => {
            let code = match fault.code.parse::<i64>() {
                Ok(n) => Value::Integer(n),
                Err(_) => Value::String(fault.code.clone()),
            };
            let members = [
                ("faultCode".to_owned(), code),
                ("faultString".to_owned(), Value::String(fault.message.clone())),
            ];
            xml.start("fault")?;
            xml.value(&Value::Struct(members.into_iter().collect()))?;
            xml.end("fault")?;
        }
    }
    xml.end("methodResponse")?;
    Ok(xml.finish())
}

/// Formats a datetime as `yyyyMMddTHH:mm:ss`.
///
/// The wire form has exactly four year digits, so years outside
/// `0..=9999` cannot be written (chrono would emit a sign and extra
/// digits that no reader accepts).
fn datetime_text(dt: &NaiveDateTime) -> Result<String, ProtocolError> {
    if !(0..=9999).contains(&dt.year()) {
        return Err(ProtocolError::Encode(format!(
            "year {} does not fit dateTime.iso8601",
            dt.year()
        )));
    }
    Ok(dt.format(DATETIME_FORMAT).to_string())
}

// ---------------------------------------------------------------------------
// XmlWriter
// ---------------------------------------------------------------------------

/// Thin wrapper over `quick_xml::Writer` that speaks in element names.
struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new(Vec::new()),
        }
    }

    fn emit(&mut self, event: Event<'_>) -> Result<(), ProtocolError> {
        self.inner
            .write_event(event)
            .map_err(|e| ProtocolError::Encode(e.to_string()))
    }

    fn declaration(&mut self) -> Result<(), ProtocolError> {
        self.emit(Event::Decl(BytesDecl::new("1.0", None, None)))
    }

    fn start(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.emit(Event::Start(BytesStart::new(name)))
    }

    fn end(&mut self, name: &str) -> Result<(), ProtocolError> {
        self.emit(Event::End(BytesEnd::new(name)))
    }

    /// `<name>text</name>`, with `text` escaped.
    fn leaf(&mut self, name: &str, text: &str) -> Result<(), ProtocolError> {
        self.start(name)?;
        if !text.is_empty() {
            self.emit(Event::Text(BytesText::new(text)))?;
        }
        self.end(name)
    }

    /// Writes `<value>...</value>` for one value, recursively.
    fn value(&mut self, value: &Value) -> Result<(), ProtocolError> {
        self.start("value")?;
        match value {
            Value::Integer(n) => self.leaf("i4", &n.to_string())?,
            Value::Double(x) => self.leaf("double", &x.to_string())?,
            Value::Boolean(b) => self.leaf("boolean", if *b { "1" } else { "0" })?,
            Value::DateTime(dt) => self.leaf("dateTime.iso8601", &datetime_text(dt)?)?,
            Value::String(s) => self.leaf("string", s)?,
            Value::Array(items) => {
                self.start("array")?;
                self.start("data")?;
                for item in items {
                    self.value(item)?;
                }
                self.end("data")?;
                self.end("array")?;
            }
            Value::Struct(members) => {
                self.start("struct")?;
                for (name, member) in members {
                    self.start("member")?;
                    self.leaf("name", name)?;
                    self.value(member)?;
                    self.end("member")?;
                }
                self.end("struct")?;
            }
        }
        self.end("value")
    }

    fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}
