//! Generic tree → wire value decoding.
//!
//! The inverse of [`encode`](crate::encode), applied to a `<value>` node
//! of the generic tree. The type element is found by *presence*, never
//! by content: `<i4>0</i4>` is an integer and `<boolean>0</boolean>` is a
//! boolean even though both read as "nothing" in a truthiness check.

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::tree::Node;
use crate::{ProtocolError, Value, DATETIME_FORMAT};

/// Decodes a `<value>` node.
///
/// Type elements are checked in this order: `i4`/`int`, `double`,
/// `boolean`, `dateTime.iso8601`, `array`, `struct`, `string`. A value
/// with no type element at all is an untyped string.
///
/// # Errors
/// - `ProtocolError::UnrecognizedValue` if the value holds some other
///   element (`base64`, `nil`, ...).
/// - `ProtocolError::InvalidValue` if a typed scalar fails to parse.
/// - `ProtocolError::RepeatedValue` if `value` is several `<value>`
///   elements where one was expected.
pub fn decode(value: &Node) -> Result<Value, ProtocolError> {
    if let Node::List(_) = value {
        return Err(ProtocolError::RepeatedValue);
    }
    if let Some(node) = value.get("i4").or_else(|| value.get("int")) {
        return decode_integer(node);
    }
    if let Some(node) = value.get("double") {
        let text = scalar_text(node, "double")?;
        return text
            .trim()
            .parse()
            .map(Value::Double)
            .map_err(|_| invalid("double", text));
    }
    if let Some(node) = value.get("boolean") {
        let text = scalar_text(node, "boolean")?;
        return Ok(Value::Boolean(text.trim() == "1"));
    }
    if let Some(node) = value.get("dateTime.iso8601") {
        let text = scalar_text(node, "dateTime.iso8601")?;
        return NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT)
            .map(Value::DateTime)
            .map_err(|_| invalid("dateTime.iso8601", text));
    }
    if let Some(node) = value.get("array") {
        return decode_array(node);
    }
    if let Some(node) = value.get("struct") {
        return decode_struct(node);
    }
    if let Some(node) = value.get("string") {
        return scalar_text(node, "string").map(|text| Value::String(text.to_owned()));
    }

    match value.element_names().next() {
        Some(name) => Err(ProtocolError::UnrecognizedValue(name.to_owned())),
        None => Ok(Value::String(value.text().unwrap_or_default().to_owned())),
    }
}

fn decode_integer(node: &Node) -> Result<Value, ProtocolError> {
    let text = scalar_text(node, "i4")?;
    text.trim()
        .parse()
        .map(Value::Integer)
        .map_err(|_| invalid("i4", text))
}

/// `<array><data><value/>*</data></array>`.
///
/// A missing `data` or an empty one is an empty array; a single `value`
/// is still an array of one.
fn decode_array(array: &Node) -> Result<Value, ProtocolError> {
    let Some(values) = array.path(&["data", "value"]) else {
        return Ok(Value::Array(Vec::new()));
    };
    values.items().map(decode).collect::<Result<_, _>>().map(Value::Array)
}

/// `<struct><member><name/><value/></member>*</struct>`.
///
/// Members without a `name`, or with an empty one, are skipped. A member without a `value`
/// decodes to an empty string, as an empty `<value/>` would.
fn decode_struct(node: &Node) -> Result<Value, ProtocolError> {
    let mut members = IndexMap::new();
    let Some(list) = node.get("member") else {
        return Ok(Value::Struct(members));
    };
    for member in list.items() {
        let Some(name) = member
            .get("name")
            .and_then(Node::text)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        let value = match member.get("value") {
            Some(value) => decode(value)?,
            None => Value::String(String::new()),
        };
        members.insert(name.to_owned(), value);
    }
    Ok(Value::Struct(members))
}

fn scalar_text<'a>(node: &'a Node, kind: &'static str) -> Result<&'a str, ProtocolError> {
    node.text().ok_or_else(|| invalid(kind, "<element>"))
}

fn invalid(kind: &'static str, text: &str) -> ProtocolError {
    ProtocolError::InvalidValue {
        kind,
        text: text.to_owned(),
    }
}
