//! Core types for the XML-RPC wire format.
//!
//! [`Value`] is the only data type that flows through encoding and
//! decoding. [`MethodCall`] and [`MethodResponse`] are the two envelopes
//! built around it: one per request, one per reply, each used once and
//! then dropped.

use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::Native;

/// `strftime` pattern for `dateTime.iso8601` values: `yyyyMMddTHH:mm:ss`.
///
/// No timezone offset and no fractional seconds. Servers interpret the
/// timestamp in their own local time.
pub const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Largest integer an IEEE-754 double represents exactly (2^53 − 1).
///
/// Whole numbers within `±MAX_SAFE_INTEGER` encode as `<i4>`; anything
/// beyond it encodes as `<double>`.
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A single XML-RPC value.
///
/// This is a tagged union: each variant corresponds to one wire element
/// inside `<value>`. Trees of values are always finite and acyclic since
/// they come either from a native value or from a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<i4>`: a safe integer.
    Integer(i64),
    /// `<double>`: any other finite number.
    Double(f64),
    /// `<boolean>`: written as `1` or `0`.
    Boolean(bool),
    /// `<dateTime.iso8601>`: wall-clock time, no timezone.
    DateTime(NaiveDateTime),
    /// `<string>`: also the fallback for anything unrecognised.
    String(String),
    /// `<array><data>`: ordered values.
    Array(Vec<Value>),
    /// `<struct>`: named members.
    ///
    /// Lookup is by name; the insertion order is the order members are
    /// written in, nothing more.
    Struct(IndexMap<String, Value>),
}

impl Value {
    /// Returns the wire element name for this value's type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "i4",
            Self::Double(_) => "double",
            Self::Boolean(_) => "boolean",
            Self::DateTime(_) => "dateTime.iso8601",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Struct(_) => "struct",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the value as a float. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Looks up a struct member by name.
    ///
    /// Returns `None` if this value is not a struct or has no such member.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_struct().and_then(|members| members.get(name))
    }

    /// Converts this value into any `Deserialize` type by way of JSON.
    ///
    /// Integers and doubles become JSON numbers, datetimes become
    /// strings in [`DATETIME_FORMAT`], structs become objects.
    ///
    /// ```rust
    /// use pressrpc_protocol::Value;
    ///
    /// let value = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
    /// let ids: Vec<u32> = value.deserialize_into().unwrap();
    /// assert_eq!(ids, vec![1, 2]);
    /// ```
    #[cfg(feature = "json")]
    pub fn deserialize_into<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, crate::ProtocolError> {
        let json = serde_json::to_value(self)?;
        Ok(serde_json::from_value(json)?)
    }
}

/// Prints the value's textual form.
///
/// Scalars print bare (a fault code of `Integer(403)` prints as `403`);
/// composites print in a compact bracketed form for logs.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Double(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Self::String(s) => f.write_str(s),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Struct(members) => {
                f.write_str("{")?;
                for (i, (name, value)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Serializes as the closest plain data shape, without type tags.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Double(x) => serializer.serialize_f64(*x),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::DateTime(dt) => {
                serializer.collect_str(&dt.format(DATETIME_FORMAT))
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Struct(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (name, value) in members {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// A request: method name plus already-encoded parameters, in order.
///
/// No arity check happens here; getting the parameter list right for
/// the remote method is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<Value>,
}

impl MethodCall {
    /// Encodes each native parameter and builds the call.
    pub fn new<I, P>(method: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Native>,
    {
        Self {
            method: method.into(),
            params: params
                .into_iter()
                .map(|param| crate::encode(param.into()))
                .collect(),
        }
    }
}

/// A remote fault: the server understood the call and refused it.
///
/// Faults travel inside the response document (`<fault>`), so they are
/// ordinary data here, not transport failures. Bad credentials are the
/// typical example.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("fault {code}: {message}")]
pub struct Fault {
    /// `faultCode`, in its textual form.
    pub code: String,
    /// `faultString`.
    pub message: String,
}

/// The decoded outcome of a call.
///
/// Whether a response is a fault is decided only by the document's
/// top-level `<fault>` element. A success value that happens to be a
/// struct with `faultCode`/`faultString` members is still a success.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Fault(Fault),
}

impl MethodResponse {
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Converts into a `Result`, with the fault as the error.
    pub fn into_result(self) -> Result<Value, Fault> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Fault(fault) => Err(fault),
        }
    }
}
