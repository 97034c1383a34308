//! Native input values accepted by the encoder.
//!
//! Callers hand the codec plain Rust data: numbers, strings, dates,
//! vectors, maps, or any `Serialize` record. [`Native`] is the explicit
//! set of categories that data falls into. The encoder then maps each
//! category onto a wire [`Value`] in a fixed priority order (see
//! [`encode`](crate::encode)).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDateTime, TimeZone};
use indexmap::IndexMap;

use crate::Value;

/// A native value, before encoding.
///
/// Categories overlap on purpose: a whole `Float` is also a number, a
/// `UInt` may be too large to be a safe integer. The encoder resolves
/// those overlaps, not the conversions below.
#[derive(Debug, Clone, PartialEq)]
pub enum Native {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// Local wall-clock time. Timezone-aware inputs are converted to
    /// their local fields on the way in.
    DateTime(NaiveDateTime),
    Seq(Vec<Native>),
    /// Key-value mapping; structured records land here too.
    Map(IndexMap<String, Native>),
    Text(String),
    Null,
    /// An already-encoded wire value, passed through unchanged.
    ///
    /// Use this to force a type the priority order would not pick,
    /// e.g. `Value::Double(3.0)`.
    Wire(Value),
}

impl Native {
    /// Converts any `Serialize` value into a `Native` by way of JSON.
    ///
    /// Records and maps become [`Native::Map`], sequences become
    /// [`Native::Seq`], `None`/unit become [`Native::Null`].
    ///
    /// ```rust
    /// use pressrpc_protocol::Native;
    ///
    /// #[derive(serde::Serialize)]
    /// struct Post { title: &'static str, categories: Vec<u32> }
    ///
    /// let native = Native::from_serialize(&Post { title: "x", categories: vec![1] }).unwrap();
    /// assert!(matches!(native, Native::Map(_)));
    /// ```
    #[cfg(feature = "json")]
    pub fn from_serialize<T: serde::Serialize + ?Sized>(
        value: &T,
    ) -> Result<Self, crate::ProtocolError> {
        Ok(serde_json::to_value(value)?.into())
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

macro_rules! from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Native {
            fn from(n: $ty) -> Self {
                Self::Int(n as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Native {
            fn from(n: $ty) -> Self {
                Self::UInt(n as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Native {
    fn from(n: f32) -> Self {
        Self::Float(f64::from(n))
    }
}

impl From<f64> for Native {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Native {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Native {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Native {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<NaiveDateTime> for Native {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Native {
    fn from(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.naive_local())
    }
}

impl<T: Into<Native>> From<Option<T>> for Native {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Native>> From<Vec<T>> for Native {
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Native>> From<IndexMap<String, T>> for Native {
    fn from(map: IndexMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Native>> From<BTreeMap<String, T>> for Native {
    fn from(map: BTreeMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Native>> From<HashMap<String, T>> for Native {
    fn from(map: HashMap<String, T>) -> Self {
        Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<Value> for Native {
    fn from(value: Value) -> Self {
        Self::Wire(value)
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Value> for Native {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Json::Null => Self::Null,
            Json::Bool(b) => Self::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    // Always `Some` without arbitrary_precision.
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Self::Text(s),
            Json::Array(items) => {
                Self::Seq(items.into_iter().map(Into::into).collect())
            }
            Json::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
