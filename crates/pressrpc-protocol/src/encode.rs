//! Native → wire value encoding.

use chrono::Timelike;

use crate::{Native, Value, MAX_SAFE_INTEGER};

/// Encodes a native value into a wire [`Value`].
///
/// Total and recursive. Categories are tried in this order, and the
/// order is part of the contract (`0`, `1` and `true` land differently
/// if it changes):
///
/// 1. safe integer → `Integer`
/// 2. any other finite number → `Double`
/// 3. boolean → `Boolean`
/// 4. date/time → `DateTime` (whole seconds)
/// 5. sequence → `Array`
/// 6. mapping → `Struct`
/// 7. anything else → `String`, using its textual form
///
/// ```rust
/// use pressrpc_protocol::{encode, Native, Value};
///
/// assert_eq!(encode(Native::Float(2.0)), Value::Integer(2));
/// assert_eq!(encode(Native::Float(2.5)), Value::Double(2.5));
/// assert_eq!(encode(Native::Float(f64::NAN)), Value::String("NaN".into()));
/// ```
pub fn encode(native: Native) -> Value {
    match native {
        Native::Wire(value) => value,
        Native::Int(n) if is_safe_i64(n) => Value::Integer(n),
        Native::UInt(n) if n <= MAX_SAFE_INTEGER as u64 => {
            Value::Integer(n as i64)
        }
        Native::Float(x) if is_safe_f64(x) => Value::Integer(x as i64),
        Native::Int(n) => Value::Double(n as f64),
        Native::UInt(n) => Value::Double(n as f64),
        Native::Float(x) if x.is_finite() => Value::Double(x),
        Native::Bool(b) => Value::Boolean(b),
        Native::DateTime(dt) => {
            Value::DateTime(dt.with_nanosecond(0).unwrap_or(dt))
        }
        Native::Seq(items) => {
            Value::Array(items.into_iter().map(encode).collect())
        }
        Native::Map(members) => Value::Struct(
            members
                .into_iter()
                .map(|(name, value)| (name, encode(value)))
                .collect(),
        ),
        Native::Float(x) => Value::String(non_finite_text(x).to_owned()),
        Native::Text(s) => Value::String(s),
        Native::Null => Value::String("null".to_owned()),
    }
}

fn is_safe_i64(n: i64) -> bool {
    n.unsigned_abs() <= MAX_SAFE_INTEGER as u64
}

fn is_safe_f64(x: f64) -> bool {
    x.is_finite() && x.fract() == 0.0 && x.abs() <= MAX_SAFE_INTEGER as f64
}

fn non_finite_text(x: f64) -> &'static str {
    if x.is_nan() {
        "NaN"
    } else if x.is_sign_positive() {
        "Infinity"
    } else {
        "-Infinity"
    }
}
