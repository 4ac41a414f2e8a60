//! Conversions from [`Value`] back into Rust field types.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Types that can be read back out of a [`Value`].
///
/// This is the inverse of the `From<_> for Value` impls and is what entity
/// field setters use to accept a stored value.
pub trait FromValue: Sized {
    /// Converts the value, failing on a kind mismatch.
    fn from_value(value: Value) -> CodecResult<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> CodecResult<Self> {
        Ok(value)
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(CodecError::type_mismatch("bool", other.kind())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Integer(n) => Ok(n),
            other => Err(CodecError::type_mismatch("integer", other.kind())),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> CodecResult<Self> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| CodecError::IntegerOverflow {
            value: n,
            target: "i32",
        })
    }
}

impl FromValue for u32 {
    fn from_value(value: Value) -> CodecResult<Self> {
        let n = i64::from_value(value)?;
        u32::try_from(n).map_err(|_| CodecError::IntegerOverflow {
            value: n,
            target: "u32",
        })
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> CodecResult<Self> {
        value
            .as_float()
            .ok_or_else(|| CodecError::type_mismatch("float", value.kind()))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(CodecError::type_mismatch("text", other.kind())),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Bytes(b) => Ok(b),
            other => Err(CodecError::type_mismatch("bytes", other.kind())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> CodecResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
