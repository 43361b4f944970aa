//! Cast rules applied to raw values before type checking.
//!
//! A cast is either a free-form function ([`Cast::Func`]) or the name of one
//! of the built-in conversions ([`Cast::Named`]):
//!
//! | name     | result                                                      |
//! |----------|-------------------------------------------------------------|
//! | `string` | text form of a bool, int, float, time or string             |
//! | `int`    | parsed string, truncated finite float, `0`/`1` for bools    |
//! | `float`  | parsed string or widened int                                |
//! | `bool`   | `true/false/yes/no/1/0` strings, `0`/`1` ints               |
//! | `time`   | RFC 3339 string, or unix seconds from an int                |
//! | `list`   | wraps any non-list value in a one-element list              |
//!
//! Names are resolved when a type's descriptors are built; an unknown name is
//! a [`ConfigError::UnknownCast`](crate::ConfigError::UnknownCast).
//! Casts are never applied to [`Value::Nil`].

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use core::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::CastError;
use crate::value::Value;

/// Signature of a cast function.
pub type CastFn = fn(&Value) -> Result<Value, CastError>;

// -----------------------------------------------------------------------------
// Cast

/// A cast rule attached to a field.
///
/// # Examples
///
/// ```
/// use vc_marshal::cast::Cast;
/// use vc_marshal::value::Value;
///
/// let cast = Cast::Named("int").resolve().unwrap();
/// assert_eq!(cast(&Value::from(" 42 ")).unwrap(), Value::Int(42));
///
/// assert!(Cast::Named("nope").resolve().is_none());
/// ```
#[derive(Clone, Copy)]
pub enum Cast {
    /// One of the built-in casts, by name.
    Named(&'static str),
    /// A free-form cast function.
    Func(CastFn),
}

impl Cast {
    /// Returns the function behind this rule, or `None` for an unknown name.
    pub fn resolve(self) -> Option<CastFn> {
        match self {
            Self::Named(name) => named(name),
            Self::Func(func) => Some(func),
        }
    }
}

impl fmt::Debug for Cast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "Cast::Named({name:?})"),
            Self::Func(_) => f.write_str("Cast::Func(..)"),
        }
    }
}

/// Looks up a built-in cast by name.
pub fn named(name: &str) -> Option<CastFn> {
    let func: CastFn = match name {
        "string" => to_string,
        "int" => to_int,
        "float" => to_float,
        "bool" => to_bool,
        "time" => to_time,
        "list" => to_list,
        _ => return None,
    };
    Some(func)
}

#[cold]
fn unsupported(target: &str, value: &Value) -> CastError {
    CastError::new(format!("cannot cast {} to {target}", value.kind()))
}

// -----------------------------------------------------------------------------
// Built-in casts

fn to_string(value: &Value) -> Result<Value, CastError> {
    let text: String = match value {
        Value::Str(v) => v.clone(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Time(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        _ => return Err(unsupported("string", value)),
    };
    Ok(Value::Str(text))
}

fn to_int(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Int(v) => Ok(Value::Int(*v)),
        Value::Bool(v) => Ok(Value::Int(i64::from(*v))),
        Value::Float(v) if v.is_finite() && v.abs() < 9.2e18 => Ok(Value::Int(*v as i64)),
        Value::Str(v) => v
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| CastError::new(format!("cannot cast {v:?} to int: {e}"))),
        _ => Err(unsupported("int", value)),
    }
}

fn to_float(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Float(v) => Ok(Value::Float(*v)),
        Value::Int(v) => Ok(Value::Float(*v as f64)),
        Value::Str(v) => v
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| CastError::new(format!("cannot cast {v:?} to float: {e}"))),
        _ => Err(unsupported("float", value)),
    }
}

fn to_bool(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Bool(v) => Ok(Value::Bool(*v)),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::Str(v) => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "0" => Ok(Value::Bool(false)),
            _ => Err(CastError::new(format!("cannot cast {v:?} to bool"))),
        },
        _ => Err(unsupported("bool", value)),
    }
}

fn to_time(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Time(v) => Ok(Value::Time(*v)),
        Value::Str(v) => DateTime::parse_from_rfc3339(v.trim())
            .map(|t| Value::Time(t.with_timezone(&Utc)))
            .map_err(|e| CastError::new(format!("cannot cast {v:?} to time: {e}"))),
        Value::Int(secs) => DateTime::from_timestamp(*secs, 0)
            .map(Value::Time)
            .ok_or_else(|| CastError::new(format!("timestamp {secs} is out of range"))),
        _ => Err(unsupported("time", value)),
    }
}

fn to_list(value: &Value) -> Result<Value, CastError> {
    Ok(match value {
        Value::List(_) => value.clone(),
        other => Value::List(vec![other.clone()]),
    })
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use chrono::DateTime;

    use super::{Cast, named};
    use crate::error::CastError;
    use crate::value::Value;

    fn cast(name: &str, value: Value) -> Result<Value, CastError> {
        named(name).unwrap()(&value)
    }

    #[test]
    fn string_cast() {
        assert_eq!(cast("string", Value::Int(5)).unwrap(), Value::from("5"));
        assert_eq!(cast("string", Value::Bool(true)).unwrap(), Value::from("true"));
        assert!(cast("string", Value::List(vec![])).is_err());
    }

    #[test]
    fn int_cast() {
        assert_eq!(cast("int", Value::from("12")).unwrap(), Value::Int(12));
        assert_eq!(cast("int", Value::Float(2.9)).unwrap(), Value::Int(2));
        assert_eq!(
            cast("int", Value::from("twelve")).unwrap_err().message(),
            "cannot cast \"twelve\" to int: invalid digit found in string"
        );
        assert!(cast("int", Value::Float(f64::NAN)).is_err());
    }

    #[test]
    fn float_and_bool_casts() {
        assert_eq!(cast("float", Value::Int(2)).unwrap(), Value::Float(2.0));
        assert_eq!(cast("bool", Value::from("Yes")).unwrap(), Value::Bool(true));
        assert_eq!(cast("bool", Value::Int(0)).unwrap(), Value::Bool(false));
        assert!(cast("bool", Value::Int(2)).is_err());
    }

    #[test]
    fn time_cast() {
        let epoch = DateTime::from_timestamp(0, 0).unwrap();
        assert_eq!(
            cast("time", Value::from("1970-01-01T00:00:00Z")).unwrap(),
            Value::Time(epoch)
        );
        assert_eq!(cast("time", Value::Int(0)).unwrap(), Value::Time(epoch));
        assert!(cast("time", Value::from("yesterday")).is_err());
    }

    #[test]
    fn list_cast_wraps() {
        assert_eq!(
            cast("list", Value::Int(1)).unwrap(),
            Value::List(vec![Value::Int(1)])
        );
    }

    #[test]
    fn func_cast_resolves() {
        fn upper(value: &Value) -> Result<Value, CastError> {
            value
                .as_str()
                .map(|s| Value::from(s.to_uppercase()))
                .ok_or_else(|| CastError::new("not a string"))
        }

        let func = Cast::Func(upper).resolve().unwrap();
        assert_eq!(func(&Value::from("ab")).unwrap(), Value::from("AB"));
        assert!(Cast::Named("to_s").resolve().is_none());
    }
}
