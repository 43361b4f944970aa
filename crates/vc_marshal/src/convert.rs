//! Typed conversion between [`Value`] and field types.
//!
//! [`FieldType`] is the per-type half of value coercion: it knows the type's
//! [`DeclaredType`] and performs the runtime type check. Casting, defaults and
//! nilability are applied around it by the deserializer.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use chrono::{DateTime, Utc};

use crate::error::{Error, ErrorKind};
use crate::info::DeclaredType;
use crate::value::{Map, Value};

// -----------------------------------------------------------------------------
// FromValueError

/// Why [`FieldType::from_value`] rejected a value.
#[derive(Debug)]
pub enum FromValueError {
    /// The value has the wrong runtime type; it is handed back so the caller
    /// can report it or fall back to a default.
    Mismatch(Value),
    /// A nested object failed to build. Never rescued by defaults.
    Nested(Error),
}

// -----------------------------------------------------------------------------
// FieldType

/// A type that can be stored in a field of a marshalable object.
///
/// Implemented for the primitive types, [`String`], [`DateTime<Utc>`],
/// [`Value`], [`Option`], [`Vec`] and `BTreeMap<String, _>`, and by
/// `#[derive(Marshal)]` for every derived type so it can be nested.
///
/// # Examples
///
/// ```
/// use vc_marshal::{FieldType, FromValueError, value::Value};
///
/// assert_eq!(u8::from_value(Value::Int(7)).unwrap(), 7);
/// assert!(matches!(u8::from_value(Value::Int(300)), Err(FromValueError::Mismatch(_))));
///
/// assert_eq!(<Option<u8>>::from_value(Value::Nil).unwrap(), None);
/// assert!(<Option<u8>>::declared_type().is_nilable());
/// ```
pub trait FieldType: Sized + 'static {
    /// Static description used by the descriptors.
    fn declared_type() -> DeclaredType;

    /// Type-checks and converts a value.
    fn from_value(value: Value) -> Result<Self, FromValueError>;

    /// Converts back to a value.
    fn to_value(&self) -> Result<Value, Error>;

    /// The nil representation, for nilable types.
    #[inline]
    fn nil() -> Option<Self> {
        None
    }
}

// -----------------------------------------------------------------------------
// Primitive impls

impl FieldType for bool {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("bool")
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Bool(*self))
    }
}

macro_rules! impl_int_field {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                #[inline]
                fn declared_type() -> DeclaredType {
                    DeclaredType::leaf("int")
                }

                fn from_value(value: Value) -> Result<Self, FromValueError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v)
                            .map_err(|_| FromValueError::Mismatch(Value::Int(v))),
                        other => Err(FromValueError::Mismatch(other)),
                    }
                }

                fn to_value(&self) -> Result<Value, Error> {
                    i64::try_from(*self)
                        .map(Value::Int)
                        .map_err(|_| Error::new(ErrorKind::IntOutOfRange(self.to_string())))
                }
            }
        )*
    };
}

impl_int_field!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FieldType for f64 {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("float")
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Float(*self))
    }
}

impl FieldType for f32 {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("float")
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            // Finite doubles beyond the `f32` range are rejected, not turned into infinities.
            Value::Float(v) if v.is_finite() && (v as f32).is_infinite() => {
                Err(FromValueError::Mismatch(Value::Float(v)))
            }
            Value::Float(v) => Ok(v as f32),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Float(f64::from(*self)))
    }
}

impl FieldType for String {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("string")
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Str(self.clone()))
    }
}

impl FieldType for DateTime<Utc> {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("time")
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Time(v) => Ok(v),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(Value::Time(*self))
    }
}

/// Accepts anything, including nil.
impl FieldType for Value {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("any").nilable()
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        Ok(value)
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        Ok(self.clone())
    }

    #[inline]
    fn nil() -> Option<Self> {
        Some(Value::Nil)
    }
}

// -----------------------------------------------------------------------------
// Container impls

impl<T: FieldType> FieldType for Option<T> {
    #[inline]
    fn declared_type() -> DeclaredType {
        T::declared_type().nilable()
    }

    #[inline]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Nil => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    #[inline]
    fn to_value(&self) -> Result<Value, Error> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Nil),
        }
    }

    #[inline]
    fn nil() -> Option<Self> {
        Some(None)
    }
}

/// Items are checked one by one; the first rejected item is reported.
impl<T: FieldType> FieldType for Vec<T> {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("list")
    }

    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    fn to_value(&self) -> Result<Value, Error> {
        self.iter()
            .map(T::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

impl<T: FieldType> FieldType for BTreeMap<String, T> {
    #[inline]
    fn declared_type() -> DeclaredType {
        DeclaredType::leaf("map")
    }

    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Map(map) => map
                .into_iter()
                .map(|(key, item)| T::from_value(item).map(|v| (key, v)))
                .collect(),
            other => Err(FromValueError::Mismatch(other)),
        }
    }

    fn to_value(&self) -> Result<Value, Error> {
        self.iter()
            .map(|(key, item)| item.to_value().map(|v| (key.clone(), v)))
            .collect::<Result<Map, _>>()
            .map(Value::Map)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{FieldType, FromValueError};
    use crate::error::ErrorKind;
    use crate::value::Value;

    #[test]
    fn ints_are_range_checked() {
        assert_eq!(i32::from_value(Value::Int(-4)).unwrap(), -4);
        assert!(matches!(
            u16::from_value(Value::Int(-1)),
            Err(FromValueError::Mismatch(Value::Int(-1)))
        ));
        assert!(matches!(
            i64::from_value(Value::Float(1.0)),
            Err(FromValueError::Mismatch(_))
        ));
        assert_eq!(i64::MIN.to_value().unwrap(), Value::Int(i64::MIN));
        assert_eq!(
            (i64::MAX as u64).to_value().unwrap(),
            Value::Int(i64::MAX)
        );
        let err = u64::MAX.to_value().unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::IntOutOfRange(u64::MAX.to_string())
        );
        assert!(usize::MAX.to_value().is_err());
    }

    #[test]
    fn floats_require_floats() {
        assert_eq!(f64::from_value(Value::Float(0.5)).unwrap(), 0.5);
        assert!(f64::from_value(Value::Int(1)).is_err());
    }

    #[test]
    fn f32_rejects_doubles_out_of_range() {
        assert_eq!(f32::from_value(Value::Float(f64::from(f32::MAX))).unwrap(), f32::MAX);
        assert!(matches!(
            f32::from_value(Value::Float(1e300)),
            Err(FromValueError::Mismatch(Value::Float(v))) if v == 1e300
        ));
        assert!(f32::from_value(Value::Float(f64::INFINITY)).unwrap().is_infinite());
    }

    #[test]
    fn option_is_nilable() {
        assert_eq!(<Option<String>>::nil(), Some(None));
        assert_eq!(String::nil(), None);
        assert_eq!(<Option<String>>::declared_type().name(), "string");
        assert_eq!(
            <Option<String>>::from_value(Value::from("a")).unwrap(),
            Some(String::from("a"))
        );
    }

    #[test]
    fn list_reports_first_bad_item() {
        let value = Value::List(vec![Value::Int(1), Value::from("x"), Value::Bool(true)]);
        match <Vec<i64>>::from_value(value) {
            Err(FromValueError::Mismatch(found)) => assert_eq!(found, Value::from("x")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn map_round_trips() {
        let mut input = BTreeMap::new();
        input.insert(String::from("a"), 1_i64);
        input.insert(String::from("b"), 2_i64);

        let value = input.to_value().unwrap();
        assert_eq!(<BTreeMap<String, i64>>::from_value(value).unwrap(), input);
        assert_eq!(<Vec<i64>>::declared_type().name(), "list");
    }
}
