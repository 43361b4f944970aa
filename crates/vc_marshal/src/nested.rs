//! Nested resolution: marshalable values as field values.
//!
//! A field whose type is itself [`Marshal`] is built from a sub-map and
//! exported as one. `#[derive(Marshal)]` wires these helpers into the
//! generated [`FieldType`](crate::FieldType) impl; hand-written types use
//! [`impl_field_type!`](crate::impl_field_type).

use crate::convert::FromValueError;
use crate::error::Error;
use crate::marshal::Marshal;
use crate::value::Value;

/// Builds a `T` from a map value.
///
/// A non-map value is a mismatch; a failure inside the sub-map is returned as
/// [`FromValueError::Nested`] and never rescued by the outer field's default.
pub fn nested_from_value<T: Marshal>(value: Value) -> Result<T, FromValueError> {
    match value {
        Value::Map(map) => T::from_map(map).map_err(FromValueError::Nested),
        other => Err(FromValueError::Mismatch(other)),
    }
}

/// Exports a `T` as a map value.
#[inline]
pub fn nested_to_value<T: Marshal>(value: &T) -> Result<Value, Error> {
    value.to_map().map(Value::Map)
}

/// Implements [`FieldType`](crate::FieldType) for a hand-written
/// [`Marshal`] type so it can be used as a field of another type.
///
/// ```
/// # use vc_marshal::{Error, Fields, Marshal};
/// # use vc_marshal::info::{StructInfo, StructInfoCell};
/// # use core::any::Any;
/// struct Empty;
/// # impl Marshal for Empty {
/// #     const NAME: &'static str = "Empty";
/// #     fn struct_info() -> Result<&'static StructInfo, Error> {
/// #         static CELL: StructInfoCell = StructInfoCell::new();
/// #         CELL.get_or_build(|| StructInfo::builder::<Self>().build())
/// #     }
/// #     fn assemble(_: &mut Fields) -> Result<Self, Error> { Ok(Empty) }
/// #     fn field_ref(&self, _: &str) -> Option<&dyn Any> { None }
/// # }
///
/// vc_marshal::impl_field_type!(Empty);
///
/// assert_eq!(<Empty as vc_marshal::FieldType>::declared_type().name(), "Empty");
/// ```
#[macro_export]
macro_rules! impl_field_type {
    ($ty:ty) => {
        impl $crate::FieldType for $ty {
            #[inline]
            fn declared_type() -> $crate::info::DeclaredType {
                $crate::info::DeclaredType::nested::<Self>()
            }

            #[inline]
            fn from_value(
                value: $crate::value::Value,
            ) -> ::core::result::Result<Self, $crate::FromValueError> {
                $crate::nested::nested_from_value::<Self>(value)
            }

            #[inline]
            fn to_value(&self) -> ::core::result::Result<$crate::value::Value, $crate::Error> {
                $crate::nested::nested_to_value(self)
            }
        }
    };
}
