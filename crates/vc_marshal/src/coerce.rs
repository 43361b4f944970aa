//! Turns one raw input value into a typed field value.
//!
//! For a present key: cast (skipped for nil), type check, then on mismatch
//! fall back to the default, then to nil for nilable types. A nil that no
//! fallback absorbs is a missing field; anything else is a type mismatch
//! naming the raw value. Nested construction errors are never rescued.

use alloc::boxed::Box;
use core::any::Any;

use crate::convert::FromValueError;
use crate::error::Error;
use crate::info::FieldInfo;
use crate::value::Value;

pub(crate) fn present(field: &FieldInfo, raw: Value) -> Result<Box<dyn Any>, Error> {
    let candidate = match field.cast_fn() {
        Some(cast) if !raw.is_nil() => match cast(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::debug!("cast of `{}` failed: {err}", field.name());
                return fallback(field, raw);
            }
        },
        _ => raw,
    };

    match field.decode(candidate) {
        Ok(value) => Ok(value),
        Err(FromValueError::Mismatch(found)) => fallback(field, found),
        Err(FromValueError::Nested(err)) => Err(err),
    }
}

pub(crate) fn absent(field: &FieldInfo) -> Result<Box<dyn Any>, Error> {
    field
        .make_default()
        .or_else(|| field.make_nil())
        .ok_or_else(|| Error::missing(field.name()))
}

fn fallback(field: &FieldInfo, found: Value) -> Result<Box<dyn Any>, Error> {
    if let Some(value) = field.make_default() {
        return Ok(value);
    }
    if field.declared_type().is_nilable()
        && let Some(value) = field.make_nil()
    {
        return Ok(value);
    }
    if found.is_nil() {
        return Err(Error::missing(field.name()));
    }
    Err(Error::mismatch(
        field.name(),
        field.declared_type().name(),
        found,
    ))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{absent, present};
    use crate::cast::Cast;
    use crate::error::ErrorKind;
    use crate::info::FieldInfo;
    use crate::value::Value;

    fn with_cast(field: FieldInfo, cast: &'static str) -> FieldInfo {
        let mut field = field;
        field.set_cast_fn(Cast::Named(cast).resolve().unwrap());
        field
    }

    #[test]
    fn matching_value_passes() {
        let field = FieldInfo::of::<i64>("n").build();
        let out = present(&field, Value::Int(3)).unwrap();
        assert_eq!(*out.downcast::<i64>().unwrap(), 3);
    }

    #[test]
    fn mismatch_uses_default_then_nil() {
        let field = FieldInfo::of::<i64>("n").default_with(|| 9).build();
        let out = present(&field, Value::from("x")).unwrap();
        assert_eq!(*out.downcast::<i64>().unwrap(), 9);

        let field = FieldInfo::of::<Option<i64>>("n").build();
        let out = present(&field, Value::from("x")).unwrap();
        assert_eq!(*out.downcast::<Option<i64>>().unwrap(), None);
    }

    #[test]
    fn mismatch_names_raw_value() {
        let field = FieldInfo::of::<i64>("n").build();
        let err = present(&field, Value::from("x")).unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::TypeMismatch {
                field: "n".into(),
                expected: "int",
                found: Value::from("x"),
            }
        );
    }

    #[test]
    fn nil_for_required_is_missing() {
        let field = FieldInfo::of::<String>("s").build();
        let err = present(&field, Value::Nil).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::MissingRequiredField { field: "s" });
        assert!(absent(&field).is_err());
    }

    #[test]
    fn cast_runs_before_check() {
        let field = with_cast(FieldInfo::of::<i64>("n").build(), "int");
        let out = present(&field, Value::from("12")).unwrap();
        assert_eq!(*out.downcast::<i64>().unwrap(), 12);
    }

    #[test]
    fn cast_is_skipped_for_nil() {
        let field = with_cast(FieldInfo::of::<Option<String>>("s").build(), "string");
        let out = present(&field, Value::Nil).unwrap();
        assert_eq!(*out.downcast::<Option<String>>().unwrap(), None);
    }

    #[test]
    fn failed_cast_reports_raw_value() {
        let field = with_cast(FieldInfo::of::<i64>("n").build(), "int");
        let err = present(&field, Value::from("twelve")).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { found: Value::Str(s), .. } if s == "twelve"
        ));
    }
}
