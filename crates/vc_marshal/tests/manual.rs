use core::any::Any;

use vc_marshal::cast::Cast;
use vc_marshal::info::{FieldInfo, StructInfo, StructInfoCell};
use vc_marshal::value::{Map, Value};
use vc_marshal::{ConfigError, Error, ErrorKind, Fields, Marshal};

// -----------------------------------------------------------------------------
// Range

#[derive(Debug, PartialEq)]
struct Range {
    start: i64,
    end: i64,
    has_end: bool,
}

impl Marshal for Range {
    const NAME: &'static str = "Range";

    fn struct_info() -> Result<&'static StructInfo, Error> {
        static CELL: StructInfoCell = StructInfoCell::new();
        CELL.get_or_build(|| {
            StructInfo::builder::<Self>()
                .field(FieldInfo::of::<i64>("start").cast(Cast::Named("int")))
                .field(
                    FieldInfo::of::<i64>("end")
                        .default_with(|| i64::MAX)
                        .presence("has_end"),
                )
                .strict()
                .build()
        })
    }

    fn assemble(fields: &mut Fields) -> Result<Self, Error> {
        Ok(Range {
            start: fields.take("start")?,
            end: fields.take("end")?,
            has_end: fields.is_present("end"),
        })
    }

    fn field_ref(&self, name: &str) -> Option<&dyn Any> {
        match name {
            "start" => Some(&self.start),
            "end" => Some(&self.end),
            _ => None,
        }
    }

    fn after_initialize(&mut self) -> Result<(), Error> {
        if self.start > self.end {
            return Err(Error::custom(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

vc_marshal::impl_field_type!(Range);

#[test]
fn manual_impl_round_trips() {
    let range = Range::from_map([("start", Value::from("2")), ("end", Value::from(5))]).unwrap();
    assert_eq!(
        range,
        Range {
            start: 2,
            end: 5,
            has_end: true,
        }
    );

    let exported = range.to_map().unwrap();
    assert_eq!(exported.len(), 2);
    assert_eq!(exported["start"], Value::Int(2));
}

#[test]
fn presence_is_reported_for_manual_impls() {
    let range = Range::from_map([("start", Value::from(1))]).unwrap();
    assert!(!range.has_end);
    assert_eq!(range.end, i64::MAX);
}

#[test]
fn after_initialize_can_reject() {
    let err = Range::from_map([("start", Value::from(9)), ("end", Value::from(1))]).unwrap_err();
    assert_eq!(
        *err.kind(),
        ErrorKind::Custom("start 9 is after end 1".into())
    );
    assert_eq!(err.to_string(), "start 9 is after end 1\n  parsing Range");
}

#[derive(Marshal, Debug)]
struct Schedule {
    name: String,
    window: Range,
}

#[test]
fn manual_impls_nest() {
    let window: Value = [("start", 3), ("end", 4)].into_iter().collect();
    let schedule =
        Schedule::from_map([("name", Value::from("night")), ("window", window.clone())]).unwrap();
    assert_eq!(schedule.window.end, 4);
    assert_eq!(schedule.to_map().unwrap()["window"], window);

    let window: Value = [("start", 3), ("end", 1)].into_iter().collect();
    let err = Schedule::from_map([("name", Value::from("night")), ("window", window)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "start 3 is after end 1\n  parsing Range\n  parsing Schedule#window"
    );
}

// -----------------------------------------------------------------------------
// Broken

struct Broken {
    a: i64,
}

impl Marshal for Broken {
    const NAME: &'static str = "Broken";

    fn struct_info() -> Result<&'static StructInfo, Error> {
        static CELL: StructInfoCell = StructInfoCell::new();
        CELL.get_or_build(|| {
            StructInfo::builder::<Self>()
                .field(FieldInfo::of::<i64>("a").cast(Cast::Named("octal")))
                .build()
        })
    }

    fn assemble(fields: &mut Fields) -> Result<Self, Error> {
        Ok(Broken {
            a: fields.take("a")?,
        })
    }

    fn field_ref(&self, name: &str) -> Option<&dyn Any> {
        (name == "a").then_some(&self.a as &dyn Any)
    }
}

#[test]
fn configuration_errors_are_reported_on_every_use() {
    let first = Broken::struct_info().unwrap_err();
    assert_eq!(
        *first.kind(),
        ErrorKind::Config(ConfigError::UnknownCast {
            field: "a",
            cast: "octal",
        })
    );

    let err = Broken::from_map(Map::new()).err().unwrap();
    assert_eq!(
        err.to_string(),
        "invalid marshal configuration: field `a` uses unknown cast `octal`\n  parsing Broken"
    );

    let again = Broken::from_map([("a", Value::from(1))]).err().unwrap();
    assert_eq!(again, err);
    assert!(Broken { a: 1 }.to_map().is_err());
}
