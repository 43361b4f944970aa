use core::any::Any;

use crate::error::Error;
use crate::info::StructInfo;
use crate::value::{Map, MapKey, Value};

pub use crate::de::Fields;

/// A type that can be built from a [`Map`] and turned back into one.
///
/// Usually implemented by `#[derive(Marshal)]`. A manual impl provides the
/// descriptors, assembles itself from validated [`Fields`] and exposes its
/// fields by name; [`from_map`](Marshal::from_map) and
/// [`to_map`](Marshal::to_map) are driven by the descriptors.
///
/// # Examples
///
/// ```
/// use vc_marshal::{Error, Fields, Marshal};
/// use vc_marshal::info::{FieldInfo, StructInfo, StructInfoCell};
/// use vc_marshal::value::Value;
/// use core::any::Any;
///
/// #[derive(Debug, PartialEq)]
/// struct Note {
///     message: String,
///     read: bool,
/// }
///
/// impl Marshal for Note {
///     const NAME: &'static str = "Note";
///
///     fn struct_info() -> Result<&'static StructInfo, Error> {
///         static CELL: StructInfoCell = StructInfoCell::new();
///         CELL.get_or_build(|| {
///             StructInfo::builder::<Self>()
///                 .field(FieldInfo::of::<String>("message"))
///                 .field(FieldInfo::of::<bool>("read").or_default())
///                 .build()
///         })
///     }
///
///     fn assemble(fields: &mut Fields) -> Result<Self, Error> {
///         Ok(Note {
///             message: fields.take("message")?,
///             read: fields.take("read")?,
///         })
///     }
///
///     fn field_ref(&self, name: &str) -> Option<&dyn Any> {
///         match name {
///             "message" => Some(&self.message),
///             "read" => Some(&self.read),
///             _ => None,
///         }
///     }
/// }
///
/// let note = Note::from_map([("message", Value::from("hi"))]).unwrap();
/// assert_eq!(note, Note { message: "hi".into(), read: false });
///
/// let map = note.to_map().unwrap();
/// assert_eq!(map["read"], Value::Bool(false));
///
/// let err = Note::from_map([("read", Value::Bool(true))]).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "missing required field `message`\n  parsing Note#message",
/// );
/// ```
pub trait Marshal: Sized + 'static {
    /// The name used in error frames.
    const NAME: &'static str;

    /// Returns the type's validated descriptors, built on first use.
    fn struct_info() -> Result<&'static StructInfo, Error>;

    /// Builds the value from staged field values.
    fn assemble(fields: &mut Fields) -> Result<Self, Error>;

    /// Returns the field with the given name, for serialization.
    fn field_ref(&self, name: &str) -> Option<&dyn Any>;

    /// Writes the `Unmapped` store, if the type has one.
    ///
    /// Must not overwrite keys already in `out`.
    #[inline]
    fn write_unmapped(&self, out: &mut Map) -> Result<(), Error> {
        let _ = out;
        Ok(())
    }

    /// Runs after every field is filled, before the value is returned.
    ///
    /// An error here fails the whole construction.
    #[inline]
    fn after_initialize(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Builds a value from key/value pairs.
    ///
    /// Keys are normalized to strings; when two keys normalize to the same
    /// string the later value wins.
    #[inline]
    fn from_map<K, I>(input: I) -> Result<Self, Error>
    where
        K: MapKey,
        I: IntoIterator<Item = (K, Value)>,
    {
        crate::de::from_map(input)
    }

    /// Produces the map form of the value.
    #[inline]
    fn to_map(&self) -> Result<Map, Error> {
        crate::ser::to_map(self)
    }
}
