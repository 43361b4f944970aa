//! Declarative conversion between structs and generic key/value maps.
//!
//! A marshalable type describes each of its fields once (key, type, default,
//! cast, presence flag and ignore flags). Those descriptors drive both
//! directions:
//!
//! - [`Marshal::from_map`] validates and coerces an input map into a new
//!   value, recursing into nested marshalable fields and applying the type's
//!   unknown-key policy.
//! - [`Marshal::to_map`] exports a value back into a map.
//!
//! Errors carry one `parsing <Type>[#<field>]` frame per object level:
//!
//! ```
//! use vc_marshal::Marshal;
//! use vc_marshal::value::{Map, Value};
//!
//! #[derive(Marshal, Debug, PartialEq)]
//! struct Note {
//!     message: String,
//! }
//!
//! #[derive(Marshal, Debug, PartialEq)]
//! #[marshal(strict)]
//! struct Post {
//!     title: String,
//!     note: Note,
//! }
//!
//! let post = Post::from_map([
//!     ("title", Value::from("hello")),
//!     ("note", Value::from_iter([("message", "hi")])),
//! ])
//! .unwrap();
//! assert_eq!(post.note.message, "hi");
//!
//! let err = Post::from_map([
//!     ("title", Value::from("hello")),
//!     ("note", Value::Map(Map::new())),
//! ])
//! .unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "missing required field `message`\n  parsing Note#message\n  parsing Post#note",
//! );
//! ```
//!
//! ## Menu
//!
//! - [`value`]: the generic [`Value`](value::Value) and [`Map`](value::Map).
//! - [`info`]: field descriptors and their per-type cache.
//! - [`cast`]: cast rules applied before type checking.
//! - [`registry`]: lookup of marshalable types by name.
//! - [`Unmapped`]: capture of unknown keys.

// Usually, we need to use `crate` in the crate itself and use `vc_marshal` in doc testing.
// The derive macro emits absolute `::vc_marshal` paths, so we need an
// `extern self` to ensure `vc_marshal` can be used as an alias for `crate`.
extern crate self as vc_marshal;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod coerce;
mod convert;
mod error;
mod marshal;
mod unmapped;

pub mod cast;
pub mod de;
pub mod hash;
pub mod info;
pub mod nested;
pub mod registry;
pub mod ser;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use convert::{FieldType, FromValueError};
pub use error::{CastError, ConfigError, Error, ErrorKind, Frame};
pub use marshal::{Fields, Marshal};
pub use unmapped::Unmapped;

/// Derives [`Marshal`] and [`FieldType`] for a struct with named fields.
///
/// ## Type attributes: `#[marshal(...)]`
///
/// - `strict`: unknown keys fail construction.
/// - `rename_all = "..."`: derive keys from field names with one of
///   `lowercase`, `UPPERCASE`, `camelCase`, `PascalCase`, `snake_case`,
///   `SCREAMING_SNAKE_CASE` or `kebab-case`.
/// - `auto_register`: collect the type for
///   [`MarshalRegistry::auto_register`](registry::MarshalRegistry::auto_register).
///
/// ## Field attributes: `#[marshal(...)]`
///
/// - `key = "..."`: bind to a different map key.
/// - `default` / `default = path`: use `Default::default()` or `path()` when
///   the key is absent or its value is rejected.
/// - `presence = ident`: set the `bool` field `ident` to whether the key was
///   in the input. The companion field itself is not marshaled.
/// - `cast = "name"` / `cast = path`: apply a built-in or custom cast.
/// - `ignore`, `ignore_on_read`, `ignore_on_write`: suppress the field.
/// - `unmapped`: the [`Unmapped`] store of unknown keys.
pub use vc_marshal_derive::Marshal;
