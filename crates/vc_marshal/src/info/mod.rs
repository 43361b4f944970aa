//! Field descriptors and per-type descriptor sets.
//!
//! ## Menu
//!
//! - [`FieldInfo`]: one declared field; name, key, type, default, cast,
//!   presence flag and ignore flags.
//! - [`StructInfo`]: the validated, ordered set of a type's fields plus its
//!   [`UnknownKeys`] policy.
//! - [`DeclaredType`]: static description of a field's type.
//! - [`StructInfoCell`] / [`GenericStructInfoCell`]: static storage used by
//!   [`Marshal::struct_info`](crate::Marshal::struct_info).

mod cell;
mod declared;
mod field_info;
mod policy;
mod struct_info;

pub use cell::{GenericStructInfoCell, StructInfoCell};
pub use declared::{DeclaredType, StructInfoFn};
pub use field_info::{FieldBuilder, FieldFlags, FieldInfo};
pub use policy::UnknownKeys;
pub use struct_info::{StructInfo, StructInfoBuilder};
