//! Containers for static storage of descriptors.
//!
//! These are used to implement [`Marshal::struct_info`](crate::Marshal::struct_info).
//!
//! The build result is cached whether it succeeded or not: a broken
//! declaration reports the same [`ConfigError`] on every call, and a valid one
//! is built exactly once.
//!
//! ## StructInfoCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional
//! expenses.
//!
//! ## GenericStructInfoCell
//!
//! If the type is generic, the `static CELL` inside the function is shared by
//! every instantiation. Therefore the inner of this container is a map keyed
//! by [`TypeId`] and wrapped in [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::error::{ConfigError, Error};
use crate::hash::{FixedHashState, HashMap};
use crate::info::StructInfo;

type Built = Result<StructInfo, ConfigError>;

#[inline]
fn share(built: &Built) -> Result<&StructInfo, Error> {
    built.as_ref().map_err(|e| Error::from(e.clone()))
}

// -----------------------------------------------------------------------------
// StructInfoCell

/// Container for static storage of non-generic descriptors.
///
/// ## Example
///
/// ```
/// use vc_marshal::{Error, Fields, Marshal};
/// use vc_marshal::info::{FieldInfo, StructInfo, StructInfoCell};
/// use core::any::Any;
///
/// struct Point { x: i64 }
///
/// impl Marshal for Point {
///     const NAME: &'static str = "Point";
///
///     fn struct_info() -> Result<&'static StructInfo, Error> {
///         static CELL: StructInfoCell = StructInfoCell::new();
///         CELL.get_or_build(|| {
///             StructInfo::builder::<Self>()
///                 .field(FieldInfo::of::<i64>("x"))
///                 .build()
///         })
///     }
///
///     fn assemble(fields: &mut Fields) -> Result<Self, Error> {
///         Ok(Point { x: fields.take("x")? })
///     }
///
///     fn field_ref(&self, name: &str) -> Option<&dyn Any> {
///         match name {
///             "x" => Some(&self.x),
///             _ => None,
///         }
///     }
/// }
///
/// let info = Point::struct_info().unwrap();
/// assert_eq!(info.type_name(), "Point");
/// assert!(core::ptr::eq(info, Point::struct_info().unwrap()));
/// ```
pub struct StructInfoCell(OnceLock<Built>);

impl StructInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the descriptors stored in the cell, building them with `f` on
    /// first use.
    #[inline]
    pub fn get_or_build<F>(&self, f: F) -> Result<&StructInfo, Error>
    where
        F: FnOnce() -> Built,
    {
        share(self.0.get_or_init(f))
    }
}

impl Default for StructInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// GenericStructInfoCell

/// Container for static storage of descriptors of generic types.
///
/// ## Example
///
/// ```
/// use vc_marshal::{Error, FieldType, Fields, Marshal};
/// use vc_marshal::info::{FieldInfo, GenericStructInfoCell, StructInfo};
/// use core::any::Any;
///
/// struct Wrapper<T> { inner: T }
///
/// impl<T: FieldType> Marshal for Wrapper<T> {
///     const NAME: &'static str = "Wrapper";
///
///     fn struct_info() -> Result<&'static StructInfo, Error> {
///         static CELL: GenericStructInfoCell = GenericStructInfoCell::new();
///         CELL.get_or_build::<Self>(|| {
///             StructInfo::builder::<Self>()
///                 .field(FieldInfo::of::<T>("inner"))
///                 .build()
///         })
///     }
///
///     fn assemble(fields: &mut Fields) -> Result<Self, Error> {
///         Ok(Wrapper { inner: fields.take("inner")? })
///     }
///
///     fn field_ref(&self, name: &str) -> Option<&dyn Any> {
///         match name {
///             "inner" => Some(&self.inner),
///             _ => None,
///         }
///     }
/// }
///
/// let a = <Wrapper<i64>>::struct_info().unwrap();
/// let b = <Wrapper<String>>::struct_info().unwrap();
/// assert!(a.field("inner").unwrap().type_is::<i64>());
/// assert!(b.field("inner").unwrap().type_is::<String>());
/// ```
pub struct GenericStructInfoCell(RwLock<HashMap<TypeId, &'static Built>>);

impl GenericStructInfoCell {
    /// Create an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedHashState)))
    }

    /// Returns the descriptors of `G`, building them with `f` on first use.
    #[inline(always)]
    pub fn get_or_build<G: Any + ?Sized>(
        &self,
        f: impl FnOnce() -> Built,
    ) -> Result<&'static StructInfo, Error> {
        // Separate to reduce code compilation times
        share(self.get_or_insert_by_type_id(TypeId::of::<G>(), f))
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> Built) -> &'static Built {
        match self.get_by_type_id(type_id) {
            Some(built) => built,
            // The lock is not held while `f` runs.
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static Built> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: Built) -> &'static Built {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}

impl Default for GenericStructInfoCell {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
