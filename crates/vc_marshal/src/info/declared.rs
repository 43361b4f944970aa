use core::fmt;

use crate::error::Error;
use crate::info::StructInfo;
use crate::marshal::Marshal;

/// Accessor for a nested type's descriptors.
pub type StructInfoFn = fn() -> Result<&'static StructInfo, Error>;

// -----------------------------------------------------------------------------
// DeclaredType

/// Static description of a field's type.
///
/// Produced once per field by [`FieldType::declared_type`] when the owning
/// type's descriptors are built.
///
/// [`FieldType::declared_type`]: crate::FieldType::declared_type
#[derive(Clone, Copy)]
pub struct DeclaredType {
    name: &'static str,
    nilable: bool,
    nested: Option<StructInfoFn>,
}

impl DeclaredType {
    /// A non-nilable leaf type with the given display name.
    #[inline]
    pub const fn leaf(name: &'static str) -> Self {
        Self {
            name,
            nilable: false,
            nested: None,
        }
    }

    /// A marshalable type, resolved through its own descriptors.
    #[inline]
    pub const fn nested<T: Marshal>() -> Self {
        Self {
            name: T::NAME,
            nilable: false,
            nested: Some(T::struct_info),
        }
    }

    /// The same type with nil accepted.
    #[inline]
    pub const fn nilable(self) -> Self {
        Self {
            nilable: true,
            ..self
        }
    }

    /// The name used in `TypeMismatch` messages, nilability stripped.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn is_nilable(&self) -> bool {
        self.nilable
    }

    /// Returns `true` if the type is itself marshalable.
    #[inline]
    pub const fn is_nested(&self) -> bool {
        self.nested.is_some()
    }

    /// Returns the nested type's descriptors, if the type is marshalable.
    #[inline]
    pub fn nested_info(&self) -> Option<Result<&'static StructInfo, Error>> {
        self.nested.map(|f| f())
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredType")
            .field("name", &self.name)
            .field("nilable", &self.nilable)
            .field("nested", &self.is_nested())
            .finish()
    }
}
