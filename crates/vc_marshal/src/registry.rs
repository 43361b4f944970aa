//! A registry of marshalable types, addressable by name.
//!
//! ## Menu
//!
//! - [`MarshalRegistry`]: central store of [`Registration`]s, indexed by
//!   [`TypeId`], type path and short type name.
//! - [`Registration`]: type-erased `from_map`/`to_map` entry points plus the
//!   type's descriptors.
//!
//! ## auto_register
//!
//! With the `auto_register` feature, types annotated with
//! `#[marshal(auto_register)]` are collected by the [`inventory`] crate and
//! registered by [`MarshalRegistry::auto_register`].
//!
//! [`inventory`]: https://docs.rs/inventory

use alloc::boxed::Box;
use alloc::string::ToString;
use core::any::{Any, TypeId};
use core::fmt;

use crate::error::{Error, ErrorKind};
use crate::hash::{HashMap, HashSet};
use crate::info::StructInfo;
use crate::marshal::Marshal;
use crate::value::Map;

// -----------------------------------------------------------------------------
// Registration

/// Type-erased marshaling entry points of one registered type.
#[derive(Clone, Copy)]
pub struct Registration {
    info: &'static StructInfo,
    from_map: fn(Map) -> Result<Box<dyn Any>, Error>,
    to_map: fn(&dyn Any) -> Option<Result<Map, Error>>,
}

impl Registration {
    /// Creates the registration of `T`, building its descriptors.
    pub fn of<T: Marshal>() -> Result<Self, Error> {
        Ok(Self {
            info: T::struct_info().map_err(|e| e.within_type(T::NAME))?,
            from_map: |map| T::from_map(map).map(|v| Box::new(v) as Box<dyn Any>),
            to_map: |value| value.downcast_ref::<T>().map(T::to_map),
        })
    }

    /// Returns the type's descriptors.
    #[inline]
    pub fn struct_info(&self) -> &'static StructInfo {
        self.info
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.info.ty_id()
    }

    /// Builds a boxed instance of the registered type.
    #[inline]
    pub fn from_map(&self, map: Map) -> Result<Box<dyn Any>, Error> {
        (self.from_map)(map)
    }

    /// Exports `value`, or returns `None` if it is not of the registered type.
    #[inline]
    pub fn to_map(&self, value: &dyn Any) -> Option<Result<Map, Error>> {
        (self.to_map)(value)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("type_name", &self.info.type_name())
            .field("type_path", &self.info.type_path())
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// MarshalRegistry

/// A registry of [marshalable](Marshal) types.
///
/// Short type names shared by more than one registered type are ambiguous
/// and can only be resolved by full type path.
///
/// # Example
///
/// ```
/// use vc_marshal::Marshal;
/// use vc_marshal::registry::MarshalRegistry;
/// use vc_marshal::value::{Map, Value};
///
/// #[derive(Marshal, Debug, PartialEq)]
/// struct Note {
///     message: String,
/// }
///
/// let mut registry = MarshalRegistry::new();
/// assert!(registry.register::<Note>().unwrap());
///
/// let mut map = Map::new();
/// map.insert("message".into(), Value::from("hi"));
///
/// let note = registry.from_map_by_name("Note", map).unwrap();
/// assert_eq!(note.downcast_ref::<Note>().unwrap().message, "hi");
/// ```
#[derive(Debug)]
pub struct MarshalRegistry {
    registrations: HashMap<TypeId, Registration>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl Default for MarshalRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl MarshalRegistry {
    /// Create an empty [`MarshalRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            registrations: HashMap::with_hasher(crate::hash::FixedHashState),
            type_path_to_id: HashMap::with_hasher(crate::hash::FixedHashState),
            type_name_to_id: HashMap::with_hasher(crate::hash::FixedHashState),
            ambiguous_names: HashSet::with_hasher(crate::hash::FixedHashState),
        }
    }

    /// Registers `T` if it is not registered yet.
    ///
    /// Returns `Ok(false)` if `T` was already registered, and an error if its
    /// descriptors are invalid.
    pub fn register<T: Marshal>(&mut self) -> Result<bool, Error> {
        let type_id = TypeId::of::<T>();
        if self.registrations.contains_key(&type_id) {
            return Ok(false);
        }

        let registration = Registration::of::<T>()?;
        self.add_indices(&registration);
        self.registrations.insert(type_id, registration);
        Ok(true)
    }

    // The type must **not** already exist.
    fn add_indices(&mut self, registration: &Registration) {
        let info = registration.struct_info();
        let type_name = info.type_name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.remove(type_name).is_some() {
                log::warn!("marshal type name `{type_name}` is ambiguous, use the type path instead");
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, info.ty_id());
            }
        }

        self.type_path_to_id.insert(info.type_path(), info.ty_id());
    }

    /// Registers every type annotated with `#[marshal(auto_register)]`.
    ///
    /// Repeated calls are cheap and will not insert duplicates. Returns
    /// `Ok(false)` when the `auto_register` feature is disabled.
    pub fn auto_register(&mut self) -> Result<bool, Error> {
        #[cfg(feature = "auto_register")]
        {
            for entry in inventory::iter::<crate::__macro_exports::auto_register::__AutoRegister> {
                (entry.0)(self)?;
            }
            Ok(true)
        }

        #[cfg(not(feature = "auto_register"))]
        {
            Ok(false)
        }
    }

    /// Whether the type with given [`TypeId`] has been registered.
    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.registrations.contains_key(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&Registration> {
        self.registrations.get(&type_id)
    }

    /// Returns the registration with the given full type path.
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&Registration> {
        self.type_path_to_id
            .get(type_path)
            .and_then(|id| self.get(*id))
    }

    /// Returns the registration with the given short type name.
    ///
    /// Returns `None` if the name is ambiguous or unknown.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&Registration> {
        self.type_name_to_id
            .get(type_name)
            .and_then(|id| self.get(*id))
    }

    /// Returns `true` if the given type name matches multiple registered types.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    /// Builds a boxed instance of the type registered under `name`.
    ///
    /// `name` is tried as a short type name first, then as a type path.
    pub fn from_map_by_name(&self, name: &str, map: Map) -> Result<Box<dyn Any>, Error> {
        self.get_with_type_name(name)
            .or_else(|| self.get_with_type_path(name))
            .ok_or_else(|| Error::new(ErrorKind::Unregistered(name.to_string())))?
            .from_map(map)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Iterates over all registrations, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.values()
    }
}
