//! Construction of marshalable values from maps.
//!
//! Every descriptor is processed in declaration order and staged in
//! [`Fields`]; only after all of them succeeded (and the unknown-key policy
//! has run) does the type assemble itself. Nothing is observable on failure.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::coerce;
use crate::error::{ConfigError, Error, ErrorKind};
use crate::hash::HashMap;
use crate::info::{StructInfo, UnknownKeys};
use crate::marshal::Marshal;
use crate::value::{Map, MapKey, Value};

/// Builds a `T` from key/value pairs. See [`Marshal::from_map`].
pub fn from_map<T, K, I>(input: I) -> Result<T, Error>
where
    T: Marshal,
    K: MapKey,
    I: IntoIterator<Item = (K, Value)>,
{
    let info = T::struct_info().map_err(|e| e.within_type(T::NAME))?;
    let entries = Entries::normalize(input);

    let mut fields = stage(info, T::NAME, entries)?;
    let mut this = T::assemble(&mut fields).map_err(|e| e.within_type(T::NAME))?;
    this.after_initialize().map_err(|e| e.within_type(T::NAME))?;
    Ok(this)
}

fn stage(
    info: &'static StructInfo,
    type_name: &'static str,
    mut entries: Entries,
) -> Result<Fields, Error> {
    let mut slots = Vec::with_capacity(info.field_len());
    let mut found = HashMap::with_capacity_and_hasher(info.field_len(), Default::default());

    for field in info.iter() {
        if field.is_read_ignored() {
            slots.push(field.make_default());
            continue;
        }

        let raw = entries.take(field.key());
        found.insert(field.key(), raw.is_some());

        let value = match raw {
            Some(raw) => coerce::present(field, raw),
            None => coerce::absent(field),
        }
        .map_err(|e| e.within(type_name, Some(field.name())))?;

        slots.push(Some(value));
    }

    let mut leftovers = Map::new();
    for (key, value) in entries.into_leftovers() {
        match info.policy() {
            UnknownKeys::Ignore => log::trace!("`{type_name}` ignores unknown key `{key}`"),
            UnknownKeys::Strict => {
                let err = Error::new(ErrorKind::UnknownKey { key, type_name });
                return Err(err.within_type(type_name));
            }
            UnknownKeys::Unmapped => {
                leftovers.insert(key, value);
            }
        }
    }

    Ok(Fields {
        info,
        slots,
        found,
        leftovers,
    })
}

// -----------------------------------------------------------------------------
// Entries

/// Input pairs with normalized keys, in input order.
struct Entries {
    items: Vec<(String, Option<Value>)>,
    index: HashMap<String, usize>,
}

impl Entries {
    fn normalize<K: MapKey>(input: impl IntoIterator<Item = (K, Value)>) -> Self {
        let input = input.into_iter();
        let (lower, _) = input.size_hint();
        let mut items: Vec<(String, Option<Value>)> = Vec::with_capacity(lower);
        let mut index: HashMap<String, usize> =
            HashMap::with_capacity_and_hasher(lower, Default::default());

        for (key, value) in input {
            let key = key.into_key();
            match index.get(&key) {
                // Later value wins, first position is kept.
                Some(&pos) => items[pos].1 = Some(value),
                None => {
                    index.insert(key.clone(), items.len());
                    items.push((key, Some(value)));
                }
            }
        }

        Self { items, index }
    }

    fn take(&mut self, key: &str) -> Option<Value> {
        let pos = *self.index.get(key)?;
        self.items[pos].1.take()
    }

    fn into_leftovers(self) -> impl Iterator<Item = (String, Value)> {
        self.items
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

// -----------------------------------------------------------------------------
// Fields

/// Field values staged during construction, handed to
/// [`Marshal::assemble`].
///
/// Values are moved out with [`take`](Fields::take); each can be taken once.
pub struct Fields {
    info: &'static StructInfo,
    slots: Vec<Option<Box<dyn Any>>>,
    found: HashMap<&'static str, bool>,
    leftovers: Map,
}

impl Fields {
    /// Returns the descriptors being assembled.
    #[inline]
    pub fn struct_info(&self) -> &'static StructInfo {
        self.info
    }

    /// Moves the staged value of field `name` out.
    ///
    /// Fails with [`ConfigError::FieldAccess`] if the field is unknown, was
    /// already taken, has no staged value, or is not a `T`.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<T, Error> {
        let access = || Error::from(ConfigError::FieldAccess(Cow::Owned(name.into())));
        let index = self.info.index_of(name).ok_or_else(access)?;
        let slot = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(access)?;
        slot.downcast::<T>().map(|v| *v).map_err(|_| access())
    }

    /// Returns `true` if the key bound to field `name` was in the input.
    #[inline]
    pub fn is_present(&self, name: &str) -> bool {
        self.info
            .field(name)
            .is_some_and(|field| self.is_found(field.key()))
    }

    /// Returns `true` if `key` was consumed by a descriptor.
    #[inline]
    pub fn is_found(&self, key: &str) -> bool {
        self.found.get(key).copied().unwrap_or(false)
    }

    /// Moves the collected unknown pairs out.
    ///
    /// Always empty unless the type's policy is [`UnknownKeys::Unmapped`].
    #[inline]
    pub fn take_leftovers(&mut self) -> Map {
        core::mem::take(&mut self.leftovers)
    }
}

impl core::fmt::Debug for Fields {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fields")
            .field("type_name", &self.info.type_name())
            .field("found", &self.found)
            .field("leftovers", &self.leftovers)
            .finish_non_exhaustive()
    }
}
