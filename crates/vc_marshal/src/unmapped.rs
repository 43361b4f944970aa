use alloc::collections::BTreeMap;
use alloc::collections::btree_map::{Entry, Iter};
use alloc::string::String;

use crate::convert::{FieldType, FromValueError};
use crate::error::Error;
use crate::value::{Map, Value};

/// Storage for input keys no field claimed.
///
/// A type with an `Unmapped` field captures its leftovers at construction and
/// writes them back on export, so unknown data survives a round trip.
/// `V` bounds which leftover values are accepted.
///
/// # Examples
///
/// ```
/// use vc_marshal::Unmapped;
/// use vc_marshal::value::{Map, Value};
///
/// let mut leftovers = Map::new();
/// leftovers.insert("extra".into(), Value::Int(1));
///
/// let store: Unmapped<i64> = Unmapped::from_leftovers(leftovers).unwrap();
/// assert_eq!(store.get("extra"), Some(&1));
///
/// let mut out = Map::new();
/// out.insert("extra".into(), Value::Int(2));
/// store.write_into(&mut out).unwrap();
/// // Existing keys win.
/// assert_eq!(out["extra"], Value::Int(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Unmapped<V = Value> {
    entries: BTreeMap<String, V>,
}

impl<V> Default for Unmapped<V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Unmapped<V> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Adds or replaces an entry.
    #[inline]
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        self.entries.insert(key.into(), value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in key order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, String, V> {
        self.entries.iter()
    }
}

impl<V: FieldType> Unmapped<V> {
    /// Converts captured leftovers into a store.
    ///
    /// A value that is not a `V` fails with `TypeMismatch` naming its key.
    pub fn from_leftovers(leftovers: Map) -> Result<Self, Error> {
        leftovers
            .into_iter()
            .map(|(key, value)| match V::from_value(value) {
                Ok(v) => Ok((key, v)),
                Err(FromValueError::Mismatch(found)) => {
                    Err(Error::mismatch(key, V::declared_type().name(), found))
                }
                Err(FromValueError::Nested(err)) => Err(err),
            })
            .collect::<Result<_, _>>()
            .map(|entries| Self { entries })
    }

    /// Writes the entries into `out`, skipping keys already present.
    pub fn write_into(&self, out: &mut Map) -> Result<(), Error> {
        for (key, value) in &self.entries {
            if let Entry::Vacant(slot) = out.entry(key.clone()) {
                slot.insert(value.to_value()?);
            }
        }
        Ok(())
    }
}

impl<'a, V> IntoIterator for &'a Unmapped<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = Iter<'a, String, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
