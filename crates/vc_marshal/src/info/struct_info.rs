use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::cast::{self, Cast};
use crate::error::ConfigError;
use crate::hash::HashMap;
use crate::info::{FieldInfo, UnknownKeys};
use crate::marshal::Marshal;

// -----------------------------------------------------------------------------
// StructInfo

/// The validated descriptor set of a marshalable type.
///
/// Built once per type through [`StructInfo::builder`] and cached in a
/// [`StructInfoCell`](crate::info::StructInfoCell). Fields keep their
/// declaration order; construction and serialization walk them in that order.
#[derive(Debug)]
pub struct StructInfo {
    type_name: &'static str,
    type_path: &'static str,
    ty_id: TypeId,
    fields: Box<[FieldInfo]>,
    by_name: HashMap<&'static str, usize>,
    by_key: HashMap<Cow<'static, str>, usize>,
    policy: UnknownKeys,
}

impl StructInfo {
    /// Starts a descriptor set for `T`.
    #[inline]
    pub fn builder<T: Marshal>() -> StructInfoBuilder {
        StructInfoBuilder {
            type_name: T::NAME,
            type_path: core::any::type_name::<T>(),
            ty_id: TypeId::of::<T>(),
            fields: Vec::new(),
            strict: false,
            unmapped: false,
        }
    }

    /// Returns the name used in error frames.
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Returns what construction does with unclaimed keys.
    #[inline]
    pub const fn policy(&self) -> UnknownKeys {
        self.policy
    }

    /// Returns the [`FieldInfo`] for the given field name.
    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.index_of(name).map(|index| &self.fields[index])
    }

    /// Returns the [`FieldInfo`] bound to the given map key.
    #[inline]
    pub fn field_by_key(&self, key: &str) -> Option<&FieldInfo> {
        self.by_key.get(key).map(|&index| &self.fields[index])
    }

    /// Returns the [`FieldInfo`] at the given declaration index.
    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Returns the declaration index of the given field name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Iterates over the fields in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    /// Returns the number of declared fields, ignored ones included.
    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields.len()
    }
}

// -----------------------------------------------------------------------------
// StructInfoBuilder

/// Collects field descriptors and validates them as a set.
///
/// # Examples
///
/// ```
/// use vc_marshal::{ConfigError, Error, Fields, Marshal};
/// use vc_marshal::info::{FieldInfo, StructInfo};
/// use core::any::Any;
///
/// struct Pair;
///
/// impl Marshal for Pair {
///     const NAME: &'static str = "Pair";
///     fn struct_info() -> Result<&'static StructInfo, Error> { unimplemented!() }
///     fn assemble(_: &mut Fields) -> Result<Self, Error> { Ok(Pair) }
///     fn field_ref(&self, _: &str) -> Option<&dyn Any> { None }
/// }
///
/// let err = StructInfo::builder::<Pair>()
///     .field(FieldInfo::of::<i64>("a").key("k"))
///     .field(FieldInfo::of::<i64>("b").key("k"))
///     .build()
///     .unwrap_err();
///
/// assert!(matches!(err, ConfigError::DuplicateKey { first: "a", second: "b", .. }));
/// ```
#[derive(Debug)]
pub struct StructInfoBuilder {
    type_name: &'static str,
    type_path: &'static str,
    ty_id: TypeId,
    fields: Vec<FieldInfo>,
    strict: bool,
    unmapped: bool,
}

impl StructInfoBuilder {
    /// Appends a field.
    #[inline]
    pub fn field(mut self, field: impl Into<FieldInfo>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Rejects unknown keys.
    #[inline]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Collects unknown keys into the type's `Unmapped` store.
    #[inline]
    pub fn unmapped(mut self) -> Self {
        self.unmapped = true;
        self
    }

    /// Validates the fields and produces the descriptor set.
    pub fn build(self) -> Result<StructInfo, ConfigError> {
        let policy = match (self.strict, self.unmapped) {
            (true, true) => return Err(ConfigError::ConflictingPolicy),
            (true, false) => UnknownKeys::Strict,
            (false, true) => UnknownKeys::Unmapped,
            (false, false) => UnknownKeys::Ignore,
        };

        let len = self.fields.len();
        let mut by_name = HashMap::with_capacity_and_hasher(len, Default::default());
        let mut by_key: HashMap<Cow<'static, str>, usize> =
            HashMap::with_capacity_and_hasher(len, Default::default());
        let mut casts = Vec::with_capacity(len);
        let mut fields = self.fields;

        for (index, field) in fields.iter().enumerate() {
            let name = field.name();
            if by_name.insert(name, index).is_some() {
                return Err(ConfigError::DuplicateField(name));
            }

            if let Some(&first) = by_key.get(field.key()) {
                return Err(ConfigError::DuplicateKey {
                    key: Cow::Owned(field.key().into()),
                    first: fields[first].name(),
                    second: name,
                });
            }
            by_key.insert(Cow::Owned(field.key().into()), index);

            if !field.has_codec() && !(field.is_read_ignored() && field.is_write_ignored()) {
                return Err(ConfigError::MissingCodec(name));
            }

            if field.is_read_ignored() && !field.is_write_ignored() && !field.has_default() {
                return Err(ConfigError::MissingDefault(name));
            }

            casts.push(match field.cast() {
                Some(Cast::Named(cast)) => Some(
                    cast::named(cast).ok_or(ConfigError::UnknownCast { field: name, cast })?,
                ),
                Some(Cast::Func(func)) => Some(func),
                None => None,
            });
        }

        for (field, func) in fields.iter_mut().zip(casts) {
            if let Some(func) = func {
                field.set_cast_fn(func);
            }
        }

        for field in &fields {
            if let Some(flag) = field.presence()
                && by_name.contains_key(flag)
            {
                return Err(ConfigError::PresenceCollision {
                    field: field.name(),
                    flag,
                });
            }
        }

        log::debug!(
            "built marshal descriptors for `{}`: {} fields, {} unknown keys",
            self.type_name,
            fields.len(),
            policy,
        );

        Ok(StructInfo {
            type_name: self.type_name,
            type_path: self.type_path,
            ty_id: self.ty_id,
            fields: fields.into_boxed_slice(),
            by_name,
            by_key,
            policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use core::any::Any;

    use super::StructInfo;
    use crate::cast::Cast;
    use crate::error::{ConfigError, Error};
    use crate::info::{FieldInfo, UnknownKeys};
    use crate::marshal::{Fields, Marshal};

    struct Probe;

    impl Marshal for Probe {
        const NAME: &'static str = "Probe";

        fn struct_info() -> Result<&'static StructInfo, Error> {
            unreachable!()
        }

        fn assemble(_: &mut Fields) -> Result<Self, Error> {
            Ok(Probe)
        }

        fn field_ref(&self, _: &str) -> Option<&dyn Any> {
            None
        }
    }

    #[test]
    fn indexes_by_name_and_key() {
        let info = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<String>("message").key("msg"))
            .field(FieldInfo::of::<i64>("count"))
            .build()
            .unwrap();

        assert_eq!(info.type_name(), "Probe");
        assert_eq!(info.policy(), UnknownKeys::Ignore);
        assert_eq!(info.index_of("count"), Some(1));
        assert_eq!(info.field_by_key("msg").unwrap().name(), "message");
        assert!(info.field_by_key("message").is_none());
        assert_eq!(
            info.iter().map(FieldInfo::name).collect::<alloc::vec::Vec<_>>(),
            ["message", "count"]
        );
    }

    #[test]
    fn rejects_duplicates() {
        let err = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<i64>("a"))
            .field(FieldInfo::of::<bool>("a").key("b"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateField("a"));
    }

    #[test]
    fn rejects_conflicting_policy() {
        let err = StructInfo::builder::<Probe>().strict().unmapped().build();
        assert_eq!(err.unwrap_err(), ConfigError::ConflictingPolicy);
    }

    #[test]
    fn rejects_unknown_cast() {
        let err = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<i64>("a").cast(Cast::Named("octal")))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownCast {
                field: "a",
                cast: "octal"
            }
        );
    }

    #[test]
    fn read_ignored_needs_default() {
        let err = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<i64>("a").ignore_on_read())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingDefault("a"));

        let info = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<i64>("a").ignore_on_read().or_default())
            .field(FieldInfo::of::<i64>("b").ignore())
            .build();
        assert!(info.is_ok());
    }

    #[test]
    fn rejects_presence_collision() {
        let err = StructInfo::builder::<Probe>()
            .field(FieldInfo::of::<i64>("a").presence("b"))
            .field(FieldInfo::of::<bool>("b"))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::PresenceCollision { field: "a", flag: "b" });
    }
}
