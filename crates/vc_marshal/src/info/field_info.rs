use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use bitflags::bitflags;

use crate::cast::{Cast, CastFn};
use crate::convert::{FieldType, FromValueError};
use crate::error::Error;
use crate::info::DeclaredType;
use crate::value::Value;

// -----------------------------------------------------------------------------
// FieldFlags

bitflags! {
    /// Direction-specific suppression of a field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// The field is not read by `from_map`.
        const IGNORE_READ = 1;
        /// The field is not written by `to_map`.
        const IGNORE_WRITE = 1 << 1;
        /// The field takes no part in marshaling.
        const IGNORE = Self::IGNORE_READ.bits() | Self::IGNORE_WRITE.bits();
    }
}

// -----------------------------------------------------------------------------
// Codec

type DefaultFn = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Type-erased entry points into a field's [`FieldType`] impl.
#[derive(Clone, Copy)]
struct Codec {
    decode: fn(Value) -> Result<Box<dyn Any>, FromValueError>,
    encode: fn(&dyn Any) -> Option<Result<Value, Error>>,
    nil: fn() -> Option<Box<dyn Any>>,
}

impl Codec {
    fn of<T: FieldType>() -> Self {
        Self {
            decode: |value| T::from_value(value).map(|v| Box::new(v) as Box<dyn Any>),
            encode: |any| any.downcast_ref::<T>().map(T::to_value),
            nil: || T::nil().map(|v| Box::new(v) as Box<dyn Any>),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Descriptor of one declared field.
///
/// Created through [`FieldInfo::of`] (or [`FieldInfo::ignored`] for fields
/// with no marshalable type) and collected into a
/// [`StructInfo`](crate::info::StructInfo), which validates the set.
///
/// # Examples
///
/// ```
/// use vc_marshal::info::{FieldFlags, FieldInfo};
///
/// let field: FieldInfo = FieldInfo::of::<Option<String>>("title")
///     .key("heading")
///     .ignore_on_write()
///     .into();
///
/// assert_eq!(field.name(), "title");
/// assert_eq!(field.key(), "heading");
/// assert!(field.declared_type().is_nilable());
/// assert_eq!(field.flags(), FieldFlags::IGNORE_WRITE);
/// ```
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    key: Cow<'static, str>,
    ty_id: TypeId,
    type_path: &'static str,
    declared: DeclaredType,
    flags: FieldFlags,
    presence: Option<&'static str>,
    cast: Option<Cast>,
    // Filled by `StructInfoBuilder::build`.
    cast_fn: Option<CastFn>,
    default: Option<DefaultFn>,
    // `None` only for fields created by `FieldInfo::ignored`.
    codec: Option<Codec>,
}

impl FieldInfo {
    /// Starts a descriptor for field `name` of type `T`, bound to the key `name`.
    #[inline]
    pub fn of<T: FieldType>(name: &'static str) -> FieldBuilder<T> {
        FieldBuilder {
            info: Self {
                name,
                key: Cow::Borrowed(name),
                ty_id: TypeId::of::<T>(),
                type_path: core::any::type_name::<T>(),
                declared: T::declared_type(),
                flags: FieldFlags::empty(),
                presence: None,
                cast: None,
                cast_fn: None,
                default: None,
                codec: Some(Codec::of::<T>()),
            },
            marker: PhantomData,
        }
    }

    /// A descriptor for a field that takes no part in marshaling.
    ///
    /// `T` need not implement [`FieldType`]; the owning type fills the field
    /// itself during assembly.
    pub fn ignored<T: 'static>(name: &'static str) -> Self {
        let type_path = core::any::type_name::<T>();
        Self {
            name,
            key: Cow::Borrowed(name),
            ty_id: TypeId::of::<T>(),
            type_path,
            declared: DeclaredType::leaf(type_path),
            flags: FieldFlags::IGNORE,
            presence: None,
            cast: None,
            cast_fn: None,
            default: None,
            codec: None,
        }
    }

    /// Returns the field's identifier.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the map key the field binds to.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub const fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches the field's type.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Returns the Rust type name of the field.
    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn declared_type(&self) -> &DeclaredType {
        &self.declared
    }

    #[inline]
    pub const fn flags(&self) -> FieldFlags {
        self.flags
    }

    #[inline]
    pub const fn is_read_ignored(&self) -> bool {
        self.flags.contains(FieldFlags::IGNORE_READ)
    }

    #[inline]
    pub const fn is_write_ignored(&self) -> bool {
        self.flags.contains(FieldFlags::IGNORE_WRITE)
    }

    /// Returns the companion presence flag, if the field tracks presence.
    #[inline]
    pub const fn presence(&self) -> Option<&'static str> {
        self.presence
    }

    #[inline]
    pub const fn cast(&self) -> Option<Cast> {
        self.cast
    }

    #[inline]
    pub const fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub(crate) const fn has_codec(&self) -> bool {
        self.codec.is_some()
    }

    #[inline]
    pub(crate) fn cast_fn(&self) -> Option<CastFn> {
        self.cast_fn
    }

    #[inline]
    pub(crate) fn set_cast_fn(&mut self, func: CastFn) {
        self.cast_fn = Some(func);
    }

    #[inline]
    pub(crate) fn make_default(&self) -> Option<Box<dyn Any>> {
        self.default.as_ref().map(|f| f())
    }

    #[inline]
    pub(crate) fn make_nil(&self) -> Option<Box<dyn Any>> {
        self.codec.and_then(|c| (c.nil)())
    }

    #[inline]
    pub(crate) fn decode(&self, value: Value) -> Result<Box<dyn Any>, FromValueError> {
        match self.codec {
            Some(c) => (c.decode)(value),
            None => Err(FromValueError::Mismatch(value)),
        }
    }

    #[inline]
    pub(crate) fn encode(&self, value: &dyn Any) -> Option<Result<Value, Error>> {
        self.codec.and_then(|c| (c.encode)(value))
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("type_path", &self.type_path)
            .field("declared", &self.declared)
            .field("flags", &self.flags)
            .field("presence", &self.presence)
            .field("cast", &self.cast)
            .field("has_default", &self.has_default())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// FieldBuilder

/// Typed builder for a [`FieldInfo`], returned by [`FieldInfo::of`].
pub struct FieldBuilder<T> {
    info: FieldInfo,
    marker: PhantomData<fn() -> T>,
}

impl<T: FieldType> FieldBuilder<T> {
    /// Binds the field to `key` instead of its name.
    #[inline]
    pub fn key(mut self, key: impl Into<Cow<'static, str>>) -> Self {
        self.info.key = key.into();
        self
    }

    /// Uses `f` when the key is absent or its value is rejected.
    #[inline]
    pub fn default_with(mut self, f: fn() -> T) -> Self {
        self.info.default = Some(Arc::new(move || Box::new(f()) as Box<dyn Any>));
        self
    }

    /// Uses `T::default()` when the key is absent or its value is rejected.
    #[inline]
    pub fn or_default(self) -> Self
    where
        T: Default,
    {
        self.default_with(T::default)
    }

    /// Records key presence in the companion boolean field `flag`.
    #[inline]
    pub fn presence(mut self, flag: &'static str) -> Self {
        self.info.presence = Some(flag);
        self
    }

    /// Applies `cast` to present, non-nil values before type checking.
    #[inline]
    pub fn cast(mut self, cast: Cast) -> Self {
        self.info.cast = Some(cast);
        self
    }

    #[inline]
    pub fn ignore(mut self) -> Self {
        self.info.flags |= FieldFlags::IGNORE;
        self
    }

    #[inline]
    pub fn ignore_on_read(mut self) -> Self {
        self.info.flags |= FieldFlags::IGNORE_READ;
        self
    }

    #[inline]
    pub fn ignore_on_write(mut self) -> Self {
        self.info.flags |= FieldFlags::IGNORE_WRITE;
        self
    }

    /// Finishes the descriptor.
    #[inline]
    pub fn build(self) -> FieldInfo {
        self.info
    }
}

impl<T: FieldType> From<FieldBuilder<T>> for FieldInfo {
    #[inline]
    fn from(value: FieldBuilder<T>) -> Self {
        value.build()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{FieldFlags, FieldInfo};
    use crate::value::Value;

    #[test]
    fn defaults_to_name_as_key() {
        let field = FieldInfo::of::<String>("message").build();
        assert_eq!(field.key(), "message");
        assert!(field.type_is::<String>());
        assert!(!field.has_default());
        assert_eq!(field.flags(), FieldFlags::empty());
    }

    #[test]
    fn default_provider_is_typed() {
        let field = FieldInfo::of::<i64>("count").default_with(|| 3).build();
        let value = field.make_default().unwrap();
        assert_eq!(*value.downcast::<i64>().unwrap(), 3);
    }

    #[test]
    fn codec_round_trips_through_any() {
        let field = FieldInfo::of::<Option<i64>>("n").build();

        let decoded = field.decode(Value::Int(4)).unwrap();
        assert_eq!(*decoded.downcast_ref::<Option<i64>>().unwrap(), Some(4));

        let nil = field.make_nil().unwrap();
        assert_eq!(field.encode(&*nil).unwrap().unwrap(), Value::Nil);

        // Wrong concrete type behind the `Any`.
        assert!(field.encode(&5_u8).is_none());
    }

    #[test]
    fn ignored_fields_have_no_codec() {
        struct Cache;
        let field = FieldInfo::ignored::<Cache>("cache");
        assert!(!field.has_codec());
        assert!(field.is_read_ignored() && field.is_write_ignored());
    }
}
