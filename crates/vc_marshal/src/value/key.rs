use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;

// -----------------------------------------------------------------------------
// MapKey

/// A key type with a canonical string projection.
///
/// Every key handed to `from_map` is reduced to a [`String`] before it is
/// compared with descriptor keys, so maps keyed by [`Symbol`], `&str` or
/// integers build the same object as the equivalent `String`-keyed map.
///
/// # Examples
///
/// ```
/// use vc_marshal::value::{MapKey, Symbol};
///
/// assert_eq!(Symbol::new("id").into_key(), "id");
/// assert_eq!(7_u32.into_key(), "7");
/// ```
pub trait MapKey {
    /// Consumes the key and returns its canonical form.
    fn into_key(self) -> String;
}

impl MapKey for String {
    #[inline]
    fn into_key(self) -> String {
        self
    }
}

impl MapKey for &str {
    #[inline]
    fn into_key(self) -> String {
        self.into()
    }
}

impl MapKey for &String {
    #[inline]
    fn into_key(self) -> String {
        self.clone()
    }
}

impl MapKey for Cow<'_, str> {
    #[inline]
    fn into_key(self) -> String {
        self.into_owned()
    }
}

impl MapKey for Box<str> {
    #[inline]
    fn into_key(self) -> String {
        self.into()
    }
}

impl MapKey for Arc<str> {
    #[inline]
    fn into_key(self) -> String {
        self.as_ref().into()
    }
}

impl MapKey for char {
    #[inline]
    fn into_key(self) -> String {
        self.to_string()
    }
}

macro_rules! impl_int_key {
    ($($ty:ty),*) => {
        $(
            impl MapKey for $ty {
                #[inline]
                fn into_key(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_int_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Symbol

/// A `'static` interned name used as a map key.
///
/// Symbols compare and hash by their text, cost one pointer-sized copy, and
/// normalize to the same key as the equivalent string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(&'static str);

impl Symbol {
    /// Creates a symbol for `name`.
    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the symbol's text.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Symbol {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl MapKey for Symbol {
    #[inline]
    fn into_key(self) -> String {
        self.0.into()
    }
}

impl MapKey for &Symbol {
    #[inline]
    fn into_key(self) -> String {
        self.0.into()
    }
}
