use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

use crate::value::Value;

// -----------------------------------------------------------------------------
// ConfigError

/// A schema problem found while building a type's [`StructInfo`].
///
/// These are deterministic properties of the declaration, so they are
/// reported the first time the descriptors are built and on every call after.
///
/// [`StructInfo`]: crate::info::StructInfo
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(&'static str),

    #[error("key `{key}` is bound by both `{first}` and `{second}`")]
    DuplicateKey {
        key: Cow<'static, str>,
        first: &'static str,
        second: &'static str,
    },

    #[error("`Strict` and `Unmapped` cannot be composed on the same type")]
    ConflictingPolicy,

    #[error("field `{field}` uses unknown cast `{cast}`")]
    UnknownCast {
        field: &'static str,
        cast: &'static str,
    },

    #[error("field `{0}` is ignored on read but has no default")]
    MissingDefault(&'static str),

    #[error("field `{0}` has no codec but is not ignored")]
    MissingCodec(&'static str),

    #[error("presence flag `{flag}` of field `{field}` collides with a declared field")]
    PresenceCollision {
        field: &'static str,
        flag: &'static str,
    },

    #[error("field `{0}` could not be accessed with its declared type")]
    FieldAccess(Cow<'static, str>),
}

// -----------------------------------------------------------------------------
// CastError

/// Failure reported by a cast rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CastError(Cow<'static, str>);

impl CastError {
    /// Creates a cast error with the given message.
    #[inline]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }

    /// Returns the message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// -----------------------------------------------------------------------------
// ErrorKind

/// What went wrong, without the location.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    #[error("invalid marshal configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("missing required field `{field}`")]
    MissingRequiredField { field: &'static str },

    #[error("expected {expected} for `{field}`, found {found}")]
    TypeMismatch {
        field: Cow<'static, str>,
        expected: &'static str,
        found: Value,
    },

    #[error("unknown key `{key}` for `{type_name}`")]
    UnknownKey {
        key: String,
        type_name: &'static str,
    },

    /// An unsigned value too large for [`Value::Int`].
    #[error("integer {0} does not fit in a signed 64-bit int")]
    IntOutOfRange(String),

    #[error("no marshalable type named `{0}` is registered")]
    Unregistered(String),

    /// Raised by user code, usually `Marshal::after_initialize`.
    #[error("{0}")]
    Custom(Cow<'static, str>),
}

// -----------------------------------------------------------------------------
// Frame

/// One level of the object graph an error travelled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    type_name: &'static str,
    field: Option<Cow<'static, str>>,
}

impl Frame {
    /// Returns the name of the type being parsed.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the field being parsed, if the error is tied to one.
    #[inline]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\n  parsing {}", self.type_name)?;
        if let Some(field) = &self.field {
            write!(f, "#{field}")?;
        }
        Ok(())
    }
}

/// Frames in innermost-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace(Vec<Frame>);

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|frame| fmt::Display::fmt(frame, f))
    }
}

// -----------------------------------------------------------------------------
// Error

/// The error returned by marshaling operations.
///
/// Renders as the message followed by one `parsing <Type>[#<field>]` line per
/// object level, innermost first:
///
/// ```text
/// missing required field `message`
///   parsing Note#message
///   parsing Post#note
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}{trace}")]
pub struct Error {
    kind: ErrorKind,
    trace: Trace,
}

impl Error {
    /// Creates an error without location information.
    #[inline]
    pub fn new(kind: impl Into<ErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            trace: Trace::default(),
        }
    }

    /// Returns what went wrong.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the frames, innermost first.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.trace.0
    }

    /// Appends an outer frame.
    #[must_use]
    pub fn within(
        mut self,
        type_name: &'static str,
        field: Option<impl Into<Cow<'static, str>>>,
    ) -> Self {
        self.trace.0.push(Frame {
            type_name,
            field: field.map(Into::into),
        });
        self
    }

    /// Appends an outer frame that is not tied to a field.
    #[inline]
    #[must_use]
    pub fn within_type(self, type_name: &'static str) -> Self {
        self.within(type_name, None::<&'static str>)
    }

    /// Creates an error with a free-form message.
    #[inline]
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Custom(message.into()))
    }

    #[inline]
    pub(crate) fn missing(field: &'static str) -> Self {
        Self::new(ErrorKind::MissingRequiredField { field })
    }

    #[inline]
    pub(crate) fn mismatch(
        field: impl Into<Cow<'static, str>>,
        expected: &'static str,
        found: Value,
    ) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            field: field.into(),
            expected,
            found,
        })
    }
}

impl From<ConfigError> for Error {
    #[inline]
    fn from(value: ConfigError) -> Self {
        Self::new(value)
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(value: ErrorKind) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{ConfigError, Error, ErrorKind};
    use crate::value::Value;

    #[test]
    fn frames_render_innermost_first() {
        let err = Error::missing("message")
            .within("Note", Some("message"))
            .within("Post", Some("note"));

        assert_eq!(
            err.to_string(),
            "missing required field `message`\n  parsing Note#message\n  parsing Post#note"
        );
        assert_eq!(err.frames()[1].field(), Some("note"));
    }

    #[test]
    fn type_frame_has_no_field_suffix() {
        let err = Error::new(ErrorKind::UnknownKey {
            key: "extra".into(),
            type_name: "Note",
        })
        .within_type("Note");

        assert_eq!(err.to_string(), "unknown key `extra` for `Note`\n  parsing Note");
    }

    #[test]
    fn mismatch_names_the_value() {
        let err = Error::mismatch("count", "int", Value::from("three"));
        assert_eq!(err.to_string(), "expected int for `count`, found \"three\"");
    }

    #[test]
    fn config_error_converts() {
        let err: Error = ConfigError::ConflictingPolicy.into();
        assert!(matches!(
            err.kind(),
            ErrorKind::Config(ConfigError::ConflictingPolicy)
        ));
    }
}
