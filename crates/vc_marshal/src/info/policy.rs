use core::fmt;

/// What construction does with input keys no descriptor claims.
///
/// Selected per type: composing `Strict` gives [`UnknownKeys::Strict`],
/// composing an `Unmapped` store gives [`UnknownKeys::Unmapped`], and a type
/// composing neither discards leftovers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum UnknownKeys {
    /// Leftover keys are silently discarded.
    #[default]
    Ignore,
    /// The first leftover key fails construction with `UnknownKey`.
    Strict,
    /// Leftover pairs are kept in the object's `Unmapped` store.
    Unmapped,
}

impl fmt::Display for UnknownKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Strict => "strict",
            Self::Unmapped => "unmapped",
        })
    }
}
