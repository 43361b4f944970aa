//! Export of marshalable values to maps.

use alloc::borrow::Cow;

use crate::error::{ConfigError, Error};
use crate::marshal::Marshal;
use crate::value::Map;

/// Produces the map form of `value`. See [`Marshal::to_map`].
///
/// The output holds every field not ignored on write, under its key, plus
/// the entries of the `Unmapped` store that no field already wrote.
pub fn to_map<T: Marshal>(value: &T) -> Result<Map, Error> {
    let info = T::struct_info().map_err(|e| e.within_type(T::NAME))?;
    let mut out = Map::new();

    for field in info.iter() {
        if field.is_write_ignored() {
            continue;
        }

        let access = || {
            Error::from(ConfigError::FieldAccess(Cow::Borrowed(field.name())))
                .within(T::NAME, Some(field.name()))
        };

        let current = value.field_ref(field.name()).ok_or_else(access)?;
        let encoded = field
            .encode(current)
            .ok_or_else(access)?
            .map_err(|e| e.within(T::NAME, Some(field.name())))?;

        out.insert(field.key().into(), encoded);
    }

    value
        .write_unmapped(&mut out)
        .map_err(|e| e.within_type(T::NAME))?;

    Ok(out)
}
