// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod struct_kind;
mod trait_field_type;
mod trait_marshal;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use struct_kind::impl_struct;

use auto_register::get_auto_register_impl;
use trait_field_type::impl_trait_field_type;
use trait_marshal::impl_trait_marshal;
