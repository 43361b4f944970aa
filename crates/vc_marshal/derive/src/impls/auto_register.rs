use crate::derive_data::MarshalStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(
    info: &MarshalStruct,
    vc_marshal_path: &syn::Path,
) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    let Some(span) = info.attrs.auto_register else {
        return proc_macro2::TokenStream::new();
    };

    // Invalid for generic types.
    if info.is_generic() {
        return proc_macro2::TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(vc_marshal_path);
    let marshal_registry_ = crate::path::marshal_registry_(vc_marshal_path);
    let ident = info.ident;

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::__AutoRegister(#marshal_registry_::register::<#ident>)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(
    _: &MarshalStruct,
    _: &syn::Path,
) -> proc_macro2::TokenStream {
    proc_macro2::TokenStream::new()
}
