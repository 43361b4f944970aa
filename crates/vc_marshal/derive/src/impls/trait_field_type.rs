use proc_macro2::TokenStream;
use quote::quote;
use syn::WhereClause;

use crate::derive_data::MarshalStruct;

/// Generate implementation code for `FieldType`, so the type can be nested.
pub(crate) fn impl_trait_field_type(
    info: &MarshalStruct,
    vc_marshal_path: &syn::Path,
    where_clause: &WhereClause,
) -> TokenStream {
    let field_type_ = crate::path::field_type_(vc_marshal_path);
    let declared_type_ = crate::path::declared_type_(vc_marshal_path);
    let from_value_error_ = crate::path::from_value_error_(vc_marshal_path);
    let value_ = crate::path::value_(vc_marshal_path);
    let error_ = crate::path::error_(vc_marshal_path);
    let nested_ = crate::path::nested_(vc_marshal_path);

    let ident = info.ident;
    let (impl_generics, ty_generics, _) = info.generics.split_for_impl();

    quote! {
        impl #impl_generics #field_type_ for #ident #ty_generics #where_clause {
            #[inline]
            fn declared_type() -> #declared_type_ {
                #declared_type_::nested::<Self>()
            }

            #[inline]
            fn from_value(value: #value_) -> ::core::result::Result<Self, #from_value_error_> {
                #nested_::nested_from_value::<Self>(value)
            }

            #[inline]
            fn to_value(&self) -> ::core::result::Result<#value_, #error_> {
                #nested_::nested_to_value(self)
            }
        }
    }
}
