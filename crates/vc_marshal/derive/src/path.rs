//! This independent module is used to provide the required path.
//! So as to minimize changes when the `vc_marshal` structure is modified.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the access path to the `vc_marshal` crate.
///
/// `vc_marshal` declares `extern crate self as vc_marshal`, so the absolute
/// path also works inside the crate itself.
pub(crate) fn vc_marshal() -> syn::Path {
    syn::parse_quote!(::vc_marshal)
}

#[inline(always)]
pub(crate) fn marshal_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::Marshal }
}

#[inline(always)]
pub(crate) fn field_type_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::FieldType }
}

#[inline(always)]
pub(crate) fn fields_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::Fields }
}

#[inline(always)]
pub(crate) fn error_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::Error }
}

#[inline(always)]
pub(crate) fn from_value_error_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::FromValueError }
}

#[inline(always)]
pub(crate) fn value_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::value::Value }
}

#[inline(always)]
pub(crate) fn map_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::value::Map }
}

#[inline(always)]
pub(crate) fn struct_info_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::info::StructInfo }
}

#[inline(always)]
pub(crate) fn field_info_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::info::FieldInfo }
}

#[inline(always)]
pub(crate) fn declared_type_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::info::DeclaredType }
}

#[inline(always)]
pub(crate) fn struct_info_cell_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::info::StructInfoCell }
}

#[inline(always)]
pub(crate) fn generic_struct_info_cell_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::info::GenericStructInfoCell }
}

#[inline(always)]
pub(crate) fn cast_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::cast::Cast }
}

#[inline(always)]
pub(crate) fn nested_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::nested }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::__macro_exports::auto_register }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn marshal_registry_(vc_marshal_path: &syn::Path) -> TokenStream {
    quote! { #vc_marshal_path::registry::MarshalRegistry }
}
