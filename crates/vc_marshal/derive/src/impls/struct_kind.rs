use proc_macro2::TokenStream;
use quote::quote;
use syn::{WhereClause, parse_quote};

use super::{get_auto_register_impl, impl_trait_field_type, impl_trait_marshal};
use crate::attributes::DefaultAttr;
use crate::derive_data::{FieldKind, MarshalStruct};

/// Generate every impl of `#[derive(Marshal)]`.
pub(crate) fn impl_struct(info: &MarshalStruct) -> TokenStream {
    let vc_marshal_path = crate::path::vc_marshal();
    let where_clause = where_clause_with_bounds(info, &vc_marshal_path);

    let marshal_impl = impl_trait_marshal(info, &vc_marshal_path, &where_clause);
    let field_type_impl = impl_trait_field_type(info, &vc_marshal_path, &where_clause);
    let auto_register_impl = get_auto_register_impl(info, &vc_marshal_path);

    quote! {
        #marshal_impl

        #field_type_impl

        #auto_register_impl
    }
}

/// The user's where clause, extended with the bounds the generated code needs
/// when the struct is generic.
fn where_clause_with_bounds(info: &MarshalStruct, vc_marshal_path: &syn::Path) -> WhereClause {
    let mut where_clause = info
        .generics
        .where_clause
        .clone()
        .unwrap_or_else(|| parse_quote!(where));

    if !info.is_generic() {
        return where_clause;
    }

    let field_type_ = crate::path::field_type_(vc_marshal_path);

    for param in info.generics.type_params() {
        let ident = &param.ident;
        where_clause.predicates.push(parse_quote!(#ident: 'static));
    }

    for field in &info.fields {
        let ty = field.ty;
        let attrs = &field.attrs;
        match &field.kind {
            FieldKind::Marshaled { .. } => {
                where_clause.predicates.push(parse_quote!(#ty: #field_type_));
                let needs_default = matches!(attrs.default, Some(DefaultAttr::Trait))
                    || (attrs.ignore_on_read.is_some() && attrs.default.is_none());
                if needs_default {
                    where_clause
                        .predicates
                        .push(parse_quote!(#ty: ::core::default::Default));
                }
            }
            FieldKind::Ignored => {
                if !matches!(attrs.default, Some(DefaultAttr::Path(_))) {
                    where_clause
                        .predicates
                        .push(parse_quote!(#ty: ::core::default::Default));
                }
            }
            FieldKind::Presence { .. } | FieldKind::Unmapped => {}
        }
    }

    where_clause
}
