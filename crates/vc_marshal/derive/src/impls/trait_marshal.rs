use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Ident, WhereClause};

use crate::attributes::{CastAttr, DefaultAttr};
use crate::derive_data::{FieldKind, MarshalField, MarshalStruct};

/// Generate implementation code for `Marshal`.
pub(crate) fn impl_trait_marshal(
    info: &MarshalStruct,
    vc_marshal_path: &syn::Path,
    where_clause: &WhereClause,
) -> TokenStream {
    let marshal_ = crate::path::marshal_(vc_marshal_path);
    let struct_info_ = crate::path::struct_info_(vc_marshal_path);
    let fields_ = crate::path::fields_(vc_marshal_path);
    let error_ = crate::path::error_(vc_marshal_path);
    let map_ = crate::path::map_(vc_marshal_path);

    let fields_var = Ident::new("__fields", Span::call_site());
    let out_var = Ident::new("__out", Span::call_site());

    let ident = info.ident;
    let type_name = ident.to_string();
    let (impl_generics, ty_generics, _) = info.generics.split_for_impl();

    let struct_info_tokens = struct_info_tokens(info, vc_marshal_path);

    let assemble_members = info.fields.iter().map(|field| {
        let member = field.ident;
        let value = assemble_value(field, &fields_var);
        quote! { #member: #value }
    });

    let field_ref_arms = info.fields.iter().filter_map(|field| match field.kind {
        FieldKind::Marshaled { .. } => {
            let name = &field.name;
            let member = field.ident;
            Some(quote! { #name => ::core::option::Option::Some(&self.#member) })
        }
        _ => None,
    });

    let write_unmapped = info
        .fields
        .iter()
        .find(|field| matches!(field.kind, FieldKind::Unmapped))
        .map(|field| {
            let member = field.ident;
            quote! {
                #[inline]
                fn write_unmapped(&self, #out_var: &mut #map_) -> ::core::result::Result<(), #error_> {
                    self.#member.write_into(#out_var)
                }
            }
        });

    quote! {
        impl #impl_generics #marshal_ for #ident #ty_generics #where_clause {
            const NAME: &'static str = #type_name;

            fn struct_info() -> ::core::result::Result<&'static #struct_info_, #error_> {
                #struct_info_tokens
            }

            fn assemble(#fields_var: &mut #fields_) -> ::core::result::Result<Self, #error_> {
                ::core::result::Result::Ok(Self {
                    #(#assemble_members,)*
                })
            }

            fn field_ref(&self, name: &str) -> ::core::option::Option<&dyn ::core::any::Any> {
                match name {
                    #(#field_ref_arms,)*
                    _ => ::core::option::Option::None,
                }
            }

            #write_unmapped
        }
    }
}

/// The body of `struct_info`: a static cell built from the descriptors.
fn struct_info_tokens(info: &MarshalStruct, vc_marshal_path: &syn::Path) -> TokenStream {
    let struct_info_ = crate::path::struct_info_(vc_marshal_path);

    let descriptors = info
        .fields
        .iter()
        .filter_map(|field| field_info_tokens(field, vc_marshal_path));

    let strict = info.attrs.strict.map(|_| quote! { .strict() });
    let unmapped = info
        .fields
        .iter()
        .any(|field| matches!(field.kind, FieldKind::Unmapped))
        .then(|| quote! { .unmapped() });

    let build = quote! {
        #struct_info_::builder::<Self>()
            #(.field(#descriptors))*
            #strict
            #unmapped
            .build()
    };

    if info.is_generic() {
        let info_cell = crate::path::generic_struct_info_cell_(vc_marshal_path);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_build::<Self>(|| {
                #build
            })
        }
    } else {
        let info_cell = crate::path::struct_info_cell_(vc_marshal_path);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_build(|| {
                #build
            })
        }
    }
}

/// The `FieldInfo` expression of one field, `None` for fields without one.
fn field_info_tokens(field: &MarshalField, vc_marshal_path: &syn::Path) -> Option<TokenStream> {
    let field_info_ = crate::path::field_info_(vc_marshal_path);
    let name = &field.name;
    let ty = field.ty;
    let attrs = &field.attrs;

    let key = match &field.kind {
        FieldKind::Marshaled { key } => key,
        FieldKind::Ignored => {
            return Some(quote! { #field_info_::ignored::<#ty>(#name) });
        }
        FieldKind::Presence { .. } | FieldKind::Unmapped => return None,
    };

    let mut tokens = quote! { #field_info_::of::<#ty>(#name) };

    if key != name {
        tokens.extend(quote! { .key(#key) });
    }

    match &attrs.default {
        Some(DefaultAttr::Trait) => tokens.extend(quote! { .or_default() }),
        Some(DefaultAttr::Path(path)) => tokens.extend(quote! { .default_with(#path) }),
        // Fields not read still need a value.
        None if attrs.ignore_on_read.is_some() => tokens.extend(quote! { .or_default() }),
        None => {}
    }

    if let Some(cast) = &attrs.cast {
        let cast_ = crate::path::cast_(vc_marshal_path);
        tokens.extend(match cast {
            CastAttr::Named(lit) => quote! { .cast(#cast_::Named(#lit)) },
            CastAttr::Func(path) => quote! { .cast(#cast_::Func(#path)) },
        });
    }

    if let Some(flag) = &attrs.presence {
        let flag = flag.to_string();
        let flag = flag.trim_start_matches("r#");
        tokens.extend(quote! { .presence(#flag) });
    }

    if attrs.ignore_on_read.is_some() {
        tokens.extend(quote! { .ignore_on_read() });
    }
    if attrs.ignore_on_write.is_some() {
        tokens.extend(quote! { .ignore_on_write() });
    }

    Some(tokens)
}

/// The expression moving one field's value out of the staged fields.
fn assemble_value(field: &MarshalField, fields_var: &Ident) -> TokenStream {
    let ty = field.ty;
    match &field.kind {
        FieldKind::Marshaled { .. } => {
            let name = &field.name;
            quote! { #fields_var.take::<#ty>(#name)? }
        }
        FieldKind::Ignored => match &field.attrs.default {
            Some(DefaultAttr::Path(path)) => quote! { #path() },
            _ => quote! { <#ty as ::core::default::Default>::default() },
        },
        FieldKind::Presence { owner } => quote! { #fields_var.is_present(#owner) },
        FieldKind::Unmapped => quote! {
            <#ty>::from_leftovers(#fields_var.take_leftovers())?
        },
    }
}
