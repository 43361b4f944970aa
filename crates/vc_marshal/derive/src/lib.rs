//! Derive macro for `vc_marshal`.
//!
//! See [`Marshal`].
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static MARSHAL_ATTRIBUTE_NAME: &str = "marshal";

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod derive_data;
mod impls;
mod path;
mod rename;

// -----------------------------------------------------------------------------
// Macros

/// Implements `Marshal` and `FieldType` for a struct with named fields.
///
/// The generated `FieldType` impl lets the type be nested in other
/// marshalable types, including through `Option`, `Vec` and maps.
///
/// ## Type attributes
///
/// ```rust, ignore
/// #[derive(Marshal)]
/// #[marshal(strict, rename_all = "camelCase", auto_register)]
/// struct Foo { /* ... */ }
/// ```
///
/// - `strict`: unknown keys fail construction.
/// - `rename_all`: `lowercase`, `UPPERCASE`, `camelCase`, `PascalCase`,
///   `snake_case`, `SCREAMING_SNAKE_CASE` or `kebab-case`.
/// - `auto_register`: submit the type for `MarshalRegistry::auto_register`.
///   No-op for generic types and when the `auto_register` feature is off.
///
/// ## Field attributes
///
/// ```rust, ignore
/// #[derive(Marshal)]
/// struct Foo {
///     #[marshal(key = "ID", cast = "int")]
///     id: i64,
///     #[marshal(default, presence = has_tags)]
///     tags: Vec<String>,
///     has_tags: bool,
///     #[marshal(default = default_limit)]
///     limit: u32,
///     #[marshal(ignore)]
///     cache: Vec<u8>,
///     #[marshal(unmapped)]
///     extra: Unmapped,
/// }
/// ```
///
/// - `key = "..."`: bind to a different map key.
/// - `default` / `default = path`: fallback when the key is absent or its
///   value is rejected.
/// - `presence = ident`: the `bool` field `ident` records whether the key was
///   in the input.
/// - `cast = "name"` / `cast = path`: built-in or custom cast.
/// - `ignore` / `ignore_on_read` / `ignore_on_write`: suppress the field.
///   Fields not read are filled with their default, `Default::default()` if
///   none is given.
/// - `unmapped`: the `Unmapped` store receiving unknown keys.
#[proc_macro_derive(Marshal, attributes(marshal))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let marshal_struct = match derive_data::MarshalStruct::from_input(&ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let marshal_impls = impls::impl_struct(&marshal_struct);

    TokenStream::from(quote! {
        const _: () = {
            #marshal_impls
        };
    })
}
