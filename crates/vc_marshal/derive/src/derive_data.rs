use std::collections::HashMap;

use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Type};

use crate::attributes::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// MarshalField

/// The role a struct field plays in marshaling.
pub(crate) enum FieldKind {
    /// Described by a `FieldInfo`; bound to `key`.
    Marshaled { key: String },
    /// Described by `FieldInfo::ignored`; filled with its default.
    Ignored,
    /// Companion flag of the field named `owner`.
    Presence { owner: String },
    /// The `Unmapped` store.
    Unmapped,
}

pub(crate) struct MarshalField<'a> {
    pub ident: &'a Ident,
    /// The identifier without `r#`.
    pub name: String,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
    pub kind: FieldKind,
}

// -----------------------------------------------------------------------------
// MarshalStruct

pub(crate) struct MarshalStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<MarshalField<'a>>,
}

impl<'a> MarshalStruct<'a> {
    pub(crate) fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                _ => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`#[derive(Marshal)]` only supports structs with named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`#[derive(Marshal)]` only supports structs",
                ));
            }
        };

        if let Some(lifetime) = ast.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "marshalable types must be `'static`, lifetime parameters are not supported",
            ));
        }

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            // Named fields always have an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let name = ident.to_string().trim_start_matches("r#").to_owned();

            let kind = if field_attrs.unmapped.is_some() {
                FieldKind::Unmapped
            } else if field_attrs.is_fully_ignored() {
                FieldKind::Ignored
            } else {
                let key = match (&field_attrs.key, attrs.rename_all) {
                    (Some(key), _) => key.value(),
                    (None, Some(rule)) => rule.apply(&name),
                    (None, None) => name.clone(),
                };
                FieldKind::Marshaled { key }
            };

            fields.push(MarshalField {
                ident,
                name,
                ty: &field.ty,
                attrs: field_attrs,
                kind,
            });
        }

        let mut this = Self {
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
        };
        this.resolve_presence()?;
        this.validate()?;
        Ok(this)
    }

    /// Marks the companion fields named by `presence = ident`.
    fn resolve_presence(&mut self) -> syn::Result<()> {
        let mut companions: Vec<(usize, String, Ident)> = Vec::new();

        for field in &self.fields {
            let Some(flag) = &field.attrs.presence else {
                continue;
            };
            let index = self
                .fields
                .iter()
                .position(|f| f.ident == flag)
                .ok_or_else(|| syn::Error::new(flag.span(), format!("no field named `{flag}`")))?;

            if self.fields[index].name == field.name {
                return Err(syn::Error::new(flag.span(), "a field cannot be its own presence flag"));
            }
            if companions.iter().any(|(i, ..)| *i == index) {
                return Err(syn::Error::new(
                    flag.span(),
                    format!("`{flag}` is already the presence flag of another field"),
                ));
            }
            companions.push((index, field.name.clone(), flag.clone()));
        }

        for (index, owner, flag) in companions {
            let companion = &mut self.fields[index];
            if !companion.attrs.is_empty() {
                return Err(syn::Error::new(
                    companion.attrs.span.unwrap_or_else(|| flag.span()),
                    "a presence flag cannot carry `#[marshal]` attributes",
                ));
            }
            companion.kind = FieldKind::Presence { owner };
        }

        Ok(())
    }

    fn validate(&self) -> syn::Result<()> {
        let mut unmapped = self
            .fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::Unmapped));
        if let Some(first) = unmapped.next() {
            if let Some(second) = unmapped.next() {
                return Err(syn::Error::new(
                    second.ident.span(),
                    "only one field can be `#[marshal(unmapped)]`",
                ));
            }
            if let Some(span) = self.attrs.strict {
                return Err(syn::Error::new(
                    span,
                    format!("`strict` conflicts with the unmapped field `{}`", first.name),
                ));
            }
        }

        let mut keys: HashMap<&str, &str> = HashMap::new();
        for field in &self.fields {
            let attrs = &field.attrs;
            let key = match &field.kind {
                FieldKind::Marshaled { key } => key.as_str(),
                // `FieldInfo::ignored` binds the field name.
                FieldKind::Ignored => field.name.as_str(),
                FieldKind::Presence { .. } => continue,
                FieldKind::Unmapped => {
                    if let Some(span) = attrs
                        .key
                        .as_ref()
                        .map(Spanned::span)
                        .or(attrs.ignore)
                        .or(attrs.ignore_on_read)
                        .or(attrs.ignore_on_write)
                        .or(attrs.presence.as_ref().map(Spanned::span))
                    {
                        return Err(syn::Error::new(
                            span,
                            "`unmapped` cannot be combined with other marshal attributes",
                        ));
                    }
                    continue;
                }
            };

            if let Some(first) = keys.insert(key, field.name.as_str()) {
                return Err(syn::Error::new(
                    field.ident.span(),
                    format!("key `{key}` is bound by both `{first}` and `{}`", field.name),
                ));
            }

            if matches!(field.kind, FieldKind::Ignored)
                && let Some(span) = attrs
                    .key
                    .as_ref()
                    .map(Spanned::span)
                    .or(attrs.presence.as_ref().map(Spanned::span))
                    .or(attrs.cast.as_ref().map(|_| field.ident.span()))
            {
                return Err(syn::Error::new(
                    span,
                    "ignored fields cannot have a `key`, `presence` or `cast`",
                ));
            }
        }

        Ok(())
    }

    /// Returns `true` if the struct has type or const parameters.
    #[inline]
    pub(crate) fn is_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}
