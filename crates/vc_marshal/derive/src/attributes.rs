//! Parsing of `#[marshal(...)]` attributes.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Ident, LitStr, Path};

use crate::MARSHAL_ATTRIBUTE_NAME;
use crate::rename::RenameRule;

fn set_once<T>(slot: &mut Option<T>, value: T, meta: &ParseNestedMeta) -> syn::Result<()> {
    if slot.is_some() {
        let name = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(meta.error(format!("duplicate `{name}` attribute")));
    }
    *slot = Some(value);
    Ok(())
}

fn marshal_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(MARSHAL_ATTRIBUTE_NAME))
}

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes on the struct itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub strict: Option<Span>,
    pub rename_all: Option<RenameRule>,
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in marshal_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("strict") {
                    set_once(&mut this.strict, meta.path.span(), &meta)
                } else if meta.path.is_ident("auto_register") {
                    set_once(&mut this.auto_register, meta.path.span(), &meta)
                } else if meta.path.is_ident("rename_all") {
                    let lit: LitStr = meta.value()?.parse()?;
                    let rule = RenameRule::parse(&lit.value()).ok_or_else(|| {
                        syn::Error::new(
                            lit.span(),
                            format!("unknown rename rule, expected one of {}", RenameRule::NAMES),
                        )
                    })?;
                    set_once(&mut this.rename_all, rule, &meta)
                } else {
                    Err(meta.error("unsupported marshal attribute, expected `strict`, `rename_all` or `auto_register`"))
                }
            })?;
        }

        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

pub(crate) enum DefaultAttr {
    /// `default`
    Trait,
    /// `default = path`
    Path(Path),
}

pub(crate) enum CastAttr {
    /// `cast = "name"`
    Named(LitStr),
    /// `cast = path`
    Func(Path),
}

/// Attributes on one field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub key: Option<LitStr>,
    pub default: Option<DefaultAttr>,
    pub presence: Option<Ident>,
    pub cast: Option<CastAttr>,
    pub ignore: Option<Span>,
    pub ignore_on_read: Option<Span>,
    pub ignore_on_write: Option<Span>,
    pub unmapped: Option<Span>,
    /// Span of the first `#[marshal]` attribute, for error reporting.
    pub span: Option<Span>,
}

impl FieldAttributes {
    pub(crate) fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in marshal_attrs(attrs) {
            this.span.get_or_insert(attr.span());
            attr.parse_nested_meta(|meta| {
                let path = &meta.path;
                if path.is_ident("key") {
                    let lit: LitStr = meta.value()?.parse()?;
                    set_once(&mut this.key, lit, &meta)
                } else if path.is_ident("default") {
                    let value = if meta.input.peek(syn::Token![=]) {
                        DefaultAttr::Path(meta.value()?.parse()?)
                    } else {
                        DefaultAttr::Trait
                    };
                    set_once(&mut this.default, value, &meta)
                } else if path.is_ident("presence") {
                    let ident: Ident = meta.value()?.parse()?;
                    set_once(&mut this.presence, ident, &meta)
                } else if path.is_ident("cast") {
                    let input = meta.value()?;
                    let value = if input.peek(LitStr) {
                        CastAttr::Named(input.parse()?)
                    } else {
                        CastAttr::Func(input.parse()?)
                    };
                    set_once(&mut this.cast, value, &meta)
                } else if path.is_ident("ignore") {
                    set_once(&mut this.ignore, path.span(), &meta)
                } else if path.is_ident("ignore_on_read") {
                    set_once(&mut this.ignore_on_read, path.span(), &meta)
                } else if path.is_ident("ignore_on_write") {
                    set_once(&mut this.ignore_on_write, path.span(), &meta)
                } else if path.is_ident("unmapped") {
                    set_once(&mut this.unmapped, path.span(), &meta)
                } else {
                    Err(meta.error("unsupported marshal field attribute"))
                }
            })?;
        }

        Ok(this)
    }

    /// Returns `true` if no `#[marshal]` attribute was given.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    /// `ignore`, or both one-sided flags.
    #[inline]
    pub(crate) fn is_fully_ignored(&self) -> bool {
        self.ignore.is_some() || (self.ignore_on_read.is_some() && self.ignore_on_write.is_some())
    }
}
