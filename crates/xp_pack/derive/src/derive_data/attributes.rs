//! Parsing of `#[xpack(...)]` attributes.

use proc_macro2::Span;
use syn::{Attribute, Expr, LitStr, Path, Type};

use crate::XPACK_ATTRIBUTE_NAME;

/// Flags that map to `xp_pack::extend::Flags` constants.
const FLAG_NAMES: [(&str, &str); 6] = [
    ("omitempty", "OMIT_EMPTY"),
    ("mandatory", "MANDATORY"),
    ("empty_null", "EMPTY_NULL"),
    ("attr", "ATTR"),
    ("single_line", "SINGLE_LINE"),
    ("xml_content", "XML_CONTENT"),
];

// -----------------------------------------------------------------------------
// Type attributes

/// Container level attributes.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `#[xpack(remote = "path::Type")]`: the annotated struct mirrors the
    /// fields of another type.
    pub remote: Option<Type>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(XPACK_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("remote") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.remote = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown xpack container attribute, expected `remote`"))
                }
            })?;
        }
        Ok(out)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// Field level attributes.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    /// `alias = "..."`, kept as the literal and parsed at runtime.
    pub alias: Option<LitStr>,
    /// Names of the `Flags` constants to set.
    pub flags: Vec<&'static str>,
    /// `flag = <u32 expr>`: the raw custom slot.
    pub custom: Option<Expr>,
    /// `with = Converter`.
    pub with: Option<Path>,
    pub inherit: Option<Span>,
    pub skip: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if !attr.path().is_ident(XPACK_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                let path = &meta.path;
                if path.is_ident("alias") {
                    out.alias = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if path.is_ident("flag") {
                    out.custom = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if path.is_ident("with") {
                    out.with = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if path.is_ident("inherit") {
                    out.inherit = Some(Span::call_site());
                    return Ok(());
                }
                if path.is_ident("skip") {
                    out.skip = Some(Span::call_site());
                    return Ok(());
                }
                for (name, flag) in FLAG_NAMES {
                    if path.is_ident(name) {
                        if !out.flags.contains(&flag) {
                            out.flags.push(flag);
                        }
                        return Ok(());
                    }
                }
                Err(meta.error("unknown xpack field attribute"))
            })?;
        }
        out.validate(attrs)?;
        Ok(out)
    }

    fn validate(&self, attrs: &[Attribute]) -> syn::Result<()> {
        let Some(attr) = attrs
            .iter()
            .find(|attr| attr.path().is_ident(XPACK_ATTRIBUTE_NAME))
        else {
            return Ok(());
        };
        if self.inherit.is_some()
            && (self.with.is_some() || self.alias.is_some() || !self.flags.is_empty())
        {
            return Err(syn::Error::new_spanned(
                attr,
                "`inherit` takes no other options",
            ));
        }
        if self.skip.is_some() && self.inherit.is_some() {
            return Err(syn::Error::new_spanned(attr, "`skip` conflicts with `inherit`"));
        }
        Ok(())
    }
}
