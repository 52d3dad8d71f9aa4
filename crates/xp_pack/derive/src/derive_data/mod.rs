//! Provide some tools for parsing the derive input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod xpack_enum;
mod xpack_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use xpack_enum::XPackEnum;
pub(crate) use xpack_struct::{StructField, XPackStruct};

use syn::{Data, DeriveInput, Fields};

/// The parsed input of `#[derive(XPack)]`.
pub(crate) enum XPackDerive<'a> {
    Struct(XPackStruct<'a>),
    Enum(XPackEnum<'a>),
}

impl<'a> XPackDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => {
                    XPackStruct::new(input, attrs, fields.named.iter()).map(Self::Struct)
                }
                _ => Err(syn::Error::new_spanned(
                    &input.ident,
                    "XPack structs need named fields",
                )),
            },
            Data::Enum(data) => {
                if attrs.remote.is_some() {
                    return Err(syn::Error::new_spanned(
                        &input.ident,
                        "`remote` is only supported on structs",
                    ));
                }
                XPackEnum::new(input, data).map(Self::Enum)
            }
            Data::Union(_) => Err(syn::Error::new_spanned(
                &input.ident,
                "XPack cannot be derived for unions",
            )),
        }
    }
}
