use syn::{DataEnum, DeriveInput, Fields, Ident};

// -----------------------------------------------------------------------------
// Define

/// A field-less enum, mapped through its integer discriminant.
pub(crate) struct XPackEnum<'a> {
    pub input: &'a DeriveInput,
    pub xp_pack: syn::Path,
    pub variants: Vec<&'a Ident>,
}

impl<'a> XPackEnum<'a> {
    pub fn new(input: &'a DeriveInput, data: &'a DataEnum) -> syn::Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "XPack enums cannot be generic",
            ));
        }
        let mut variants = Vec::with_capacity(data.variants.len());
        for variant in &data.variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    variant,
                    "XPack enums must be field-less",
                ));
            }
            variants.push(&variant.ident);
        }
        Ok(Self {
            input,
            xp_pack: crate::path::xp_pack(),
            variants,
        })
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.input.ident
    }
}
