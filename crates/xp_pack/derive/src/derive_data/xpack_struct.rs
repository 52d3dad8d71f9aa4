use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Field, Ident, Type};

use super::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// Define

pub(crate) struct XPackStruct<'a> {
    pub input: &'a DeriveInput,
    pub xp_pack: syn::Path,
    pub remote: Option<Type>,
    /// Every non-skipped field, in declaration order.
    pub fields: Vec<StructField<'a>>,
}

pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub ident: &'a Ident,
    pub attrs: FieldAttributes,
    /// Index into the descriptor table; `None` for inherited bases.
    pub index: Option<usize>,
}

// -----------------------------------------------------------------------------
// StructField

impl StructField<'_> {
    #[inline]
    pub fn ty(&self) -> &Type {
        &self.data.ty
    }

    /// The declared name, without a raw identifier prefix.
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_owned(),
            None => name,
        }
    }

    #[inline]
    pub fn is_inherit(&self) -> bool {
        self.attrs.inherit.is_some()
    }

    /// `FieldInfo` construction for this field.
    ///
    /// ```ignore
    /// FieldInfo::new::<Ty>("name", Extend::new(Flags::A | Flags::B).with_custom(..).with_alias(..))
    /// ```
    pub fn to_info_tokens(&self, xp_pack: &syn::Path) -> TokenStream {
        let field_info_ = crate::path::field_info_(xp_pack);
        let extend_ = crate::path::extend_(xp_pack);
        let flags_ = crate::path::flags_(xp_pack);
        let alias_ = crate::path::alias_(xp_pack);

        let name = self.name();
        let flags = self
            .attrs
            .flags
            .iter()
            .map(|flag| Ident::new(flag, proc_macro2::Span::call_site()));
        let with_custom = self
            .attrs
            .custom
            .as_ref()
            .map(|custom| quote!(.with_custom(#custom)));
        let with_alias = self
            .attrs
            .alias
            .as_ref()
            .map(|alias| quote!(.with_alias(#alias_::parse(#alias))));
        let extend = quote! {
            #extend_::new(#flags_::empty() #(| #flags_::#flags)*)
                #with_custom
                #with_alias
        };

        let ty = self.ty();
        match &self.attrs.with {
            Some(conv) => {
                let convert_ = crate::path::convert_(xp_pack);
                quote! {
                    #field_info_::with_category(
                        #name,
                        <#conv as #convert_<#ty>>::CATEGORY,
                        #extend,
                    )
                }
            }
            None => quote! {
                #field_info_::new::<#ty>(#name, #extend)
            },
        }
    }
}

// -----------------------------------------------------------------------------
// XPackStruct

impl<'a> XPackStruct<'a> {
    pub fn new(
        input: &'a DeriveInput,
        attrs: TypeAttributes,
        fields: impl Iterator<Item = &'a Field>,
    ) -> syn::Result<Self> {
        let mut out = Vec::new();
        let mut index = 0;
        for data in fields {
            let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
            if attrs.skip.is_some() {
                continue;
            }
            let Some(ident) = &data.ident else {
                return Err(syn::Error::new_spanned(data, "XPack structs need named fields"));
            };
            let field_index = if attrs.inherit.is_some() {
                None
            } else {
                index += 1;
                Some(index - 1)
            };
            out.push(StructField {
                data,
                ident,
                attrs,
                index: field_index,
            });
        }

        let this = Self {
            input,
            xp_pack: crate::path::xp_pack(),
            remote: attrs.remote,
            fields: out,
        };
        if this.remote.is_some() && this.fields.iter().any(StructField::is_inherit) {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "`inherit` is not supported with `remote`",
            ));
        }
        Ok(this)
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        &self.input.ident
    }

    /// Fields stored in the descriptor table.
    pub fn own_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| !field.is_inherit())
    }

    /// Fields flattened from a base struct.
    pub fn inherit_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.is_inherit())
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        self.input.generics.type_params().next().is_some()
    }

    /// `StructInfo` construction, bases first.
    pub fn to_info_tokens(&self) -> TokenStream {
        let xp_pack = &self.xp_pack;
        let struct_info_ = crate::path::struct_info_(xp_pack);
        let fields_ = crate::path::fields_(xp_pack);

        let name = self.ident().to_string();
        let fields = self.own_fields().map(|field| field.to_info_tokens(xp_pack));
        let bases = self.inherit_fields().map(|field| {
            let ty = field.ty();
            quote!(.with_base(<#ty as #fields_>::struct_info()))
        });

        quote! {
            #struct_info_::new(#name, ::std::vec![#(#fields),*])
                #(#bases)*
        }
    }
}
