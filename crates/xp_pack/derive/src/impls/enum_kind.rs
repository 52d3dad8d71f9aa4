use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::XPackEnum;

/// Generate `Typed`, `Decode`, `Encode` and `MapKey` for a field-less enum.
pub(crate) fn impl_enum(data: &XPackEnum) -> syn::Result<TokenStream> {
    let ident = data.ident();
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            ident,
            "XPack enums need at least one variant",
        ));
    }

    let xp_pack = &data.xp_pack;
    let typed_ = crate::path::typed_(xp_pack);
    let category_ = crate::path::category_(xp_pack);
    let decode_ = crate::path::decode_(xp_pack);
    let decoder_ = crate::path::decoder_(xp_pack);
    let node_ = crate::path::node_(xp_pack);
    let encode_ = crate::path::encode_(xp_pack);
    let encoder_ = crate::path::encoder_(xp_pack);
    let writer_ = crate::path::writer_(xp_pack);
    let extend_ = crate::path::extend_(xp_pack);
    let map_key_ = crate::path::map_key_(xp_pack);
    let parse_decimal_ = crate::path::parse_decimal_(xp_pack);
    let result_ = crate::path::result_(xp_pack);

    let name = ident.to_string();
    let variants = &data.variants;

    Ok(quote! {
        const _: () = {
            #[inline]
            fn discriminant(value: &#ident) -> i64 {
                match value {
                    #( #ident::#variants => #ident::#variants as i64, )*
                }
            }

            #[inline]
            fn from_discriminant(value: i64) -> ::core::option::Option<#ident> {
                match value {
                    #( x if x == #ident::#variants as i64 => ::core::option::Option::Some(#ident::#variants), )*
                    _ => ::core::option::Option::None,
                }
            }

            impl #typed_ for #ident {
                const CATEGORY: #category_ = #category_::Enum;
            }

            impl #decode_ for #ident {
                fn decode<__N: #node_>(
                    &mut self,
                    de: &#decoder_<'_, __N>,
                    _ext: &#extend_,
                ) -> #result_<bool> {
                    if de.is_null() {
                        return ::core::result::Result::Ok(false);
                    }
                    let value = de.read_i64()?;
                    match from_discriminant(value) {
                        ::core::option::Option::Some(variant) => {
                            *self = variant;
                            ::core::result::Result::Ok(true)
                        }
                        ::core::option::Option::None => ::core::result::Result::Err(
                            de.mismatch(::std::format!("invalid value {} for enum {}", value, #name)),
                        ),
                    }
                }
            }

            impl #encode_ for #ident {
                #[inline]
                fn encode<__W: #writer_>(
                    &self,
                    en: &mut #encoder_<__W>,
                    key: ::core::option::Option<&str>,
                    ext: &#extend_,
                ) -> #result_<bool> {
                    en.write_i64(key, discriminant(self), ext)
                }

                #[inline]
                fn is_empty_value(&self) -> bool {
                    discriminant(self) == 0
                }
            }

            impl #map_key_ for #ident {
                fn from_key(key: &str) -> ::core::option::Option<Self> {
                    from_discriminant(#parse_decimal_::<i64>(key, true)?)
                }

                fn to_key(&self) -> ::std::borrow::Cow<'_, str> {
                    ::std::borrow::Cow::Owned(::std::string::ToString::to_string(&discriminant(self)))
                }
            }
        };
    })
}
