use proc_macro2::TokenStream;
use quote::quote;

use super::struct_kind::{decode_fields_body, encode_fields_body};
use crate::derive_data::XPackStruct;

/// Generate `Convert<Remote>` for a mirror struct.
///
/// The mirror itself is never encoded; it only carries the field list. Its
/// descriptor table is reachable through a hidden inherent function.
pub(crate) fn impl_remote(data: &XPackStruct) -> syn::Result<TokenStream> {
    let Some(remote) = &data.remote else {
        return Ok(TokenStream::new());
    };
    if !data.input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &data.input.generics,
            "`remote` mirrors cannot be generic",
        ));
    }

    let xp_pack = &data.xp_pack;
    let convert_ = crate::path::convert_(xp_pack);
    let category_ = crate::path::category_(xp_pack);
    let decoder_ = crate::path::decoder_(xp_pack);
    let node_ = crate::path::node_(xp_pack);
    let encoder_ = crate::path::encoder_(xp_pack);
    let writer_ = crate::path::writer_(xp_pack);
    let extend_ = crate::path::extend_(xp_pack);
    let struct_info_ = crate::path::struct_info_(xp_pack);
    let info_cell = crate::path::struct_info_cell_(xp_pack);
    let result_ = crate::path::result_(xp_pack);

    let ident = data.ident();
    let info_tokens = data.to_info_tokens();
    let decode_body = decode_fields_body(data, quote!(value));
    let encode_body = encode_fields_body(data, quote!(value));

    Ok(quote! {
        const _: () = {
            impl #ident {
                #[doc(hidden)]
                pub fn __struct_info() -> &'static #struct_info_ {
                    static CELL: #info_cell = #info_cell::new();
                    CELL.get_or_init(|| #info_tokens)
                }
            }

            impl #convert_<#remote> for #ident {
                const CATEGORY: #category_ = #category_::External;

                fn decode<__N: #node_>(
                    value: &mut #remote,
                    de: &#decoder_<'_, __N>,
                    _ext: &#extend_,
                ) -> #result_<bool> {
                    if de.is_null() {
                        return ::core::result::Result::Ok(false);
                    }
                    let _set: bool = { #decode_body }?;
                    ::core::result::Result::Ok(true)
                }

                fn encode<__W: #writer_>(
                    value: &#remote,
                    en: &mut #encoder_<__W>,
                    key: ::core::option::Option<&str>,
                    ext: &#extend_,
                ) -> #result_<bool> {
                    en.encode_object(key, ext, |en| { #encode_body })
                }
            }
        };
    })
}
