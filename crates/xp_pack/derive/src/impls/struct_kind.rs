use proc_macro2::TokenStream;
use quote::quote;
use syn::{Generics, WherePredicate, parse_quote};

use crate::derive_data::{StructField, XPackStruct};

/// Generate `Typed`, `Fields`, `Decode` and `Encode` for a struct.
pub(crate) fn impl_struct(data: &XPackStruct) -> TokenStream {
    let xp_pack = &data.xp_pack;
    let typed_ = crate::path::typed_(xp_pack);
    let category_ = crate::path::category_(xp_pack);
    let fields_ = crate::path::fields_(xp_pack);
    let decode_ = crate::path::decode_(xp_pack);
    let decoder_ = crate::path::decoder_(xp_pack);
    let node_ = crate::path::node_(xp_pack);
    let encode_ = crate::path::encode_(xp_pack);
    let encoder_ = crate::path::encoder_(xp_pack);
    let writer_ = crate::path::writer_(xp_pack);
    let extend_ = crate::path::extend_(xp_pack);
    let struct_info_ = crate::path::struct_info_(xp_pack);
    let result_ = crate::path::result_(xp_pack);

    let generics = bounded_generics(data);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = data.ident();

    let info_tokens = data.to_info_tokens();
    let info_cell_tokens = if data.is_generic() {
        let info_cell = crate::path::generic_struct_info_cell_(xp_pack);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        let info_cell = crate::path::struct_info_cell_(xp_pack);
        quote! {
            static CELL: #info_cell = #info_cell::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    let decode_body = decode_fields_body(data, quote!(self));
    let encode_body = encode_fields_body(data, quote!(self));

    quote! {
        const _: () = {
            impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
                const CATEGORY: #category_ = #category_::Struct;
            }

            impl #impl_generics #fields_ for #ident #ty_generics #where_clause {
                fn struct_info() -> &'static #struct_info_ {
                    #info_cell_tokens
                }

                fn decode_fields<__N: #node_>(
                    &mut self,
                    de: &#decoder_<'_, __N>,
                ) -> #result_<bool> {
                    #decode_body
                }

                fn encode_fields<__W: #writer_>(
                    &self,
                    en: &mut #encoder_<__W>,
                ) -> #result_<()> {
                    #encode_body
                }
            }

            impl #impl_generics #decode_ for #ident #ty_generics #where_clause {
                fn decode<__N: #node_>(
                    &mut self,
                    de: &#decoder_<'_, __N>,
                    _ext: &#extend_,
                ) -> #result_<bool> {
                    if de.is_null() {
                        return ::core::result::Result::Ok(false);
                    }
                    <Self as #fields_>::decode_fields(self, de)?;
                    ::core::result::Result::Ok(true)
                }
            }

            impl #impl_generics #encode_ for #ident #ty_generics #where_clause {
                fn encode<__W: #writer_>(
                    &self,
                    en: &mut #encoder_<__W>,
                    key: ::core::option::Option<&str>,
                    ext: &#extend_,
                ) -> #result_<bool> {
                    en.encode_object(key, ext, |en| <Self as #fields_>::encode_fields(self, en))
                }
            }
        };
    }
}

/// The struct generics plus the bounds the generated impls need on each
/// field type. Non-generic structs are left untouched.
fn bounded_generics(data: &XPackStruct) -> Generics {
    let mut generics = data.input.generics.clone();
    if !data.is_generic() {
        return generics;
    }

    let xp_pack = &data.xp_pack;
    let decode_ = crate::path::decode_(xp_pack);
    let encode_ = crate::path::encode_(xp_pack);
    let fields_ = crate::path::fields_(xp_pack);
    let convert_ = crate::path::convert_(xp_pack);

    let params: Vec<_> = generics.type_params().map(|param| param.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for param in params {
        where_clause.predicates.push(parse_quote!(#param: 'static));
    }
    for field in &data.fields {
        let ty = field.ty();
        let predicate: WherePredicate = match (&field.attrs.with, field.is_inherit()) {
            (_, true) => parse_quote!(#ty: #fields_),
            (Some(conv), false) => parse_quote!(#conv: #convert_<#ty>),
            (None, false) => parse_quote!(#ty: #decode_ + #encode_),
        };
        where_clause.predicates.push(predicate);
    }
    generics
}

fn field_index(field: &StructField) -> usize {
    field.index.unwrap_or_default()
}

/// Body of `decode_fields`, reading through `target` (`self` or a remote value).
pub(crate) fn decode_fields_body(data: &XPackStruct, target: TokenStream) -> TokenStream {
    let fields_ = crate::path::fields_(&data.xp_pack);
    let table = struct_info_call(data);

    let bases = data.inherit_fields().map(|field| {
        let ident = field.ident;
        let ty = field.ty();
        quote! {
            set |= <#ty as #fields_>::decode_fields(&mut #target.#ident, de)?;
        }
    });
    let own = data.own_fields().map(|field| {
        let ident = field.ident;
        let index = field_index(field);
        match &field.attrs.with {
            Some(conv) => quote! {
                set |= de.decode_field_with::<#conv, _>(&mut #target.#ident, &fields[#index])?;
            },
            None => quote! {
                set |= de.decode_field(&mut #target.#ident, &fields[#index])?;
            },
        }
    });

    if data.fields.is_empty() {
        return quote! {
            let _ = de;
            ::core::result::Result::Ok(false)
        };
    }
    let fields = (data.own_fields().count() > 0).then(|| quote!(let fields = #table.fields();));
    quote! {
        #fields
        let mut set = false;
        #(#bases)*
        #(#own)*
        ::core::result::Result::Ok(set)
    }
}

/// Body of `encode_fields`, reading through `source` (`self` or a remote value).
pub(crate) fn encode_fields_body(data: &XPackStruct, source: TokenStream) -> TokenStream {
    let fields_ = crate::path::fields_(&data.xp_pack);
    let table = struct_info_call(data);

    let bases = data.inherit_fields().map(|field| {
        let ident = field.ident;
        let ty = field.ty();
        quote! {
            <#ty as #fields_>::encode_fields(&#source.#ident, en)?;
        }
    });
    let own = data.own_fields().map(|field| {
        let ident = field.ident;
        let index = field_index(field);
        match &field.attrs.with {
            Some(conv) => quote! {
                en.encode_field_with::<#conv, _>(&#source.#ident, &fields[#index])?;
            },
            None => quote! {
                en.encode_field(&#source.#ident, &fields[#index])?;
            },
        }
    });

    if data.fields.is_empty() {
        return quote! {
            let _ = en;
            ::core::result::Result::Ok(())
        };
    }
    let fields = (data.own_fields().count() > 0).then(|| quote!(let fields = #table.fields();));
    quote! {
        #fields
        #(#bases)*
        #(#own)*
        ::core::result::Result::Ok(())
    }
}

/// Expression yielding the `&'static StructInfo` of the derive target.
fn struct_info_call(data: &XPackStruct) -> TokenStream {
    let ident = data.ident();
    if data.remote.is_some() {
        quote!(#ident::__struct_info())
    } else {
        let fields_ = crate::path::fields_(&data.xp_pack);
        quote!(<Self as #fields_>::struct_info())
    }
}
