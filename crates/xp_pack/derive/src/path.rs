//! Paths into `xp_pack` used by the generated code.
//!
//! Kept in one place so that moving an item inside `xp_pack` only touches
//! this file.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the access path to the `xp_pack` crate as seen by the caller.
///
/// 1. For crates that depend on `xp_pack`, `::xp_pack` is returned.
/// 2. For crates that depend on the `xpack` facade, `::xpack::pack` is returned.
/// 3. Otherwise `::xp_pack` is returned, which may be incorrect.
///
/// This reads the caller's manifest, so the path is computed once per
/// derive and passed around.
pub(crate) fn xp_pack() -> syn::Path {
    xp_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("xp_pack"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn result_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::Result)
}

#[inline(always)]
pub(crate) fn category_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::classify::Category)
}

#[inline(always)]
pub(crate) fn typed_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::classify::Typed)
}

#[inline(always)]
pub(crate) fn decode_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::de::Decode)
}

#[inline(always)]
pub(crate) fn decoder_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::de::Decoder)
}

#[inline(always)]
pub(crate) fn node_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::de::Node)
}

#[inline(always)]
pub(crate) fn encode_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::ser::Encode)
}

#[inline(always)]
pub(crate) fn encoder_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::ser::Encoder)
}

#[inline(always)]
pub(crate) fn writer_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::ser::Writer)
}

#[inline(always)]
pub(crate) fn extend_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::extend::Extend)
}

#[inline(always)]
pub(crate) fn flags_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::extend::Flags)
}

#[inline(always)]
pub(crate) fn alias_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::extend::Alias)
}

#[inline(always)]
pub(crate) fn convert_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::convert::Convert)
}

#[inline(always)]
pub(crate) fn fields_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::info::Fields)
}

#[inline(always)]
pub(crate) fn field_info_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::info::FieldInfo)
}

#[inline(always)]
pub(crate) fn struct_info_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::info::StructInfo)
}

#[inline(always)]
pub(crate) fn struct_info_cell_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::info::StructInfoCell)
}

#[inline(always)]
pub(crate) fn generic_struct_info_cell_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::info::GenericStructInfoCell)
}

#[inline(always)]
pub(crate) fn map_key_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::impls::MapKey)
}

#[inline(always)]
pub(crate) fn parse_decimal_(xp_pack: &syn::Path) -> TokenStream {
    quote!(#xp_pack::impls::parse_decimal)
}
