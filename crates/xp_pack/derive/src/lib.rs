//! See the [`XPack`] derive macro.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static XPACK_ATTRIBUTE_NAME: &str = "xpack";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Field Mapping Derivation
///
/// `#[derive(XPack)]` on a struct with named fields implements `Typed`,
/// `Fields`, `Decode` and `Encode`. Every field must itself be mappable.
///
/// ```rust, ignore
/// #[derive(XPack, Default)]
/// struct User {
///     id: i64,
///     #[xpack(alias = "mail xml:email", omitempty)]
///     mail: String,
/// }
/// ```
///
/// On a field-less enum it maps each variant to its integer value and also
/// implements `MapKey`, so the enum can key a map.
///
/// ## Field attributes
///
/// - `alias = "default fmt:name,flag,key@value"`: per-format names and
///   flags, see `xp_pack::extend::Alias`.
/// - `omitempty`: skip the field on encode when it is empty.
/// - `mandatory`: fail decoding when the key is missing.
/// - `empty_null`: write an explicit null for empty values.
/// - `attr`: XML attribute.
/// - `single_line`: keep an array on one line in pretty JSON.
/// - `xml_content`: XML text content of the enclosing element.
/// - `flag = expr`: raw `u32` slot read by custom converters.
/// - `with = Converter`: map the field through `Convert<FieldType>`.
/// - `inherit`: flatten the fields of a base struct into this one.
/// - `skip`: leave the field out entirely.
///
/// ## Remote types
///
/// A struct from another crate is mapped by mirroring its fields:
///
/// ```rust, ignore
/// #[derive(XPack)]
/// #[xpack(remote = "geo::Point")]
/// struct PointDef {
///     x: f64,
///     y: f64,
/// }
///
/// #[derive(XPack, Default)]
/// struct Shape {
///     #[xpack(with = PointDef)]
///     origin: geo::Point,
/// }
/// ```
///
/// The mirror implements `Convert<geo::Point>`; use it with `with` on a field
/// or through `Via<PointDef, geo::Point>`.
#[proc_macro_derive(XPack, attributes(xpack))]
pub fn derive_xpack(input: TokenStream) -> TokenStream {
    use crate::derive_data::XPackDerive;

    let ast: DeriveInput = parse_macro_input!(input as DeriveInput);

    let derive = match XPackDerive::from_input(&ast) {
        Ok(v) => v,
        Err(err) => return err.into_compile_error().into(),
    };

    let tokens = match &derive {
        XPackDerive::Struct(data) if data.remote.is_some() => impls::impl_remote(data),
        XPackDerive::Struct(data) => Ok(impls::impl_struct(data)),
        XPackDerive::Enum(data) => impls::impl_enum(data),
    };

    match tokens {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
