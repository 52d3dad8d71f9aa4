#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names `xp_pack` even inside this crate and its doc tests.
extern crate self as xp_pack;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;

pub mod builder;
pub mod classify;
pub mod convert;
pub mod de;
pub mod extend;
pub mod impls;
pub mod info;
pub mod ser;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use xp_pack_derive as derive;

pub use classify::{Category, Typed};
pub use convert::{Convert, Via};
pub use de::Decode;
pub use error::{Error, Result, line_column_offset};
pub use impls::MapKey;
pub use info::Fields;
pub use ser::Encode;
pub use value::Value;

use value::{ValueFormat, ValueNode};

// -----------------------------------------------------------------------------
// Dynamic value

/// Encode `value` into a [`Value`] tree.
#[inline]
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Result<Value> {
    ser::encode_with(&ValueFormat, value)
}

/// Decode a `T` from a [`Value`] tree.
pub fn from_value<T: Decode + Default>(value: &Value) -> Result<T> {
    let mut out = T::default();
    decode_value(value, &mut out)?;
    Ok(out)
}

/// Decode into an existing `T`; fields absent from `value` keep their
/// current contents.
#[inline]
pub fn decode_value<T: Decode + ?Sized>(value: &Value, out: &mut T) -> Result<bool> {
    de::decode_node(ValueNode(value), out)
}
