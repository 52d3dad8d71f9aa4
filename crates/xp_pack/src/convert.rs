//! Converter strategies.
//!
//! A [`Convert<T>`] implementation replaces the generic handling of `T`. It
//! is selected in three ways:
//!
//! - for every use of a local type, with [`impl_xtype!`](crate::impl_xtype);
//! - for a single field, with `#[xpack(with = Converter)]`;
//! - for a type from another crate, by deriving `XPack` on a mirror struct
//!   with `#[xpack(remote = "path::Type")]` and using [`Via`] or `with`.
//!
//! ```
//! use xp_pack::convert::Convert;
//! use xp_pack::de::{Decoder, Node};
//! use xp_pack::extend::Extend;
//! use xp_pack::ser::{Encoder, Writer};
//! use xp_pack::{derive::XPack, Error, Result};
//!
//! /// Integers written as `0x..` strings.
//! struct Hex;
//!
//! impl Convert<i64> for Hex {
//!     fn decode<N: Node>(value: &mut i64, de: &Decoder<'_, N>, _: &Extend) -> Result<bool> {
//!         let text = de.read_string()?;
//!         let digits = text.trim_start_matches("0x");
//!         *value = i64::from_str_radix(digits, 16).map_err(Error::custom)?;
//!         Ok(true)
//!     }
//!
//!     fn encode<W: Writer>(
//!         value: &i64,
//!         en: &mut Encoder<W>,
//!         key: Option<&str>,
//!         ext: &Extend,
//!     ) -> Result<bool> {
//!         en.write_str(key, &format!("{value:#x}"), ext)
//!     }
//! }
//!
//! #[derive(XPack, Default)]
//! struct Color {
//!     #[xpack(with = Hex)]
//!     rgb: i64,
//! }
//!
//! let value = xp_pack::to_value(&Color { rgb: 14 }).unwrap();
//! assert_eq!(value["rgb"].as_str(), Some("0xe"));
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

/// Decode and encode strategy for `T`.
pub trait Convert<T: ?Sized> {
    const CATEGORY: Category = Category::XType;

    fn decode<N: Node>(value: &mut T, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool>;

    fn encode<W: Writer>(
        value: &T,
        en: &mut Encoder<W>,
        key: Option<&str>,
        ext: &Extend,
    ) -> Result<bool>;

    #[inline]
    fn is_empty(value: &T) -> bool {
        let _ = value;
        false
    }
}

/// A `T` mapped through the converter `C`.
///
/// Lets converted types appear at the top level and inside containers:
/// `Vec<Via<PointDef, Point>>`.
pub struct Via<C, T> {
    pub value: T,
    marker: PhantomData<fn() -> C>,
}

impl<C, T> Via<C, T> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<C, T: Default> Default for Via<C, T> {
    #[inline]
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<C, T: Clone> Clone for Via<C, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<C, T: PartialEq> PartialEq for Via<C, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<C, T: fmt::Debug> fmt::Debug for Via<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Via").field(&self.value).finish()
    }
}

impl<C: Convert<T>, T> Typed for Via<C, T> {
    const CATEGORY: Category = C::CATEGORY;
}

impl<C: Convert<T>, T> Decode for Via<C, T> {
    #[inline]
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool> {
        C::decode(&mut self.value, de, ext)
    }
}

impl<C: Convert<T>, T> Encode for Via<C, T> {
    #[inline]
    fn encode<W: Writer>(
        &self,
        en: &mut Encoder<W>,
        key: Option<&str>,
        ext: &Extend,
    ) -> Result<bool> {
        C::encode(&self.value, en, key, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        C::is_empty(&self.value)
    }
}

/// Route every use of a local type through a converter.
///
/// ```
/// use xp_pack::convert::Convert;
/// use xp_pack::de::{Decoder, Node};
/// use xp_pack::extend::Extend;
/// use xp_pack::ser::{Encoder, Writer};
/// use xp_pack::Result;
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Celsius(f64);
///
/// struct AsNumber;
///
/// impl Convert<Celsius> for AsNumber {
///     fn decode<N: Node>(value: &mut Celsius, de: &Decoder<'_, N>, _: &Extend) -> Result<bool> {
///         value.0 = de.read_f64()?;
///         Ok(true)
///     }
///
///     fn encode<W: Writer>(
///         value: &Celsius,
///         en: &mut Encoder<W>,
///         key: Option<&str>,
///         ext: &Extend,
///     ) -> Result<bool> {
///         en.write_f64(key, value.0, ext)
///     }
/// }
///
/// xp_pack::impl_xtype!(Celsius => AsNumber);
///
/// let value = xp_pack::to_value(&vec![Celsius(21.5)]).unwrap();
/// let back: Vec<Celsius> = xp_pack::from_value(&value).unwrap();
/// assert_eq!(back, [Celsius(21.5)]);
/// ```
#[macro_export]
macro_rules! impl_xtype {
    ($ty:ty => $conv:ty) => {
        impl $crate::Typed for $ty {
            const CATEGORY: $crate::Category = <$conv as $crate::convert::Convert<$ty>>::CATEGORY;
        }

        impl $crate::Decode for $ty {
            #[inline]
            fn decode<N: $crate::de::Node>(
                &mut self,
                de: &$crate::de::Decoder<'_, N>,
                ext: &$crate::extend::Extend,
            ) -> $crate::Result<bool> {
                <$conv as $crate::convert::Convert<$ty>>::decode(self, de, ext)
            }
        }

        impl $crate::Encode for $ty {
            #[inline]
            fn encode<W: $crate::ser::Writer>(
                &self,
                en: &mut $crate::ser::Encoder<W>,
                key: ::core::option::Option<&str>,
                ext: &$crate::extend::Extend,
            ) -> $crate::Result<bool> {
                <$conv as $crate::convert::Convert<$ty>>::encode(self, en, key, ext)
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                <$conv as $crate::convert::Convert<$ty>>::is_empty(self)
            }
        }
    };
}
