use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use core::hash::{BuildHasher, Hash};
use std::collections::HashMap;

use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

/// A map key: serialized as an object key string.
///
/// Implemented for `String`, every integer width and derived enums.
pub trait MapKey: Sized {
    /// Convert an object key; `None` makes the decoder skip the entry.
    fn from_key(key: &str) -> Option<Self>;

    fn to_key(&self) -> Cow<'_, str>;
}

impl MapKey for String {
    #[inline]
    fn from_key(key: &str) -> Option<Self> {
        Some(key.to_owned())
    }

    #[inline]
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

/// Strict decimal: optional leading `-` when `signed`, no `+`, no leading
/// zeros, no whitespace. Overflow fails.
#[doc(hidden)]
pub fn parse_decimal<T: core::str::FromStr>(key: &str, signed: bool) -> Option<T> {
    let digits = match key.strip_prefix('-') {
        Some(rest) if signed => rest,
        _ => key,
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    key.parse().ok()
}

macro_rules! impl_int_key {
    ($signed:literal: $($ty:ty),*) => {$(
        impl MapKey for $ty {
            #[inline]
            fn from_key(key: &str) -> Option<Self> {
                parse_decimal(key, $signed)
            }

            #[inline]
            fn to_key(&self) -> Cow<'_, str> {
                Cow::Owned(self.to_string())
            }
        }
    )*};
}

impl_int_key!(true: i8, i16, i32, i64, isize);
impl_int_key!(false: u8, u16, u32, u64, usize);

fn decode_entries<N, K, V>(de: &Decoder<'_, N>, mut insert: impl FnMut(K, V)) -> Result<()>
where
    N: Node,
    K: MapKey,
    V: Decode + Default,
{
    de.for_each_entry(|key, child| {
        let Some(k) = K::from_key(key) else {
            log::debug!("skipping map entry with unconvertible key `{key}` at `{}`", de.path());
            return Ok(());
        };
        let mut value = V::default();
        if child.decode_value(&mut value, Extend::DEFAULT)? {
            insert(k, value);
        }
        Ok(())
    })
}

fn encode_entries<'a, W, K, V>(
    en: &mut Encoder<W>,
    key: Option<&str>,
    ext: &Extend,
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> Result<bool>
where
    W: Writer,
    K: MapKey + 'a,
    V: Encode + 'a,
{
    en.encode_object(key, ext, |en| {
        for (k, v) in entries {
            let k = k.to_key();
            en.encode_value(Some(k.as_ref()), v, Extend::DEFAULT)?;
        }
        Ok(())
    })
}

macro_rules! impl_map {
    ([$($gen:tt)*], $ty:ty) => {
        impl<$($gen)*> Typed for $ty {
            const CATEGORY: Category = Category::Map;
        }

        impl<$($gen)*> Decode for $ty
        where
            V: Decode + Default,
        {
            fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
                self.clear();
                decode_entries(de, |k: K, v: V| {
                    self.insert(k, v);
                })?;
                Ok(true)
            }
        }

        impl<$($gen)*> Encode for $ty
        where
            V: Encode,
        {
            #[inline]
            fn encode<W: Writer>(
                &self,
                en: &mut Encoder<W>,
                key: Option<&str>,
                ext: &Extend,
            ) -> Result<bool> {
                encode_entries(en, key, ext, self)
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                self.is_empty()
            }
        }
    };
}

impl_map!([K: MapKey + Ord, V], BTreeMap<K, V>);
impl_map!([K: MapKey + Eq + Hash, V, S: BuildHasher + Default], HashMap<K, V, S>);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;

    use super::{MapKey, parse_decimal};
    use crate::value::Value;
    use crate::{from_value, to_value};

    #[test]
    fn strict_decimal() {
        assert_eq!(parse_decimal::<i32>("12", true), Some(12));
        assert_eq!(parse_decimal::<i32>("-12", true), Some(-12));
        assert_eq!(parse_decimal::<i32>("0", true), Some(0));
        assert_eq!(parse_decimal::<i32>("012", true), None);
        assert_eq!(parse_decimal::<i32>("+1", true), None);
        assert_eq!(parse_decimal::<i32>(" 1", true), None);
        assert_eq!(parse_decimal::<u32>("-1", false), None);
        assert_eq!(parse_decimal::<u8>("256", false), None);
        assert_eq!(parse_decimal::<i32>("", true), None);
        assert_eq!(u16::from_key("65535"), Some(65535));
        assert_eq!(7_i64.to_key(), "7");
    }

    #[test]
    fn bad_keys_are_skipped() {
        let value = Value::Object(vec![
            ("1".into(), Value::Int(10)),
            ("x".into(), Value::Int(20)),
            ("03".into(), Value::Int(30)),
            ("4".into(), Value::Int(40)),
        ]);
        let map: BTreeMap<u32, i32> = from_value(&value).unwrap();
        assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 10), (4, 40)]);
    }

    #[test]
    fn string_keys_keep_order_of_container() {
        let mut map = BTreeMap::new();
        map.insert("b".to_owned(), 2_i32);
        map.insert("a".to_owned(), 1_i32);
        let value = to_value(&map).unwrap();
        assert_eq!(
            value,
            Value::Object(vec![("a".into(), Value::Int(1)), ("b".into(), Value::Int(2))])
        );
    }
}
