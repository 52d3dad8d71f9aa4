use alloc::collections::{BTreeSet, LinkedList, VecDeque};
use core::hash::{BuildHasher, Hash};
use std::collections::HashSet;

use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

/// Decode every item of the array under `de` into fresh values.
fn decode_items<N, T>(de: &Decoder<'_, N>, mut push: impl FnMut(T)) -> Result<()>
where
    N: Node,
    T: Decode + Default,
{
    let size = de.size()?;
    for index in 0..size {
        let mut item = T::default();
        de.at(index)?.decode_value(&mut item, Extend::DEFAULT)?;
        push(item);
    }
    Ok(())
}

macro_rules! impl_list {
    ($category:ident, [$($gen:tt)*], $ty:ty, $push:ident) => {
        impl<$($gen)*> Typed for $ty
        where
            T: Typed,
        {
            const CATEGORY: Category = Category::$category;
        }

        impl<$($gen)*> Decode for $ty
        where
            T: Decode + Default,
        {
            fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
                self.clear();
                decode_items(de, |item: T| {
                    self.$push(item);
                })?;
                Ok(true)
            }
        }

        impl<$($gen)*> Encode for $ty
        where
            T: Encode,
        {
            #[inline]
            fn encode<W: Writer>(
                &self,
                en: &mut Encoder<W>,
                key: Option<&str>,
                ext: &Extend,
            ) -> Result<bool> {
                en.encode_items(key, ext, self)
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                self.is_empty()
            }
        }
    };
}

impl_list!(Sequence, [T], Vec<T>, push);
impl_list!(Sequence, [T], VecDeque<T>, push_back);
impl_list!(Sequence, [T], LinkedList<T>, push_back);
impl_list!(Set, [T: Ord], BTreeSet<T>, insert);
impl_list!(Set, [T: Eq + Hash, S: BuildHasher + Default], HashSet<T, S>, insert);

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use std::collections::HashSet;

    use crate::value::Value;
    use crate::{Error, from_value, to_value};

    #[test]
    fn vec_round_trip() {
        let value = to_value(&vec![1_u8, 2, 3]).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::UInt(1), Value::UInt(2), Value::UInt(3)])
        );
        let back: Vec<u8> = from_value(&value).unwrap();
        assert_eq!(back, [1, 2, 3]);
    }

    #[test]
    fn none_items_keep_their_place() {
        let items = vec![Some(1_i32), None, Some(3)];
        let value = to_value(&items).unwrap();
        let Value::Array(values) = &value else {
            panic!("expected array, got {value:?}");
        };
        assert_eq!(values.len(), 3);
        assert_eq!(values[1], Value::Null);
        let back: Vec<Option<i32>> = from_value(&value).unwrap();
        assert_eq!(back, items);
    }

    #[test]
    fn sets_dedupe() {
        let value = Value::Array(vec![Value::Int(2), Value::Int(1), Value::Int(2)]);
        let set: BTreeSet<i32> = from_value(&value).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 2]);
        let set: HashSet<i32> = from_value(&value).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn null_is_empty_and_object_is_not_array() {
        let v: Vec<i32> = from_value(&Value::Null).unwrap();
        assert!(v.is_empty());
        let err = from_value::<Vec<i32>>(&Value::Object(vec![])).err();
        assert!(matches!(err, Some(Error::TypeMismatch { .. })));
    }

    #[test]
    fn item_error_has_index_path() {
        let value = Value::Array(vec![Value::Int(1), Value::String("x".into())]);
        let err = from_value::<Vec<i32>>(&value).err();
        assert_eq!(err.as_ref().and_then(|e| e.path()), Some("[1]"));
    }
}
