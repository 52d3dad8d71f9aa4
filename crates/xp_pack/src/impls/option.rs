use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

impl<T: Typed> Typed for Option<T> {
    const CATEGORY: Category = Category::Optional;
}

impl<T: Decode + Default> Decode for Option<T> {
    /// A null node leaves `None`. Otherwise the value is decoded into fresh
    /// storage, and nothing is kept if that fails.
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool> {
        if de.is_null() {
            *self = None;
            return Ok(false);
        }
        let mut value = T::default();
        match de.decode_value(&mut value, ext) {
            Ok(true) => {
                *self = Some(value);
                Ok(true)
            }
            Ok(false) => {
                *self = None;
                Ok(false)
            }
            Err(err) => {
                *self = None;
                Err(err)
            }
        }
    }
}

impl<T: Encode> Encode for Option<T> {
    /// `None` writes nothing; as a sequence item it becomes a null where the
    /// format has one. The empty-value policy has already been applied
    /// to the option itself, so `Some(0)` is written even with `omitempty`.
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        match self {
            Some(value) => value.encode(en, key, ext),
            None => Ok(false),
        }
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_none()
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        self.as_ref()?.as_key_str()
    }
}

impl<T: Typed + ?Sized> Typed for Box<T> {
    const CATEGORY: Category = T::CATEGORY;
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    #[inline]
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool> {
        (**self).decode(de, ext)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        (**self).encode(en, key, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        (**self).as_key_str()
    }
}

impl<T: Typed + ?Sized> Typed for &T {
    const CATEGORY: Category = T::CATEGORY;
}

impl<T: Encode + ?Sized> Encode for &T {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        (**self).encode(en, key, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        (**self).as_key_str()
    }
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::{Error, from_value, to_value};

    #[test]
    fn null_leaves_none() {
        let v: Option<i32> = from_value(&Value::Null).unwrap();
        assert_eq!(v, None);
        let v: Option<i32> = from_value(&Value::Int(3)).unwrap();
        assert_eq!(v, Some(3));
    }

    #[test]
    fn failure_resets() {
        let mut v = Some(5_i32);
        let err = crate::decode_value(&Value::String("x".into()), &mut v).err();
        assert!(matches!(err, Some(Error::TypeMismatch { .. })));
        assert_eq!(v, None);
    }

    #[test]
    fn none_writes_nothing() {
        assert_eq!(to_value(&None::<i32>).ok(), Some(Value::Null));
        assert_eq!(to_value(&Some(Box::new(0_u8))).ok(), Some(Value::UInt(0)));
    }
}
