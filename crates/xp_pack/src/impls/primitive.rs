use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Typed for $ty {
            const CATEGORY: Category = Category::Number;
        }

        impl Decode for $ty {
            fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
                let value = de.read_i64()?;
                *self = <$ty>::try_from(value).map_err(|_| de.mismatch("integer overflow"))?;
                Ok(true)
            }
        }

        impl Encode for $ty {
            #[inline]
            fn encode<W: Writer>(
                &self,
                en: &mut Encoder<W>,
                key: Option<&str>,
                ext: &Extend,
            ) -> Result<bool> {
                match i64::try_from(*self) {
                    Ok(value) => en.write_i64(key, value, ext),
                    Err(_) => Err(crate::Error::unsupported(W::FORMAT, "integer wider than 64 bits")),
                }
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl Typed for $ty {
            const CATEGORY: Category = Category::Number;
        }

        impl Decode for $ty {
            fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
                let value = de.read_u64()?;
                *self = <$ty>::try_from(value).map_err(|_| de.mismatch("integer overflow"))?;
                Ok(true)
            }
        }

        impl Encode for $ty {
            #[inline]
            fn encode<W: Writer>(
                &self,
                en: &mut Encoder<W>,
                key: Option<&str>,
                ext: &Extend,
            ) -> Result<bool> {
                match u64::try_from(*self) {
                    Ok(value) => en.write_u64(key, value, ext),
                    Err(_) => Err(crate::Error::unsupported(W::FORMAT, "integer wider than 64 bits")),
                }
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl Typed for $ty {
            const CATEGORY: Category = Category::Number;
        }

        impl Decode for $ty {
            #[inline]
            fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
                *self = de.read_f64()? as $ty;
                Ok(true)
            }
        }

        impl Encode for $ty {
            #[inline]
            fn encode<W: Writer>(
                &self,
                en: &mut Encoder<W>,
                key: Option<&str>,
                ext: &Extend,
            ) -> Result<bool> {
                en.write_f64(key, f64::from(*self), ext)
            }

            #[inline]
            fn is_empty_value(&self) -> bool {
                *self == 0.0
            }
        }
    )*};
}

impl_float!(f32, f64);

impl Typed for bool {
    const CATEGORY: Category = Category::Bool;
}

impl Decode for bool {
    #[inline]
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
        *self = de.read_bool()?;
        Ok(true)
    }
}

impl Encode for bool {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        en.write_bool(key, *self, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl Typed for String {
    const CATEGORY: Category = Category::String;
}

impl Decode for String {
    #[inline]
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
        *self = de.read_string()?;
        Ok(true)
    }
}

impl Encode for String {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        en.write_str(key, self, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl Typed for str {
    const CATEGORY: Category = Category::String;
}

impl Encode for str {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        en.write_str(key, self, ext)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::{Error, from_value, to_value};

    #[test]
    fn null_reads_as_zero() {
        assert_eq!(from_value::<i32>(&Value::Null).ok(), Some(0));
        assert_eq!(from_value::<bool>(&Value::Null).ok(), Some(false));
        assert_eq!(from_value::<String>(&Value::Null).ok(), Some(String::new()));
        assert_eq!(from_value::<f64>(&Value::Null).ok(), Some(0.0));
    }

    #[test]
    fn narrowing_is_checked() {
        assert_eq!(from_value::<u8>(&Value::Int(255)).ok(), Some(255));
        let err = from_value::<u8>(&Value::Int(256)).err();
        assert!(matches!(err, Some(Error::TypeMismatch { .. })));
        let err = from_value::<u32>(&Value::Int(-1)).err();
        assert!(matches!(err, Some(Error::TypeMismatch { .. })));
    }

    #[test]
    fn wrong_kind_is_mismatch() {
        let err = from_value::<String>(&Value::Array(vec![])).err();
        assert!(matches!(err, Some(Error::TypeMismatch { .. })));
    }

    #[test]
    fn primitives_encode() {
        assert_eq!(to_value(&-3_i16).ok(), Some(Value::Int(-3)));
        assert_eq!(to_value(&3_u16).ok(), Some(Value::UInt(3)));
        assert_eq!(to_value(&true).ok(), Some(Value::Bool(true)));
        assert_eq!(to_value("hi").ok(), Some(Value::String("hi".into())));
    }
}
