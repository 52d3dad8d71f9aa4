use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Writer};

impl<T: Typed, const N: usize> Typed for [T; N] {
    const CATEGORY: Category = Category::Array;
}

impl<T: Decode, const N: usize> Decode for [T; N] {
    /// Decodes `min(size, N)` items in place; extra source items are ignored.
    fn decode<D: Node>(&mut self, de: &Decoder<'_, D>, _ext: &Extend) -> Result<bool> {
        let size = de.size()?;
        if size > N {
            log::debug!("truncating {size} items to {N} at `{}`", de.path());
        }
        for (index, slot) in self.iter_mut().enumerate().take(size) {
            de.at(index)?.decode_value(slot, Extend::DEFAULT)?;
        }
        Ok(true)
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    #[inline]
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        en.encode_items(key, ext, self)
    }

    #[inline]
    fn is_empty_value(&self) -> bool {
        N == 0
    }
}
