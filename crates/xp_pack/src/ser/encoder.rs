use core::any::Any;
use core::fmt::Write as _;

use crate::convert::Convert;
use crate::extend::Extend;
use crate::info::FieldInfo;
use crate::ser::{Encode, Writer};
use crate::{Error, Result};

enum Segment {
    Key(String),
    Index(usize),
}

/// Drives [`Encode`] implementations into a [`Writer`].
///
/// Before a value opens any scope, the encoder checks whether it is empty:
/// [`OMIT_EMPTY`](crate::extend::Flags::OMIT_EMPTY) skips it, and
/// [`EMPTY_NULL`](crate::extend::Flags::EMPTY_NULL) writes a null when the
/// writer supports one (otherwise the value is skipped).
pub struct Encoder<W> {
    writer: W,
    path: Vec<Segment>,
}

impl<W: Writer> Encoder<W> {
    #[inline]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            path: Vec::new(),
        }
    }

    #[inline]
    pub fn writer(&mut self) -> &mut W {
        &mut self.writer
    }

    #[inline]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Path of the value being written, for error messages.
    pub fn path(&self) -> String {
        let mut out = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    #[inline]
    fn error(&self, err: Error) -> Error {
        err.with_path(|| self.path())
    }

    fn scoped<R>(
        &mut self,
        segment: Option<Segment>,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let pushed = segment.is_some();
        if let Some(segment) = segment {
            self.path.push(segment);
        }
        let result = f(self).map_err(|e| self.error(e));
        if pushed {
            self.path.pop();
        }
        result
    }

    // -------------------------------------------------------------------------
    // Dispatch

    /// Write `value` under `key`, applying the empty-value policy of `ext`.
    pub fn encode_value<T: Encode + ?Sized>(
        &mut self,
        key: Option<&str>,
        value: &T,
        ext: &Extend,
    ) -> Result<bool> {
        self.encode_policy(key, value.is_empty_value(), ext, |en| {
            value.encode(en, key, ext)
        })
    }

    fn encode_policy(
        &mut self,
        key: Option<&str>,
        empty: bool,
        ext: &Extend,
        f: impl FnOnce(&mut Self) -> Result<bool>,
    ) -> Result<bool> {
        if empty {
            if ext.omit_empty() {
                return Ok(false);
            }
            if ext.empty_null() {
                if W::SUPPORT_NULL {
                    return self.write_null(key, ext);
                }
                return Ok(false);
            }
        }
        self.scoped(key.map(|k| Segment::Key(k.to_owned())), f)
    }

    /// Write a declared field under its alias-resolved name.
    #[inline]
    pub fn encode_field<T: Encode + ?Sized>(&mut self, value: &T, field: &FieldInfo) -> Result<bool> {
        self.encode_value(Some(field.name_for(W::FORMAT)), value, field.extend())
    }

    /// Write a declared field through the converter `C`.
    pub fn encode_field_with<C, T>(&mut self, value: &T, field: &FieldInfo) -> Result<bool>
    where
        C: Convert<T>,
        T: ?Sized,
    {
        let key = Some(field.name_for(W::FORMAT));
        let ext = field.extend();
        self.encode_policy(key, C::is_empty(value), ext, |en| {
            C::encode(value, en, key, ext)
        })
    }

    /// Open an object scope, let `f` fill it and close it.
    pub fn encode_object(
        &mut self,
        key: Option<&str>,
        ext: &Extend,
        f: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<bool> {
        self.object_begin(key, ext)?;
        f(self)?;
        self.object_end(key, ext)?;
        Ok(true)
    }

    /// Write `items` as an array; items carry no key and no flags.
    ///
    /// An item that writes nothing, such as `None`, becomes a null where the
    /// format has one so later items keep their index.
    pub fn encode_items<'a, T, I>(&mut self, key: Option<&str>, ext: &Extend, items: I) -> Result<bool>
    where
        T: Encode + ?Sized + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        self.array_begin(key, ext)?;
        for (index, item) in items.into_iter().enumerate() {
            self.scoped(Some(Segment::Index(index)), |en| {
                if !en.encode_value(None, item, Extend::DEFAULT)? && W::SUPPORT_NULL {
                    en.write_null(None, Extend::DEFAULT)?;
                }
                Ok(())
            })?;
        }
        self.array_end(key, ext)?;
        Ok(true)
    }

    /// Offer `value` to the writer's native handling of special types.
    pub fn encode_special(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        ext: &Extend,
    ) -> Option<Result<bool>> {
        let result = self.writer.encode_special(key, value, ext)?;
        Some(result.map(|()| true).map_err(|e| self.error(e)))
    }

    // -------------------------------------------------------------------------
    // Primitives

    pub fn object_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.writer.object_begin(key, ext).map_err(|e| self.error(e))
    }

    pub fn object_end(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.writer.object_end(key, ext).map_err(|e| self.error(e))
    }

    pub fn array_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.writer.array_begin(key, ext).map_err(|e| self.error(e))
    }

    pub fn array_end(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.writer.array_end(key, ext).map_err(|e| self.error(e))
    }

    pub fn write_null(&mut self, key: Option<&str>, ext: &Extend) -> Result<bool> {
        self.writer.write_null(key, ext).map_err(|e| self.error(e))?;
        Ok(true)
    }

    pub fn write_bool(&mut self, key: Option<&str>, value: bool, ext: &Extend) -> Result<bool> {
        self.writer
            .write_bool(key, value, ext)
            .map_err(|e| self.error(e))?;
        Ok(true)
    }

    pub fn write_i64(&mut self, key: Option<&str>, value: i64, ext: &Extend) -> Result<bool> {
        self.writer
            .write_i64(key, value, ext)
            .map_err(|e| self.error(e))?;
        Ok(true)
    }

    pub fn write_u64(&mut self, key: Option<&str>, value: u64, ext: &Extend) -> Result<bool> {
        self.writer
            .write_u64(key, value, ext)
            .map_err(|e| self.error(e))?;
        Ok(true)
    }

    pub fn write_f64(&mut self, key: Option<&str>, value: f64, ext: &Extend) -> Result<bool> {
        self.writer
            .write_f64(key, value, ext)
            .map_err(|e| self.error(e))?;
        Ok(true)
    }

    pub fn write_str(&mut self, key: Option<&str>, value: &str, ext: &Extend) -> Result<bool> {
        self.writer
            .write_str(key, value, ext)
            .map_err(|e| self.error(e))?;
        Ok(true)
    }
}
