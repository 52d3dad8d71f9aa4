use core::any::Any;

use crate::Result;
use crate::extend::Extend;

/// Write side of one format.
///
/// Scopes are bracketed by the [`Encoder`](crate::ser::Encoder): every
/// `*_begin` is matched by the `*_end` with the same key. `key` is `None` for
/// array items and for the top-level value.
pub trait Writer {
    /// Format tag used for alias lookup.
    const FORMAT: &'static str;

    /// Whether [`write_null`](Writer::write_null) produces an explicit null.
    /// Formats without one get empty values omitted instead.
    const SUPPORT_NULL: bool;

    fn object_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()>;

    fn object_end(&mut self, key: Option<&str>, ext: &Extend) -> Result<()>;

    fn array_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()>;

    fn array_end(&mut self, key: Option<&str>, ext: &Extend) -> Result<()>;

    fn write_null(&mut self, key: Option<&str>, ext: &Extend) -> Result<()>;

    fn write_bool(&mut self, key: Option<&str>, value: bool, ext: &Extend) -> Result<()>;

    fn write_i64(&mut self, key: Option<&str>, value: i64, ext: &Extend) -> Result<()>;

    fn write_u64(&mut self, key: Option<&str>, value: u64, ext: &Extend) -> Result<()>;

    fn write_f64(&mut self, key: Option<&str>, value: f64, ext: &Extend) -> Result<()>;

    fn write_str(&mut self, key: Option<&str>, value: &str, ext: &Extend) -> Result<()>;

    /// Write a format-specific special type natively.
    ///
    /// `None` lets the type fall back to its generic representation.
    #[inline]
    fn encode_special(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        ext: &Extend,
    ) -> Option<Result<()>> {
        let _ = (key, value, ext);
        None
    }
}

/// A writer factory plus the step that turns a finished writer into output.
///
/// Carries the writer options (indentation, XML root name, ...).
pub trait Format {
    type Writer: Writer;
    type Output;

    fn writer(&self) -> Self::Writer;

    fn finish(&self, writer: Self::Writer) -> Result<Self::Output>;
}

/// Indentation of pretty printed text formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Indent {
    /// Characters per level.
    pub width: usize,
    pub ch: char,
}

impl Indent {
    #[inline]
    pub const fn new(width: usize, ch: char) -> Self {
        Self { width, ch }
    }

    /// The text of one indentation level.
    pub fn level(&self) -> String {
        core::iter::repeat_n(self.ch, self.width).collect()
    }
}

impl Default for Indent {
    /// Four spaces.
    #[inline]
    fn default() -> Self {
        Self::new(4, ' ')
    }
}
