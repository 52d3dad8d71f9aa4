use std::io;

use serde_json::ser::{CompactFormatter, Formatter};
use xp_pack::extend::Extend;
use xp_pack::ser::{Format, Indent, Writer};
use xp_pack::{Error, Result};

const FORMAT: &str = "json";

#[inline]
fn io_error(err: io::Error) -> Error {
    Error::custom(err)
}

// -----------------------------------------------------------------------------
// Layout

/// [`Formatter`] that is compact without an indent and otherwise breaks
/// objects and arrays over lines like `serde_json`'s pretty printer.
///
/// An array opened through [`Layout::begin_single_line`] and everything
/// nested in it stays on one line.
struct Layout {
    indent: Option<Vec<u8>>,
    depth: usize,
    has_value: bool,
    /// Depth of the outermost single-line array.
    single_line: Option<usize>,
}

impl Layout {
    fn new(indent: Option<Indent>) -> Self {
        Self {
            indent: indent.map(|i| i.level().into_bytes()),
            depth: 0,
            has_value: false,
            single_line: None,
        }
    }

    /// The indent when the current position breaks lines.
    #[inline]
    fn broken(&self) -> Option<&[u8]> {
        match self.single_line {
            Some(depth) if self.depth >= depth => None,
            _ => self.indent.as_deref(),
        }
    }

    fn newline<W: ?Sized + io::Write>(&self, writer: &mut W, indent: &[u8]) -> io::Result<()> {
        writer.write_all(b"\n")?;
        for _ in 0..self.depth {
            writer.write_all(indent)?;
        }
        Ok(())
    }

    fn begin_single_line<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.single_line.is_none() {
            self.single_line = Some(self.depth + 1);
        }
        self.begin_array(writer)
    }

    fn open<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        self.depth += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W: ?Sized + io::Write>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()> {
        let broken = self.broken().is_some();
        self.depth -= 1;
        if self.single_line.is_some_and(|depth| self.depth < depth) {
            self.single_line = None;
        }
        if let Some(indent) = &self.indent
            && broken
            && self.has_value
        {
            self.newline(writer, indent)?;
        }
        writer.write_all(bracket)
    }

    fn item<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        match self.broken() {
            Some(indent) => {
                if !first {
                    writer.write_all(b",")?;
                }
                self.newline(writer, indent)
            }
            None if self.indent.is_some() && !first => writer.write_all(b", "),
            None => CompactFormatter.begin_array_value(writer, first),
        }
    }
}

impl Formatter for Layout {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.item(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.open(writer, b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.close(writer, b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.item(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.indent.is_some() {
            writer.write_all(b": ")
        } else {
            CompactFormatter.begin_object_value(writer)
        }
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Writer

#[derive(Clone, Copy)]
struct Scope {
    array: bool,
    first: bool,
}

/// Streaming JSON [`Writer`] over a `serde_json` [`Formatter`].
///
/// Compact by default. With an [`Indent`], objects and arrays are broken over
/// lines; arrays flagged [`SINGLE_LINE`](xp_pack::extend::Flags::SINGLE_LINE)
/// and the arrays nested in them stay on one line.
pub struct JsonWriter {
    out: Vec<u8>,
    layout: Layout,
    stack: Vec<Scope>,
    written: bool,
}

impl JsonWriter {
    #[inline]
    pub fn new(indent: Option<Indent>) -> Self {
        Self {
            out: Vec::new(),
            layout: Layout::new(indent),
            stack: Vec::new(),
            written: false,
        }
    }

    /// The text written so far; `null` when nothing was written.
    pub fn finish(self) -> Result<String> {
        if !self.stack.is_empty() {
            return Err(Error::custom("unclosed scope"));
        }
        if !self.written {
            return Ok("null".to_owned());
        }
        String::from_utf8(self.out).map_err(Error::custom)
    }

    /// Separator and key before a value.
    fn begin_value(&mut self, key: Option<&str>) -> Result<()> {
        let Some(scope) = self.stack.last_mut() else {
            if self.written {
                return Err(Error::custom("more than one top-level value"));
            }
            self.written = true;
            return Ok(());
        };
        let first = core::mem::replace(&mut scope.first, false);
        if scope.array {
            return self.layout.begin_array_value(&mut self.out, first).map_err(io_error);
        }
        let key = key.ok_or_else(|| Error::custom("object member without key"))?;
        self.layout.begin_object_key(&mut self.out, first).map_err(io_error)?;
        serde_json::to_writer(&mut self.out, key).map_err(Error::custom)?;
        self.layout.end_object_key(&mut self.out).map_err(io_error)?;
        self.layout.begin_object_value(&mut self.out).map_err(io_error)
    }

    fn end_value(&mut self) -> Result<()> {
        match self.stack.last() {
            Some(scope) if scope.array => self.layout.end_array_value(&mut self.out),
            Some(_) => self.layout.end_object_value(&mut self.out),
            None => Ok(()),
        }
        .map_err(io_error)
    }

    fn leaf(
        &mut self,
        key: Option<&str>,
        write: impl FnOnce(&mut Layout, &mut Vec<u8>) -> io::Result<()>,
    ) -> Result<()> {
        self.begin_value(key)?;
        write(&mut self.layout, &mut self.out).map_err(io_error)?;
        self.end_value()
    }

    fn begin(&mut self, key: Option<&str>, array: bool, single_line: bool) -> Result<()> {
        self.begin_value(key)?;
        let out = &mut self.out;
        match (array, single_line) {
            (true, true) => self.layout.begin_single_line(out),
            (true, false) => self.layout.begin_array(out),
            (false, _) => self.layout.begin_object(out),
        }
        .map_err(io_error)?;
        self.stack.push(Scope { array, first: true });
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let scope = self
            .stack
            .pop()
            .ok_or_else(|| Error::custom("scope end without begin"))?;
        if scope.array {
            self.layout.end_array(&mut self.out)
        } else {
            self.layout.end_object(&mut self.out)
        }
        .map_err(io_error)?;
        self.end_value()
    }
}

impl Writer for JsonWriter {
    const FORMAT: &'static str = FORMAT;
    const SUPPORT_NULL: bool = true;

    fn object_begin(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.begin(key, false, false)
    }

    fn object_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.end()
    }

    fn array_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.begin(key, true, ext.single_line())
    }

    fn array_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.end()
    }

    fn write_null(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.leaf(key, |f, out| f.write_null(out))
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool, _ext: &Extend) -> Result<()> {
        self.leaf(key, |f, out| f.write_bool(out, value))
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64, _ext: &Extend) -> Result<()> {
        self.leaf(key, |f, out| f.write_i64(out, value))
    }

    fn write_u64(&mut self, key: Option<&str>, value: u64, _ext: &Extend) -> Result<()> {
        self.leaf(key, |f, out| f.write_u64(out, value))
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64, _ext: &Extend) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::unsupported(FORMAT, "a non-finite float"));
        }
        self.leaf(key, |f, out| f.write_f64(out, value))
    }

    fn write_str(&mut self, key: Option<&str>, value: &str, _ext: &Extend) -> Result<()> {
        self.begin_value(key)?;
        serde_json::to_writer(&mut self.out, value).map_err(Error::custom)?;
        self.end_value()
    }
}

// -----------------------------------------------------------------------------
// Format

/// JSON output options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonFormat {
    /// `None` writes compact text.
    pub indent: Option<Indent>,
}

impl JsonFormat {
    #[inline]
    pub const fn compact() -> Self {
        Self { indent: None }
    }

    #[inline]
    pub const fn pretty(width: usize, ch: char) -> Self {
        Self {
            indent: Some(Indent::new(width, ch)),
        }
    }
}

impl Format for JsonFormat {
    type Writer = JsonWriter;
    type Output = String;

    #[inline]
    fn writer(&self) -> JsonWriter {
        JsonWriter::new(self.indent)
    }

    #[inline]
    fn finish(&self, writer: JsonWriter) -> Result<String> {
        writer.finish()
    }
}
