use crate::Result;
use crate::extend::Extend;
use crate::ser::{Format, TreeBuilder, Writer};
use crate::value::Value;

/// [`Writer`] assembling a [`Value`].
#[derive(Default)]
pub struct ValueWriter {
    tree: TreeBuilder<Value>,
}

impl ValueWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The written value; [`Value::Null`] when nothing was written.
    pub fn finish(self) -> Result<Value> {
        Ok(self.tree.finish()?.unwrap_or_default())
    }
}

impl Writer for ValueWriter {
    const FORMAT: &'static str = "value";
    const SUPPORT_NULL: bool = true;

    fn object_begin(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.tree.begin_object(key);
        Ok(())
    }

    fn object_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.tree.end()
    }

    fn array_begin(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.tree.begin_array(key);
        Ok(())
    }

    fn array_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.tree.end()
    }

    fn write_null(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::Null)
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::Bool(value))
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::Int(value))
    }

    fn write_u64(&mut self, key: Option<&str>, value: u64, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::UInt(value))
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::Float(value))
    }

    fn write_str(&mut self, key: Option<&str>, value: &str, _ext: &Extend) -> Result<()> {
        self.tree.push(key, Value::String(value.to_owned()))
    }
}

/// The in-memory [`Value`] format.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueFormat;

impl Format for ValueFormat {
    type Writer = ValueWriter;
    type Output = Value;

    #[inline]
    fn writer(&self) -> ValueWriter {
        ValueWriter::new()
    }

    #[inline]
    fn finish(&self, writer: ValueWriter) -> Result<Value> {
        writer.finish()
    }
}
