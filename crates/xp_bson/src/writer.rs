use core::any::Any;

use bson::{Bson, Document};
use xp_pack::extend::Extend;
use xp_pack::ser::{Format, Tree, TreeBuilder, Writer};
use xp_pack::{Error, Result};

use crate::node::FORMAT;
use crate::special::{DateTime, ObjectId};

struct BsonTree(Bson);

impl Tree for BsonTree {
    fn object() -> Self {
        Self(Bson::Document(Document::new()))
    }

    fn array() -> Self {
        Self(Bson::Array(Vec::new()))
    }

    fn insert(&mut self, key: Option<&str>, child: Self) -> Result<()> {
        match (&mut self.0, key) {
            (Bson::Document(doc), Some(key)) => {
                doc.insert(key, child.0);
                Ok(())
            }
            (Bson::Array(items), _) => {
                items.push(child.0);
                Ok(())
            }
            _ => Err(Error::custom("object member without key")),
        }
    }
}

/// [`Writer`] assembling a `bson` document.
///
/// Integers that fit are written as `Int32`, the rest as `Int64`.
#[derive(Default)]
pub struct BsonWriter {
    tree: TreeBuilder<BsonTree>,
}

impl BsonWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The written document; empty when nothing was written.
    pub fn finish(self) -> Result<Document> {
        match self.tree.finish()? {
            None => Ok(Document::new()),
            Some(BsonTree(Bson::Document(doc))) => Ok(doc),
            Some(BsonTree(other)) => Err(Error::unsupported(
                FORMAT,
                format!("a top-level {:?}, only documents", other.element_type()),
            )),
        }
    }

    #[inline]
    fn push(&mut self, key: Option<&str>, value: Bson) -> Result<()> {
        self.tree.push(key, BsonTree(value))
    }
}

impl Writer for BsonWriter {
    const FORMAT: &'static str = FORMAT;
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
        self.push(key, Bson::Null)
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool, _ext: &Extend) -> Result<()> {
        self.push(key, Bson::Boolean(value))
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64, _ext: &Extend) -> Result<()> {
        let value = match i32::try_from(value) {
            Ok(small) => Bson::Int32(small),
            Err(_) => Bson::Int64(value),
        };
        self.push(key, value)
    }

    fn write_u64(&mut self, key: Option<&str>, value: u64, ext: &Extend) -> Result<()> {
        let value = i64::try_from(value)
            .map_err(|_| Error::unsupported(FORMAT, "an integer above i64::MAX"))?;
        self.write_i64(key, value, ext)
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64, _ext: &Extend) -> Result<()> {
        self.push(key, Bson::Double(value))
    }

    fn write_str(&mut self, key: Option<&str>, value: &str, _ext: &Extend) -> Result<()> {
        self.push(key, Bson::String(value.to_owned()))
    }

    fn encode_special(
        &mut self,
        key: Option<&str>,
        value: &dyn Any,
        _ext: &Extend,
    ) -> Option<Result<()>> {
        if let Some(id) = value.downcast_ref::<ObjectId>() {
            return Some(self.push(key, Bson::ObjectId(id.0)));
        }
        if let Some(date) = value.downcast_ref::<DateTime>() {
            return Some(self.push(key, Bson::DateTime(date.0)));
        }
        None
    }
}

// -----------------------------------------------------------------------------
// Format

/// BSON bytes output.
#[derive(Clone, Copy, Debug, Default)]
pub struct BsonFormat;

impl Format for BsonFormat {
    type Writer = BsonWriter;
    type Output = Vec<u8>;

    #[inline]
    fn writer(&self) -> BsonWriter {
        BsonWriter::new()
    }

    fn finish(&self, writer: BsonWriter) -> Result<Vec<u8>> {
        let doc = writer.finish()?;
        let mut bytes = Vec::new();
        doc.to_writer(&mut bytes).map_err(Error::custom)?;
        Ok(bytes)
    }
}

/// The same writer yielding the [`Document`] instead of its bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentFormat;

impl Format for DocumentFormat {
    type Writer = BsonWriter;
    type Output = Document;

    #[inline]
    fn writer(&self) -> BsonWriter {
        BsonWriter::new()
    }

    #[inline]
    fn finish(&self, writer: BsonWriter) -> Result<Document> {
        writer.finish()
    }
}
