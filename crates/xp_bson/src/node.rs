use core::any::Any;

use bson::{Bson, Document};
use xp_pack::de::{Node, NodeKind};
use xp_pack::extend::Extend;
use xp_pack::{Error, Result};

use crate::special::{DateTime, ObjectId};

pub(crate) const FORMAT: &str = "bson";

/// [`Node`] over a `bson` document. Numbers coerce between `Int32`, `Int64`
/// and `Double`.
#[derive(Clone, Copy, Debug)]
pub enum BsonNode<'a> {
    Document(&'a Document),
    Value(&'a Bson),
}

impl<'a> BsonNode<'a> {
    fn document(&self) -> Option<&'a Document> {
        match *self {
            Self::Document(doc) | Self::Value(Bson::Document(doc)) => Some(doc),
            Self::Value(_) => None,
        }
    }

    fn value(&self) -> Option<&'a Bson> {
        match *self {
            Self::Value(value) => Some(value),
            Self::Document(_) => None,
        }
    }
}

impl Node for BsonNode<'_> {
    const FORMAT: &'static str = FORMAT;

    fn kind(&self) -> NodeKind {
        match self.value() {
            None | Some(Bson::Document(_)) => NodeKind::Object,
            Some(Bson::Null | Bson::Undefined) => NodeKind::Null,
            Some(Bson::Boolean(_)) => NodeKind::Bool,
            Some(Bson::Int32(_) | Bson::Int64(_)) => NodeKind::Integer,
            Some(Bson::Double(_)) => NodeKind::Float,
            Some(Bson::String(_)) => NodeKind::String,
            Some(Bson::Array(_)) => NodeKind::Array,
            Some(_) => NodeKind::Other,
        }
    }

    fn find(&self, key: &str, _ext: &Extend) -> Result<Option<Self>> {
        match self.document() {
            Some(doc) => Ok(doc.get(key).map(BsonNode::Value)),
            None if self.is_null() => Ok(None),
            None => Err(Error::mismatch("not document")),
        }
    }

    fn size(&self) -> Result<usize> {
        match self.value() {
            Some(Bson::Array(items)) => Ok(items.len()),
            _ => Err(Error::mismatch("not array")),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match self.value() {
            Some(Bson::Array(items)) => Ok(items.get(index).map(BsonNode::Value)),
            _ => Err(Error::mismatch("not array")),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        let doc = self.document().ok_or_else(|| Error::mismatch("not document"))?;
        for (key, value) in doc {
            f(key, BsonNode::Value(value))?;
        }
        Ok(())
    }

    fn read_bool(&self) -> Result<bool> {
        match self.value() {
            Some(Bson::Boolean(b)) => Ok(*b),
            Some(Bson::Int32(i)) => Ok(*i != 0),
            Some(Bson::Int64(i)) => Ok(*i != 0),
            Some(Bson::Double(d)) => Ok(*d != 0.0),
            _ => Err(Error::mismatch("not bool")),
        }
    }

    fn read_i64(&self) -> Result<i64> {
        match self.value() {
            Some(Bson::Int32(i)) => Ok(i64::from(*i)),
            Some(Bson::Int64(i)) => Ok(*i),
            Some(Bson::Double(d)) => Ok(*d as i64),
            Some(Bson::Boolean(b)) => Ok(i64::from(*b)),
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_u64(&self) -> Result<u64> {
        let value = self.read_i64()?;
        u64::try_from(value).map_err(|_| Error::mismatch("integer overflow"))
    }

    fn read_f64(&self) -> Result<f64> {
        match self.value() {
            Some(Bson::Double(d)) => Ok(*d),
            Some(Bson::Int32(i)) => Ok(f64::from(*i)),
            Some(Bson::Int64(i)) => Ok(*i as f64),
            _ => Err(Error::mismatch("not number")),
        }
    }

    fn read_string(&self) -> Result<String> {
        match self.value() {
            Some(Bson::String(s) | Bson::Symbol(s)) => Ok(s.clone()),
            _ => Err(Error::mismatch("not string")),
        }
    }

    fn decode_special(&self, target: &mut dyn Any, _ext: &Extend) -> Option<Result<bool>> {
        let value = self.value()?;
        if let Some(id) = target.downcast_mut::<ObjectId>() {
            let Bson::ObjectId(oid) = value else {
                return None;
            };
            id.0 = *oid;
            return Some(Ok(true));
        }
        if let Some(date) = target.downcast_mut::<DateTime>() {
            let Bson::DateTime(dt) = value else {
                return None;
            };
            date.0 = *dt;
            return Some(Ok(true));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;

    use super::*;

    #[test]
    fn numeric_coercion() {
        let doc = doc! { "i": 3_i32, "l": 1_i64 << 40, "d": 2.5, "b": true, "s": "x" };
        let root = BsonNode::Document(&doc);
        let get = |key| root.find(key, Extend::DEFAULT).unwrap().unwrap();

        assert_eq!(get("i").read_f64().unwrap(), 3.0);
        assert_eq!(get("l").read_i64().unwrap(), 1 << 40);
        assert_eq!(get("d").read_i64().unwrap(), 2);
        assert!(get("b").read_bool().unwrap());
        assert_eq!(get("s").read_i64().unwrap_err().to_string(), "not integer");
    }

    #[test]
    fn container_errors() {
        let doc = doc! { "n": 1, "a": [1, 2] };
        let root = BsonNode::Document(&doc);
        let n = root.find("n", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(n.find("x", Extend::DEFAULT).unwrap_err().to_string(), "not document");
        assert_eq!(root.size().unwrap_err().to_string(), "not array");
        let a = root.find("a", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(a.size().unwrap(), 2);
    }
}
