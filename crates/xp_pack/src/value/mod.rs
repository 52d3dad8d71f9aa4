//! A format-neutral document tree.
//!
//! [`Value`] captures whatever subtree a document holds, in any format, and
//! can be written back to any format. It also serves as an in-memory format
//! of its own through [`ValueNode`] and [`ValueFormat`].

// -----------------------------------------------------------------------------
// Modules

mod node;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use node::ValueNode;
pub use writer::{ValueFormat, ValueWriter};

use core::ops::Index;

use crate::classify::{Category, Typed};
use crate::de::{Decode, Decoder, Node, NodeKind};
use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Tree, Writer};
use crate::{Error, Result};

/// Any document subtree. Objects keep their key order.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
}

static NULL: Value = Value::Null;

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, if it fits an `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Integer value, if it fits a `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            Self::UInt(u) => Some(*u),
            _ => None,
        }
    }

    /// Any number as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::UInt(u) => Some(*u as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// First value under `key` of an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Null => NodeKind::Null,
            Self::Bool(_) => NodeKind::Bool,
            Self::Int(_) | Self::UInt(_) => NodeKind::Integer,
            Self::Float(_) => NodeKind::Float,
            Self::String(_) => NodeKind::String,
            Self::Array(_) => NodeKind::Array,
            Self::Object(_) => NodeKind::Object,
        }
    }
}

impl Index<&str> for Value {
    type Output = Value;

    /// Missing keys and non-objects index to [`Value::Null`].
    fn index(&self, key: &str) -> &Value {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Value {
    type Output = Value;

    /// Out-of-range indexes and non-arrays index to [`Value::Null`].
    fn index(&self, index: usize) -> &Value {
        self.as_array()
            .and_then(|items| items.get(index))
            .unwrap_or(&NULL)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// -----------------------------------------------------------------------------
// Mapping

impl Typed for Value {
    const CATEGORY: Category = Category::XType;
}

impl Decode for Value {
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, _ext: &Extend) -> Result<bool> {
        *self = match de.kind() {
            NodeKind::Null => Self::Null,
            NodeKind::Bool => Self::Bool(de.read_bool()?),
            NodeKind::Integer => match de.read_i64() {
                Ok(i) => Self::Int(i),
                Err(_) => Self::UInt(de.read_u64()?),
            },
            NodeKind::Float => Self::Float(de.read_f64()?),
            NodeKind::String | NodeKind::Other => Self::String(de.read_string()?),
            NodeKind::Array => {
                let size = de.size()?;
                let mut items = Vec::with_capacity(size);
                for index in 0..size {
                    let mut item = Self::Null;
                    de.at(index)?.decode_value(&mut item, Extend::DEFAULT)?;
                    items.push(item);
                }
                Self::Array(items)
            }
            NodeKind::Object => {
                let mut entries = Vec::new();
                de.for_each_entry(|key, child| {
                    let mut item = Self::Null;
                    child.decode_value(&mut item, Extend::DEFAULT)?;
                    entries.push((key.to_owned(), item));
                    Ok(())
                })?;
                Self::Object(entries)
            }
        };
        Ok(true)
    }
}

impl Encode for Value {
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend) -> Result<bool> {
        match self {
            Self::Null => en.write_null(key, ext),
            Self::Bool(b) => en.write_bool(key, *b, ext),
            Self::Int(i) => en.write_i64(key, *i, ext),
            Self::UInt(u) => en.write_u64(key, *u, ext),
            Self::Float(f) => en.write_f64(key, *f, ext),
            Self::String(s) => en.write_str(key, s, ext),
            Self::Array(items) => en.encode_items(key, ext, items),
            Self::Object(entries) => en.encode_object(key, ext, |en| {
                for (k, v) in entries {
                    en.encode_value(Some(k), v, Extend::DEFAULT)?;
                }
                Ok(())
            }),
        }
    }

    fn is_empty_value(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !*b,
            Self::Int(i) => *i == 0,
            Self::UInt(u) => *u == 0,
            Self::Float(f) => *f == 0.0,
            Self::String(s) => s.is_empty(),
            Self::Array(items) => items.is_empty(),
            Self::Object(entries) => entries.is_empty(),
        }
    }

    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        self.as_str()
    }
}

impl Tree for Value {
    #[inline]
    fn object() -> Self {
        Self::Object(Vec::new())
    }

    #[inline]
    fn array() -> Self {
        Self::Array(Vec::new())
    }

    fn insert(&mut self, key: Option<&str>, child: Self) -> Result<()> {
        match (self, key) {
            (Self::Array(items), _) => items.push(child),
            (Self::Object(entries), Some(key)) => entries.push((key.to_owned(), child)),
            (Self::Object(_), None) => return Err(Error::custom("object member without key")),
            _ => return Err(Error::custom("value is not a container")),
        }
        Ok(())
    }
}
