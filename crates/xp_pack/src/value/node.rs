use crate::de::{Node, NodeKind};
use crate::extend::Extend;
use crate::value::Value;
use crate::{Error, Result};

/// [`Node`] over a borrowed [`Value`].
#[derive(Clone, Copy, Debug)]
pub struct ValueNode<'a>(pub &'a Value);

impl Node for ValueNode<'_> {
    const FORMAT: &'static str = "value";

    #[inline]
    fn kind(&self) -> NodeKind {
        self.0.kind()
    }

    fn find(&self, key: &str, _ext: &Extend) -> Result<Option<Self>> {
        match self.0 {
            Value::Object(_) => Ok(self.0.get(key).map(ValueNode)),
            Value::Null => Ok(None),
            other => Err(Error::mismatch(format!("not object, found {}", other.kind()))),
        }
    }

    fn size(&self) -> Result<usize> {
        match self.0 {
            Value::Array(items) => Ok(items.len()),
            other => Err(Error::mismatch(format!("not array, found {}", other.kind()))),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match self.0 {
            Value::Array(items) => Ok(items.get(index).map(ValueNode)),
            other => Err(Error::mismatch(format!("not array, found {}", other.kind()))),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        match self.0 {
            Value::Object(entries) => {
                for (key, value) in entries {
                    f(key, ValueNode(value))?;
                }
                Ok(())
            }
            other => Err(Error::mismatch(format!("not object, found {}", other.kind()))),
        }
    }

    fn read_bool(&self) -> Result<bool> {
        match self.0 {
            Value::Bool(b) => Ok(*b),
            Value::Int(i) => Ok(*i != 0),
            Value::UInt(u) => Ok(*u != 0),
            _ => Err(Error::mismatch("not bool or integer")),
        }
    }

    fn read_i64(&self) -> Result<i64> {
        match self.0 {
            Value::Int(i) => Ok(*i),
            Value::UInt(u) => i64::try_from(*u).map_err(|_| Error::mismatch("integer overflow")),
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_u64(&self) -> Result<u64> {
        match self.0 {
            Value::UInt(u) => Ok(*u),
            Value::Int(i) => u64::try_from(*i).map_err(|_| Error::mismatch("integer overflow")),
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_f64(&self) -> Result<f64> {
        self.0.as_f64().ok_or_else(|| Error::mismatch("not number"))
    }

    fn read_string(&self) -> Result<String> {
        match self.0 {
            Value::String(s) => Ok(s.clone()),
            _ => Err(Error::mismatch("not string")),
        }
    }
}
