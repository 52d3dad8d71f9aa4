use serde_json::Value;
use xp_pack::de::{Node, NodeKind};
use xp_pack::extend::Extend;
use xp_pack::{Error, Result};

/// [`Node`] over a parsed `serde_json` document.
#[derive(Clone, Copy, Debug)]
pub struct JsonNode<'a>(pub &'a Value);

impl JsonNode<'_> {
    fn not(&self, what: &str) -> Error {
        Error::mismatch(format!("not {what}, found {}", self.kind()))
    }
}

impl Node for JsonNode<'_> {
    const FORMAT: &'static str = "json";

    fn kind(&self) -> NodeKind {
        match self.0 {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => NodeKind::Integer,
            Value::Number(_) => NodeKind::Float,
            Value::String(_) => NodeKind::String,
            Value::Array(_) => NodeKind::Array,
            Value::Object(_) => NodeKind::Object,
        }
    }

    fn find(&self, key: &str, _ext: &Extend) -> Result<Option<Self>> {
        match self.0 {
            Value::Object(map) => Ok(map.get(key).map(JsonNode)),
            Value::Null => Ok(None),
            _ => Err(self.not("object")),
        }
    }

    fn size(&self) -> Result<usize> {
        match self.0 {
            Value::Array(items) => Ok(items.len()),
            _ => Err(self.not("array")),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match self.0 {
            Value::Array(items) => Ok(items.get(index).map(JsonNode)),
            _ => Err(self.not("array")),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        match self.0 {
            Value::Object(map) => {
                for (key, value) in map {
                    f(key, JsonNode(value))?;
                }
                Ok(())
            }
            _ => Err(self.not("object")),
        }
    }

    fn read_bool(&self) -> Result<bool> {
        match self.0 {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                Ok(n.as_i64().is_none_or(|i| i != 0))
            }
            _ => Err(Error::mismatch("not bool")),
        }
    }

    fn read_i64(&self) -> Result<i64> {
        match self.0 {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(i),
                None if n.is_u64() => Err(Error::mismatch("integer overflow")),
                None => Err(Error::mismatch("not integer")),
            },
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_u64(&self) -> Result<u64> {
        match self.0 {
            Value::Number(n) => match n.as_u64() {
                Some(u) => Ok(u),
                None if n.is_i64() => Err(Error::mismatch("integer overflow")),
                None => Err(Error::mismatch("not integer")),
            },
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_f64(&self) -> Result<f64> {
        match self.0 {
            Value::Number(n) => n.as_f64().ok_or_else(|| Error::mismatch("not number")),
            _ => Err(Error::mismatch("not number")),
        }
    }

    fn read_string(&self) -> Result<String> {
        match self.0 {
            Value::String(s) => Ok(s.clone()),
            _ => Err(Error::mismatch("not string")),
        }
    }
}
