use serde_yaml::Value;
use xp_pack::de::{Node, NodeKind};
use xp_pack::extend::Extend;
use xp_pack::{Error, Result};

/// [`Node`] over a parsed `serde_yaml` document. Tags are looked through.
#[derive(Clone, Copy, Debug)]
pub struct YamlNode<'a>(pub &'a Value);

impl<'a> YamlNode<'a> {
    fn value(&self) -> &'a Value {
        let mut value = self.0;
        while let Value::Tagged(tagged) = value {
            value = &tagged.value;
        }
        value
    }
}

fn key_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Node for YamlNode<'_> {
    const FORMAT: &'static str = "yaml";

    fn kind(&self) -> NodeKind {
        match self.value() {
            Value::Null => NodeKind::Null,
            Value::Bool(_) => NodeKind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => NodeKind::Integer,
            Value::Number(_) => NodeKind::Float,
            Value::String(_) => NodeKind::String,
            Value::Sequence(_) => NodeKind::Array,
            Value::Mapping(_) => NodeKind::Object,
            Value::Tagged(_) => NodeKind::Other,
        }
    }

    fn find(&self, key: &str, _ext: &Extend) -> Result<Option<Self>> {
        match self.value() {
            Value::Mapping(map) => Ok(map.get(key).map(YamlNode)),
            Value::Null => Ok(None),
            _ => Err(Error::mismatch("not map")),
        }
    }

    fn size(&self) -> Result<usize> {
        match self.value() {
            Value::Sequence(items) => Ok(items.len()),
            _ => Err(Error::mismatch("not sequence")),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match self.value() {
            Value::Sequence(items) => Ok(items.get(index).map(YamlNode)),
            _ => Err(Error::mismatch("not sequence")),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        let Value::Mapping(map) = self.value() else {
            return Err(Error::mismatch("not map"));
        };
        for (key, value) in map {
            if let Some(key) = key_text(key) {
                f(&key, YamlNode(value))?;
            }
        }
        Ok(())
    }

    fn read_bool(&self) -> Result<bool> {
        match self.value() {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(n.as_i64().is_none_or(|i| i != 0)),
            _ => Err(Error::mismatch("type unmatch, not bool")),
        }
    }

    fn read_i64(&self) -> Result<i64> {
        match self.value() {
            Value::Number(n) => n.as_i64().ok_or_else(|| Error::mismatch("not integer or overflow")),
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_u64(&self) -> Result<u64> {
        match self.value() {
            Value::Number(n) => n.as_u64().ok_or_else(|| Error::mismatch("not integer or overflow")),
            _ => Err(Error::mismatch("not integer")),
        }
    }

    fn read_f64(&self) -> Result<f64> {
        match self.value() {
            Value::Number(n) => n.as_f64().ok_or_else(|| Error::mismatch("not number")),
            _ => Err(Error::mismatch("not number")),
        }
    }

    fn read_string(&self) -> Result<String> {
        match self.value() {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(Error::mismatch("not string")),
        }
    }
}
