use serde_yaml::{Mapping, Value};
use xp_pack::extend::Extend;
use xp_pack::ser::{Format, Tree, TreeBuilder, Writer};
use xp_pack::{Error, Result};

struct YamlTree(Value);

impl Tree for YamlTree {
    fn object() -> Self {
        Self(Value::Mapping(Mapping::new()))
    }

    fn array() -> Self {
        Self(Value::Sequence(Vec::new()))
    }

    fn insert(&mut self, key: Option<&str>, child: Self) -> Result<()> {
        match (&mut self.0, key) {
            (Value::Mapping(map), Some(key)) => {
                map.insert(Value::String(key.to_owned()), child.0);
                Ok(())
            }
            (Value::Sequence(items), _) => {
                items.push(child.0);
                Ok(())
            }
            _ => Err(Error::custom("object member without key")),
        }
    }
}

/// [`Writer`] assembling a `serde_yaml` document.
#[derive(Default)]
pub struct YamlWriter {
    tree: TreeBuilder<YamlTree>,
}

impl YamlWriter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The written document; null when nothing was written.
    pub fn finish(self) -> Result<Value> {
        Ok(self.tree.finish()?.map_or(Value::Null, |tree| tree.0))
    }

    #[inline]
    fn push(&mut self, key: Option<&str>, value: Value) -> Result<()> {
        self.tree.push(key, YamlTree(value))
    }
}

impl Writer for YamlWriter {
    const FORMAT: &'static str = "yaml";
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
        self.push(key, Value::Null)
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool, _ext: &Extend) -> Result<()> {
        self.push(key, Value::Bool(value))
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64, _ext: &Extend) -> Result<()> {
        self.push(key, Value::Number(value.into()))
    }

    fn write_u64(&mut self, key: Option<&str>, value: u64, _ext: &Extend) -> Result<()> {
        self.push(key, Value::Number(value.into()))
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64, _ext: &Extend) -> Result<()> {
        self.push(key, Value::Number(value.into()))
    }

    fn write_str(&mut self, key: Option<&str>, value: &str, _ext: &Extend) -> Result<()> {
        self.push(key, Value::String(value.to_owned()))
    }
}

/// YAML text output.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlFormat;

impl Format for YamlFormat {
    type Writer = YamlWriter;
    type Output = String;

    #[inline]
    fn writer(&self) -> YamlWriter {
        YamlWriter::new()
    }

    fn finish(&self, writer: YamlWriter) -> Result<String> {
        serde_yaml::to_string(&writer.finish()?).map_err(Error::custom)
    }
}
