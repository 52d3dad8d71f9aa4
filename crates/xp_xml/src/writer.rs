use xp_pack::extend::Extend;
use xp_pack::ser::{Format, Indent, Writer};
use xp_pack::{Error, Result};

use crate::element::{Element, serialize};
use crate::node::FORMAT;

/// An open scope. Sibling arrays have no element of their own; their items
/// land in the enclosing element.
struct Frame {
    element: Option<Element>,
    item: Option<String>,
}

/// [`Writer`] assembling an [`Element`] tree.
///
/// The top-level value becomes the root element. Array items are named by
/// the alias value `vl@name`, or repeat the array's own name.
pub struct XmlWriter {
    root_name: String,
    stack: Vec<Frame>,
    root: Option<Element>,
}

impl XmlWriter {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            root_name: root_name.into(),
            stack: Vec::new(),
            root: None,
        }
    }

    /// The root element; empty when nothing was written.
    pub fn finish(self) -> Result<Element> {
        if !self.stack.is_empty() {
            return Err(Error::custom("unclosed scope"));
        }
        Ok(self
            .root
            .unwrap_or_else(|| Element::new(self.root_name)))
    }

    fn name(&self, key: Option<&str>) -> Result<String> {
        if let Some(key) = key {
            return Ok(key.to_owned());
        }
        match self.stack.last() {
            Some(Frame {
                item: Some(item), ..
            }) => Ok(item.clone()),
            Some(_) => Err(Error::custom("object member without key")),
            None => Ok(self.root_name.clone()),
        }
    }

    fn current(&mut self) -> Result<&mut Element> {
        self.stack
            .iter_mut()
            .rev()
            .find_map(|frame| frame.element.as_mut())
            .ok_or_else(|| Error::custom("no enclosing element"))
    }

    fn attach(&mut self, element: Element) -> Result<()> {
        if self.stack.is_empty() {
            if self.root.is_some() {
                return Err(Error::custom("more than one top-level value"));
            }
            self.root = Some(element);
            return Ok(());
        }
        self.current()?.children.push(element);
        Ok(())
    }

    fn leaf(&mut self, key: Option<&str>, text: String, ext: &Extend) -> Result<()> {
        if let Some(key) = key
            && ext.attribute()
        {
            self.current()?.attributes.push((key.to_owned(), text));
            return Ok(());
        }
        if ext.xml_content() && !self.stack.is_empty() {
            let current = self.current()?;
            current.text = text;
            current.cdata = ext.alias_flag(FORMAT, "cdata");
            return Ok(());
        }
        let mut element = Element::new(self.name(key)?);
        element.text = text;
        element.cdata = ext.alias_flag(FORMAT, "cdata");
        self.attach(element)
    }

    fn close(&mut self) -> Result<()> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| Error::custom("scope end without begin"))?;
        match frame.element {
            Some(element) => self.attach(element),
            None => Ok(()),
        }
    }
}

impl Writer for XmlWriter {
    const FORMAT: &'static str = FORMAT;
    const SUPPORT_NULL: bool = false;

    fn object_begin(&mut self, key: Option<&str>, _ext: &Extend) -> Result<()> {
        let element = Element::new(self.name(key)?);
        self.stack.push(Frame {
            element: Some(element),
            item: None,
        });
        Ok(())
    }

    fn object_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.close()
    }

    fn array_begin(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        let name = self.name(key)?;
        let frame = if key.is_some() && ext.alias_flag(FORMAT, "sbs") {
            Frame {
                element: None,
                item: Some(name),
            }
        } else {
            let item = ext.alias_value(FORMAT, "vl").map_or_else(|| name.clone(), str::to_owned);
            Frame {
                element: Some(Element::new(name)),
                item: Some(item),
            }
        };
        self.stack.push(frame);
        Ok(())
    }

    fn array_end(&mut self, _key: Option<&str>, _ext: &Extend) -> Result<()> {
        self.close()
    }

    fn write_null(&mut self, key: Option<&str>, ext: &Extend) -> Result<()> {
        self.leaf(key, String::new(), ext)
    }

    fn write_bool(&mut self, key: Option<&str>, value: bool, ext: &Extend) -> Result<()> {
        self.leaf(key, value.to_string(), ext)
    }

    fn write_i64(&mut self, key: Option<&str>, value: i64, ext: &Extend) -> Result<()> {
        self.leaf(key, value.to_string(), ext)
    }

    fn write_u64(&mut self, key: Option<&str>, value: u64, ext: &Extend) -> Result<()> {
        self.leaf(key, value.to_string(), ext)
    }

    fn write_f64(&mut self, key: Option<&str>, value: f64, ext: &Extend) -> Result<()> {
        self.leaf(key, value.to_string(), ext)
    }

    fn write_str(&mut self, key: Option<&str>, value: &str, ext: &Extend) -> Result<()> {
        self.leaf(key, value.to_owned(), ext)
    }
}

// -----------------------------------------------------------------------------
// Format

/// XML output options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlFormat {
    /// Name of the root element.
    pub root: String,
    /// `None` writes everything on one line.
    pub indent: Option<Indent>,
}

impl XmlFormat {
    #[inline]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            indent: None,
        }
    }

    #[inline]
    pub fn pretty(mut self, width: usize, ch: char) -> Self {
        self.indent = Some(Indent::new(width, ch));
        self
    }
}

impl Default for XmlFormat {
    #[inline]
    fn default() -> Self {
        Self::new("root")
    }
}

impl Format for XmlFormat {
    type Writer = XmlWriter;
    type Output = String;

    #[inline]
    fn writer(&self) -> XmlWriter {
        XmlWriter::new(self.root.as_str())
    }

    fn finish(&self, writer: XmlWriter) -> Result<String> {
        serialize(&writer.finish()?, self.indent)
    }
}
