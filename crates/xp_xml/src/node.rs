use xp_pack::de::{Node, NodeKind};
use xp_pack::extend::Extend;
use xp_pack::{Error, Result};

use crate::element::Element;

pub(crate) const FORMAT: &str = "xml";

/// [`Node`] over a parsed [`Element`] tree.
///
/// Keys resolve to the last child element of that name, then to an
/// attribute. A field flagged `xml_content` reads the element text, and the
/// alias flag `sbs` collects every same-named child into a sequence.
#[derive(Clone, Debug)]
pub enum XmlNode<'a> {
    Element(&'a Element),
    /// Attribute value or element text.
    Text(&'a str),
    /// Same-named siblings read as a sequence.
    Siblings(Vec<&'a Element>),
}

impl<'a> XmlNode<'a> {
    fn text(&self) -> Result<&'a str> {
        match self {
            Self::Element(el) => Ok(el.text.as_str()),
            Self::Text(text) => Ok(text),
            Self::Siblings(_) => Err(Error::mismatch("not leaf, found sibling list")),
        }
    }

    fn element(&self, what: &str) -> Result<&'a Element> {
        match self {
            Self::Element(el) => Ok(el),
            _ => Err(Error::mismatch(format!("not {what}, found {}", self.kind()))),
        }
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "true" | "TRUE" | "True" => Some(true),
        "0" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn int_error() -> Error {
    Error::mismatch("parse int fail. not integer or overflow")
}

impl Node for XmlNode<'_> {
    const FORMAT: &'static str = FORMAT;

    fn kind(&self) -> NodeKind {
        match self {
            Self::Element(el) if el.is_leaf() => NodeKind::String,
            Self::Element(_) => NodeKind::Object,
            Self::Text(_) => NodeKind::String,
            Self::Siblings(_) => NodeKind::Array,
        }
    }

    fn find(&self, key: &str, ext: &Extend) -> Result<Option<Self>> {
        let el = self.element("element")?;
        if ext.xml_content() {
            return Ok(Some(Self::Text(&el.text)));
        }
        if ext.attribute() {
            return Ok(el.attribute(key).map(Self::Text));
        }
        if ext.alias_flag(FORMAT, "sbs") {
            let siblings: Vec<_> = el.children.iter().filter(|c| c.name == key).collect();
            if siblings.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Self::Siblings(siblings)));
        }
        Ok(el
            .child(key)
            .map(Self::Element)
            .or_else(|| el.attribute(key).map(Self::Text)))
    }

    fn size(&self) -> Result<usize> {
        match self {
            Self::Element(el) => Ok(el.children.len()),
            Self::Siblings(items) => Ok(items.len()),
            Self::Text(_) => Err(Error::mismatch("not array, found text")),
        }
    }

    fn at(&self, index: usize) -> Result<Option<Self>> {
        match self {
            Self::Element(el) => Ok(el.children.get(index).map(Self::Element)),
            Self::Siblings(items) => Ok(items.get(index).copied().map(Self::Element)),
            Self::Text(_) => Err(Error::mismatch("not array, found text")),
        }
    }

    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()> {
        let el = self.element("object")?;
        for child in &el.children {
            f(&child.name, Self::Element(child))?;
        }
        for (key, value) in &el.attributes {
            f(key, Self::Text(value))?;
        }
        Ok(())
    }

    fn read_bool(&self) -> Result<bool> {
        parse_bool(self.text()?.trim()).ok_or_else(|| Error::mismatch("parse bool fail"))
    }

    fn read_i64(&self) -> Result<i64> {
        self.text()?.trim().parse().map_err(|_| int_error())
    }

    fn read_u64(&self) -> Result<u64> {
        self.text()?.trim().parse().map_err(|_| int_error())
    }

    fn read_f64(&self) -> Result<f64> {
        self.text()?
            .trim()
            .parse()
            .map_err(|_| Error::mismatch("parse float fail"))
    }

    fn read_string(&self) -> Result<String> {
        self.text().map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    use xp_pack::extend::{Alias, Extend, Flags};

    use super::*;
    use crate::element::parse;

    #[test]
    fn child_then_attribute() {
        let root = parse(r#"<r a="attr" b="2"><a>child</a></r>"#).unwrap();
        let node = XmlNode::Element(&root);
        let a = node.find("a", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(a.read_string().unwrap(), "child");
        let b = node.find("b", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(b.read_i64().unwrap(), 2);

        let attr_only = Extend::new(Flags::ATTR);
        let a = node.find("a", &attr_only).unwrap().unwrap();
        assert_eq!(a.read_string().unwrap(), "attr");
    }

    #[test]
    fn repeated_children_resolve_to_the_last() {
        let root = parse("<r><a>1</a><b>x</b><a>2</a><a>3</a></r>").unwrap();
        let node = XmlNode::Element(&root);
        let a = node.find("a", Extend::DEFAULT).unwrap().unwrap();
        assert_eq!(a.read_i64().unwrap(), 3);
        assert_eq!(node.size().unwrap(), 4);
    }

    #[test]
    fn siblings_and_content() {
        let root = parse("<r>text<v>1</v><v>2</v></r>").unwrap();
        let node = XmlNode::Element(&root);
        let sbs = Extend::new(Flags::empty()).with_alias(Alias::parse("v xml:,sbs"));
        let list = node.find("v", &sbs).unwrap().unwrap();
        assert_eq!(list.kind(), NodeKind::Array);
        assert_eq!(list.size().unwrap(), 2);
        assert_eq!(list.at(1).unwrap().unwrap().read_u64().unwrap(), 2);

        let content = Extend::new(Flags::XML_CONTENT);
        let text = node.find("ignored", &content).unwrap().unwrap();
        assert_eq!(text.read_string().unwrap(), "text");
    }

    #[test]
    fn bools() {
        for (text, expected) in [("1", true), ("True", true), ("FALSE", false), ("0", false)] {
            assert_eq!(XmlNode::Text(text).read_bool().unwrap(), expected);
        }
        let err = XmlNode::Text("yes").read_bool().unwrap_err();
        assert_eq!(err.to_string(), "parse bool fail");
        assert!(XmlNode::Text("").read_i64().is_err());
    }
}
