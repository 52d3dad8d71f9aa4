use core::str;

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use xp_pack::ser::Indent;
use xp_pack::{Error, Result};

/// One XML element: name, attributes in document order, child elements and
/// the concatenated text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
    /// Write `text` as a CDATA section.
    pub cdata: bool,
}

impl Element {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Child element named `name`; the last one when the name repeats.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().rev().find(|c| c.name == name)
    }

    /// Value of the attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the element has neither children nor attributes.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Parse

fn position(reader: &Reader<&[u8]>, input: &str) -> usize {
    usize::try_from(reader.buffer_position()).unwrap_or(input.len())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    str::from_utf8(bytes).map_err(Error::custom)
}

fn start_element(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(Error::custom)?;
        let value = attr.unescape_value().map_err(Error::custom)?;
        element
            .attributes
            .push((utf8(attr.key.as_ref())?.to_owned(), value.into_owned()));
    }
    Ok(element)
}

fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(Error::custom("more than one root element")),
    }
    Ok(())
}

/// Parse `input` into its root element.
pub fn parse(input: &str) -> Result<Element> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| Error::parse("xml", err.to_string(), input, position(&reader, input)))?;
        let step = match event {
            Event::Start(start) => start_element(&start).map(|el| stack.push(el)),
            Event::Empty(start) => {
                start_element(&start).and_then(|el| close(&mut stack, &mut root, el))
            }
            Event::End(_) => match stack.pop() {
                Some(el) => close(&mut stack, &mut root, el),
                None => Err(Error::custom("unexpected end tag")),
            },
            Event::Text(text) => match stack.last_mut() {
                Some(top) => text
                    .unescape()
                    .map(|t| top.text.push_str(&t))
                    .map_err(Error::custom),
                None => Ok(()),
            },
            Event::CData(data) => match stack.last_mut() {
                Some(top) => utf8(&data).map(|t| top.text.push_str(t)),
                None => Ok(()),
            },
            Event::Eof => break,
            _ => Ok(()),
        };
        step.map_err(|err| Error::parse("xml", err.to_string(), input, position(&reader, input)))?;
    }

    if !stack.is_empty() {
        return Err(Error::parse("xml", "unclosed element", input, input.len()));
    }
    root.ok_or_else(|| Error::parse("xml", "no root element", input, 0))
}

// -----------------------------------------------------------------------------
// Serialize

fn write_event<'a>(writer: &mut Writer<Vec<u8>>, event: impl Into<Event<'a>>) -> Result<()> {
    writer.write_event(event).map_err(Error::custom)?;
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    if !element.text.is_empty() {
        if element.cdata {
            write_event(writer, Event::CData(BytesCData::new(element.text.as_str())))?;
        } else {
            write_event(writer, Event::Text(BytesText::new(&element.text)))?;
        }
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

/// Render `root` as text, indented when `indent` is set.
pub fn serialize(root: &Element, indent: Option<Indent>) -> Result<String> {
    let mut writer = match indent {
        Some(indent) => {
            let ch = u8::try_from(indent.ch).unwrap_or(b' ');
            Writer::new_with_indent(Vec::new(), ch, indent.width)
        }
        None => Writer::new(Vec::new()),
    };
    write_element(&mut writer, root)?;
    String::from_utf8(writer.into_inner()).map_err(Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tree() {
        let root = parse(r#"<?xml version="1.0"?><root id="3"><a>1</a><b/><c><![CDATA[<x>]]></c></root>"#)
            .unwrap();
        assert_eq!(root.name, "root");
        assert_eq!(root.attribute("id"), Some("3"));
        assert_eq!(root.child("a").unwrap().text, "1");
        assert!(root.child("b").unwrap().is_leaf());
        assert_eq!(root.child("c").unwrap().text, "<x>");
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse("<a><b></a>"), Err(Error::Parse { .. })));
        assert!(matches!(parse(""), Err(Error::Parse { .. })));
        assert!(matches!(parse("<a></a><b/>"), Err(Error::Parse { .. })));
    }

    #[test]
    fn serialize_escapes() {
        let mut root = Element::new("root");
        root.attributes.push(("q".into(), "a\"b".into()));
        let mut child = Element::new("t");
        child.text = "1 < 2".into();
        root.children.push(child);
        root.children.push(Element::new("e"));
        assert_eq!(
            serialize(&root, None).unwrap(),
            r#"<root q="a&quot;b"><t>1 &lt; 2</t><e/></root>"#
        );
    }
}
