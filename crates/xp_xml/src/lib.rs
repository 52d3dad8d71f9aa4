//! XML adapter for `xp_pack`.
//!
//! The document root element is the decode root; encoding wraps the value in
//! a root element named by [`XmlFormat::root`].
//!
//! Field behaviour is steered by flags and `xml:` alias options:
//!
//! - `attr`: the field is an attribute of the enclosing element.
//! - `xml_content`: the field is the text of the enclosing element.
//! - `xml:,sbs`: sequence items are siblings instead of being wrapped.
//! - `xml:,vl@item`: name of the wrapped sequence items.
//! - `xml:,cdata`: text is written as a CDATA section.
//!
//! ```
//! use xp_pack::derive::XPack;
//!
//! #[derive(XPack, Default)]
//! struct Item {
//!     #[xpack(attr)]
//!     id: u32,
//!     #[xpack(alias = "tags xml:,vl@tag")]
//!     tags: Vec<String>,
//! }
//!
//! let item = Item { id: 4, tags: vec!["a".into()] };
//! let text = xp_xml::encode_with_root(&item, "item").unwrap();
//! assert_eq!(text, r#"<item id="4"><tags><tag>a</tag></tags></item>"#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod element;
mod node;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use element::{Element, parse};
pub use node::XmlNode;
pub use writer::{XmlFormat, XmlWriter};

use std::path::Path;

use xp_pack::de::{Decode, decode_node};
use xp_pack::ser::{Encode, encode_with};
use xp_pack::{Error, Result};

// -----------------------------------------------------------------------------
// Decode

/// Decode a `T` from XML text.
pub fn decode<T: Decode + Default>(input: &str) -> Result<T> {
    let mut out = T::default();
    decode_into(input, &mut out)?;
    Ok(out)
}

/// Decode into an existing value; elements absent from `input` leave their
/// fields untouched.
pub fn decode_into<T: Decode + ?Sized>(input: &str, out: &mut T) -> Result<bool> {
    let root = parse(input)?;
    decode_element(&root, out)
}

/// Decode a `T` that holds the root element as a member: `<config>..</config>`
/// fills the field `config` of `T` rather than `T` itself.
pub fn decode_with_root<T: Decode + Default>(input: &str) -> Result<T> {
    let mut out = T::default();
    decode_into_with_root(input, &mut out)?;
    Ok(out)
}

/// [`decode_into`] with the root element as a member of `out`.
pub fn decode_into_with_root<T: Decode + ?Sized>(input: &str, out: &mut T) -> Result<bool> {
    let mut document = Element::default();
    document.children.push(parse(input)?);
    decode_element(&document, out)
}

/// Decode from an already parsed root element.
#[inline]
pub fn decode_element<T: Decode + ?Sized>(root: &Element, out: &mut T) -> Result<bool> {
    decode_node(XmlNode::Element(root), out)
}

/// Read and decode the file at `path`.
pub fn decode_file<T: Decode + ?Sized>(path: impl AsRef<Path>, out: &mut T) -> Result<bool> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_into(&text, out)
}

// -----------------------------------------------------------------------------
// Encode

/// XML text under a `<root>` element.
#[inline]
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<String> {
    encode_with(&XmlFormat::default(), value)
}

/// XML text under a root element named `root`.
#[inline]
pub fn encode_with_root<T: Encode + ?Sized>(value: &T, root: &str) -> Result<String> {
    encode_with(&XmlFormat::new(root), value)
}

/// Indented XML text under a `<root>` element.
#[inline]
pub fn encode_pretty<T: Encode + ?Sized>(value: &T, width: usize, ch: char) -> Result<String> {
    encode_with(&XmlFormat::default().pretty(width, ch), value)
}

#[cfg(test)]
mod tests {
    use xp_pack::derive::XPack;

    use super::*;

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Tagged {
        a: i32,
        #[xpack(attr)]
        b: String,
    }

    #[test]
    fn attributes() {
        let value = Tagged {
            a: 1,
            b: "hello".into(),
        };
        let text = encode(&value).unwrap();
        assert_eq!(text, r#"<root b="hello"><a>1</a></root>"#);
        assert_eq!(decode::<Tagged>(&text).unwrap(), value);
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Lists {
        a: Vec<i32>,
        #[xpack(alias = "b xml:,sbs")]
        b: Vec<i32>,
        #[xpack(alias = "c xml:,vl@x")]
        c: Vec<i32>,
    }

    #[test]
    fn sequence_shapes() {
        let value = Lists {
            a: vec![1, 2],
            b: vec![3, 4],
            c: vec![5, 6],
        };
        let text = encode(&value).unwrap();
        assert_eq!(
            text,
            "<root><a><a>1</a><a>2</a></a><b>3</b><b>4</b><c><x>5</x><x>6</x></c></root>"
        );
        assert_eq!(decode::<Lists>(&text).unwrap(), value);
    }

    #[test]
    fn content_and_cdata() {
        #[derive(XPack, Default, Debug, PartialEq)]
        struct Note {
            #[xpack(attr)]
            lang: String,
            #[xpack(xml_content, alias = "body xml:,cdata")]
            body: String,
        }
        let note = Note {
            lang: "en".into(),
            body: "a < b".into(),
        };
        let text = encode_with_root(&note, "note").unwrap();
        assert_eq!(text, r#"<note lang="en"><![CDATA[a < b]]></note>"#);
        assert_eq!(decode::<Note>(&text).unwrap(), note);
    }

    #[test]
    fn empty_elements_and_bools() {
        #[derive(XPack, Default, Debug, PartialEq)]
        struct Flags {
            on: bool,
            name: String,
        }
        let text = encode(&Flags {
            on: true,
            name: String::new(),
        })
        .unwrap();
        assert_eq!(text, "<root><on>true</on><name/></root>");

        let flags: Flags = decode("<root><on>1</on><name>x</name></root>").unwrap();
        assert!(flags.on);
        let err = decode::<Flags>("<root><on>yes</on></root>").unwrap_err();
        assert_eq!(err.to_string(), "parse bool fail. (path: on)");
    }

    #[test]
    fn pretty() {
        let text = encode_pretty(&Tagged { a: 1, b: "x".into() }, 2, ' ').unwrap();
        assert_eq!(text, "<root b=\"x\">\n  <a>1</a>\n</root>");
    }

    #[test]
    fn root_as_member() {
        #[derive(XPack, Default, Debug, PartialEq)]
        struct Settings {
            config: Tagged,
            other: i32,
        }
        let text = r#"<config b="x"><a>1</a><a>7</a></config>"#;
        let settings: Settings = decode_with_root(text).unwrap();
        assert_eq!(settings.config, Tagged { a: 7, b: "x".into() });
        assert_eq!(decode::<Tagged>(text).unwrap(), settings.config);

        let err = decode_with_root::<Settings>("<config><a>z</a></config>").unwrap_err();
        assert!(err.to_string().ends_with("(path: config.a)"));
    }

    #[test]
    fn parse_error() {
        let err = decode::<Tagged>("<root><a>1</root>").unwrap_err();
        assert!(matches!(err, Error::Parse { format: "xml", .. }));
    }
}
