//! BSON adapter for `xp_pack`.
//!
//! The top level of a BSON value is always a document. [`ObjectId`] and
//! [`DateTime`] map to the native BSON types here and to their extended JSON
//! shapes in every other format.
//!
//! ```
//! use xp_bson::ObjectId;
//! use xp_pack::derive::XPack;
//!
//! #[derive(XPack, Default, Debug, PartialEq)]
//! struct Record {
//!     #[xpack(alias = "id bson:_id")]
//!     id: ObjectId,
//!     score: f64,
//! }
//!
//! let record = Record { id: ObjectId::new(), score: 0.5 };
//! let bytes = xp_bson::encode(&record).unwrap();
//! assert_eq!(xp_bson::decode::<Record>(&bytes).unwrap(), record);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod node;
mod special;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use node::BsonNode;
pub use special::{DateTime, ObjectId};
pub use writer::{BsonFormat, BsonWriter, DocumentFormat};

use std::path::Path;

use bson::{Bson, Document};
use xp_pack::builder::Builder;
use xp_pack::de::{Decode, decode_node};
use xp_pack::ser::{Encode, encode_with};
use xp_pack::{Error, Result};

/// Document templates rendered to BSON bytes.
///
/// ```
/// use xp_bson::BsonBuilder;
///
/// let builder = BsonBuilder::new("{'$set': {?: ?}}");
/// let bytes = xp_pack::build!(builder, "age", 30).unwrap();
/// let json = xp_bson::encode_as_json(&bytes).unwrap();
/// assert_eq!(json, r#"{"$set":{"age":30}}"#);
/// ```
pub type BsonBuilder = Builder<BsonFormat>;

// -----------------------------------------------------------------------------
// Decode

/// Parse BSON bytes into a document.
pub fn parse(bytes: &[u8]) -> Result<Document> {
    Document::from_reader(bytes).map_err(|err| Error::parse("bson", err.to_string(), "", 0))
}

/// Decode a `T` from BSON bytes.
pub fn decode<T: Decode + Default>(bytes: &[u8]) -> Result<T> {
    let mut out = T::default();
    decode_into(bytes, &mut out)?;
    Ok(out)
}

/// Decode into an existing value; keys absent from `bytes` leave their
/// fields untouched.
pub fn decode_into<T: Decode + ?Sized>(bytes: &[u8], out: &mut T) -> Result<bool> {
    let doc = parse(bytes)?;
    decode_document(&doc, out)
}

/// Decode from an already parsed document.
#[inline]
pub fn decode_document<T: Decode + ?Sized>(doc: &Document, out: &mut T) -> Result<bool> {
    decode_node(BsonNode::Document(doc), out)
}

/// Read and decode the file at `path`.
pub fn decode_file<T: Decode + ?Sized>(path: impl AsRef<Path>, out: &mut T) -> Result<bool> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_into(&bytes, out)
}

// -----------------------------------------------------------------------------
// Encode

/// BSON bytes. Fails with [`Error::Unsupported`] unless `value` is a document.
#[inline]
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>> {
    encode_with(&BsonFormat, value)
}

/// The `bson` document of `value`.
#[inline]
pub fn encode_document<T: Encode + ?Sized>(value: &T) -> Result<Document> {
    encode_with(&DocumentFormat, value)
}

/// BSON bytes rendered as relaxed extended JSON.
pub fn encode_as_json(bytes: &[u8]) -> Result<String> {
    let doc = parse(bytes)?;
    Ok(Bson::Document(doc).into_relaxed_extjson().to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use bson::doc;
    use xp_pack::derive::XPack;

    use super::*;

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Event {
        #[xpack(alias = "id bson:_id")]
        id: ObjectId,
        at: DateTime,
        kind: String,
        tags: Vec<String>,
        counts: BTreeMap<String, i64>,
        #[xpack(omitempty)]
        note: Option<String>,
    }

    fn sample() -> Event {
        Event {
            id: ObjectId::parse_str("65f1a2b3c4d5e6f708192a3b").unwrap(),
            at: DateTime::from_millis(1_700_000_000_000),
            kind: "click".into(),
            tags: vec!["a".into(), "b".into()],
            counts: BTreeMap::from([("x".into(), 1), ("y".into(), 1 << 40)]),
            note: None,
        }
    }

    #[test]
    fn native_types_round_trip() {
        let event = sample();
        let doc = encode_document(&event).unwrap();
        assert!(matches!(doc.get("_id"), Some(Bson::ObjectId(_))));
        assert!(matches!(doc.get("at"), Some(Bson::DateTime(_))));
        assert_eq!(doc.get_document("counts").unwrap().get("x"), Some(&Bson::Int32(1)));
        assert!(!doc.contains_key("note"));

        let bytes = encode(&event).unwrap();
        assert_eq!(decode::<Event>(&bytes).unwrap(), event);
    }

    #[test]
    fn special_types_through_json_shapes() {
        let json = encode_as_json(&encode(&sample()).unwrap()).unwrap();
        assert!(json.starts_with(r#"{"_id":{"$oid":"65f1a2b3c4d5e6f708192a3b"},"at":{"$date":"#));
    }

    #[test]
    fn top_level_must_be_a_document() {
        let err = encode(&vec![1, 2]).unwrap_err();
        assert!(matches!(err, Error::Unsupported { format: "bson", .. }));
        assert!(encode(&Option::<i32>::None).is_ok());
    }

    #[test]
    fn decode_errors() {
        assert!(matches!(decode::<Event>(&[1, 2, 3]), Err(Error::Parse { .. })));

        let mut raw = Vec::new();
        doc! { "kind": 3, "tags": "x" }.to_writer(&mut raw).unwrap();
        let err = decode::<Event>(&raw).unwrap_err();
        assert_eq!(err.to_string(), "not string. (path: kind)");
    }

    #[test]
    fn builder() {
        let builder = BsonBuilder::new("{'name': ?, 'tags': [?, 'fixed']}");
        let bytes = xp_pack::build!(builder, "n", "t").unwrap();
        let doc = parse(&bytes).unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "n");
        assert_eq!(doc.get_array("tags").unwrap().len(), 2);
    }
}
