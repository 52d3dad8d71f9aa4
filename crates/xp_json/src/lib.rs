//! JSON adapter for `xp_pack`.
//!
//! Reading goes through a `serde_json` document with source order kept;
//! writing drives a `serde_json` formatter.
//!
//! ```
//! use xp_pack::derive::XPack;
//!
//! #[derive(XPack, Default, Debug, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let user: User = xp_json::decode(r#"{"id": 7, "name": "Jack"}"#).unwrap();
//! assert_eq!(xp_json::encode(&user).unwrap(), r#"{"id":7,"name":"Jack"}"#);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod node;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use node::JsonNode;
pub use writer::{JsonFormat, JsonWriter};

use std::path::Path;

use xp_pack::builder::Builder;
use xp_pack::de::{Decode, decode_node};
use xp_pack::ser::{Encode, encode_with};
use xp_pack::{Error, Result, line_column_offset};

/// Document templates rendered to JSON text.
pub type JsonBuilder = Builder<JsonFormat>;

// -----------------------------------------------------------------------------
// Decode

/// Parse `input` into a `serde_json` document.
pub fn parse(input: &str) -> Result<serde_json::Value> {
    serde_json::from_str(input).map_err(|err| {
        let offset = line_column_offset(input, err.line(), err.column());
        Error::parse("json", err.to_string(), input, offset)
    })
}

/// Decode a `T` from JSON text.
pub fn decode<T: Decode + Default>(input: &str) -> Result<T> {
    let mut out = T::default();
    decode_into(input, &mut out)?;
    Ok(out)
}

/// Decode into an existing value; keys absent from `input` leave their
/// fields untouched.
pub fn decode_into<T: Decode + ?Sized>(input: &str, out: &mut T) -> Result<bool> {
    let doc = parse(input)?;
    decode_value(&doc, out)
}

/// Decode from an already parsed document.
#[inline]
pub fn decode_value<T: Decode + ?Sized>(doc: &serde_json::Value, out: &mut T) -> Result<bool> {
    decode_node(JsonNode(doc), out)
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

/// Compact JSON text.
#[inline]
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<String> {
    encode_with(&JsonFormat::compact(), value)
}

/// Pretty JSON text indented by `width` copies of `ch` per level.
#[inline]
pub fn encode_pretty<T: Encode + ?Sized>(value: &T, width: usize, ch: char) -> Result<String> {
    encode_with(&JsonFormat::pretty(width, ch), value)
}

#[cfg(test)]
mod tests {
    use xp_pack::convert::Convert;
    use xp_pack::de::{Decoder, Node};
    use xp_pack::derive::XPack;
    use xp_pack::extend::Extend;
    use xp_pack::ser::{Encoder, Format, Writer};
    use xp_pack::{Error, Result};

    use super::*;

    #[derive(XPack, Default, Debug, PartialEq)]
    struct User {
        id: i64,
        name: String,
        mail: String,
    }

    #[test]
    fn struct_round_trip() {
        let user = User {
            id: 7,
            name: "Jack".into(),
            mail: "jack@x.com".into(),
        };
        let text = encode(&user).unwrap();
        assert_eq!(text, r#"{"id":7,"name":"Jack","mail":"jack@x.com"}"#);
        assert_eq!(decode::<User>(&text).unwrap(), user);
    }

    #[test]
    fn fixed_array_truncates() {
        let array: [i32; 3] = decode("[1,2,3,4]").unwrap();
        assert_eq!(array, [1, 2, 3]);
    }

    #[test]
    fn mandatory_field() {
        #[derive(XPack, Default, Debug)]
        struct Login {
            #[xpack(mandatory)]
            user: String,
        }
        let err = decode::<Login>("{}").unwrap_err();
        assert!(matches!(&err, Error::MissingMandatoryField { path } if path == "user"));
    }

    #[test]
    fn null_reads_as_zero() {
        let user: User = decode(r#"{"id":null,"name":null}"#).unwrap();
        assert_eq!(user, User::default());
    }

    #[test]
    fn mismatch_reports_path() {
        let err = decode::<User>(r#"{"id":"7"}"#).unwrap_err();
        assert_eq!(err.to_string(), "not integer. (path: id)");
    }

    #[derive(XPack, Default)]
    struct Inner {
        a: i32,
        b: String,
    }

    #[derive(XPack, Default)]
    struct Sparse {
        #[xpack(omitempty)]
        a: i32,
        b: Vec<i32>,
        c: Inner,
        #[xpack(omitempty)]
        d: String,
    }

    #[test]
    fn omit_empty() {
        let value = Sparse {
            b: vec![0, 0],
            ..Default::default()
        };
        assert_eq!(encode(&value).unwrap(), r#"{"b":[0,0],"c":{"a":0,"b":""}}"#);
    }

    #[test]
    fn empty_null() {
        #[derive(XPack, Default)]
        struct Nullable {
            a: i32,
            #[xpack(empty_null)]
            b: String,
            #[xpack(empty_null)]
            c: Vec<i32>,
        }
        let value = Nullable {
            a: 1,
            ..Default::default()
        };
        assert_eq!(encode(&value).unwrap(), r#"{"a":1,"b":null,"c":null}"#);
    }

    struct Hex;

    impl Convert<i64> for Hex {
        fn decode<N: Node>(value: &mut i64, de: &Decoder<'_, N>, _: &Extend) -> Result<bool> {
            let text = de.read_string()?;
            *value = i64::from_str_radix(text.trim_start_matches("0x"), 16).map_err(Error::custom)?;
            Ok(true)
        }

        fn encode<W: Writer>(
            value: &i64,
            en: &mut Encoder<W>,
            key: Option<&str>,
            ext: &Extend,
        ) -> Result<bool> {
            en.write_str(key, &format!("{value:#x}"), ext)
        }
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Registers {
        a: i32,
        b: i32,
        #[xpack(with = Hex)]
        c: i64,
    }

    #[test]
    fn custom_converter() {
        let regs = Registers { a: 1, b: 2, c: 14 };
        let text = encode(&regs).unwrap();
        assert_eq!(text, r#"{"a":1,"b":2,"c":"0xe"}"#);
        assert_eq!(decode::<Registers>(&text).unwrap(), regs);
    }

    #[test]
    fn pretty_with_single_line_arrays() {
        #[derive(XPack, Default)]
        struct Plot {
            name: String,
            #[xpack(single_line)]
            xs: Vec<Vec<i32>>,
            ys: Vec<i32>,
            none: Vec<i32>,
        }
        let plot = Plot {
            name: "p".into(),
            xs: vec![vec![1, 2], vec![3]],
            ys: vec![4],
            none: Vec::new(),
        };
        let expected = "{\n  \"name\": \"p\",\n  \"xs\": [[1, 2], [3]],\n  \"ys\": [\n    4\n  ],\n  \"none\": []\n}";
        assert_eq!(encode_pretty(&plot, 2, ' ').unwrap(), expected);
    }

    #[test]
    fn non_finite_floats_are_unsupported() {
        let err = encode(&vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, Error::Unsupported { format: "json", .. }));
    }

    #[test]
    fn none_items_are_null() {
        let items = vec![Some(1), None, Some(2)];
        assert_eq!(encode(&items).unwrap(), "[1,null,2]");
        assert_eq!(decode::<Vec<Option<i32>>>("[1,null,2]").unwrap(), items);
    }

    #[test]
    fn nothing_written_is_null() {
        assert_eq!(encode(&Option::<i32>::None).unwrap(), "null");
    }

    #[test]
    fn parse_error_has_offset() {
        let err = decode::<User>("{\"id\": 1,\n \"name\" tru}").unwrap_err();
        let Error::Parse { format, offset, .. } = err else {
            panic!("expected parse error");
        };
        assert_eq!(format, "json");
        assert!(offset > 10);
    }

    #[test]
    fn builder_matches_direct_encoding() {
        let builder = JsonBuilder::new("{?:?, 'users':?}");
        assert!(builder.error().is_none());
        let built = xp_pack::build!(builder, "hi", true, vec![1, 2, 3]).unwrap();

        let format = JsonFormat::default();
        let mut en = Encoder::new(format.writer());
        let ext = Extend::DEFAULT;
        en.object_begin(None, ext).unwrap();
        en.write_bool(Some("hi"), true, ext).unwrap();
        en.encode_value(Some("users"), &vec![1, 2, 3], ext).unwrap();
        en.object_end(None, ext).unwrap();
        let direct = format.finish(en.into_writer()).unwrap();

        assert_eq!(built, direct);
        assert_eq!(built, r#"{"hi":true,"users":[1,2,3]}"#);
    }

    #[test]
    fn builder_empty_template_yields_empty_output() {
        let builder = JsonBuilder::new("");
        assert!(builder.error().is_none());
        assert_eq!(builder.build().unwrap(), "");
    }

    #[test]
    fn builder_parse_error_yields_empty_output() {
        let builder = JsonBuilder::new("{'a' 1}");
        assert!(builder.error().is_some());
        assert_eq!(builder.build().unwrap(), "");
    }
}
