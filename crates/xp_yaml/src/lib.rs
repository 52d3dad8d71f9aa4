//! YAML adapter for `xp_pack`, backed by `serde_yaml` documents.
//!
//! ```
//! use xp_pack::derive::XPack;
//!
//! #[derive(XPack, Default, Debug, PartialEq)]
//! struct Service {
//!     name: String,
//!     ports: Vec<u16>,
//! }
//!
//! let service: Service = xp_yaml::decode("name: web\nports: [80, 443]\n").unwrap();
//! assert_eq!(service.ports, [80, 443]);
//! assert_eq!(xp_yaml::encode(&service).unwrap(), "name: web\nports:\n- 80\n- 443\n");
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod node;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use node::YamlNode;
pub use writer::{YamlFormat, YamlWriter};

use std::path::Path;

use xp_pack::de::{Decode, decode_node};
use xp_pack::ser::{Encode, encode_with};
use xp_pack::{Error, Result};

// -----------------------------------------------------------------------------
// Decode

/// Parse `input` into a `serde_yaml` document.
pub fn parse(input: &str) -> Result<serde_yaml::Value> {
    serde_yaml::from_str(input).map_err(|err| {
        let offset = err.location().map_or(0, |loc| loc.index());
        Error::parse("yaml", err.to_string(), input, offset)
    })
}

/// Decode a `T` from YAML text.
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
pub fn decode_value<T: Decode + ?Sized>(doc: &serde_yaml::Value, out: &mut T) -> Result<bool> {
    decode_node(YamlNode(doc), out)
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

/// YAML text.
#[inline]
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<String> {
    encode_with(&YamlFormat, value)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use xp_pack::derive::XPack;
    use xp_pack::value::Value;

    use super::*;

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Limits {
        cpu: f64,
        memory: u64,
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Deployment {
        name: String,
        replicas: i32,
        enabled: bool,
        #[xpack(alias = "limits yaml:resources")]
        limits: Limits,
        labels: BTreeMap<String, String>,
        #[xpack(omitempty)]
        note: String,
    }

    const DOC: &str = "\
name: api
replicas: 3
enabled: true
resources:
  cpu: 0.5
  memory: 512
labels:
  app: api
  tier: backend
";

    #[test]
    fn decode_and_encode() {
        let dep: Deployment = decode(DOC).unwrap();
        assert_eq!(dep.name, "api");
        assert_eq!(dep.limits.cpu, 0.5);
        assert_eq!(dep.labels["tier"], "backend");
        assert_eq!(encode(&dep).unwrap(), DOC);
    }

    #[test]
    fn mapping_order_is_kept() {
        let value: Value = decode("z: 1\na: 2\n").unwrap();
        let Value::Object(entries) = &value else {
            panic!("expected object");
        };
        assert_eq!(entries[0].0, "z");
        assert_eq!(entries[1].0, "a");
    }

    #[test]
    fn errors() {
        let err = decode::<Deployment>("replicas: [1]\n").unwrap_err();
        assert_eq!(err.to_string(), "not integer. (path: replicas)");
        let err = decode::<Deployment>("name: [unclosed\n").unwrap_err();
        assert!(matches!(err, Error::Parse { format: "yaml", .. }));
    }
}
