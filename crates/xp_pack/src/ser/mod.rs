//! The encode driver.
//!
//! A format adapter receives values through [`Writer`]; the [`Encoder`]
//! applies the empty-value policies and drives [`Encode`] implementations.

// -----------------------------------------------------------------------------
// Modules

mod encoder;
mod tree;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use encoder::Encoder;
pub use tree::{Tree, TreeBuilder};
pub use writer::{Format, Indent, Writer};

use crate::Result;
use crate::classify::Typed;
use crate::extend::Extend;

/// A type that can be written to any [`Writer`].
///
/// `key` names the value inside the enclosing object; it is `None` for
/// array items and for the top-level value. `encode` returns whether
/// anything was written.
pub trait Encode: Typed {
    fn encode<W: Writer>(&self, en: &mut Encoder<W>, key: Option<&str>, ext: &Extend)
    -> Result<bool>;

    /// Whether the value counts as empty for
    /// [`OMIT_EMPTY`](crate::extend::Flags::OMIT_EMPTY) and
    /// [`EMPTY_NULL`](crate::extend::Flags::EMPTY_NULL).
    #[inline]
    fn is_empty_value(&self) -> bool {
        false
    }

    /// The value as a map key, for types that are strings.
    #[inline]
    fn as_key_str(&self) -> Option<&str> {
        None
    }
}

/// Encode `value` as a whole document of `format`.
pub fn encode_with<F: Format, T: Encode + ?Sized>(format: &F, value: &T) -> Result<F::Output> {
    let mut en = Encoder::new(format.writer());
    en.encode_value(None, value, Extend::DEFAULT)?;
    format.finish(en.into_writer())
}

#[cfg(test)]
mod tests {
    use crate::derive::XPack;
    use crate::to_value;
    use crate::value::Value;

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
        #[xpack(omitempty)]
        c: Inner,
        #[xpack(omitempty)]
        d: Option<i32>,
        e: Option<i32>,
    }

    fn keys(value: &Value) -> Vec<&str> {
        match value {
            Value::Object(entries) => entries.iter().map(|(k, _)| k.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn omit_empty_skips_zero_values() {
        let value = to_value(&Sparse {
            b: vec![0, 0],
            ..Default::default()
        })
        .unwrap();
        // Structs are never empty; untagged `None` writes nothing.
        assert_eq!(keys(&value), ["b", "c"]);
        assert_eq!(value["c"]["a"].as_i64(), Some(0));
        assert_eq!(value["c"]["b"].as_str(), Some(""));
    }

    #[derive(XPack, Default)]
    struct Nullable {
        a: i32,
        #[xpack(empty_null)]
        b: String,
        #[xpack(empty_null)]
        c: Option<Vec<i32>>,
    }

    #[test]
    fn empty_null_writes_null() {
        let value = to_value(&Nullable {
            a: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(keys(&value), ["a", "b", "c"]);
        assert!(value["b"].is_null());
        assert!(value["c"].is_null());
    }

    #[derive(XPack, Default)]
    struct Base {
        id: i64,
    }

    #[derive(XPack, Default)]
    struct Derived {
        name: String,
        #[xpack(inherit)]
        base: Base,
    }

    #[test]
    fn bases_come_first_without_wrapper() {
        let value = to_value(&Derived {
            name: "n".into(),
            base: Base { id: 4 },
        })
        .unwrap();
        assert_eq!(keys(&value), ["id", "name"]);
    }

    #[test]
    fn alias_names_by_format() {
        #[derive(XPack, Default)]
        struct Tagged {
            #[xpack(alias = "tag value:v")]
            t: u8,
        }
        let value = to_value(&Tagged { t: 1 }).unwrap();
        assert_eq!(keys(&value), ["v"]);
    }
}
