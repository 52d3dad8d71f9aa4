//! The decode driver.
//!
//! A format adapter exposes its parsed document through [`Node`]; the
//! [`Decoder`] wraps a node with its navigation path and drives [`Decode`]
//! implementations over it.

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod node;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::Decoder;
pub use node::{Node, NodeKind};

use crate::Result;
use crate::classify::Typed;
use crate::extend::Extend;

/// A type that can be populated from any [`Node`].
///
/// `decode` returns whether the value was set. Absent keys leave the value
/// untouched and report `false`.
pub trait Decode: Typed {
    fn decode<N: Node>(&mut self, de: &Decoder<'_, N>, ext: &Extend) -> Result<bool>;
}

/// Decode `value` from the document root `node`.
pub fn decode_node<N: Node, T: Decode + ?Sized>(node: N, value: &mut T) -> Result<bool> {
    Decoder::new(node).decode_value(value, Extend::DEFAULT)
}

#[cfg(test)]
mod tests {
    use crate::convert::Via;
    use crate::derive::XPack;
    use crate::value::Value;
    use crate::{Error, decode_value, from_value};

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Member {
        id: i64,
        #[xpack(alias = "email")]
        mail: String,
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Group {
        name: String,
        members: Vec<Member>,
        leader: Option<Member>,
    }

    #[test]
    fn nested_structs_and_containers() {
        let value = object(vec![
            ("name", "ops".into()),
            (
                "members",
                Value::Array(vec![
                    object(vec![("id", Value::Int(1)), ("email", "a@x".into())]),
                    object(vec![("id", Value::Int(2))]),
                ]),
            ),
        ]);
        let group: Group = from_value(&value).unwrap();
        assert_eq!(group.name, "ops");
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.members[0].mail, "a@x");
        assert_eq!(group.members[1].mail, "");
        assert_eq!(group.leader, None);
    }

    #[test]
    fn mismatch_carries_full_path() {
        let value = object(vec![(
            "members",
            Value::Array(vec![
                object(vec![("id", Value::Int(1))]),
                object(vec![("id", Value::Int(2))]),
                object(vec![("email", Value::Int(3))]),
            ]),
        )]);
        let err = from_value::<Group>(&value).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        assert_eq!(err.path(), Some("members[2].email"));
    }

    #[derive(XPack, Default, Debug)]
    struct Login {
        #[xpack(mandatory)]
        user: String,
        #[xpack(mandatory)]
        code: i32,
    }

    #[test]
    fn mandatory_field_missing() {
        let err = from_value::<Login>(&object(vec![])).unwrap_err();
        match &err {
            Error::MissingMandatoryField { path } => assert_eq!(path, "user"),
            other => panic!("unexpected error {other}"),
        }
        assert!(err.to_string().contains("mandatory key not found"));

        // A null value is present: the key exists and reads as zero.
        let login: Login =
            from_value(&object(vec![("user", "u".into()), ("code", Value::Null)])).unwrap();
        assert_eq!(login.code, 0);
    }

    #[test]
    fn absent_keys_keep_current_values() {
        let mut member = Member {
            id: 9,
            mail: "keep".into(),
        };
        let set = decode_value(&object(vec![("id", Value::Int(3))]), &mut member).unwrap();
        assert!(set);
        assert_eq!(member.id, 3);
        assert_eq!(member.mail, "keep");
    }

    #[test]
    fn fixed_array_truncates() {
        let value = Value::Array((1..=4).map(Value::Int).collect());
        let arr: [i32; 3] = from_value(&value).unwrap();
        assert_eq!(arr, [1, 2, 3]);
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Base {
        id: i64,
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Derived {
        #[xpack(inherit)]
        base: Base,
        name: String,
        #[xpack(skip)]
        cache: Vec<u8>,
    }

    #[test]
    fn inherited_fields_are_flat() {
        let value = object(vec![
            ("id", Value::Int(5)),
            ("name", "n".into()),
            ("cache", Value::Array(vec![Value::Int(1)])),
        ]);
        let derived: Derived = from_value(&value).unwrap();
        assert_eq!(derived.base.id, 5);
        assert_eq!(derived.name, "n");
        assert!(derived.cache.is_empty());
    }

    #[derive(XPack, Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord)]
    enum Level {
        #[default]
        Low = 0,
        High = 5,
    }

    #[test]
    fn enums_by_value() {
        let level: Level = from_value(&Value::Int(5)).unwrap();
        assert_eq!(level, Level::High);
        let err = from_value::<Level>(&Value::Int(3)).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        let map: alloc::collections::BTreeMap<Level, bool> =
            from_value(&object(vec![("5", Value::Bool(true)), ("7", Value::Bool(true))])).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&Level::High), Some(&true));
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Pair<T> {
        left: T,
        right: Option<T>,
    }

    #[test]
    fn generic_structs() {
        let pair: Pair<String> = from_value(&object(vec![("left", "l".into())])).unwrap();
        assert_eq!(pair.left, "l");
        assert_eq!(pair.right, None);
        let pair: Pair<u8> = from_value(&object(vec![("right", Value::Int(2))])).unwrap();
        assert_eq!(pair.right, Some(2));
    }

    mod geo {
        #[derive(Default, Debug, PartialEq)]
        pub struct Point {
            pub x: i32,
            pub y: i32,
        }
    }

    #[derive(XPack)]
    #[xpack(remote = "geo::Point")]
    struct PointDef {
        x: i32,
        #[xpack(alias = "yy")]
        y: i32,
    }

    #[derive(XPack, Default)]
    struct Shape {
        #[xpack(with = PointDef)]
        origin: geo::Point,
        path: Vec<Via<PointDef, geo::Point>>,
    }

    #[test]
    fn remote_structs() {
        let point = |x, y| object(vec![("x", Value::Int(x)), ("yy", Value::Int(y))]);
        let value = object(vec![
            ("origin", point(1, 2)),
            ("path", Value::Array(vec![point(3, 4)])),
        ]);
        let shape: Shape = from_value(&value).unwrap();
        assert_eq!(shape.origin, geo::Point { x: 1, y: 2 });
        assert_eq!(shape.path[0].value, geo::Point { x: 3, y: 4 });
        assert_eq!(PointDef::__struct_info().fields().len(), 2);
        let _unused = PointDef { x: 0, y: 0 };
    }
}
