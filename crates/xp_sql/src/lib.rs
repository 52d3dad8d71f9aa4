//! Relational row adapter for `xp_pack`.
//!
//! A [`RowSet`] holds named, typed columns and text cells. Structs decode
//! from the first row, sequences of structs from every row. `NULL` cells
//! count as absent keys, cells decoded into structs or containers are read
//! as JSON text, and date or time columns decoded into integers give Unix
//! seconds.
//!
//! ```
//! use xp_pack::derive::XPack;
//! use xp_sql::{Column, ColumnType, RowSet};
//!
//! #[derive(XPack, Default, Debug, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let mut set = RowSet::new(vec![
//!     Column::new("id", ColumnType::Integer),
//!     Column::new("name", ColumnType::Text),
//! ]);
//! set.push_row(vec![Some("7".into()), Some("Jack".into())]).unwrap();
//!
//! let users: Vec<User> = xp_sql::decode(&set).unwrap();
//! assert_eq!(users, [User { id: 7, name: "Jack".into() }]);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod node;
mod rows;

#[cfg(feature = "sqlite")]
mod sqlite;

// -----------------------------------------------------------------------------
// Exports

pub use node::RowNode;
pub use rows::{Cell, Column, ColumnType, RowSet, RowSource};

#[cfg(feature = "sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "sqlite")))]
pub use sqlite::{SqliteSource, query};

use xp_pack::de::{Decode, decode_node};
use xp_pack::{Category, Result};

#[inline]
const fn is_rows(category: Category) -> bool {
    matches!(category, Category::Array | Category::Sequence | Category::Set)
}

// -----------------------------------------------------------------------------
// Decode

/// Decode a `T` from `set`; see [`decode_rows`].
pub fn decode<T: Decode + Default>(set: &RowSet) -> Result<T> {
    let mut out = T::default();
    decode_rows(set, &mut out)?;
    Ok(out)
}

/// Decode every row into a sequence, or the first row into anything else.
///
/// An empty set leaves a non-sequence `out` untouched and returns `false`.
pub fn decode_rows<T: Decode + ?Sized>(set: &RowSet, out: &mut T) -> Result<bool> {
    if is_rows(T::CATEGORY) {
        return decode_node(RowNode::Rows(set), out);
    }
    if set.is_empty() {
        return Ok(false);
    }
    decode_node(RowNode::Row(set, 0), out)
}

/// Decode the column `name` of every row into a sequence, or of the first
/// row into anything else.
///
/// A missing column, an empty set and a `NULL` first cell all return `false`.
pub fn decode_column<T: Decode + ?Sized>(set: &RowSet, name: &str, out: &mut T) -> Result<bool> {
    let Some(index) = set.column_index(name) else {
        return Ok(false);
    };
    if is_rows(T::CATEGORY) {
        return decode_node(RowNode::Column(set, index), out);
    }
    let column = &set.columns()[index];
    match set.cell(0, index) {
        Some(cell) if cell.text().is_some() => decode_node(RowNode::cell(column, cell), out),
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use xp_pack::derive::XPack;

    use super::*;

    #[derive(XPack, Default, Debug, PartialEq)]
    struct Profile {
        city: String,
        tags: Vec<String>,
    }

    #[derive(XPack, Default, Debug, PartialEq)]
    struct User {
        id: u32,
        name: String,
        joined: i64,
        profile: Profile,
        #[xpack(alias = "score db:rating")]
        score: f64,
    }

    fn users() -> RowSet {
        let mut set = RowSet::new(vec![
            Column::new("id", ColumnType::Integer),
            Column::new("name", ColumnType::Text),
            Column::new("joined", ColumnType::Date),
            Column::new("profile", ColumnType::Text),
            Column::new("rating", ColumnType::Float),
        ]);
        set.push_row(vec![
            Some("1".into()),
            Some("ann".into()),
            Some("1970-01-03".into()),
            Some(r#"{"city": "Oslo", "tags": ["a"]}"#.into()),
            Some("4.5".into()),
        ])
        .unwrap();
        set.push_row(vec![Some("2".into()), None, None, None, None])
            .unwrap();
        set
    }

    #[test]
    fn struct_from_first_row() {
        let user: User = decode(&users()).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.joined, 2 * 86_400);
        assert_eq!(user.profile.city, "Oslo");
        assert_eq!(user.profile.tags, ["a"]);
        assert_eq!(user.score, 4.5);

        let mut none = User::default();
        let empty = RowSet::new(users().columns().to_vec());
        assert!(!decode_rows(&empty, &mut none).unwrap());
    }

    #[test]
    fn sequence_from_all_rows() {
        let users: Vec<User> = decode(&users()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id, 2);
        assert_eq!(users[1].name, "");
        assert_eq!(users[1].profile, Profile::default());
    }

    #[test]
    fn null_cells_keep_current_values() {
        let mut user = User {
            name: "kept".into(),
            ..User::default()
        };
        let mut set = RowSet::new(users().columns().to_vec());
        set.push_row(vec![Some("9".into()), None, None, None, None])
            .unwrap();
        decode_rows(&set, &mut user).unwrap();
        assert_eq!(user.id, 9);
        assert_eq!(user.name, "kept");
    }

    #[test]
    fn single_columns() {
        let set = users();
        let mut ids = Vec::<u32>::new();
        decode_column(&set, "id", &mut ids).unwrap();
        assert_eq!(ids, [1, 2]);

        let mut name = String::new();
        assert!(decode_column(&set, "name", &mut name).unwrap());
        assert_eq!(name, "ann");
        assert!(!decode_column(&set, "missing", &mut name).unwrap());

        let mut profile = BTreeMap::<String, Vec<String>>::new();
        let mut only_tags = RowSet::new(vec![Column::new("p", ColumnType::Text)]);
        only_tags
            .push_row(vec![Some(r#"{"x": ["1", "2"]}"#.into())])
            .unwrap();
        decode_column(&only_tags, "p", &mut profile).unwrap();
        assert_eq!(profile["x"], ["1", "2"]);
    }

    #[test]
    fn mismatches_carry_paths() {
        let mut set = RowSet::new(vec![Column::new("id", ColumnType::Integer)]);
        set.push_row(vec![Some("x".into())]).unwrap();
        let err = decode::<Vec<User>>(&set).unwrap_err();
        assert_eq!(err.to_string(), "not integer. (path: [0].id)");
    }
}
