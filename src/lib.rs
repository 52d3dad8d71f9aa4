#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use xp_pack as pack;

#[cfg(feature = "json")]
pub use xp_json as json;

#[cfg(feature = "xml")]
pub use xp_xml as xml;

#[cfg(feature = "yaml")]
pub use xp_yaml as yaml;

#[cfg(feature = "bson")]
pub use xp_bson as bson;

#[cfg(feature = "sql")]
pub use xp_sql as sql;

pub use xp_pack::derive::XPack;
pub use xp_pack::{Error, Result};
