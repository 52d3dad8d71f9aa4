//! Descriptor tables generated for `#[derive(XPack)]` structs.
//!
//! A [`StructInfo`] lists the directly declared fields of a struct plus the
//! tables of the bases it flattens (`#[xpack(inherit)]`). Tables are built on
//! first use and live for the rest of the program.
//!
//! ```
//! use xp_pack::{derive::XPack, Fields};
//!
//! #[derive(XPack, Default)]
//! struct Base {
//!     id: i64,
//! }
//!
//! #[derive(XPack, Default)]
//! struct User {
//!     #[xpack(inherit)]
//!     base: Base,
//!     #[xpack(alias = "mail xml:email", omitempty)]
//!     mail_address: String,
//! }
//!
//! let info = User::struct_info();
//! assert_eq!(info.type_name(), "User");
//! assert_eq!(info.fields().len(), 1);
//!
//! let names: Vec<_> = info.all_fields().iter().map(|f| f.name_for("xml")).collect();
//! assert_eq!(names, ["id", "email"]);
//! ```

use core::any::TypeId;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::Result;
use crate::classify::{Category, Typed};
use crate::de::{Decoder, Node};
use crate::extend::Extend;
use crate::ser::{Encoder, Writer};

// -----------------------------------------------------------------------------
// FieldInfo

/// One declared field: name, category of its type and flags.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    category: Category,
    extend: Extend,
}

impl FieldInfo {
    /// A field named `name` holding a `T`.
    #[inline]
    pub fn new<T: Typed + ?Sized>(name: &'static str, extend: Extend) -> Self {
        Self::with_category(name, T::CATEGORY, extend)
    }

    /// A field whose category is decided by its converter.
    #[inline]
    pub fn with_category(name: &'static str, category: Category, extend: Extend) -> Self {
        Self {
            name,
            category,
            extend,
        }
    }

    /// The declared identifier.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The key used by `format`: its alias override, else the alias default,
    /// else the declared identifier.
    pub fn name_for(&self, format: &str) -> &str {
        self.extend
            .alias()
            .and_then(|alias| alias.name(format))
            .unwrap_or(self.name)
    }

    #[inline]
    pub const fn category(&self) -> Category {
        self.category
    }

    #[inline]
    pub const fn extend(&self) -> &Extend {
        &self.extend
    }
}

// -----------------------------------------------------------------------------
// StructInfo

/// Descriptor table of a struct.
#[derive(Debug)]
pub struct StructInfo {
    type_name: &'static str,
    bases: Vec<&'static StructInfo>,
    fields: Vec<FieldInfo>,
}

impl StructInfo {
    #[inline]
    pub fn new(type_name: &'static str, fields: Vec<FieldInfo>) -> Self {
        Self {
            type_name,
            bases: Vec::new(),
            fields,
        }
    }

    /// Append a flattened base. Bases come before own fields, in the order added.
    #[inline]
    pub fn with_base(mut self, base: &'static StructInfo) -> Self {
        self.bases.push(base);
        self
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn bases(&self) -> &[&'static StructInfo] {
        &self.bases
    }

    /// Directly declared fields, in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Look up a directly declared field by identifier.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Every field as encoded: base fields first, recursively, then own.
    pub fn all_fields(&self) -> Vec<&FieldInfo> {
        let mut out = Vec::with_capacity(self.fields.len());
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a FieldInfo>) {
        for base in &self.bases {
            base.collect_fields(out);
        }
        out.extend(self.fields.iter());
    }
}

// -----------------------------------------------------------------------------
// Cells

/// Static storage of the table of a non-generic struct.
pub struct StructInfoCell(OnceLock<StructInfo>);

impl StructInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> StructInfo) -> &StructInfo {
        self.0.get_or_init(f)
    }
}

/// Static storage of the tables of a generic struct.
///
/// The `static` inside a generic function is shared by every instantiation,
/// so the tables are keyed by [`TypeId`] and leaked once per type.
pub struct GenericStructInfoCell(RwLock<Option<HashMap<TypeId, &'static StructInfo>>>);

impl GenericStructInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(None))
    }

    pub fn get_or_insert<T: 'static>(&self, f: impl FnOnce() -> StructInfo) -> &'static StructInfo {
        let id = TypeId::of::<T>();
        {
            let map = self.0.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(info) = map.as_ref().and_then(|m| m.get(&id)) {
                return *info;
            }
        }
        // Built outside the lock: `f` may ask for other tables.
        let built = f();
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *map.get_or_insert_with(HashMap::new)
            .entry(id)
            .or_insert_with(|| Box::leak(Box::new(built)))
    }
}

// -----------------------------------------------------------------------------
// Fields

/// Field traversal of a struct, implemented by `#[derive(XPack)]`.
///
/// Decoding and encoding a struct walks [`Fields::struct_info`] in order,
/// flattening inherited bases into the same object.
pub trait Fields: Typed {
    fn struct_info() -> &'static StructInfo;

    /// Decode every field from the object `de` points at.
    fn decode_fields<N: Node>(&mut self, de: &Decoder<'_, N>) -> Result<bool>;

    /// Write every field into the currently open object.
    fn encode_fields<W: Writer>(&self, en: &mut Encoder<W>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extend::{Alias, Flags};

    fn base() -> &'static StructInfo {
        static CELL: StructInfoCell = StructInfoCell::new();
        CELL.get_or_init(|| {
            StructInfo::new("Base", vec![FieldInfo::new::<i64>("id", Extend::default())])
        })
    }

    #[test]
    fn flattening_is_base_first() {
        let info = StructInfo::new(
            "Derived",
            vec![
                FieldInfo::new::<String>("id", Extend::default()),
                FieldInfo::new::<bool>("ok", Extend::new(Flags::OMIT_EMPTY)),
            ],
        )
        .with_base(base());

        let all: Vec<_> = info.all_fields().iter().map(|f| f.name()).collect();
        assert_eq!(all, ["id", "id", "ok"]);
        assert_eq!(all_categories(&info), [Category::Number, Category::String, Category::Bool]);
        assert!(info.field("ok").is_some_and(|f| f.extend().omit_empty()));
    }

    fn all_categories(info: &StructInfo) -> Vec<Category> {
        info.all_fields().iter().map(|f| f.category()).collect()
    }

    #[test]
    fn alias_resolution() {
        let plain = FieldInfo::new::<i64>("user_id", Extend::default());
        assert_eq!(plain.name_for("json"), "user_id");

        let ext = Extend::default().with_alias(Alias::parse("uid bson:_id"));
        let aliased = FieldInfo::new::<i64>("user_id", ext);
        assert_eq!(aliased.name_for("json"), "uid");
        assert_eq!(aliased.name_for("bson"), "_id");
    }

    #[test]
    fn generic_cell_keys_by_type() {
        static CELL: GenericStructInfoCell = GenericStructInfoCell::new();
        let a = CELL.get_or_insert::<u8>(|| StructInfo::new("A", Vec::new()));
        let b = CELL.get_or_insert::<u16>(|| StructInfo::new("B", Vec::new()));
        let a2 = CELL.get_or_insert::<u8>(|| StructInfo::new("C", Vec::new()));
        assert_eq!(a.type_name(), "A");
        assert_eq!(b.type_name(), "B");
        assert!(core::ptr::eq(a, a2));
    }
}
