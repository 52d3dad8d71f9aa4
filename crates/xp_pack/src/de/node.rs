use core::any::Any;
use core::fmt;

use crate::Result;
use crate::extend::Extend;

/// What a node holds, as far as the driver cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
    /// Format-specific leaf, e.g. a BSON object id.
    Other,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
            Self::Other => "other",
        };
        f.pad(name)
    }
}

/// Read-only view into one format's parsed document.
///
/// Nodes are cheap borrowed handles; the document outlives every node taken
/// from it. Errors returned here carry no path, the [`Decoder`] adds it.
///
/// Null handling is done by the decoder: the leaf readers are only called on
/// non-null nodes.
///
/// [`Decoder`]: crate::de::Decoder
pub trait Node: Sized {
    /// Format tag used for alias lookup (`"json"`, `"xml"`, ...).
    const FORMAT: &'static str;

    fn kind(&self) -> NodeKind;

    #[inline]
    fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    /// Child under `key`. `Ok(None)` means absent, which is different from a
    /// present null child.
    fn find(&self, key: &str, ext: &Extend) -> Result<Option<Self>>;

    /// Number of items; fails when the node is not an array.
    fn size(&self) -> Result<usize>;

    /// Item at `index`, `None` past the end.
    fn at(&self, index: usize) -> Result<Option<Self>>;

    /// Every `(key, child)` pair in document order; fails when the node is
    /// not an object.
    fn for_each_entry(&self, f: &mut dyn FnMut(&str, Self) -> Result<()>) -> Result<()>;

    fn read_bool(&self) -> Result<bool>;

    fn read_i64(&self) -> Result<i64>;

    fn read_u64(&self) -> Result<u64>;

    fn read_f64(&self) -> Result<f64>;

    fn read_string(&self) -> Result<String>;

    /// Decode a format-specific special type natively.
    ///
    /// Return `None` to let the type's generic representation handle it;
    /// `Some(result)` bypasses it entirely.
    #[inline]
    fn decode_special(&self, target: &mut dyn Any, ext: &Extend) -> Option<Result<bool>> {
        let _ = (target, ext);
        None
    }
}
