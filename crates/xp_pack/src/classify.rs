use core::fmt;

/// How the drivers treat a type.
///
/// The categories are mutually exclusive. When a type could match several
/// shapes, the one listed first here wins: a struct with a registered
/// converter is [`XType`](Category::XType), not [`Struct`](Category::Struct).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Native representation in some formats, generic object elsewhere.
    Special,
    /// Format-independent custom converter.
    XType,
    /// Struct whose fields are declared on a mirror type.
    External,
    /// Struct with `#[derive(XPack)]`.
    Struct,
    /// Field-less enum mapped to its integer value.
    Enum,
    /// Present or absent value.
    Optional,
    /// Fixed-size array.
    Array,
    /// Ordered, growable sequence.
    Sequence,
    /// Unordered membership container.
    Set,
    /// String, integer or enum keyed container.
    Map,
    Bool,
    Number,
    String,
}

impl Category {
    /// Whether the category holds a single leaf value.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        matches!(self, Self::Bool | Self::Number | Self::String | Self::Enum)
    }

    /// Whether the category is written as an array.
    #[inline]
    pub const fn is_list(self) -> bool {
        matches!(self, Self::Array | Self::Sequence | Self::Set)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Special => "special",
            Self::XType => "xtype",
            Self::External => "external struct",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Optional => "optional",
            Self::Array => "array",
            Self::Sequence => "sequence",
            Self::Set => "set",
            Self::Map => "map",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
        };
        f.pad(name)
    }
}

/// Static classification of a mappable type.
pub trait Typed {
    const CATEGORY: Category;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads() {
        assert_eq!(format!("{:>8}", Category::Map), "     map");
        assert_eq!(Category::External.to_string(), "external struct");
    }

    #[test]
    fn shapes() {
        assert!(Category::Enum.is_primitive());
        assert!(!Category::Struct.is_primitive());
        assert!(Category::Set.is_list());
        assert!(!Category::Map.is_list());
    }
}
