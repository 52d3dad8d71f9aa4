//! Per-field flags and per-format aliases.
//!
//! Every field use site carries an [`Extend`]: a [`Flags`] set, a raw custom
//! slot for converters and an optional [`Alias`].
//!
//! ## Alias syntax
//!
//! ```text
//! default json:alt xml:alt2,flag,key@value
//! ```
//!
//! Groups are separated by spaces. A group without `:` sets the default name;
//! `format:` groups override the name for that format and may carry boolean
//! flags and `key@value` pairs after commas. An empty override name keeps the
//! default, so `xml:,sbs` only adds a flag.
//!
//! ```
//! use xp_pack::extend::Alias;
//!
//! let alias = Alias::parse("id json:_id xml:,sbs,vl@item");
//! assert_eq!(alias.name("json"), Some("_id"));
//! assert_eq!(alias.name("xml"), Some("id"));
//! assert_eq!(alias.name("yaml"), Some("id"));
//! assert!(alias.flag("xml", "sbs"));
//! assert_eq!(alias.value("xml", "vl"), Some("item"));
//! ```

use bitflags::bitflags;

bitflags! {
    /// Field flags shared by every format.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        /// Skip the field on encode when it holds its empty value.
        const OMIT_EMPTY = 1 << 0;
        /// Fail decoding when the key is missing.
        const MANDATORY = 1 << 1;
        /// Write an explicit null for empty values where the format has null.
        const EMPTY_NULL = 1 << 2;
        /// XML: attribute of the enclosing element.
        const ATTR = 1 << 3;
        /// JSON: keep an array on one line when pretty printing.
        const SINGLE_LINE = 1 << 4;
        /// XML: text content of the enclosing element.
        const XML_CONTENT = 1 << 5;
    }
}

// -----------------------------------------------------------------------------
// Alias

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FormatAlias {
    format: Box<str>,
    name: Option<Box<str>>,
    flags: Vec<Box<str>>,
    values: Vec<(Box<str>, Box<str>)>,
}

/// Parsed alias specification of one field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alias {
    default: Option<Box<str>>,
    formats: Vec<FormatAlias>,
}

impl Alias {
    /// Parse an alias specification. Malformed groups are ignored.
    pub fn parse(spec: &str) -> Self {
        let mut alias = Self::default();
        for group in spec.split(' ').filter(|g| !g.is_empty()) {
            match group.split_once(':') {
                None => {
                    let name = group.split(',').next().unwrap_or_default();
                    if !name.is_empty() {
                        alias.default = Some(name.into());
                    }
                }
                Some((format, rest)) if !format.is_empty() && !rest.contains(':') => {
                    let mut parts = rest.split(',');
                    let name = parts.next().filter(|n| !n.is_empty()).map(Into::into);
                    let mut entry = FormatAlias {
                        format: format.into(),
                        name,
                        ..Default::default()
                    };
                    for part in parts.filter(|p| !p.is_empty()) {
                        match part.split_once('@') {
                            Some((key, value)) => entry.values.push((key.into(), value.into())),
                            None => entry.flags.push(part.into()),
                        }
                    }
                    alias.formats.retain(|f| f.format != entry.format);
                    alias.formats.push(entry);
                }
                Some(_) => {}
            }
        }
        alias
    }

    fn format(&self, format: &str) -> Option<&FormatAlias> {
        self.formats.iter().find(|f| &*f.format == format)
    }

    /// The default name, if one was given.
    #[inline]
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The name to use for `format`: its override, else the default.
    pub fn name(&self, format: &str) -> Option<&str> {
        self.format(format)
            .and_then(|f| f.name.as_deref())
            .or(self.default.as_deref())
    }

    /// Whether `format` carries the boolean flag `flag`.
    pub fn flag(&self, format: &str, flag: &str) -> bool {
        self.format(format)
            .is_some_and(|f| f.flags.iter().any(|x| &**x == flag))
    }

    /// The `key@value` flag of `format`.
    pub fn value(&self, format: &str, key: &str) -> Option<&str> {
        self.format(format)?
            .values
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| &**v)
    }
}

// -----------------------------------------------------------------------------
// Extend

/// Flags, custom slot and alias of one field use site.
///
/// Values reached without a field (sequence items, map values, top-level
/// values) use [`Extend::DEFAULT`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extend {
    flags: Flags,
    custom: u32,
    alias: Option<Alias>,
}

static DEFAULT_EXTEND: Extend = Extend::new(Flags::empty());

impl Extend {
    /// Shared empty extension.
    pub const DEFAULT: &'static Extend = &DEFAULT_EXTEND;

    /// An extension with `flags` and nothing else.
    #[inline]
    pub const fn new(flags: Flags) -> Self {
        Self {
            flags,
            custom: 0,
            alias: None,
        }
    }

    /// Attach the raw custom flag slot.
    #[inline]
    pub const fn with_custom(mut self, custom: u32) -> Self {
        self.custom = custom;
        self
    }

    /// Attach a parsed alias.
    #[inline]
    pub fn with_alias(mut self, alias: Alias) -> Self {
        self.alias = Some(alias);
        self
    }

    #[inline]
    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// The raw custom flag slot.
    #[inline]
    pub const fn custom(&self) -> u32 {
        self.custom
    }

    #[inline]
    pub fn alias(&self) -> Option<&Alias> {
        self.alias.as_ref()
    }

    #[inline]
    pub const fn omit_empty(&self) -> bool {
        self.flags.contains(Flags::OMIT_EMPTY)
    }

    #[inline]
    pub const fn mandatory(&self) -> bool {
        self.flags.contains(Flags::MANDATORY)
    }

    #[inline]
    pub const fn empty_null(&self) -> bool {
        self.flags.contains(Flags::EMPTY_NULL)
    }

    #[inline]
    pub const fn attribute(&self) -> bool {
        self.flags.contains(Flags::ATTR)
    }

    #[inline]
    pub const fn single_line(&self) -> bool {
        self.flags.contains(Flags::SINGLE_LINE)
    }

    #[inline]
    pub const fn xml_content(&self) -> bool {
        self.flags.contains(Flags::XML_CONTENT)
    }

    /// Shortcut for [`Alias::flag`]; `false` without an alias.
    #[inline]
    pub fn alias_flag(&self, format: &str, flag: &str) -> bool {
        self.alias.as_ref().is_some_and(|a| a.flag(format, flag))
    }

    /// Shortcut for [`Alias::value`].
    #[inline]
    pub fn alias_value(&self, format: &str, key: &str) -> Option<&str> {
        self.alias.as_ref()?.value(format, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groups() {
        let alias = Alias::parse("def json:alt xml:alt2,flag,key@val");
        assert_eq!(alias.default_name(), Some("def"));
        assert_eq!(alias.name("json"), Some("alt"));
        assert_eq!(alias.name("xml"), Some("alt2"));
        assert_eq!(alias.name("bson"), Some("def"));
        assert!(alias.flag("xml", "flag"));
        assert!(!alias.flag("json", "flag"));
        assert_eq!(alias.value("xml", "key"), Some("val"));
        assert_eq!(alias.value("xml", "missing"), None);
    }

    #[test]
    fn format_only() {
        let alias = Alias::parse("json:_id");
        assert_eq!(alias.default_name(), None);
        assert_eq!(alias.name("json"), Some("_id"));
        assert_eq!(alias.name("xml"), None);
    }

    #[test]
    fn malformed_groups_are_ignored() {
        let alias = Alias::parse("  a:b:c  :x name ");
        assert_eq!(alias.default_name(), Some("name"));
        assert_eq!(alias.name("a"), Some("name"));
    }

    #[test]
    fn later_group_wins() {
        let alias = Alias::parse("json:a json:b");
        assert_eq!(alias.name("json"), Some("b"));
    }

    #[test]
    fn extend_flags() {
        let ext = Extend::new(Flags::OMIT_EMPTY | Flags::ATTR).with_custom(7);
        assert!(ext.omit_empty());
        assert!(ext.attribute());
        assert!(!ext.mandatory());
        assert_eq!(ext.custom(), 7);
        assert!(!ext.alias_flag("xml", "sbs"));
        assert!(Extend::DEFAULT.flags().is_empty());
    }
}
