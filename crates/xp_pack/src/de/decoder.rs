use core::any::Any;
use core::fmt::Write as _;

use alloc::borrow::Cow;

use crate::convert::Convert;
use crate::de::{Decode, Node, NodeKind};
use crate::extend::Extend;
use crate::info::FieldInfo;
use crate::{Error, Result};

#[derive(Clone, Copy, Debug)]
enum Segment<'p> {
    Root,
    Key(&'p str),
    Index(usize),
}

/// A node together with the way it was reached.
///
/// Decoders form a parent-linked chain on the call stack; the chain renders
/// as a path like `group.members[2].mail` for error messages.
///
/// Decoding is permissive about nulls: a null node reads as `false`, `0`,
/// `0.0` or the empty string, and as an empty container. This is
/// independent from [`Flags::MANDATORY`](crate::extend::Flags::MANDATORY),
/// which only looks at whether the key exists.
pub struct Decoder<'p, N> {
    node: N,
    parent: Option<&'p Decoder<'p, N>>,
    segment: Segment<'p>,
}

impl<'p, N: Node> Decoder<'p, N> {
    /// A root decoder.
    #[inline]
    pub fn new(node: N) -> Self {
        Self {
            node,
            parent: None,
            segment: Segment::Root,
        }
    }

    #[inline]
    fn child<'c>(&'c self, node: N, segment: Segment<'c>) -> Decoder<'c, N> {
        Decoder {
            node,
            parent: Some(self),
            segment,
        }
    }

    /// The wrapped node.
    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.node.is_null()
    }

    /// Render the navigation path from the root to this node.
    pub fn path(&self) -> String {
        let mut chain = Vec::new();
        let mut cursor = Some(self);
        while let Some(de) = cursor {
            chain.push(de.segment);
            cursor = de.parent;
        }

        let mut out = String::new();
        for segment in chain.iter().rev() {
            match segment {
                Segment::Root => {}
                Segment::Key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                Segment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }

    /// Attach this node's path to `err` unless it already has one.
    #[inline]
    pub fn error(&self, err: Error) -> Error {
        err.with_path(|| self.path())
    }

    /// A [`TypeMismatch`](Error::TypeMismatch) at this node.
    #[inline]
    pub fn mismatch(&self, message: impl Into<Cow<'static, str>>) -> Error {
        self.error(Error::mismatch(message))
    }

    // -------------------------------------------------------------------------
    // Navigation

    /// Child under `key`.
    ///
    /// Absence is `Ok(None)` unless `ext` is mandatory, which raises
    /// [`MissingMandatoryField`](Error::MissingMandatoryField).
    pub fn find<'c>(&'c self, key: &'c str, ext: &Extend) -> Result<Option<Decoder<'c, N>>> {
        match self.node.find(key, ext).map_err(|e| self.error(e))? {
            Some(node) => Ok(Some(self.child(node, Segment::Key(key)))),
            None if ext.mandatory() => Err(Error::MissingMandatoryField {
                path: self.child_path(Segment::Key(key)),
            }),
            None => Ok(None),
        }
    }

    fn child_path(&self, segment: Segment<'_>) -> String {
        let mut path = self.path();
        match segment {
            Segment::Key(key) => {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(key);
            }
            Segment::Index(index) => {
                let _ = write!(path, "[{index}]");
            }
            Segment::Root => {}
        }
        path
    }

    /// Number of items; a null node has none.
    pub fn size(&self) -> Result<usize> {
        if self.is_null() {
            return Ok(0);
        }
        self.node.size().map_err(|e| self.error(e))
    }

    /// Item at `index`, raising [`OutOfIndex`](Error::OutOfIndex) past the end.
    pub fn at(&self, index: usize) -> Result<Decoder<'_, N>> {
        match self.node.at(index).map_err(|e| self.error(e))? {
            Some(node) => Ok(self.child(node, Segment::Index(index))),
            None => Err(Error::OutOfIndex {
                path: Some(self.path()),
                index,
                size: self.size()?,
            }),
        }
    }

    /// Visit every `(key, child)` pair; a null node has none.
    pub fn for_each_entry(
        &self,
        mut f: impl FnMut(&str, &Decoder<'_, N>) -> Result<()>,
    ) -> Result<()> {
        if self.is_null() {
            return Ok(());
        }
        let mut visit = |key: &str, node: N| {
            let child = self.child(node, Segment::Key(key));
            f(key, &child)
        };
        self.node
            .for_each_entry(&mut visit)
            .map_err(|e| self.error(e))
    }

    // -------------------------------------------------------------------------
    // Leaves

    pub fn read_bool(&self) -> Result<bool> {
        if self.is_null() {
            return Ok(false);
        }
        self.node.read_bool().map_err(|e| self.error(e))
    }

    pub fn read_i64(&self) -> Result<i64> {
        if self.is_null() {
            return Ok(0);
        }
        self.node.read_i64().map_err(|e| self.error(e))
    }

    pub fn read_u64(&self) -> Result<u64> {
        if self.is_null() {
            return Ok(0);
        }
        self.node.read_u64().map_err(|e| self.error(e))
    }

    pub fn read_f64(&self) -> Result<f64> {
        if self.is_null() {
            return Ok(0.0);
        }
        self.node.read_f64().map_err(|e| self.error(e))
    }

    pub fn read_string(&self) -> Result<String> {
        if self.is_null() {
            return Ok(String::new());
        }
        self.node.read_string().map_err(|e| self.error(e))
    }

    /// Offer `target` to the format's native handling of special types.
    pub fn decode_special(&self, target: &mut dyn Any, ext: &Extend) -> Option<Result<bool>> {
        self.node
            .decode_special(target, ext)
            .map(|r| r.map_err(|e| self.error(e)))
    }

    // -------------------------------------------------------------------------
    // Dispatch

    /// Decode this node into `value`.
    #[inline]
    pub fn decode_value<T: Decode + ?Sized>(&self, value: &mut T, ext: &Extend) -> Result<bool> {
        value.decode(self, ext).map_err(|e| self.error(e))
    }

    /// Decode the child under `key` into `value`; see [`Decoder::find`].
    pub fn decode_key<T: Decode + ?Sized>(
        &self,
        key: &str,
        value: &mut T,
        ext: &Extend,
    ) -> Result<bool> {
        match self.find(key, ext)? {
            Some(child) => child.decode_value(value, ext),
            None => Ok(false),
        }
    }

    /// Decode a declared field under its alias-resolved name.
    #[inline]
    pub fn decode_field<T: Decode + ?Sized>(&self, value: &mut T, field: &FieldInfo) -> Result<bool> {
        self.decode_key(field.name_for(N::FORMAT), value, field.extend())
    }

    /// Decode a declared field through the converter `C`.
    pub fn decode_field_with<C, T>(&self, value: &mut T, field: &FieldInfo) -> Result<bool>
    where
        C: Convert<T>,
        T: ?Sized,
    {
        let ext = field.extend();
        match self.find(field.name_for(N::FORMAT), ext)? {
            Some(child) => C::decode(value, &child, ext).map_err(|e| child.error(e)),
            None => Ok(false),
        }
    }
}
