use crate::{Error, Result};

/// A document tree that can be assembled bottom-up.
pub trait Tree: Sized {
    fn object() -> Self;

    fn array() -> Self;

    /// Append `child` to the container `self`. Objects require a key.
    fn insert(&mut self, key: Option<&str>, child: Self) -> Result<()>;
}

/// Builds a [`Tree`] from the scope-bracketed calls of a
/// [`Writer`](crate::ser::Writer).
///
/// Writers of formats whose library works on a document tree delegate to
/// this and convert the finished root.
pub struct TreeBuilder<T> {
    stack: Vec<(Option<String>, T)>,
    root: Option<T>,
}

impl<T: Tree> TreeBuilder<T> {
    #[inline]
    pub const fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
        }
    }

    /// Depth of currently open scopes.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The innermost open container.
    #[inline]
    pub fn current(&self) -> Option<&T> {
        self.stack.last().map(|(_, node)| node)
    }

    pub fn begin_object(&mut self, key: Option<&str>) {
        self.stack.push((key.map(Into::into), T::object()));
    }

    pub fn begin_array(&mut self, key: Option<&str>) {
        self.stack.push((key.map(Into::into), T::array()));
    }

    /// Close the innermost scope and attach it to its parent.
    pub fn end(&mut self) -> Result<()> {
        let (key, node) = self
            .stack
            .pop()
            .ok_or_else(|| Error::custom("scope end without begin"))?;
        self.push(key.as_deref(), node)
    }

    /// Attach a finished value to the innermost open scope, or make it the
    /// root when no scope is open.
    pub fn push(&mut self, key: Option<&str>, value: T) -> Result<()> {
        match self.stack.last_mut() {
            Some((_, parent)) => parent.insert(key, value),
            None if self.root.is_none() => {
                self.root = Some(value);
                Ok(())
            }
            None => Err(Error::custom("more than one top-level value")),
        }
    }

    /// The finished root; `None` when nothing was written.
    pub fn finish(self) -> Result<Option<T>> {
        if !self.stack.is_empty() {
            return Err(Error::custom("unclosed scope"));
        }
        Ok(self.root)
    }
}

impl<T: Tree> Default for TreeBuilder<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
