use alloc::borrow::Cow;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Alias for results produced by this crate and the format adapters.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Everything that can abort a decode, an encode or a builder replay.
///
/// Errors raised by a node or a writer do not know where they happened; the
/// driver fills in the navigation path (`group.members[2].mail`) on the way
/// out, see [`Error::with_path`].
///
/// Key conversion failures inside maps are not errors: the entry is skipped.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input is not a well-formed document.
    #[error("{format} parse error at offset {offset}: {message}{}", fmt_context(.context))]
    Parse {
        format: &'static str,
        message: String,
        offset: usize,
        context: String,
    },
    /// A field flagged `mandatory` has no node.
    #[error("mandatory key not found. (path: {path})")]
    MissingMandatoryField { path: String },
    /// The node holds something the target type cannot be read from.
    #[error("{message}{}", fmt_path(.path))]
    TypeMismatch {
        path: Option<String>,
        message: Cow<'static, str>,
    },
    /// Indexed navigation past the end of an array.
    #[error("index {index} out of range for size {size}{}", fmt_path(.path))]
    OutOfIndex {
        path: Option<String>,
        index: usize,
        size: usize,
    },
    /// A builder template failed to parse.
    #[error("template parse error: {message}")]
    TemplateParse { message: String },
    /// A builder replay got the wrong number of arguments.
    #[error("{}", fmt_arity(.expected, .supplied))]
    TemplateArity { expected: usize, supplied: usize },
    /// A builder key placeholder was bound to something that is not a string.
    #[error("variable {index} is a key, must be a string")]
    InvalidKeyType { index: usize },
    /// The writer cannot represent the value.
    #[error("{format} cannot encode {message}{}", fmt_path(.path))]
    Unsupported {
        format: &'static str,
        path: Option<String>,
        message: Cow<'static, str>,
    },
    /// Reading an input file failed.
    #[error("failed to read `{}`: {source}", fmt_file(.path))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Raised by user converters.
    #[error("{message}{}", fmt_path(.path))]
    Custom {
        path: Option<String>,
        message: String,
    },
}

fn fmt_path(path: &Option<String>) -> String {
    match path {
        Some(path) if !path.is_empty() => format!(". (path: {path})"),
        _ => String::new(),
    }
}

fn fmt_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" near `{context}`")
    }
}

fn fmt_file(path: &std::path::Path) -> String {
    path.display().to_string()
}

fn fmt_arity(expected: &usize, supplied: &usize) -> String {
    if supplied < expected {
        format!("less variable: template has {expected}, got {supplied}")
    } else {
        format!("too many variables: template has {expected}, got {supplied}")
    }
}

const CONTEXT_RADIUS: usize = 16;

impl Error {
    /// A [`TypeMismatch`](Error::TypeMismatch) without a path yet.
    #[inline]
    pub fn mismatch(message: impl Into<Cow<'static, str>>) -> Self {
        Self::TypeMismatch {
            path: None,
            message: message.into(),
        }
    }

    /// A [`Custom`](Error::Custom) error without a path yet.
    #[inline]
    pub fn custom(message: impl core::fmt::Display) -> Self {
        Self::Custom {
            path: None,
            message: message.to_string(),
        }
    }

    /// An [`Unsupported`](Error::Unsupported) error without a path yet.
    #[inline]
    pub fn unsupported(format: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unsupported {
            format,
            path: None,
            message: message.into(),
        }
    }

    /// A [`Parse`](Error::Parse) error with a snippet of `input` around `offset`.
    pub fn parse(format: &'static str, message: impl Into<String>, input: &str, offset: usize) -> Self {
        Self::Parse {
            format,
            message: message.into(),
            offset,
            context: snippet(input, offset),
        }
    }

    /// Fill in the navigation path if the error does not carry one.
    ///
    /// `path` is only called when needed.
    pub fn with_path(mut self, path: impl FnOnce() -> String) -> Self {
        match &mut self {
            Self::TypeMismatch { path: slot, .. }
            | Self::OutOfIndex { path: slot, .. }
            | Self::Unsupported { path: slot, .. }
            | Self::Custom { path: slot, .. } => {
                if slot.is_none() {
                    *slot = Some(path());
                }
            }
            _ => {}
        }
        self
    }

    /// The navigation path carried by the error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingMandatoryField { path } => Some(path),
            Self::TypeMismatch { path, .. }
            | Self::OutOfIndex { path, .. }
            | Self::Unsupported { path, .. }
            | Self::Custom { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

fn snippet(input: &str, offset: usize) -> String {
    let offset = offset.min(input.len());
    let mut start = offset.saturating_sub(CONTEXT_RADIUS);
    while !input.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + CONTEXT_RADIUS).min(input.len());
    while !input.is_char_boundary(end) {
        end += 1;
    }
    input[start..end].replace(['\n', '\r'], " ")
}

/// Byte offset of a 1-based `line` and `column` in `input`.
///
/// Used by adapters whose parser reports positions as line and column.
pub fn line_column_offset(input: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, text) in input.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return (offset + column.saturating_sub(1)).min(input.len());
        }
        offset += text.len();
    }
    input.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_filled_once() {
        let err = Error::mismatch("not integer")
            .with_path(|| "a.b".into())
            .with_path(|| "c".into());
        assert_eq!(err.path(), Some("a.b"));
        assert_eq!(err.to_string(), "not integer. (path: a.b)");
    }

    #[test]
    fn arity_message() {
        let err = Error::TemplateArity {
            expected: 3,
            supplied: 1,
        };
        assert!(err.to_string().starts_with("less variable"));
    }

    #[test]
    fn parse_snippet() {
        let err = Error::parse("json", "bad", "{\"a\":\n tru}", 9);
        let Error::Parse { context, .. } = &err else {
            panic!("expected parse error");
        };
        assert!(context.contains("tru"));
        assert!(!context.contains('\n'));
    }

    #[test]
    fn line_column() {
        let text = "ab\ncd\nef";
        assert_eq!(line_column_offset(text, 1, 1), 0);
        assert_eq!(line_column_offset(text, 2, 2), 4);
        assert_eq!(line_column_offset(text, 3, 1), 6);
    }
}
