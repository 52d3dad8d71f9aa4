//! Document templates.
//!
//! A [`Builder`] parses a compact template once and replays it with runtime
//! arguments for every document it produces:
//!
//! ```text
//! { 'name': ?, ?: [1, 2.5, true], 'tags': ? }
//! ```
//!
//! Strings are single quoted; `?` (optionally followed by a name, `?id`) is a
//! placeholder for a value or a key. Each placeholder binds one argument, left
//! to right, and arguments are written through their [`Encode`] impl.
//!
//! ```
//! use xp_pack::builder::Builder;
//! use xp_pack::value::{Value, ValueFormat};
//!
//! let builder = Builder::<ValueFormat>::new("{?:?, 'users':?}");
//! let doc = xp_pack::build!(builder, "hi", true, vec![1, 2, 3]).unwrap();
//! assert_eq!(doc["hi"], Value::Bool(true));
//! assert_eq!(doc["users"][2].as_i64(), Some(3));
//! ```
//!
//! A malformed template does not fail construction: the message is kept,
//! reported by [`Builder::error`], and every replay yields the empty output.

// -----------------------------------------------------------------------------
// Modules

mod session;
mod template;
mod token;

// -----------------------------------------------------------------------------
// Exports

pub use session::Session;

use crate::ser::Format;
use crate::{Error, Result};

use template::Template;

/// A parsed template bound to an output [`Format`].
pub struct Builder<F: Format> {
    format: F,
    template: Template,
    error: Option<String>,
    cached: Option<F::Output>,
}

impl<F> Builder<F>
where
    F: Format + Default,
    F::Output: Default + Clone,
{
    /// Parse `template` for the default options of `F`.
    #[inline]
    pub fn new(template: &str) -> Self {
        Self::with_format(F::default(), template)
    }
}

impl<F> Builder<F>
where
    F: Format,
    F::Output: Default + Clone,
{
    /// Parse `template` for `format`.
    ///
    /// A template without placeholders is rendered here, once. An empty
    /// template renders the empty output, like one that failed to parse.
    pub fn with_format(format: F, template: &str) -> Self {
        let (template, error) = match Template::parse(template) {
            Ok(parsed) => (parsed, None),
            Err(message) => {
                log::debug!("template `{template}` failed to parse: {message}");
                (Template::default(), Some(message))
            }
        };
        let mut builder = Self {
            format,
            template,
            error,
            cached: None,
        };
        if builder.error.is_none() && builder.template.items.is_empty() {
            builder.cached = Some(F::Output::default());
        } else if builder.error.is_none() && builder.template.variables == 0 {
            let rendered = builder.start().finish();
            match rendered {
                Ok(output) => builder.cached = Some(output),
                Err(err) => {
                    log::debug!("template rendering failed: {err}");
                    builder.error = Some(err.to_string());
                }
            }
        }
        builder
    }

    /// The parse error of the template, if any.
    pub fn error(&self) -> Option<Error> {
        self.error.as_ref().map(|message| Error::TemplateParse {
            message: message.clone(),
        })
    }

    /// Number of placeholders, i.e. arguments expected by a replay.
    #[inline]
    pub fn variables(&self) -> usize {
        self.template.variables
    }

    /// The output options.
    #[inline]
    pub fn format(&self) -> &F {
        &self.format
    }

    /// Begin a replay.
    #[inline]
    pub fn start(&self) -> Session<'_, F> {
        Session::new(self)
    }

    /// Replay a template without placeholders.
    #[inline]
    pub fn build(&self) -> Result<F::Output> {
        self.start().finish()
    }
}

/// Replay a [`Builder`] with the given arguments.
///
/// `build!(builder, a, b)` is `builder.start()`, `.arg(&a)`, `.arg(&b)`,
/// `.finish()`, stopping at the first error.
#[macro_export]
macro_rules! build {
    ($builder:expr $(, $arg:expr)* $(,)?) => {
        (|| -> $crate::Result<_> {
            let mut session = $builder.start();
            $( session.arg(&$arg)?; )*
            session.finish()
        })()
    };
}

#[cfg(test)]
mod tests {
    use super::Builder;
    use crate::value::{Value, ValueFormat};
    use crate::{Error, to_value};

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[test]
    fn replay_matches_direct_encoding() {
        let builder = Builder::<ValueFormat>::new("{?:?, 'users':?}");
        assert!(builder.error().is_none());
        assert_eq!(builder.variables(), 3);

        let doc = build!(builder, "hi", true, vec![1, 2, 3]).unwrap();
        let direct = object(vec![
            ("hi", Value::Bool(true)),
            ("users", to_value(&vec![1, 2, 3]).unwrap()),
        ]);
        assert_eq!(doc, direct);

        let again = build!(builder, "bye", 7_u8, Vec::<i32>::new()).unwrap();
        assert_eq!(again["bye"].as_u64(), Some(7));
    }

    #[test]
    fn literals_and_nesting() {
        let builder = Builder::<ValueFormat>::new("{'a':[1, -2.5, 'x', false], 'b':{'c':?}, 'd':[?, {}]}");
        let doc = build!(builder, "deep", 9_i64).unwrap();
        assert_eq!(doc["a"][1].as_f64(), Some(-2.5));
        assert_eq!(doc["a"][2].as_str(), Some("x"));
        assert_eq!(doc["b"]["c"].as_str(), Some("deep"));
        assert_eq!(doc["d"][0].as_i64(), Some(9));
        assert_eq!(doc["d"][1], Value::Object(Vec::new()));
    }

    #[test]
    fn key_placeholder_on_container() {
        let builder = Builder::<ValueFormat>::new("{?:[?], ?:{'k':1}}");
        let doc = build!(builder, "list", 1_i32, "map").unwrap();
        assert_eq!(doc["list"][0].as_i64(), Some(1));
        assert_eq!(doc["map"]["k"].as_i64(), Some(1));
    }

    #[test]
    fn arity_errors() {
        let builder = Builder::<ValueFormat>::new("{'a':?, 'b':?}");
        let err = build!(builder, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::TemplateArity {
                expected: 2,
                supplied: 1
            }
        ));
        assert!(err.to_string().starts_with("less variable"));

        let err = build!(builder, 1, 2, 3).unwrap_err();
        assert!(matches!(
            err,
            Error::TemplateArity {
                expected: 2,
                supplied: 3
            }
        ));
    }

    #[test]
    fn key_must_be_string() {
        let builder = Builder::<ValueFormat>::new("{'a':1, ?:2}");
        let err = build!(builder, 5).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType { index: 0 }));
    }

    #[test]
    fn parse_error_yields_empty_output() {
        let builder = Builder::<ValueFormat>::new("{'a':?");
        let err = builder.error().unwrap();
        assert_eq!(err.to_string(), "template parse error: miss } at the end of string");
        assert_eq!(build!(builder, 1).unwrap(), Value::Null);
    }

    #[test]
    fn empty_template_yields_empty_output() {
        let builder = Builder::<ValueFormat>::new("  ");
        assert!(builder.error().is_none());
        assert_eq!(builder.variables(), 0);
        assert_eq!(builder.build().unwrap(), Value::Null);
        assert!(matches!(
            build!(builder, 1).unwrap_err(),
            Error::TemplateArity { .. }
        ));
    }

    #[test]
    fn constant_template_is_cached() {
        let builder = Builder::<ValueFormat>::new("['x', {'y':true}]");
        assert_eq!(builder.variables(), 0);
        let first = builder.build().unwrap();
        assert_eq!(first[1]["y"].as_bool(), Some(true));
        assert_eq!(builder.build().unwrap(), first);
        assert!(matches!(
            build!(builder, 1).unwrap_err(),
            Error::TemplateArity { .. }
        ));
    }
}
