use crate::extend::Extend;
use crate::ser::{Encode, Encoder, Format};
use crate::{Error, Result};

use super::Builder;
use super::template::{Item, Key};
use super::token::Token;

/// One replay of a [`Builder`] template.
///
/// Every placeholder consumes one [`arg`](Session::arg), left to right.
/// Literal parts of the template are written as the replay reaches them.
pub struct Session<'b, F: Format> {
    builder: &'b Builder<F>,
    en: Option<Encoder<F::Writer>>,
    pos: usize,
    supplied: usize,
    key: Option<String>,
    scopes: Vec<Option<String>>,
}

impl<'b, F> Session<'b, F>
where
    F: Format,
    F::Output: Default + Clone,
{
    pub(super) fn new(builder: &'b Builder<F>) -> Self {
        let en = match (&builder.error, &builder.cached) {
            (None, None) => Some(Encoder::new(builder.format.writer())),
            _ => None,
        };
        Self {
            builder,
            en,
            pos: 0,
            supplied: 0,
            key: None,
            scopes: Vec::new(),
        }
    }

    /// Bind the next placeholder to `value`.
    ///
    /// A key placeholder needs a string argument and fails with
    /// [`Error::InvalidKeyType`] otherwise. An argument past the last
    /// placeholder fails with [`Error::TemplateArity`].
    pub fn arg<T: Encode + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let index = self.supplied;
        self.supplied += 1;
        if self.builder.error.is_some() {
            return Ok(self);
        }
        let builder = self.builder;
        let Some(en) = self.en.as_mut() else {
            return Err(self.arity());
        };

        if let Some(key) = self.key.take() {
            en.encode_value(Some(&key), value, Extend::DEFAULT)?;
            self.pos += 1;
            return Ok(self);
        }

        self.flush()?;
        let Some(item) = builder.template.items.get(self.pos) else {
            return Err(self.arity());
        };
        if item.key == Key::Variable {
            let key = value
                .as_key_str()
                .ok_or(Error::InvalidKeyType { index })?;
            if item.token == Token::Variable {
                self.key = Some(key.to_owned());
            } else {
                self.emit(item, Some(key))?;
                self.pos += 1;
            }
            return Ok(self);
        }

        let key = match &item.key {
            Key::Literal(key) => Some(key.as_str()),
            _ => None,
        };
        if let Some(en) = self.en.as_mut() {
            en.encode_value(key, value, Extend::DEFAULT)?;
        }
        self.pos += 1;
        Ok(self)
    }

    /// Write the rest of the template and produce the document.
    ///
    /// A template that failed to parse produces the empty output.
    pub fn finish(mut self) -> Result<F::Output> {
        if let Some(message) = &self.builder.error {
            log::warn!("builder used with a template that failed to parse: {message}");
            return Ok(F::Output::default());
        }
        if let Some(cached) = &self.builder.cached {
            return Ok(cached.clone());
        }
        if self.key.is_some() {
            return Err(self.arity());
        }
        self.flush()?;
        if self.pos < self.builder.template.items.len() {
            return Err(self.arity());
        }
        match self.en.take() {
            Some(en) => self.builder.format.finish(en.into_writer()),
            None => Ok(F::Output::default()),
        }
    }

    fn arity(&self) -> Error {
        Error::TemplateArity {
            expected: self.builder.template.variables,
            supplied: self.supplied,
        }
    }

    /// Write literal items up to the next placeholder.
    fn flush(&mut self) -> Result<()> {
        let builder = self.builder;
        while let Some(item) = builder.template.items.get(self.pos) {
            if item.has_variable() {
                break;
            }
            let key = match &item.key {
                Key::Literal(key) => Some(key.as_str()),
                _ => None,
            };
            self.emit(item, key)?;
            self.pos += 1;
        }
        Ok(())
    }

    fn emit(&mut self, item: &Item, key: Option<&str>) -> Result<()> {
        let Some(en) = self.en.as_mut() else {
            return Ok(());
        };
        let ext = Extend::DEFAULT;
        match &item.token {
            Token::ObjectBegin => {
                en.object_begin(key, ext)?;
                self.scopes.push(key.map(Into::into));
            }
            Token::ArrayBegin => {
                en.array_begin(key, ext)?;
                self.scopes.push(key.map(Into::into));
            }
            Token::ObjectEnd => {
                let key = self.scopes.pop().flatten();
                en.object_end(key.as_deref(), ext)?;
            }
            Token::ArrayEnd => {
                let key = self.scopes.pop().flatten();
                en.array_end(key.as_deref(), ext)?;
            }
            Token::Integer(value) => {
                en.write_i64(key, *value, ext)?;
            }
            Token::Float(value) => {
                en.write_f64(key, *value, ext)?;
            }
            Token::String(value) => {
                en.write_str(key, value, ext)?;
            }
            Token::Bool(value) => {
                en.write_bool(key, *value, ext)?;
            }
            Token::Comma | Token::Colon | Token::Variable => {}
        }
        Ok(())
    }
}
