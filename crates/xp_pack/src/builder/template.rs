use super::token::{Token, TokenKind, Tokenizer};

/// Key attached to a value inside an object.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Key {
    None,
    Literal(String),
    Variable,
}

/// One instruction of a parsed template.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Item {
    pub token: Token,
    pub key: Key,
}

impl Item {
    /// Whether replaying this item consumes arguments.
    #[inline]
    pub fn has_variable(&self) -> bool {
        matches!(self.token, Token::Variable) || self.key == Key::Variable
    }

    /// Arguments consumed by this item.
    #[inline]
    fn variables(&self) -> usize {
        usize::from(matches!(self.token, Token::Variable)) + usize::from(self.key == Key::Variable)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object,
    Array,
}

/// The instruction list of a template.
#[derive(Debug, Default)]
pub(crate) struct Template {
    pub items: Vec<Item>,
    pub variables: usize,
}

impl Template {
    /// Parse `input`. The error is a message, kept by the builder.
    pub(crate) fn parse(input: &str) -> Result<Self, String> {
        let mut tokenizer = Tokenizer::new(input);
        let mut items: Vec<Item> = Vec::new();
        let mut stack: Vec<Scope> = Vec::new();
        let mut pending_key: Option<Key> = None;
        let mut wait_key = false;
        let mut expect = TokenKind::OBJECT_BEGIN | TokenKind::ARRAY_BEGIN;

        while let Some(token) = tokenizer.next_token()? {
            let kind = token.kind();
            if !expect.intersects(kind) {
                let mut message = format!(
                    "unexpected token. expect[{}]. but get[{}]",
                    expect.names(),
                    kind.names()
                );
                if let Token::String(text) = &token {
                    message.push_str(&format!(". in [{text}]"));
                }
                return Err(message);
            }

            let key = pending_key.take().unwrap_or(Key::None);
            let in_object = stack.last() == Some(&Scope::Object);
            match token {
                Token::ObjectBegin => {
                    stack.push(Scope::Object);
                    expect = TokenKind::OBJECT_END | TokenKind::KEY;
                    wait_key = true;
                    items.push(Item { token, key });
                }
                Token::ArrayBegin => {
                    stack.push(Scope::Array);
                    expect = TokenKind::VALUE | TokenKind::ARRAY_END;
                    items.push(Item { token, key });
                }
                Token::ObjectEnd | Token::ArrayEnd => {
                    wait_key = false;
                    stack.pop();
                    expect = match stack.last() {
                        None => TokenKind::EOF,
                        Some(Scope::Object) => TokenKind::OBJECT_END | TokenKind::COMMA,
                        Some(Scope::Array) => TokenKind::ARRAY_END | TokenKind::COMMA,
                    };
                    items.push(Item { token, key });
                }
                Token::Comma => {
                    if in_object {
                        expect = TokenKind::KEY;
                        wait_key = true;
                    } else {
                        expect = TokenKind::VALUE;
                    }
                }
                Token::Colon => {
                    expect = TokenKind::VALUE;
                    wait_key = false;
                    pending_key = match items.pop() {
                        Some(Item {
                            token: Token::String(name),
                            ..
                        }) => Some(Key::Literal(name)),
                        _ => Some(Key::Variable),
                    };
                }
                _ => {
                    if in_object && wait_key {
                        wait_key = false;
                        expect = TokenKind::COLON;
                    } else if in_object {
                        expect = TokenKind::OBJECT_END | TokenKind::COMMA;
                    } else {
                        expect = TokenKind::ARRAY_END | TokenKind::COMMA;
                    }
                    items.push(Item { token, key });
                }
            }
        }

        match stack.last() {
            Some(Scope::Object) => Err("miss } at the end of string".to_owned()),
            Some(Scope::Array) => Err("miss ] at the end of string".to_owned()),
            None => {
                let variables = items.iter().map(Item::variables).sum();
                Ok(Self { items, variables })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_attach_to_values() {
        let template = Template::parse("{?:?, 'users':[1, ?], 'x':{}}").unwrap();
        assert_eq!(template.variables, 3);
        let keys: Vec<_> = template.items.iter().map(|item| &item.key).collect();
        assert_eq!(
            keys,
            [
                &Key::None,
                &Key::Variable,
                &Key::Literal("users".into()),
                &Key::None,
                &Key::None,
                &Key::None,
                &Key::Literal("x".into()),
                &Key::None,
                &Key::None,
            ]
        );
        assert_eq!(template.items[1].token, Token::Variable);
    }

    #[test]
    fn unexpected_tokens() {
        let err = Template::parse("{'a' 1}").unwrap_err();
        assert_eq!(err, "unexpected token. expect[:]. but get[number/bool]");

        let err = Template::parse("{1:2}").unwrap_err();
        assert_eq!(err, "unexpected token. expect[}/string/variable]. but get[number/bool]");

        let err = Template::parse("[1,]").unwrap_err();
        assert!(err.starts_with("unexpected token. expect[{/[/number/bool/string/variable]"));

        let err = Template::parse("{} 'tail'").unwrap_err();
        assert_eq!(err, "unexpected token. expect[eof]. but get[string]. in [tail]");

        let err = Template::parse("'a'").unwrap_err();
        assert!(err.starts_with("unexpected token. expect[{/[]"));
    }

    #[test]
    fn missing_close() {
        assert_eq!(
            Template::parse("{'a':[1,2]").unwrap_err(),
            "miss } at the end of string"
        );
        assert_eq!(
            Template::parse("[{'a':1}").unwrap_err(),
            "miss ] at the end of string"
        );
    }

    #[test]
    fn empty_template_is_valid() {
        let template = Template::parse("   ").unwrap();
        assert!(template.items.is_empty());
        assert_eq!(template.variables, 0);
    }
}
