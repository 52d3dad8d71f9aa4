use bitflags::bitflags;

bitflags! {
    /// Token classes, combined into the set the parser expects next.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub(crate) struct TokenKind: u16 {
        const OBJECT_BEGIN = 1 << 0;
        const OBJECT_END = 1 << 1;
        const ARRAY_BEGIN = 1 << 2;
        const ARRAY_END = 1 << 3;
        const COMMA = 1 << 4;
        const COLON = 1 << 5;
        const INTEGER = 1 << 6;
        const FLOAT = 1 << 7;
        const STRING = 1 << 8;
        const BOOL = 1 << 9;
        const VARIABLE = 1 << 10;
        const EOF = 1 << 11;

        const SCALAR = Self::INTEGER.bits()
            | Self::FLOAT.bits()
            | Self::STRING.bits()
            | Self::BOOL.bits()
            | Self::VARIABLE.bits();
        const VALUE = Self::SCALAR.bits() | Self::OBJECT_BEGIN.bits() | Self::ARRAY_BEGIN.bits();
        const KEY = Self::STRING.bits() | Self::VARIABLE.bits();
    }
}

impl TokenKind {
    /// Human readable form used in parse errors, e.g. `}/,`.
    pub(crate) fn names(self) -> String {
        let mut names = Vec::new();
        for (kind, name) in [
            (Self::OBJECT_BEGIN, "{"),
            (Self::OBJECT_END, "}"),
            (Self::ARRAY_BEGIN, "["),
            (Self::ARRAY_END, "]"),
            (Self::COMMA, ","),
            (Self::COLON, ":"),
        ] {
            if self.contains(kind) {
                names.push(name);
            }
        }
        if self.intersects(Self::INTEGER | Self::FLOAT | Self::BOOL) {
            names.push("number/bool");
        }
        if self.contains(Self::STRING) {
            names.push("string");
        }
        if self.contains(Self::VARIABLE) {
            names.push("variable");
        }
        if self.contains(Self::EOF) {
            names.push("eof");
        }
        names.join("/")
    }
}

/// One lexical element of a template.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Token {
    ObjectBegin,
    ObjectEnd,
    ArrayBegin,
    ArrayEnd,
    Comma,
    Colon,
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Variable,
}

impl Token {
    pub(crate) fn kind(&self) -> TokenKind {
        match self {
            Self::ObjectBegin => TokenKind::OBJECT_BEGIN,
            Self::ObjectEnd => TokenKind::OBJECT_END,
            Self::ArrayBegin => TokenKind::ARRAY_BEGIN,
            Self::ArrayEnd => TokenKind::ARRAY_END,
            Self::Comma => TokenKind::COMMA,
            Self::Colon => TokenKind::COLON,
            Self::Integer(_) => TokenKind::INTEGER,
            Self::Float(_) => TokenKind::FLOAT,
            Self::String(_) => TokenKind::STRING,
            Self::Bool(_) => TokenKind::BOOL,
            Self::Variable => TokenKind::VARIABLE,
        }
    }
}

// -----------------------------------------------------------------------------
// Tokenizer

/// Splits a template into [`Token`]s. Errors are plain messages.
pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

#[inline]
fn is_end(byte: Option<u8>) -> bool {
    match byte {
        None => true,
        Some(b) => b.is_ascii_whitespace() || matches!(b, b':' | b',' | b'}' | b']'),
    }
}

impl<'a> Tokenizer<'a> {
    #[inline]
    pub(crate) const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    #[inline]
    fn peek(&self, at: usize) -> Option<u8> {
        self.input.as_bytes().get(at).copied()
    }

    fn unknown(&self, start: usize) -> String {
        format!("unknown token: {}", &self.input[start..])
    }

    /// The next token, `None` at the end of the input.
    pub(crate) fn next_token(&mut self) -> Result<Option<Token>, String> {
        while self.peek(self.pos).is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        let start = self.pos;
        let Some(byte) = self.peek(start) else {
            return Ok(None);
        };

        let punct = match byte {
            b'{' => Some(Token::ObjectBegin),
            b'}' => Some(Token::ObjectEnd),
            b'[' => Some(Token::ArrayBegin),
            b']' => Some(Token::ArrayEnd),
            b',' => Some(Token::Comma),
            b':' => Some(Token::Colon),
            _ => None,
        };
        if let Some(token) = punct {
            self.pos += 1;
            return Ok(Some(token));
        }

        match byte {
            b'\'' => self.string(start),
            b'?' => self.variable(start),
            b'-' | b'+' | b'0'..=b'9' => self.number(start),
            b't' => self.keyword(start, "true", Token::Bool(true)),
            b'f' => self.keyword(start, "false", Token::Bool(false)),
            _ => Err(self.unknown(start)),
        }
    }

    fn string(&mut self, start: usize) -> Result<Option<Token>, String> {
        let body = start + 1;
        let Some(len) = self.input[body..].find('\'') else {
            return Err("no end for string".to_owned());
        };
        let close = body + len;
        if !is_end(self.peek(close + 1)) {
            return Err(self.unknown(start));
        }
        self.pos = close + 1;
        Ok(Some(Token::String(self.input[body..close].to_owned())))
    }

    fn variable(&mut self, start: usize) -> Result<Option<Token>, String> {
        let mut end = start + 1;
        while self
            .peek(end)
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            end += 1;
        }
        if !is_end(self.peek(end)) {
            return Err(self.unknown(start));
        }
        self.pos = end;
        Ok(Some(Token::Variable))
    }

    fn number(&mut self, start: usize) -> Result<Option<Token>, String> {
        let mut end = start + 1;
        let mut float = false;
        while let Some(b) = self.peek(end) {
            match b {
                b'0'..=b'9' => {}
                b'.' => float = true,
                _ => break,
            }
            end += 1;
        }
        if !is_end(self.peek(end)) {
            return Err(self.unknown(start));
        }
        let text = &self.input[start..end];
        let token = if float {
            text.parse().map(Token::Float).ok()
        } else {
            text.parse().map(Token::Integer).ok()
        };
        let token = token.ok_or_else(|| self.unknown(start))?;
        self.pos = end;
        Ok(Some(token))
    }

    fn keyword(&mut self, start: usize, word: &str, token: Token) -> Result<Option<Token>, String> {
        let end = start + word.len();
        if !self.input[start..].starts_with(word) || !is_end(self.peek(end)) {
            return Err(self.unknown(start));
        }
        self.pos = end;
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Result<Vec<Token>, String> {
        let mut tokenizer = Tokenizer::new(input);
        let mut out = Vec::new();
        while let Some(token) = tokenizer.next_token()? {
            out.push(token);
        }
        Ok(out)
    }

    #[test]
    fn lexes_every_class() {
        let got = tokens("{ 'a b':?x, 'n':[-3, 2.5, true, false, ?] }").unwrap();
        assert_eq!(
            got,
            [
                Token::ObjectBegin,
                Token::String("a b".into()),
                Token::Colon,
                Token::Variable,
                Token::Comma,
                Token::String("n".into()),
                Token::Colon,
                Token::ArrayBegin,
                Token::Integer(-3),
                Token::Comma,
                Token::Float(2.5),
                Token::Comma,
                Token::Bool(true),
                Token::Comma,
                Token::Bool(false),
                Token::Comma,
                Token::Variable,
                Token::ArrayEnd,
                Token::ObjectEnd,
            ]
        );
    }

    #[test]
    fn lexing_errors() {
        assert_eq!(tokens("{'abc").unwrap_err(), "no end for string");
        assert!(tokens("{'a'b':1}").unwrap_err().starts_with("unknown token"));
        assert!(tokens("[12x]").unwrap_err().starts_with("unknown token"));
        assert!(tokens("[truth]").unwrap_err().starts_with("unknown token"));
        assert!(tokens("[?a-b]").unwrap_err().starts_with("unknown token"));
        assert!(tokens("[@]").unwrap_err().starts_with("unknown token"));
    }

    #[test]
    fn kind_names() {
        let expect = TokenKind::OBJECT_END | TokenKind::COMMA;
        assert_eq!(expect.names(), "}/,");
        assert_eq!(TokenKind::VALUE.names(), "{/[/number/bool/string/variable");
    }
}
