use crate::error::{Diagnostics, DewError, Span};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    Semicolon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Integer,
    Float,
    String,
    Symbol,

    // Keywords
    True,
    False,
    Null,
}

impl TokenType {
    /// How the token is spelled in source, for messages.
    pub fn lexeme(&self) -> &'static str {
        match self {
            TokenType::LeftParen => "(",
            TokenType::RightParen => ")",
            TokenType::Semicolon => ";",
            TokenType::Plus => "+",
            TokenType::Minus => "-",
            TokenType::Star => "*",
            TokenType::Slash => "/",
            TokenType::Percent => "%",
            TokenType::Bang => "!",
            TokenType::BangEqual => "!=",
            TokenType::Equal => "=",
            TokenType::EqualEqual => "==",
            TokenType::Greater => ">",
            TokenType::GreaterEqual => ">=",
            TokenType::Less => "<",
            TokenType::LessEqual => "<=",
            TokenType::Integer => "integer",
            TokenType::Float => "float",
            TokenType::String => "string",
            TokenType::Symbol => "symbol",
            TokenType::True => "true",
            TokenType::False => "false",
            TokenType::Null => "null",
        }
    }
}

/// Literal payload carried by a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub literal: Literal,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, literal: Literal, span: Span) -> Self {
        Self {
            token_type,
            literal,
            span,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.token_type)?;
        match &self.literal {
            Literal::None => {}
            Literal::Integer(n) => write!(f, " {}", n)?,
            Literal::Float(n) => write!(f, " {:?}", n)?,
            Literal::String(s) => write!(f, " {:?}", s)?,
        }
        write!(f, " @ {}..{}", self.span.start, self.span.end)
    }
}

pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    keywords: HashMap<&'static str, TokenType>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("true", TokenType::True);
        keywords.insert("false", TokenType::False);
        keywords.insert("null", TokenType::Null);

        Self {
            source,
            tokens: Vec::new(),
            start: 0,
            current: 0,
            keywords,
        }
    }

    /// Scans the whole source in one pass.
    ///
    /// Bad characters and unterminated strings are pushed to `diagnostics`
    /// and scanning carries on, so the returned vector is always complete
    /// apart from the offending text.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            if let Err(error) = self.scan_token() {
                diagnostics.push(error);
            }
        }

        self.tokens
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), DewError> {
        let c = self.advance();

        match c {
            b'(' => self.add_token(TokenType::LeftParen),
            b')' => self.add_token(TokenType::RightParen),
            b';' => self.add_token(TokenType::Semicolon),
            b'+' => self.add_token(TokenType::Plus),
            b'-' => self.add_token(TokenType::Minus),
            b'*' => self.add_token(TokenType::Star),
            b'%' => self.add_token(TokenType::Percent),
            b'!' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type);
            }
            b'=' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            b'<' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            b'>' => {
                let token_type = if self.match_byte(b'=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            b'/' => {
                if self.match_byte(b'/') {
                    // Comment goes until end of line
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_byte(b'*') {
                    self.block_comment();
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            b' ' | b'\r' | b'\t' | b'\n' => {}
            b'"' => self.string()?,
            b'.' => self.number()?,
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_ascii_alphabetic() || c == b'_' => self.identifier(),
            _ => {
                // Skip the whole character so multi-byte input is one diagnostic
                let ch = self.source[self.start..].chars().next().unwrap_or('\0');
                self.current = self.start + ch.len_utf8().max(1);
                return Err(DewError::lex_error(
                    Span::new(self.start, self.current),
                    format!("unrecognized character '{}'", ch.escape_debug()),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> u8 {
        match self.source.as_bytes().get(self.current) {
            Some(&c) => {
                self.current += 1;
                c
            }
            None => b'\0',
        }
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn peek(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.current)
            .copied()
            .unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source
            .as_bytes()
            .get(self.current + 1)
            .copied()
            .unwrap_or(b'\0')
    }

    /// Skips to just past the closing `*/`, one byte at a time.
    fn block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == b'*' && self.peek_next() == b'/' {
                self.current += 2;
                return;
            }
            self.current += 1;
        }
    }

    fn string(&mut self) -> Result<(), DewError> {
        while self.peek() != b'"' && !self.is_at_end() {
            self.advance();
        }

        if self.is_at_end() {
            return Err(DewError::lex_error(
                Span::new(self.start, self.current),
                "unterminated string".to_string(),
            ));
        }

        // Consume the closing "
        self.advance();

        let content = &self.source[self.start + 1..self.current - 1];
        self.add_token_with_literal(TokenType::String, Literal::String(content.to_string()));
        Ok(())
    }

    /// Digits with at most one `.` anywhere in the run. A `.` makes it a
    /// float, so `3.` and `.5` are both floats.
    fn number(&mut self) -> Result<(), DewError> {
        let mut seen_dot = self.source.as_bytes()[self.start] == b'.';

        loop {
            let c = self.peek();
            if c.is_ascii_digit() {
                self.advance();
            } else if c == b'.' && !seen_dot {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let number_slice = &self.source[self.start..self.current];

        if seen_dot {
            let value = number_slice.parse::<f64>().map_err(|_| {
                DewError::lex_error(
                    Span::new(self.start, self.current),
                    format!("malformed number '{}'", number_slice),
                )
            })?;
            self.add_token_with_literal(TokenType::Float, Literal::Float(value));
        } else {
            // Out of range literals wrap, like a 64-bit register would
            let value = number_slice.bytes().fold(0i64, |acc, digit| {
                acc.wrapping_mul(10).wrapping_add(i64::from(digit - b'0'))
            });
            self.add_token_with_literal(TokenType::Integer, Literal::Integer(value));
        }

        Ok(())
    }

    fn identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        match self.keywords.get(text).copied() {
            Some(token_type) => self.add_token(token_type),
            None => self.add_token_with_literal(TokenType::Symbol, Literal::String(text.to_string())),
        }
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_with_literal(token_type, Literal::None);
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal: Literal) {
        self.tokens.push(Token::new(
            token_type,
            literal,
            Span::new(self.start, self.current),
        ));
    }
}
