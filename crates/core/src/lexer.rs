//! JavaScript lexer producing [`Token`]s.
//!
//! Comments and whitespace are dropped; a line terminator inside the skipped
//! trivia is remembered on the following token as `newline_before`.

use crate::result::{Error, Result};
use crate::token::{Token, TokenKind, is_keyword};

/// Punctuators ordered so that the longest candidate is tried first.
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<", ">>", "**", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-",
    "*", "/", "%", "&", "|", "^", "!", "~", "?", ":", "=", ".", "@", "#",
];

/// Tokenizes `source`.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || c == '$' || c.is_alphabetic()
}

fn is_identifier_part(c: char) -> bool {
    is_identifier_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek(0)?;
        self.pos += 1;
        if c == '\n' || (c == '\r' && self.peek(0) != Some('\n')) || c == '\u{2028}' || c == '\u{2029}' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, msg: impl Into<String>) -> Error {
        Error::Lex {
            line: self.line,
            column: self.column,
            msg: msg.into(),
        }
    }

    fn text(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn run(mut self) -> Result<Vec<Token>> {
        loop {
            let newline_before = self.skip_trivia()?;
            let Some(c) = self.peek(0) else {
                break;
            };
            let line = self.line;
            let start = self.pos;

            let kind = if is_identifier_start(c) {
                while self.peek(0).is_some_and(is_identifier_part) {
                    self.bump();
                }
                if is_keyword(&self.text(start)) {
                    TokenKind::Keyword
                } else {
                    TokenKind::Identifier
                }
            } else if c.is_ascii_digit() || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) {
                self.number()?;
                TokenKind::Number
            } else if c == '"' || c == '\'' {
                self.string(c)?;
                TokenKind::String
            } else if c == '`' {
                self.template()?;
                TokenKind::Template
            } else if c == '/' && self.regex_allowed() {
                self.regex()?;
                TokenKind::Regex
            } else {
                self.punctuator()?;
                TokenKind::Punctuator
            };

            self.tokens.push(Token {
                kind,
                value: self.text(start),
                line,
                newline_before,
            });
        }
        Ok(self.tokens)
    }

    /// Skips whitespace and comments; reports whether a line break was crossed.
    fn skip_trivia(&mut self) -> Result<bool> {
        let mut newline = false;
        while let Some(c) = self.peek(0) {
            if is_line_terminator(c) {
                newline = true;
                self.bump();
            } else if c.is_whitespace() || c == '\u{feff}' {
                self.bump();
            } else if c == '/' && self.peek(1) == Some('/') {
                while self.peek(0).is_some_and(|c| !is_line_terminator(c)) {
                    self.bump();
                }
            } else if c == '/' && self.peek(1) == Some('*') {
                self.bump();
                self.bump();
                loop {
                    match self.bump() {
                        Some('*') if self.peek(0) == Some('/') => {
                            self.bump();
                            break;
                        }
                        Some(c) if is_line_terminator(c) => newline = true,
                        Some(_) => {}
                        None => return Err(self.error("unterminated multi-line comment")),
                    }
                }
            } else {
                break;
            }
        }
        Ok(newline)
    }

    fn number(&mut self) -> Result<()> {
        let radix_prefix = self.peek(0) == Some('0')
            && self
                .peek(1)
                .is_some_and(|c| matches!(c, 'x' | 'X' | 'o' | 'O' | 'b' | 'B'));
        if radix_prefix {
            self.bump();
            self.bump();
            let digits = self.pos;
            while self.peek(0).is_some_and(|c| c.is_ascii_hexdigit() || c == '_') {
                self.bump();
            }
            if self.pos == digits {
                return Err(self.error("missing digits after radix prefix"));
            }
        } else {
            self.digits();
            if self.peek(0) == Some('.') {
                self.bump();
                self.digits();
            }
            if matches!(self.peek(0), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(0), Some('+' | '-')) {
                    self.bump();
                }
                if !self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(self.error("missing exponent digits"));
                }
                self.digits();
            }
        }
        if self.peek(0) == Some('n') {
            self.bump();
        }
        if self.peek(0).is_some_and(is_identifier_start) {
            return Err(self.error("identifier starts immediately after numeric literal"));
        }
        Ok(())
    }

    fn digits(&mut self) {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
    }

    fn string(&mut self, quote: char) -> Result<()> {
        self.bump();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(self.error("unterminated string literal"));
                    }
                }
                Some(c) if c == '\n' || c == '\r' => {
                    return Err(self.error("unterminated string literal"));
                }
                Some(_) => {}
                None => return Err(self.error("unterminated string literal")),
            }
        }
    }

    /// Consumes a whole template literal, substitutions included.
    fn template(&mut self) -> Result<()> {
        self.bump();
        let mut depth = 0usize;
        loop {
            match self.bump() {
                Some('\\') => {
                    self.bump();
                }
                Some('`') if depth == 0 => return Ok(()),
                Some('$') if self.peek(0) == Some('{') => {
                    self.bump();
                    depth += 1;
                }
                Some('}') if depth > 0 => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("unterminated template literal")),
            }
        }
    }

    /// A `/` starts a regular expression unless it can only be division.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(prev) => match prev.kind {
                TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Template
                | TokenKind::Regex => false,
                TokenKind::Keyword => !matches!(
                    prev.value.as_str(),
                    "this" | "super" | "null" | "true" | "false"
                ),
                TokenKind::Punctuator => !matches!(prev.value.as_str(), ")" | "]" | "}" | "++" | "--"),
            },
        }
    }

    fn regex(&mut self) -> Result<()> {
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                Some('\\') => {
                    if self.peek(0).is_none_or(is_line_terminator) {
                        return Err(self.error("unterminated regular expression"));
                    }
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(c) if is_line_terminator(c) => {
                    return Err(self.error("unterminated regular expression"));
                }
                Some(_) => {}
                None => return Err(self.error("unterminated regular expression")),
            }
        }
        while self.peek(0).is_some_and(is_identifier_part) {
            self.bump();
        }
        Ok(())
    }

    fn punctuator(&mut self) -> Result<()> {
        let rest = &self.chars[self.pos..];
        let matched = PUNCTUATORS.iter().find(|p| {
            let len = p.chars().count();
            rest.len() >= len && p.chars().zip(rest).all(|(a, b)| a == *b)
        });
        let Some(punct) = matched else {
            let c = self.peek(0).unwrap_or_default();
            return Err(self.error(format!("unexpected character `{c}`")));
        };
        // `a?.5:b` is a conditional, not optional chaining.
        let len = if *punct == "?." && self.peek(2).is_some_and(|c| c.is_ascii_digit()) {
            1
        } else {
            punct.chars().count()
        };
        for _ in 0..len {
            self.bump();
        }
        Ok(())
    }
}
