//! Token model shared by the lexer, the statement splitter and the transforms.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Number,
    String,
    Template,
    Regex,
    Punctuator,
}

/// Reserved words, including the literal keywords `null`, `true` and `false`.
pub const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "import",
    "in", "instanceof", "let", "new", "null", "return", "super", "switch", "this", "throw", "true",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Names a generator must never hand out, on top of [`KEYWORDS`].
const PREDEFINED: &[&str] = &[
    "arguments", "await", "eval", "implements", "Infinity", "interface", "NaN", "package",
    "private", "protected", "public", "static", "undefined",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// True for any word that cannot be used as a fresh binding name.
pub fn is_reserved_word(word: &str) -> bool {
    is_keyword(word) || PREDEFINED.contains(&word)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token, quotes and prefixes included.
    pub value: String,
    pub line: u32,
    /// Whether a line terminator separated this token from the previous one.
    pub newline_before: bool,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
            line: 0,
            newline_before: false,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(TokenKind::Identifier, name)
    }

    pub fn punctuator(value: &str) -> Self {
        Self::new(TokenKind::Punctuator, value)
    }

    pub fn is_punct(&self, value: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == value
    }

    pub fn is_keyword(&self, value: &str) -> bool {
        self.kind == TokenKind::Keyword && self.value == value
    }

    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Opening bracket this token closes, if it is a closing bracket.
    pub fn closes(&self) -> Option<&'static str> {
        if self.kind != TokenKind::Punctuator {
            return None;
        }
        match self.value.as_str() {
            ")" => Some("("),
            "]" => Some("["),
            "}" => Some("{"),
            _ => None,
        }
    }

    pub fn opens(&self) -> bool {
        self.kind == TokenKind::Punctuator && matches!(self.value.as_str(), "(" | "[" | "{")
    }
}
