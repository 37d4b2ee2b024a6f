//! Core results and error types

use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Options could not be decoded from JSON.
    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),

    /// Invalid hexadecimal in seed.
    #[error("invalid hexadecimal in seed")]
    InvalidSeedHex,

    /// Invalid seed length.
    #[error("invalid seed length: expected 64 hex chars, got {0}")]
    InvalidSeedLength(usize),

    /// The source text could not be tokenized.
    #[error("lex error at {line}:{column}: {msg}")]
    Lex {
        /// 1-based line of the offending character.
        line: u32,
        /// 1-based column of the offending character.
        column: u32,
        /// Description of the lexing error.
        msg: String,
    },

    /// A negative number was passed where only magnitudes are accepted.
    #[error("cannot format negative value {0} as hex digits")]
    NegativeHex(i64),

    /// A hex literal could not be decoded.
    #[error("invalid hex literal: `{0}`")]
    InvalidHexLiteral(String),

    /// The token stream does not form a sequence of statements.
    #[error("parse error at line {line}: {msg}")]
    Parse {
        /// The line number where parsing failed.
        line: u32,
        /// Description of the parsing error.
        msg: String,
    },

    /// A template placeholder has no bound value.
    #[error("template placeholder `{{{0}}}` is unbound")]
    UnboundPlaceholder(String),
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
