//! Core building blocks of the veil JavaScript obfuscator: tokens and
//! statements, 32-bit arithmetic, number formatting, templates, options and the
//! injectable naming and randomness services.

pub mod int32;
pub mod lexer;
pub mod naming;
pub mod number;
pub mod options;
pub mod random;
pub mod result;
pub mod seed;
pub mod statement;
pub mod template;
pub mod token;

pub use options::{IdentifierNamesGeneratorKind, ObfuscatorOptions};
pub use result::{Error, Result};
pub use statement::{Program, Statement, StatementKind, parse_to_statements};
