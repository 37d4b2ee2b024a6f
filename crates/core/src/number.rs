//! Hexadecimal number formatting for generated source.
//!
//! Generated code spells every integer as `0x<digits>`. The digits always encode
//! a magnitude; a negative value is written as an explicit `-` token in front of
//! the literal so the result reads as signed-literal arithmetic.

use crate::result::{Error, Result};

/// Sign token carried next to a hex magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn of(value: i64) -> Self {
        if value < 0 { Sign::Minus } else { Sign::Plus }
    }

    pub fn token(self) -> &'static str {
        match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        }
    }
}

/// Lowercase hex digits of `value`, without prefix or leading zeros.
pub fn to_hex(value: u64) -> String {
    format!("{value:x}")
}

/// Like [`to_hex`] for signed input; negative values are a caller error.
pub fn try_to_hex(value: i64) -> Result<String> {
    u64::try_from(value)
        .map(to_hex)
        .map_err(|_| Error::NegativeHex(value))
}

/// `0x`-prefixed literal for a non-negative value.
pub fn hex_literal(value: u64) -> String {
    format!("0x{}", to_hex(value))
}

/// Renders `value` as an additive term: `+0x1f`, `-0x3`.
pub fn signed_hex_term(value: i64) -> String {
    format!(
        "{}0x{}",
        Sign::of(value).token(),
        to_hex(value.unsigned_abs())
    )
}

/// Decodes a `0x`/`0X` literal or bare hex digits.
pub fn parse_hex(literal: &str) -> Result<u64> {
    let digits = literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
        .unwrap_or(literal);
    u64::from_str_radix(digits, 16).map_err(|_| Error::InvalidHexLiteral(literal.to_string()))
}

/// Inverse of [`signed_hex_term`].
pub fn parse_signed_hex_term(term: &str) -> Result<i64> {
    let invalid = || Error::InvalidHexLiteral(term.to_string());
    let (sign, magnitude) = match term.split_at_checked(1) {
        Some(("+", rest)) => (Sign::Plus, rest),
        Some(("-", rest)) => (Sign::Minus, rest),
        _ => return Err(invalid()),
    };
    if !magnitude.starts_with("0x") {
        return Err(invalid());
    }
    let magnitude = i128::from(parse_hex(magnitude)?);
    let value = match sign {
        Sign::Plus => magnitude,
        Sign::Minus => -magnitude,
    };
    i64::try_from(value).map_err(|_| invalid())
}
