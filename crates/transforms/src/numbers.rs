//! Rewrites decimal integer literals as hexadecimal literals.

use crate::{Result, Transform, TransformContext};
use tracing::debug;
use veil_core::Program;
use veil_core::number::hex_literal;
use veil_core::token::TokenKind;

/// Largest integer a JS number represents exactly.
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

#[derive(Debug, Default)]
pub struct NumbersToHex;

impl NumbersToHex {
    pub fn new() -> Self {
        Self
    }
}

/// The hex form of `literal` when it is a plain decimal integer.
fn hex_form(literal: &str) -> Option<String> {
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // `010` is a legacy octal literal.
    if literal.len() > 1 && literal.starts_with('0') {
        return None;
    }
    let value: u64 = literal.parse().ok()?;
    (value <= MAX_SAFE_INTEGER).then(|| hex_literal(value))
}

impl Transform for NumbersToHex {
    fn name(&self) -> &'static str {
        "NumbersToHex"
    }

    fn apply(&self, program: &mut Program, ctx: &mut TransformContext) -> Result<bool> {
        if !ctx.options.numbers_to_hex {
            return Ok(false);
        }

        let mut rewritten = 0usize;
        for token in program.tokens_mut() {
            if token.kind != TokenKind::Number {
                continue;
            }
            if let Some(hex) = hex_form(&token.value) {
                token.value = hex;
                rewritten += 1;
            }
        }

        debug!("NumbersToHex: rewrote {} literals", rewritten);
        Ok(rewritten > 0)
    }
}
