//! Evaluation of integer JavaScript expressions.
//!
//! Values are exact integers. Bitwise and shift operators apply `ToInt32` to
//! their operands exactly like a JS engine; `+`, `-` and `*` are exact, as
//! they are for doubles in the range generated code works in.

use crate::result::{Error, Result};
use std::collections::HashMap;
use veil_core::lexer::tokenize;
use veil_core::number::parse_hex;
use veil_core::token::{Token, TokenKind};

/// Values of the free identifiers of an expression.
pub type Environment = HashMap<String, i64>;

/// Evaluates `expression` with identifiers looked up in `env`.
pub fn evaluate(expression: &str, env: &Environment) -> Result<i64> {
    let tokens = tokenize(expression)?;
    let mut evaluator = Evaluator {
        tokens: &tokens,
        pos: 0,
        env,
    };
    let value = evaluator.expression(0)?;
    match evaluator.tokens.get(evaluator.pos) {
        Some(extra) => Err(Error::UnexpectedToken(extra.value.clone())),
        None => Ok(value),
    }
}

/// Binding power of a binary operator; higher binds tighter.
fn binding_power(op: &str) -> Option<u8> {
    Some(match op {
        "|" => 1,
        "^" => 2,
        "&" => 3,
        "==" | "!=" | "===" | "!==" => 4,
        "<" | ">" | "<=" | ">=" => 5,
        "<<" | ">>" | ">>>" => 6,
        "+" | "-" => 7,
        "*" | "/" | "%" => 8,
        _ => return None,
    })
}

struct Evaluator<'t> {
    tokens: &'t [Token],
    pos: usize,
    env: &'t Environment,
}

impl<'t> Evaluator<'t> {
    fn next(&mut self) -> Result<&'t Token> {
        let tokens = self.tokens;
        let token = tokens.get(self.pos).ok_or(Error::UnexpectedEnd)?;
        self.pos += 1;
        Ok(token)
    }

    fn expression(&mut self, min_power: u8) -> Result<i64> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.tokens.get(self.pos) {
            if op.kind != TokenKind::Punctuator {
                break;
            }
            let Some(power) = binding_power(&op.value) else {
                break;
            };
            if power < min_power {
                break;
            }
            let op = op.value.clone();
            self.pos += 1;
            let rhs = self.expression(power + 1)?;
            lhs = apply(&op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<i64> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Number => number(&token.value),
            TokenKind::Identifier => self
                .env
                .get(&token.value)
                .copied()
                .ok_or_else(|| Error::UnboundIdentifier(token.value.clone())),
            TokenKind::Punctuator => match token.value.as_str() {
                "(" => {
                    let value = self.expression(0)?;
                    match self.next()? {
                        close if close.is_punct(")") => Ok(value),
                        other => Err(Error::UnexpectedToken(other.value.clone())),
                    }
                }
                "-" => self.unary()?.checked_neg().ok_or(Error::Overflow),
                "+" => self.unary(),
                "~" => Ok(i64::from(!wrap32(self.unary()?))),
                "!" => Ok(i64::from(self.unary()? == 0)),
                other => Err(Error::UnexpectedToken(other.to_string())),
            },
            _ => Err(Error::UnexpectedToken(token.value.clone())),
        }
    }
}

fn number(literal: &str) -> Result<i64> {
    if literal.starts_with("0x") || literal.starts_with("0X") {
        let value = parse_hex(literal)?;
        return i64::try_from(value).map_err(|_| Error::Overflow);
    }
    literal
        .parse()
        .map_err(|_| Error::NonIntegerResult(literal.to_string()))
}

/// `ToInt32` for values that fit in an `i64`: keep the low 32 bits.
fn wrap32(value: i64) -> i32 {
    value as u32 as i32
}

fn apply(op: &str, a: i64, b: i64) -> Result<i64> {
    let (x, y) = (wrap32(a), wrap32(b));
    let shift = (y as u32) & 0x1f;
    let exact = |value: Option<i64>| value.ok_or(Error::Overflow);
    Ok(match op {
        "|" => i64::from(x | y),
        "^" => i64::from(x ^ y),
        "&" => i64::from(x & y),
        "<<" => i64::from(wrap32(i64::from(x) << shift)),
        ">>" => i64::from(x >> shift),
        ">>>" => i64::from((x as u32) >> shift),
        "+" => exact(a.checked_add(b))?,
        "-" => exact(a.checked_sub(b))?,
        "*" => exact(a.checked_mul(b))?,
        "/" => {
            if b == 0 || a % b != 0 {
                return Err(Error::NonIntegerResult(format!("{a} / {b}")));
            }
            a / b
        }
        "%" => {
            if b == 0 {
                return Err(Error::NonIntegerResult(format!("{a} % {b}")));
            }
            a % b
        }
        "==" | "===" => i64::from(a == b),
        "!=" | "!==" => i64::from(a != b),
        "<" => i64::from(a < b),
        ">" => i64::from(a > b),
        "<=" => i64::from(a <= b),
        ">=" => i64::from(a >= b),
        other => return Err(Error::UnexpectedToken(other.to_string())),
    })
}
