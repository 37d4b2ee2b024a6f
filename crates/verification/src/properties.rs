//! Properties the generated rotation code must satisfy at runtime.

use crate::result::{Error, Result};
use crate::semantics::{Environment, evaluate};
use veil_core::int32::hash_step;
use veil_core::lexer::tokenize;
use veil_core::token::TokenKind;
use veil_transform::rotation::RotationFormula;
use veil_transform::string_array::storage::decode_string_literal;

const HASH_NAME: &str = "hash";

/// Evaluates the self-defense expression for the given inputs with the hash
/// variable bound to `hash` and checks that it yields `rotation_value`.
pub fn check_rotation_round_trip(
    rotation_value: u32,
    hash: i32,
    random1: i32,
    random2: i32,
) -> Result<()> {
    let formula = RotationFormula::derive(rotation_value, hash, random1, random2, HASH_NAME);
    let env = Environment::from([(HASH_NAME.to_string(), i64::from(hash))]);
    let value = evaluate(&formula.expression(), &env)?;
    if value != i64::from(rotation_value) {
        return Err(Error::PropertyFailed {
            property: format!(
                "`{}` with {HASH_NAME} = {hash} gives {value}, expected {rotation_value}",
                formula.expression()
            ),
        });
    }
    Ok(())
}

/// Source of the rotation argument passed to the bootstrap of `array_name`:
/// the text between `})(<array_name>,` and the closing parenthesis.
pub fn rotation_argument<'c>(code: &'c str, array_name: &str) -> Option<&'c str> {
    let marker = format!("}})({array_name},");
    let start = code.find(&marker)? + marker.len();
    let mut depth = 0usize;
    for (offset, c) in code[start..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(code[start..start + offset].trim()),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// String literals of the `var <array_name> = [...]` declaration, in order.
pub fn emitted_array(code: &str, array_name: &str) -> Result<Vec<String>> {
    let tokens = tokenize(code)?;
    let start = tokens
        .windows(4)
        .position(|w| {
            w[0].is_keyword("var")
                && w[1].is_identifier()
                && w[1].value == array_name
                && w[2].is_punct("=")
                && w[3].is_punct("[")
        })
        .ok_or_else(|| Error::PropertyFailed {
            property: format!("no declaration of `{array_name}`"),
        })?;
    Ok(tokens[start + 4..]
        .iter()
        .take_while(|t| !t.is_punct("]"))
        .filter(|t| t.kind == TokenKind::String)
        .map(|t| t.value.clone())
        .collect())
}

/// What the bootstrap does at runtime: shifts the array left `rotate_value`
/// times.
pub fn restore_rotation<T: Clone>(items: &[T], rotate_value: u32) -> Vec<T> {
    let mut restored = items.to_vec();
    if !restored.is_empty() {
        let len = restored.len();
        restored.rotate_left(rotate_value as usize % len);
    }
    restored
}

/// Hash the generated hash function computes over `literals`.
pub fn runtime_hash(literals: &[String]) -> Result<i32> {
    let mut hash = 0;
    for literal in literals {
        for unit in decode_string_literal(literal)? {
            hash = hash_step(hash, unit);
        }
    }
    Ok(hash)
}
