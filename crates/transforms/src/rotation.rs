//! Self-defense formula for the string array rotation value.
//!
//! The rotation value is split into a term the generated code recomputes from
//! the runtime hash of the string array, plus a literal adjustment. Only when
//! the runtime hash matches the hash seen at generation time do the two parts
//! add up to the rotation value again.

use serde::{Deserialize, Serialize};
use veil_core::int32::self_defense_term;
use veil_core::number::{hex_literal, signed_hex_term};

/// Inclusive bounds of each random draw.
pub const RANDOM_MIN: i64 = 0;
pub const RANDOM_MAX: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationFormula {
    pub rotation_value: u32,
    pub random1: i32,
    pub random2: i32,
    /// Value of the runtime term for the generation-time hash.
    pub calculated: i32,
    /// `rotation_value - calculated`, exact.
    pub diff: i64,
    runtime_expression: String,
    adjustment: String,
}

impl RotationFormula {
    pub fn derive(
        rotation_value: u32,
        hash: i32,
        random1: i32,
        random2: i32,
        hash_name: &str,
    ) -> Self {
        let calculated = self_defense_term(hash, random1, random2);
        let diff = i64::from(rotation_value) - i64::from(calculated);
        Self {
            rotation_value,
            random1,
            random2,
            calculated,
            diff,
            runtime_expression: format!(
                "(((({hash_name}^{random1}) << 5) - {hash_name}^{random2})|0)"
            ),
            adjustment: signed_hex_term(diff),
        }
    }

    /// Source of the runtime term, referring to the hash variable by name.
    pub fn runtime_expression(&self) -> &str {
        &self.runtime_expression
    }

    /// Signed literal term, `+0x..` or `-0x..`.
    pub fn adjustment(&self) -> &str {
        &self.adjustment
    }

    /// Full argument expression: runtime term followed by the adjustment.
    pub fn expression(&self) -> String {
        format!("{}{}", self.runtime_expression, self.adjustment)
    }
}

/// Rotation argument when no self-defense is requested.
pub fn plain_rotate_value(rotation_value: u32) -> String {
    hex_literal(u64::from(rotation_value))
}
