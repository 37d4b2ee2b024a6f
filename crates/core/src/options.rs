//! Obfuscator options and presets.

use crate::result::Result;
use crate::seed::Seed;
use serde::{Deserialize, Serialize};

/// Strategy used to produce fresh identifier names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifierNamesGeneratorKind {
    /// `_0x` followed by six random hex digits.
    #[default]
    Hexadecimal,
    /// Short sequential names: `a`, `b`, ..., `aa`, ...
    Mangled,
}

/// Options of one obfuscation run. Read-only for every transform and node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObfuscatorOptions {
    /// Print the output without statement line breaks.
    pub compact: bool,
    /// Allow transforms to emit custom nodes (string array, hash, rotation bootstrap).
    pub custom_nodes: bool,
    pub identifier_names_generator: IdentifierNamesGeneratorKind,
    /// Rewrite decimal integer literals as hex literals.
    pub numbers_to_hex: bool,
    /// Rename function parameters and function-local bindings.
    pub rename_locals: bool,
    /// Rotate the string array and emit the runtime rotation bootstrap.
    pub rotate_string_array: bool,
    /// Seed for every random decision; `None` draws a fresh one per run.
    pub seed: Option<u64>,
    /// Make the rotation bootstrap depend on a runtime hash of the string array.
    pub self_defending: bool,
    /// Move string literals into a single array.
    pub string_array: bool,
}

impl Default for ObfuscatorOptions {
    fn default() -> Self {
        Self {
            compact: true,
            custom_nodes: true,
            identifier_names_generator: IdentifierNamesGeneratorKind::Hexadecimal,
            numbers_to_hex: true,
            rename_locals: true,
            rotate_string_array: true,
            seed: None,
            self_defending: false,
            string_array: true,
        }
    }
}

impl ObfuscatorOptions {
    /// Preset for code the engine generates itself: it must never lead to
    /// further custom nodes being generated.
    pub fn no_additional_nodes() -> Self {
        Self {
            compact: true,
            custom_nodes: false,
            identifier_names_generator: IdentifierNamesGeneratorKind::Hexadecimal,
            numbers_to_hex: true,
            rename_locals: true,
            rotate_string_array: false,
            seed: None,
            self_defending: false,
            string_array: false,
        }
    }

    /// Decodes options from JSON; missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The seed for this run.
    pub fn resolve_seed(&self) -> Seed {
        match self.seed {
            Some(value) => Seed::from_u64(value),
            None => Seed::generate(),
        }
    }
}
