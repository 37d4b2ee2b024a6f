//! Storage of the extracted string literals.

use crate::{Error, Result};
use std::collections::HashMap;
use veil_core::int32::hash_step;

/// Read access to the string array consumed by the custom nodes.
pub trait StringArrayStorage {
    /// Hash of the array contents in emitted order, as recomputed at runtime.
    fn hash(&self) -> i32;
}

/// One stored literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArrayEntry {
    /// Source text of the literal, quotes included.
    pub literal: String,
    /// Decoded value as UTF-16 code units, the unit `charCodeAt` reports.
    pub units: Vec<u16>,
}

/// String literals in the order they were first seen, plus the rotation the
/// emitted array is shifted by.
#[derive(Debug, Clone)]
pub struct StringArray {
    name: String,
    entries: Vec<StringArrayEntry>,
    index: HashMap<String, usize>,
    rotation: usize,
}

impl StringArray {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            index: HashMap::new(),
            rotation: 0,
        }
    }

    /// Identifier the array is declared under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `literal` and returns its index; equal literals share an index.
    pub fn insert(&mut self, literal: &str) -> Result<usize> {
        if let Some(&index) = self.index.get(literal) {
            return Ok(index);
        }
        let units = decode_string_literal(literal)?;
        let index = self.entries.len();
        self.entries.push(StringArrayEntry {
            literal: literal.to_string(),
            units,
        });
        self.index.insert(literal.to_string(), index);
        Ok(index)
    }

    /// Shifts the emitted order right by `times`, so that shifting the runtime
    /// array left `times` times restores the original indices.
    pub fn rotate(&mut self, times: u32) {
        if self.entries.is_empty() {
            return;
        }
        self.rotation = times as usize % self.entries.len();
    }

    /// Entries in the order they are emitted.
    pub fn emitted(&self) -> impl Iterator<Item = &StringArrayEntry> {
        let len = self.entries.len();
        (0..len).map(move |position| &self.entries[(position + len - self.rotation) % len])
    }

    /// Entry at its original index.
    pub fn get(&self, index: usize) -> Option<&StringArrayEntry> {
        self.entries.get(index)
    }
}

impl StringArrayStorage for StringArray {
    fn hash(&self) -> i32 {
        self.emitted()
            .flat_map(|entry| entry.units.iter().copied())
            .fold(0, hash_step)
    }
}

/// Decodes a quoted JS string literal into UTF-16 code units.
pub fn decode_string_literal(literal: &str) -> Result<Vec<u16>> {
    let invalid = || Error::InvalidStringLiteral(literal.to_string());
    let mut chars = literal.chars();
    let quote = chars.next().ok_or_else(invalid)?;
    if !matches!(quote, '\'' | '"') || !literal.ends_with(quote) || literal.len() < 2 {
        return Err(invalid());
    }
    let body: Vec<char> = literal[1..literal.len() - 1].chars().collect();

    let mut units = Vec::with_capacity(body.len());
    let mut buf = [0u16; 2];
    let mut i = 0;
    while i < body.len() {
        let c = body[i];
        i += 1;
        if c != '\\' {
            units.extend_from_slice(c.encode_utf16(&mut buf));
            continue;
        }
        let escape = *body.get(i).ok_or_else(invalid)?;
        i += 1;
        match escape {
            'n' => units.push(0x0a),
            'r' => units.push(0x0d),
            't' => units.push(0x09),
            'b' => units.push(0x08),
            'f' => units.push(0x0c),
            'v' => units.push(0x0b),
            'x' => {
                let digits: String = body.get(i..i + 2).ok_or_else(invalid)?.iter().collect();
                units.push(u16::from_str_radix(&digits, 16).map_err(|_| invalid())?);
                i += 2;
            }
            'u' if body.get(i) == Some(&'{') => {
                let close = body[i..].iter().position(|&c| c == '}').ok_or_else(invalid)?;
                let digits: String = body[i + 1..i + close].iter().collect();
                let code = u32::from_str_radix(&digits, 16).map_err(|_| invalid())?;
                let c = char::from_u32(code).ok_or_else(invalid)?;
                units.extend_from_slice(c.encode_utf16(&mut buf));
                i += close + 1;
            }
            'u' => {
                let digits: String = body.get(i..i + 4).ok_or_else(invalid)?.iter().collect();
                units.push(u16::from_str_radix(&digits, 16).map_err(|_| invalid())?);
                i += 4;
            }
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                let max_len = if escape <= '3' { 3 } else { 2 };
                let mut len = 1;
                while len < max_len
                    && let Some(digit) = body.get(i).and_then(|c| c.to_digit(8))
                {
                    value = value * 8 + digit;
                    i += 1;
                    len += 1;
                }
                units.push(value as u16);
            }
            '\r' => {
                if body.get(i) == Some(&'\n') {
                    i += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => units.extend_from_slice(other.encode_utf16(&mut buf)),
        }
    }
    Ok(units)
}
