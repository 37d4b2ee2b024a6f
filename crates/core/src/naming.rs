//! Identifier name generators.

use crate::options::IdentifierNamesGeneratorKind;
use crate::seed::Seed;
use crate::token::is_reserved_word;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::HashSet;

/// Produces fresh, collision-free identifier names.
pub trait IdentifierNamesGenerator: Send {
    fn generate(&mut self) -> String;

    /// Marks `name` as taken so it is never generated.
    fn reserve(&mut self, name: &str);
}

/// Builds the generator selected by the options.
pub fn identifier_names_generator(
    kind: IdentifierNamesGeneratorKind,
    seed: &Seed,
) -> Box<dyn IdentifierNamesGenerator> {
    match kind {
        IdentifierNamesGeneratorKind::Hexadecimal => {
            Box::new(HexadecimalIdentifierNamesGenerator::new(seed))
        }
        IdentifierNamesGeneratorKind::Mangled => Box::new(MangledIdentifierNamesGenerator::new()),
    }
}

pub struct HexadecimalIdentifierNamesGenerator {
    rng: StdRng,
    used: HashSet<String>,
}

impl HexadecimalIdentifierNamesGenerator {
    pub fn new(seed: &Seed) -> Self {
        Self {
            rng: seed.create_deterministic_rng(),
            used: HashSet::new(),
        }
    }
}

impl IdentifierNamesGenerator for HexadecimalIdentifierNamesGenerator {
    fn generate(&mut self) -> String {
        loop {
            let name = format!("_0x{:06x}", self.rng.random_range(0..=0xff_ffffu32));
            if self.used.insert(name.clone()) {
                return name;
            }
        }
    }

    fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }
}

const MANGLED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Default)]
pub struct MangledIdentifierNamesGenerator {
    next: usize,
    used: HashSet<String>,
}

impl MangledIdentifierNamesGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Bijective base-52 name of `index`: 0 is `a`, 51 is `Z`, 52 is `aa`.
fn mangled_name(mut index: usize) -> String {
    let base = MANGLED_ALPHABET.len();
    let mut name = Vec::new();
    loop {
        name.push(MANGLED_ALPHABET[index % base]);
        if index < base {
            break;
        }
        index = index / base - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

impl IdentifierNamesGenerator for MangledIdentifierNamesGenerator {
    fn generate(&mut self) -> String {
        loop {
            let name = mangled_name(self.next);
            self.next += 1;
            if !is_reserved_word(&name) && self.used.insert(name.clone()) {
                return name;
            }
        }
    }

    fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_string());
    }
}
