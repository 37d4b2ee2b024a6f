pub mod custom_nodes;
pub mod numbers;
pub mod obfuscator;
pub mod pass;
pub mod rename;
pub mod rotation;
pub mod self_hosting;
pub mod string_array;
pub mod templates;

use thiserror::Error;
use veil_core::naming::{IdentifierNamesGenerator, identifier_names_generator};
use veil_core::random::{RandomGenerator, SeededRandomGenerator};
use veil_core::{ObfuscatorOptions, Program};

pub use obfuscator::{ObfuscationMetadata, ObfuscationResult, Obfuscator};
pub use string_array::storage::{StringArray, StringArrayStorage};

/// Transform error type encompassing all transform module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A custom node was initialized a second time.
    #[error("{node} is already initialized")]
    AlreadyInitialized {
        /// Name of the offending node.
        node: &'static str,
    },

    /// Core operation failed.
    #[error("core operation failed: {0}")]
    Core(#[from] veil_core::Error),

    /// A string literal could not be decoded.
    #[error("invalid string literal: {0}")]
    InvalidStringLiteral(String),

    /// A custom node was asked for its structure before initialization.
    #[error("{node} must be initialized before it can be realized")]
    NotInitialized {
        /// Name of the offending node.
        node: &'static str,
    },

    /// The engine rejected code it generated itself.
    #[error("self-hosted obfuscation failed: {0}")]
    SelfHosting(#[source] Box<Error>),
}

/// Transform result type
pub type Result<T> = std::result::Result<T, Error>;

/// Services and state shared by the transforms of one obfuscation run.
pub struct TransformContext {
    pub options: ObfuscatorOptions,
    pub naming: Box<dyn IdentifierNamesGenerator>,
    pub random: Box<dyn RandomGenerator>,
    /// Filled by the string array transform, consumed by the custom nodes.
    pub string_array: Option<StringArray>,
}

impl TransformContext {
    /// Builds the services selected by `options`, seeded from its seed.
    pub fn new(options: &ObfuscatorOptions) -> Self {
        let seed = options.resolve_seed();
        Self {
            options: options.clone(),
            naming: identifier_names_generator(options.identifier_names_generator, &seed),
            random: Box::new(SeededRandomGenerator::new(&seed)),
            string_array: None,
        }
    }

    /// Builds a context around explicitly supplied services.
    pub fn with_services(
        options: &ObfuscatorOptions,
        naming: Box<dyn IdentifierNamesGenerator>,
        random: Box<dyn RandomGenerator>,
    ) -> Self {
        Self {
            options: options.clone(),
            naming,
            random,
            string_array: None,
        }
    }
}

/// Trait for source obfuscation transforms.
pub trait Transform: Send + Sync {
    /// Returns the transform's name for logging and identification.
    fn name(&self) -> &'static str;
    /// Applies the transform to the program, returning whether changes were made.
    fn apply(&self, program: &mut Program, ctx: &mut TransformContext) -> Result<bool>;
}

/// The full obfuscation pipeline, as seen by code that re-enters it.
pub trait Engine {
    fn transform(&self, source: &str, options: &ObfuscatorOptions) -> Result<ObfuscationResult>;
}
