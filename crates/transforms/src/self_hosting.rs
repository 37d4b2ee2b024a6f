//! Feeds generated source back through the engine.

use crate::{Engine, Error, Result};
use tracing::debug;
use veil_core::ObfuscatorOptions;

/// Obfuscates fragments the engine generated itself.
///
/// The inner run uses [`ObfuscatorOptions::no_additional_nodes`], so it can
/// never generate another fragment and re-enter again.
pub struct SelfHostingInvoker<'a> {
    engine: &'a dyn Engine,
}

impl<'a> SelfHostingInvoker<'a> {
    pub fn new(engine: &'a dyn Engine) -> Self {
        Self { engine }
    }

    /// Options of the inner run: the preset, plus the caller's naming
    /// strategy and seed.
    pub fn constraints(options: &ObfuscatorOptions) -> ObfuscatorOptions {
        ObfuscatorOptions {
            identifier_names_generator: options.identifier_names_generator,
            seed: options.seed,
            ..ObfuscatorOptions::no_additional_nodes()
        }
    }

    pub fn obfuscate(&self, fragment: &str, options: &ObfuscatorOptions) -> Result<String> {
        let constraints = Self::constraints(options);
        debug!("self-hosting {} bytes of generated source", fragment.len());
        let result = self
            .engine
            .transform(fragment, &constraints)
            .map_err(|e| Error::SelfHosting(Box::new(e)))?;
        Ok(result.obfuscated_code().to_string())
    }
}
