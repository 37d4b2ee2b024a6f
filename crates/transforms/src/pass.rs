use crate::Result;
use crate::{Transform, TransformContext};
use tracing::info;
use veil_core::Program;

/// Trait for running a sequence of obfuscation transforms on a program.
pub trait Pass {
    /// Runs `transforms` in order and returns the names of those that changed the program.
    fn run(
        &self,
        program: &mut Program,
        transforms: &[Box<dyn Transform>],
        ctx: &mut TransformContext,
    ) -> Result<Vec<&'static str>>;
}

/// Default implementation of the Pass trait.
pub struct DefaultPass;

impl Pass for DefaultPass {
    fn run(
        &self,
        program: &mut Program,
        transforms: &[Box<dyn Transform>],
        ctx: &mut TransformContext,
    ) -> Result<Vec<&'static str>> {
        let mut applied = Vec::new();

        for transform in transforms {
            let before = program.token_count();
            let mut snapshot = program.clone();

            let mutated = transform.apply(&mut snapshot, ctx)?;
            if !mutated {
                continue;
            }

            let after = snapshot.token_count();
            let delta = after as i64 - before as i64;

            info!("{:>18} Δ{:+} tokens", transform.name(), delta);
            *program = snapshot;
            applied.push(transform.name());
        }
        Ok(applied)
    }
}
