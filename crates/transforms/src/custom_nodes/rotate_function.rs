//! Runtime bootstrap that rotates the string array back into place.

use super::{CustomNode, NodeState};
use crate::rotation::{RANDOM_MAX, RANDOM_MIN, RotationFormula, plain_rotate_value};
use crate::self_hosting::SelfHostingInvoker;
use crate::string_array::storage::StringArrayStorage;
use crate::templates::{PLAIN_ADVANCE, SELF_DEFENDING, STRING_ARRAY_ROTATE_FUNCTION};
use crate::{Engine, Result};
use tracing::debug;
use veil_core::naming::IdentifierNamesGenerator;
use veil_core::random::RandomGenerator;
use veil_core::template::Bindings;
use veil_core::{ObfuscatorOptions, Statement, parse_to_statements};

const NODE: &str = "StringArrayRotateFunctionNode";

/// What the bootstrap rotates and by how much.
pub struct RotationTarget<'a> {
    pub storage: &'a dyn StringArrayStorage,
    pub array_name: String,
    pub hash_name: String,
    pub rotate_value: u32,
}

pub struct StringArrayRotateFunctionNode<'a> {
    naming: &'a mut dyn IdentifierNamesGenerator,
    random: &'a mut dyn RandomGenerator,
    invoker: SelfHostingInvoker<'a>,
    options: &'a ObfuscatorOptions,
    state: NodeState<RotationTarget<'a>>,
}

impl<'a> StringArrayRotateFunctionNode<'a> {
    pub fn new(
        naming: &'a mut dyn IdentifierNamesGenerator,
        random: &'a mut dyn RandomGenerator,
        engine: &'a dyn Engine,
        options: &'a ObfuscatorOptions,
    ) -> Self {
        Self {
            naming,
            random,
            invoker: SelfHostingInvoker::new(engine),
            options,
            state: NodeState::Uninitialized,
        }
    }

    pub fn initialize(
        &mut self,
        storage: &'a dyn StringArrayStorage,
        array_name: impl Into<String>,
        hash_name: impl Into<String>,
        rotate_value: u32,
    ) -> Result<()> {
        self.state.initialize(
            NODE,
            RotationTarget {
                storage,
                array_name: array_name.into(),
                hash_name: hash_name.into(),
                rotate_value,
            },
        )
    }

    fn draw(&mut self) -> i32 {
        // Bounds fit in i32; the clamp only guards injected generators.
        self.random
            .random_integer(RANDOM_MIN, RANDOM_MAX)
            .clamp(RANDOM_MIN, RANDOM_MAX) as i32
    }

    /// Renders the bootstrap source before it goes through the engine.
    ///
    /// Every call generates fresh counter and helper names and, with
    /// self-defense on, draws a fresh random pair.
    pub fn render_template(&mut self) -> Result<String> {
        let target = self.state.get(NODE)?;
        let (storage, hash_name, rotate_value) =
            (target.storage, target.hash_name.clone(), target.rotate_value);

        let times_name = self.naming.generate();
        let while_function_name = self.naming.generate();
        let expected = plain_rotate_value(rotate_value);

        let (rotate_argument, code) = if self.options.self_defending {
            let hash = storage.hash();
            let random1 = self.draw();
            let random2 = self.draw();
            let formula = RotationFormula::derive(rotate_value, hash, random1, random2, &hash_name);
            debug!(
                "{}: hash {} calculated {} diff {}",
                NODE, hash, formula.calculated, formula.diff
            );
            let code = SELF_DEFENDING.render(
                &Bindings::new()
                    .bind("expectedRotateValue", &expected)
                    .bind("whileFunctionName", &while_function_name)
                    .bind("timesName", &times_name),
            )?;
            (formula.expression(), code)
        } else {
            let code = PLAIN_ADVANCE.render(
                &Bindings::new()
                    .bind("whileFunctionName", &while_function_name)
                    .bind("timesName", &times_name),
            )?;
            (expected.clone(), code)
        };

        let array_name = &self.state.get(NODE)?.array_name;
        Ok(STRING_ARRAY_ROTATE_FUNCTION.render(
            &Bindings::new()
                .bind("code", &code)
                .bind("timesName", &times_name)
                .bind("stringArrayName", array_name)
                .bind("stringArrayRotateValue", &rotate_argument)
                .bind("whileFunctionName", &while_function_name),
        )?)
    }
}

impl CustomNode for StringArrayRotateFunctionNode<'_> {
    fn name(&self) -> &'static str {
        NODE
    }

    fn realize(&mut self) -> Result<Vec<Statement>> {
        let fragment = self.render_template()?;
        let code = self.invoker.obfuscate(&fragment, self.options)?;
        Ok(parse_to_statements(&code)?)
    }
}
