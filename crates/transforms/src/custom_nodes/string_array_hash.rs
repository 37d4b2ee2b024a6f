//! Runtime recomputation of the string array hash.

use super::{CustomNode, NodeState};
use crate::self_hosting::SelfHostingInvoker;
use crate::templates::STRING_ARRAY_HASH;
use crate::{Engine, Result};
use veil_core::template::Bindings;
use veil_core::{ObfuscatorOptions, Statement, parse_to_statements};

const NODE: &str = "StringArrayHashNode";

struct HashTarget {
    array_name: String,
    hash_name: String,
}

/// Declares the hash variable the self-defending bootstrap reads.
pub struct StringArrayHashNode<'a> {
    invoker: SelfHostingInvoker<'a>,
    options: &'a ObfuscatorOptions,
    state: NodeState<HashTarget>,
}

impl<'a> StringArrayHashNode<'a> {
    pub fn new(engine: &'a dyn Engine, options: &'a ObfuscatorOptions) -> Self {
        Self {
            invoker: SelfHostingInvoker::new(engine),
            options,
            state: NodeState::Uninitialized,
        }
    }

    pub fn initialize(
        &mut self,
        array_name: impl Into<String>,
        hash_name: impl Into<String>,
    ) -> Result<()> {
        self.state.initialize(
            NODE,
            HashTarget {
                array_name: array_name.into(),
                hash_name: hash_name.into(),
            },
        )
    }
}

impl CustomNode for StringArrayHashNode<'_> {
    fn name(&self) -> &'static str {
        NODE
    }

    fn realize(&mut self) -> Result<Vec<Statement>> {
        let target = self.state.get(NODE)?;
        let fragment = STRING_ARRAY_HASH.render(
            &Bindings::new()
                .bind("stringArrayHashName", &target.hash_name)
                .bind("stringArrayName", &target.array_name),
        )?;
        let code = self.invoker.obfuscate(&fragment, self.options)?;
        Ok(parse_to_statements(&code)?)
    }
}
