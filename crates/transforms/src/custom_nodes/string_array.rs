//! Declaration of the string array in its emitted (rotated) order.

use super::{CustomNode, NodeState};
use crate::Result;
use crate::string_array::storage::StringArray;
use crate::templates::STRING_ARRAY;
use veil_core::template::Bindings;
use veil_core::{Statement, parse_to_statements};

const NODE: &str = "StringArrayNode";

#[derive(Default)]
pub struct StringArrayNode<'a> {
    state: NodeState<&'a StringArray>,
}

impl<'a> StringArrayNode<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&mut self, array: &'a StringArray) -> Result<()> {
        self.state.initialize(NODE, array)
    }
}

impl CustomNode for StringArrayNode<'_> {
    fn name(&self) -> &'static str {
        NODE
    }

    fn realize(&mut self) -> Result<Vec<Statement>> {
        let array = *self.state.get(NODE)?;
        let items = array
            .emitted()
            .map(|entry| entry.literal.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let code = STRING_ARRAY.render(
            &Bindings::new()
                .bind("stringArrayName", array.name())
                .bind("items", &items),
        )?;
        Ok(parse_to_statements(&code)?)
    }
}
