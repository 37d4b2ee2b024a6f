//! Nodes that synthesize program structure instead of rewriting it.
//!
//! A node is built with its services, initialized exactly once with the data
//! it works on, and then realized into statements any number of times.

pub mod rotate_function;
pub mod string_array;
pub mod string_array_hash;

pub use rotate_function::{RotationTarget, StringArrayRotateFunctionNode};
pub use string_array::StringArrayNode;
pub use string_array_hash::StringArrayHashNode;

use crate::{Error, Result};
use veil_core::Statement;

pub trait CustomNode {
    fn name(&self) -> &'static str;

    /// Builds the node's statements. Fails if the node was never initialized.
    fn realize(&mut self) -> Result<Vec<Statement>>;
}

/// Initialization state of a node. The payload only exists once initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeState<T> {
    Uninitialized,
    Initialized(T),
}

impl<T> Default for NodeState<T> {
    fn default() -> Self {
        NodeState::Uninitialized
    }
}

impl<T> NodeState<T> {
    /// Moves to `Initialized`. A second call fails.
    pub fn initialize(&mut self, node: &'static str, payload: T) -> Result<()> {
        match self {
            NodeState::Uninitialized => {
                *self = NodeState::Initialized(payload);
                Ok(())
            }
            NodeState::Initialized(_) => Err(Error::AlreadyInitialized { node }),
        }
    }

    pub fn get(&self, node: &'static str) -> Result<&T> {
        match self {
            NodeState::Initialized(payload) => Ok(payload),
            NodeState::Uninitialized => Err(Error::NotInitialized { node }),
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self, NodeState::Initialized(_))
    }
}
