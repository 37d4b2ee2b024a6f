//! Checks that the code veil generates computes, at runtime, what the
//! generator computed ahead of time.

pub mod properties;
pub mod result;
pub mod semantics;

pub use properties::{
    check_rotation_round_trip, emitted_array, restore_rotation, rotation_argument, runtime_hash,
};
pub use result::{Error, Result};
pub use semantics::{Environment, evaluate};
