//! Circuit representation and validation.
//!
//! This module provides the [`Environment`]: the node registry and element
//! store of one circuit variant, and the assembler that scatters element
//! stamps into a [`SystemMatrix`](crate::solver::SystemMatrix).

mod environment;
mod types;
mod validate;

pub use environment::{Environment, NodeValues, StampKind};
pub use types::*;
pub use validate::validate_environment;
